//! Connection notifications.

use tokio::sync::mpsc;

use crate::core::ConnectionError;

/// Notification emitted by a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The connection opened; the message size is already negotiated.
    Open {
        /// Negotiated maximum message size.
        max_message_size: usize,
    },
    /// The connection closed after having been open.
    Close,
    /// An operation failed.
    Error(ConnectionError),
}

/// Sending half, held by the connection.
#[derive(Debug, Clone)]
pub(crate) struct EventEmitter {
    tx: mpsc::UnboundedSender<ConnectionEvent>,
}

impl EventEmitter {
    /// Emit an event; dropped silently when nobody listens.
    pub(crate) fn emit(&self, event: ConnectionEvent) {
        let _ = self.tx.send(event);
    }

    pub(crate) fn error(&self, error: ConnectionError) {
        self.emit(ConnectionEvent::Error(error));
    }
}

/// Receiving half of a connection's notifications.
#[derive(Debug)]
pub struct ConnectionEvents {
    rx: mpsc::UnboundedReceiver<ConnectionEvent>,
}

impl ConnectionEvents {
    pub(crate) fn channel() -> (EventEmitter, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (EventEmitter { tx }, Self { rx })
    }

    /// Wait for the next event.
    ///
    /// Returns `None` once the connection is dropped and all events drained.
    pub async fn recv(&mut self) -> Option<ConnectionEvent> {
        self.rx.recv().await
    }

    /// Take the next event if one is queued.
    pub fn try_recv(&mut self) -> Option<ConnectionEvent> {
        self.rx.try_recv().ok()
    }

    /// Take every queued event.
    pub fn drain(&mut self) -> Vec<ConnectionEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.try_recv() {
            events.push(event);
        }
        events
    }
}
