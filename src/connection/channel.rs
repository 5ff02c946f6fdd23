//! Underlying data channel contract.
//!
//! The channel is created by the negotiator and handed to the connection
//! through a [`ChannelInitializer`]. Its three callback slots (ready,
//! message, closed) are modelled as a [`ChannelEventSink`] the connection
//! binds once and unbinds on close.

use std::fmt;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::ChannelError;

/// Callbacks from the channel, processed in order by the connection.
pub enum ChannelEvent {
    /// The negotiator created the channel for this connection.
    Initialized(Box<dyn DataChannel>),
    /// The channel is ready to carry messages.
    Open,
    /// A message arrived on the channel.
    Message(Vec<u8>),
    /// The channel closed.
    Closed,
}

impl fmt::Debug for ChannelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initialized(channel) => f
                .debug_tuple("Initialized")
                .field(&channel.label())
                .finish(),
            Self::Open => f.write_str("Open"),
            Self::Message(data) => f.debug_tuple("Message").field(&data.len()).finish(),
            Self::Closed => f.write_str("Closed"),
        }
    }
}

/// Callback slots of a bound channel.
///
/// Every method returns `false` once the connection is gone.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<ChannelEvent>,
}

impl ChannelEventSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<ChannelEvent>) -> Self {
        Self { tx }
    }

    /// Report that the channel is ready.
    pub fn opened(&self) -> bool {
        self.tx.send(ChannelEvent::Open).is_ok()
    }

    /// Report an inbound message.
    pub fn message(&self, data: Vec<u8>) -> bool {
        self.tx.send(ChannelEvent::Message(data)).is_ok()
    }

    /// Report that the channel closed.
    pub fn closed(&self) -> bool {
        self.tx.send(ChannelEvent::Closed).is_ok()
    }
}

/// Initialize-channel callback given to the negotiator.
#[derive(Debug, Clone)]
pub struct ChannelInitializer {
    tx: mpsc::UnboundedSender<ChannelEvent>,
}

impl ChannelInitializer {
    pub(crate) fn new(tx: mpsc::UnboundedSender<ChannelEvent>) -> Self {
        Self { tx }
    }

    /// Hand the negotiated channel to the connection.
    pub fn initialize(&self, channel: Box<dyn DataChannel>) -> bool {
        self.tx.send(ChannelEvent::Initialized(channel)).is_ok()
    }
}

/// A size-limited, possibly unreliable message channel to the remote peer.
#[async_trait]
pub trait DataChannel: Send + Sync {
    /// Channel label.
    fn label(&self) -> &str;

    /// Attach the connection's callbacks.
    fn bind(&mut self, sink: ChannelEventSink);

    /// Detach the callbacks; no events may be reported afterwards.
    fn unbind(&mut self);

    /// Queue one message for the remote peer.
    fn send(&mut self, frame: Vec<u8>) -> Result<(), ChannelError>;

    /// Local session description, once available.
    async fn local_description(&self) -> Option<String>;

    /// Remote session description, once available.
    async fn remote_description(&self) -> Option<String>;
}
