//! The data connection orchestrator.
//!
//! A [`DataConnection`] owns its negotiator and, once handed over, its data
//! channel. Channel callbacks arrive as [`ChannelEvent`]s and are processed
//! one at a time, so connection state is never mutated concurrently.

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::chunk::Chunker;
use crate::core::{ChannelError, ConnectionError, IdGenerator, RandomIdGenerator};
use crate::serialization::{Payload, PayloadEncoder, Serialization};
use crate::sizing::determine_max_message_size;

use super::channel::{ChannelEvent, ChannelEventSink, ChannelInitializer, DataChannel};
use super::events::{ConnectionEvent, ConnectionEvents, EventEmitter};
use super::lifecycle::{ConnectionPhase, Lifecycle, Transition, TransitionOutcome};
use super::message::{ServerMessage, ServerMessageType};
use super::negotiator::{NegotiationPayload, Negotiator, SdpType};
use super::options::{CloseOptions, ConnectionOptions};
use super::registry::RegistryHandle;

/// A single logical data connection to a remote peer.
///
/// # Example
///
/// ```ignore
/// let (mut conn, mut events) = DataConnection::connect(
///     "remote-peer",
///     RegistryHandle::new(&registry),
///     Box::new(negotiator),
///     ConnectionOptions::builder().reliable(true).build(),
/// )
/// .await;
///
/// loop {
///     tokio::select! {
///         running = conn.next_event() => if !running { break },
///         Some(event) = events.recv() => {
///             if let ConnectionEvent::Open { .. } = event {
///                 conn.send("hello", false);
///             }
///         }
///     }
/// }
/// ```
pub struct DataConnection {
    connection_id: String,
    label: String,
    peer_id: String,
    reliable: bool,
    metadata: Option<Value>,

    encoder: Box<dyn PayloadEncoder>,
    chunker: Chunker,
    lifecycle: Lifecycle,

    negotiator: Option<Box<dyn Negotiator>>,
    channel: Option<Box<dyn DataChannel>>,
    registry: Option<RegistryHandle>,

    /// Shared by the initializer and every channel sink.
    channel_tx: mpsc::UnboundedSender<ChannelEvent>,
    channel_rx: mpsc::UnboundedReceiver<ChannelEvent>,
    events: EventEmitter,
}

impl DataConnection {
    /// Create a connection to `peer_id` and ask the negotiator to establish
    /// the channel.
    ///
    /// Never fails locally; negotiator failures are reported as
    /// [`ConnectionEvent::Error`] on the returned receiver.
    pub async fn connect(
        peer_id: impl Into<String>,
        registry: RegistryHandle,
        negotiator: Box<dyn Negotiator>,
        options: ConnectionOptions,
    ) -> (Self, ConnectionEvents) {
        let connection_id = options
            .connection_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| generate_id(options.id_generator.as_ref()));
        let label = options
            .label
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| connection_id.clone());
        let payload = options
            .payload
            .unwrap_or_else(|| NegotiationPayload::originator(options.reliable));
        if payload.reliable != options.reliable {
            debug!(
                event = "reliability_from_payload",
                connection_id = %connection_id,
                reliable = payload.reliable,
                "Negotiation payload overrides reliability option"
            );
        }

        let (channel_tx, channel_rx) = mpsc::unbounded_channel();
        let (events, receiver) = ConnectionEvents::channel();

        let mut connection = Self {
            connection_id,
            label,
            peer_id: peer_id.into(),
            reliable: payload.reliable,
            metadata: options.metadata,
            encoder: options.serialization.encoder(),
            chunker: Chunker::default(),
            lifecycle: Lifecycle::new(),
            negotiator: Some(negotiator),
            channel: None,
            registry: Some(registry),
            channel_tx,
            channel_rx,
            events,
        };

        connection.start(payload).await;
        (connection, receiver)
    }

    async fn start(&mut self, payload: NegotiationPayload) {
        debug!(
            event = "negotiation_start",
            connection_id = %self.connection_id,
            peer_id = %self.peer_id,
            originator = payload.originator,
            reliable = payload.reliable,
            "Starting channel negotiation"
        );

        let initializer = ChannelInitializer::new(self.channel_tx.clone());
        let Some(negotiator) = self.negotiator.as_mut() else {
            return;
        };
        if let Err(err) = negotiator.start_connection(payload, initializer).await {
            warn!(
                event = "negotiation_failed",
                connection_id = %self.connection_id,
                %err,
                "Negotiator failed to start"
            );
            self.events.error(err.into());
        }
    }

    /// Connection identifier.
    pub fn connection_id(&self) -> &str {
        &self.connection_id
    }

    /// Connection label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Remote peer identifier.
    pub fn peer_id(&self) -> &str {
        &self.peer_id
    }

    /// Whether reliable delivery was requested.
    ///
    /// Reflects the negotiation payload the connection was started with.
    pub fn reliable(&self) -> bool {
        self.reliable
    }

    /// Application metadata.
    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }

    /// Wire format.
    pub fn serialization(&self) -> Serialization {
        self.encoder.serialization()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> ConnectionPhase {
        self.lifecycle.phase()
    }

    /// Check if the connection is open.
    pub fn is_open(&self) -> bool {
        self.lifecycle.is_open()
    }

    /// Check if the connection is closed.
    pub fn is_closed(&self) -> bool {
        self.lifecycle.is_closed()
    }

    /// Negotiated maximum message size.
    pub fn max_message_size(&self) -> usize {
        self.lifecycle.max_message_size()
    }

    /// Check if a data channel has been handed over.
    pub fn has_channel(&self) -> bool {
        self.channel.is_some()
    }

    /// Check if the negotiator is still held.
    pub fn has_negotiator(&self) -> bool {
        self.negotiator.is_some()
    }

    // ── Channel events ──────────────────────────────────────────────────

    /// Wait for and process the next channel event.
    ///
    /// Returns `false` once the connection is closed.
    pub async fn next_event(&mut self) -> bool {
        if self.lifecycle.is_closed() {
            self.drain_channel_events();
            return false;
        }
        match self.channel_rx.recv().await {
            Some(event) => {
                self.handle_channel_event(event).await;
                !self.lifecycle.is_closed()
            }
            None => false,
        }
    }

    /// Process channel events until the connection closes.
    pub async fn run(&mut self) {
        while self.next_event().await {}
    }

    /// Process one channel event.
    pub async fn handle_channel_event(&mut self, event: ChannelEvent) {
        match event {
            ChannelEvent::Initialized(channel) => self.initialize_channel(channel),
            ChannelEvent::Open => self.on_channel_open().await,
            ChannelEvent::Message(data) => self.on_channel_message(&data),
            ChannelEvent::Closed => self.on_channel_closed(),
        }
    }

    fn initialize_channel(&mut self, mut channel: Box<dyn DataChannel>) {
        if self.lifecycle.is_closed() {
            debug!(
                event = "channel_after_close",
                connection_id = %self.connection_id,
                "Dropping channel handed over after close"
            );
            return;
        }
        if self.channel.is_some() {
            warn!(
                event = "channel_already_initialized",
                connection_id = %self.connection_id,
                channel = channel.label(),
                "Ignoring second data channel"
            );
            return;
        }

        channel.bind(ChannelEventSink::new(self.channel_tx.clone()));
        debug!(
            event = "channel_initialized",
            connection_id = %self.connection_id,
            channel = channel.label(),
            "Data channel bound"
        );
        self.channel = Some(channel);
    }

    async fn on_channel_open(&mut self) {
        if let Err(err) = self.lifecycle.apply(Transition::ChannelReady) {
            debug!(
                event = "channel_open_ignored",
                connection_id = %self.connection_id,
                %err,
                "Ignoring channel ready signal"
            );
            return;
        }

        let negotiated = match self.channel.as_deref() {
            Some(channel) => {
                let local = channel.local_description().await;
                let remote = channel.remote_description().await;
                determine_max_message_size(local.as_deref(), remote.as_deref())
            }
            None => self.lifecycle.max_message_size(),
        };
        if let Ok(size) = self.lifecycle.record_max_message_size(negotiated) {
            self.chunker.set_threshold(size);
        }

        info!(
            event = "connection_open",
            connection_id = %self.connection_id,
            peer_id = %self.peer_id,
            max_message_size = self.lifecycle.max_message_size(),
            "Data connection open"
        );
        self.events.emit(ConnectionEvent::Open {
            max_message_size: self.lifecycle.max_message_size(),
        });
    }

    /// Inbound data is logged and not delivered.
    fn on_channel_message(&mut self, data: &[u8]) {
        trace!(
            event = "channel_message",
            connection_id = %self.connection_id,
            bytes = data.len(),
            open = self.lifecycle.is_open(),
            "Received data channel message"
        );
    }

    fn on_channel_closed(&mut self) {
        debug!(
            event = "channel_closed",
            connection_id = %self.connection_id,
            "Data channel closed by transport"
        );
        self.teardown();
    }

    // ── Operations ──────────────────────────────────────────────────────

    /// Send `data` to the remote peer.
    ///
    /// `chunked` marks data the caller already sized for the channel. Before
    /// the connection is open this emits [`ConnectionError::NotOpenYet`] and
    /// sends nothing.
    pub fn send(&mut self, data: impl Into<Payload>, chunked: bool) {
        let payload = data.into();

        if !self.lifecycle.is_open() {
            debug!(
                event = "send_not_open",
                connection_id = %self.connection_id,
                phase = ?self.lifecycle.phase(),
                "Send attempted before connection is open"
            );
            self.events.error(ConnectionError::NotOpenYet);
            return;
        }

        let Some(channel) = self.channel.as_mut() else {
            self.events.error(ChannelError::Closed.into());
            return;
        };

        let frames = match self.encoder.encode(&payload, chunked, &mut self.chunker) {
            Ok(frames) => frames,
            Err(err) => {
                warn!(
                    event = "encode_failed",
                    connection_id = %self.connection_id,
                    %err,
                    "Payload rejected"
                );
                self.events.error(err);
                return;
            }
        };

        let count = frames.len();
        for frame in frames {
            if let Err(err) = channel.send(frame) {
                warn!(
                    event = "channel_send_failed",
                    connection_id = %self.connection_id,
                    %err,
                    "Data channel rejected frame"
                );
                self.events.error(err.into());
                return;
            }
        }

        trace!(
            event = "payload_sent",
            connection_id = %self.connection_id,
            frames = count,
            "Payload queued on data channel"
        );
    }

    /// Close the connection and release everything it owns.
    pub fn close(&mut self) {
        self.close_with(CloseOptions::default());
    }

    /// Close with options.
    ///
    /// A flush-close only sends the close control payload to the remote
    /// peer; it does not tear anything down locally.
    pub fn close_with(&mut self, options: CloseOptions) {
        if options.flush {
            debug!(
                event = "flush_close",
                connection_id = %self.connection_id,
                "Asking remote peer to close"
            );
            self.send(Payload::close_control(), false);
            return;
        }
        self.teardown();
    }

    fn teardown(&mut self) {
        let was_open = match self.lifecycle.apply(Transition::Close) {
            Ok(TransitionOutcome::Closed { was_open }) => was_open,
            _ => return,
        };

        if let Some(mut negotiator) = self.negotiator.take() {
            negotiator.cleanup();
        }
        if let Some(registry) = self.registry.take() {
            if !registry.remove(&self.peer_id, &self.connection_id) {
                debug!(
                    event = "registry_gone",
                    connection_id = %self.connection_id,
                    "Registry dropped before connection closed"
                );
            }
        }
        if let Some(mut channel) = self.channel.take() {
            channel.unbind();
        }
        self.drain_channel_events();

        if !was_open {
            debug!(
                event = "connection_abandoned",
                connection_id = %self.connection_id,
                "Closed before opening"
            );
            return;
        }

        info!(
            event = "connection_closed",
            connection_id = %self.connection_id,
            peer_id = %self.peer_id,
            "Data connection closed"
        );
        self.events.emit(ConnectionEvent::Close);
    }

    /// Drop channel events queued before close, including channels the
    /// negotiator handed over but the event loop never bound.
    fn drain_channel_events(&mut self) {
        while let Ok(event) = self.channel_rx.try_recv() {
            if let ChannelEvent::Initialized(channel) = event {
                debug!(
                    event = "channel_after_close",
                    connection_id = %self.connection_id,
                    channel = channel.label(),
                    "Dropping unbound channel on close"
                );
            }
        }
    }

    // ── Negotiation messages ────────────────────────────────────────────

    /// Route an inbound negotiation message to the negotiator.
    ///
    /// Answers and candidates are forwarded; everything else is logged and
    /// dropped.
    pub async fn handle_message(&mut self, message: ServerMessage) {
        let ServerMessage { kind, payload, .. } = message;

        let Some(negotiator) = self.negotiator.as_mut() else {
            debug!(
                event = "message_after_close",
                connection_id = %self.connection_id,
                kind = ?kind,
                "Dropping negotiation message"
            );
            return;
        };

        let result = match kind {
            ServerMessageType::Answer => match payload.sdp {
                Some(description) => negotiator.handle_sdp(SdpType::Answer, description).await,
                None => {
                    warn!(
                        event = "answer_without_sdp",
                        connection_id = %self.connection_id,
                        "Dropping answer without session description"
                    );
                    return;
                }
            },
            ServerMessageType::Candidate => match payload.candidate {
                Some(candidate) => negotiator.handle_candidate(candidate).await,
                None => {
                    warn!(
                        event = "candidate_missing",
                        connection_id = %self.connection_id,
                        "Dropping candidate message without candidate"
                    );
                    return;
                }
            },
            other => {
                warn!(
                    event = "unrecognized_message",
                    connection_id = %self.connection_id,
                    kind = ?other,
                    "Unrecognized message type"
                );
                return;
            }
        };

        if let Err(err) = result {
            warn!(
                event = "negotiation_failed",
                connection_id = %self.connection_id,
                kind = ?kind,
                %err,
                "Negotiator rejected message"
            );
            self.events.error(err.into());
        }
    }

    /// Parse a JSON negotiation message and route it.
    ///
    /// Unparseable text is logged and dropped.
    pub async fn handle_raw_message(&mut self, text: &str) {
        match ServerMessage::from_json(text) {
            Ok(message) => self.handle_message(message).await,
            Err(err) => warn!(
                event = "malformed_message",
                connection_id = %self.connection_id,
                %err,
                "Dropping malformed negotiation message"
            ),
        }
    }
}

/// Generate a connection id, falling back to random ids when `generator`
/// yields an empty one.
fn generate_id(generator: &dyn IdGenerator) -> String {
    let id = generator.generate();
    if !id.is_empty() {
        return id;
    }
    warn!(
        event = "empty_generated_id",
        "Id generator returned an empty id, using a random one"
    );
    RandomIdGenerator::new().generate()
}

impl std::fmt::Debug for DataConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataConnection")
            .field("connection_id", &self.connection_id)
            .field("label", &self.label)
            .field("peer_id", &self.peer_id)
            .field("reliable", &self.reliable)
            .field("serialization", &self.serialization())
            .field("phase", &self.lifecycle.phase())
            .field("max_message_size", &self.lifecycle.max_message_size())
            .finish_non_exhaustive()
    }
}
