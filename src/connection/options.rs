//! Connection options.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::core::{IdGenerator, RandomIdGenerator};
use crate::serialization::Serialization;

use super::negotiator::NegotiationPayload;

/// Options fixed at connection creation.
#[derive(Clone)]
pub struct ConnectionOptions {
    /// Connection identifier; generated when absent or empty.
    pub connection_id: Option<String>,

    /// Human-readable label; defaults to the connection id.
    pub label: Option<String>,

    /// Wire format.
    pub serialization: Serialization,

    /// Request ordered, fully reliable delivery.
    ///
    /// A supplied [`payload`](Self::payload) carries its own flag, which wins.
    pub reliable: bool,

    /// Opaque application metadata.
    pub metadata: Option<Value>,

    /// Negotiation payload; defaults to an originator payload.
    pub payload: Option<NegotiationPayload>,

    /// Source of generated connection ids.
    pub id_generator: Arc<dyn IdGenerator>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            connection_id: None,
            label: None,
            serialization: Serialization::default(),
            reliable: false,
            metadata: None,
            payload: None,
            id_generator: Arc::new(RandomIdGenerator::new()),
        }
    }
}

impl fmt::Debug for ConnectionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionOptions")
            .field("connection_id", &self.connection_id)
            .field("label", &self.label)
            .field("serialization", &self.serialization)
            .field("reliable", &self.reliable)
            .field("metadata", &self.metadata)
            .field("payload", &self.payload)
            .finish_non_exhaustive()
    }
}

impl ConnectionOptions {
    /// Start building options.
    pub fn builder() -> ConnectionOptionsBuilder {
        ConnectionOptionsBuilder::new()
    }
}

/// Builder for [`ConnectionOptions`].
#[derive(Debug, Default)]
pub struct ConnectionOptionsBuilder {
    options: ConnectionOptions,
}

impl ConnectionOptionsBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connection id.
    pub fn connection_id(mut self, id: impl Into<String>) -> Self {
        self.options.connection_id = Some(id.into());
        self
    }

    /// Set the label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.options.label = Some(label.into());
        self
    }

    /// Set the wire format.
    pub fn serialization(mut self, serialization: Serialization) -> Self {
        self.options.serialization = serialization;
        self
    }

    /// Request reliable delivery.
    pub fn reliable(mut self, reliable: bool) -> Self {
        self.options.reliable = reliable;
        self
    }

    /// Attach application metadata.
    pub fn metadata(mut self, metadata: Value) -> Self {
        self.options.metadata = Some(metadata);
        self
    }

    /// Use a caller-supplied negotiation payload.
    pub fn payload(mut self, payload: NegotiationPayload) -> Self {
        self.options.payload = Some(payload);
        self
    }

    /// Use a custom id generator.
    pub fn id_generator(mut self, generator: Arc<dyn IdGenerator>) -> Self {
        self.options.id_generator = generator;
        self
    }

    /// Build the options.
    pub fn build(self) -> ConnectionOptions {
        self.options
    }
}

/// Options for closing a connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CloseOptions {
    /// Ask the remote peer to close instead of tearing down locally.
    pub flush: bool,
}

impl CloseOptions {
    /// Flush-close: send the close control payload, keep resources.
    pub fn flush() -> Self {
        Self { flush: true }
    }
}
