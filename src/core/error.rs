//! Error types shared across layers.

use thiserror::Error;

/// Errors raised by the underlying data channel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The channel is closed or was never handed to the connection.
    #[error("data channel closed")]
    Closed,

    /// The channel refused the frame.
    #[error("data channel send failed: {0}")]
    SendFailed(String),
}

/// Error reported by an external negotiator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("negotiation failed: {0}")]
pub struct NegotiatorError(pub String);

impl NegotiatorError {
    /// Create a negotiator error from any message.
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Errors delivered on a connection's error channel.
///
/// None of these are returned to the caller of `send` or `close`; they are
/// emitted as connection events instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Send attempted before the channel reported ready.
    #[error("connection is not open yet")]
    NotOpenYet,

    /// Payload exceeds what the serialization can put in one message.
    #[error("message too big: {size} bytes, limit {limit}")]
    MessageTooBig {
        /// Encoded payload size.
        size: usize,
        /// Negotiated maximum message size.
        limit: usize,
    },

    /// The negotiator failed to start or continue negotiation.
    #[error("negotiation error: {0}")]
    Negotiation(#[from] NegotiatorError),

    /// The data channel rejected a frame.
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Payload could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ConnectionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
