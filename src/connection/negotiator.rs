//! External negotiator contract and negotiation payload types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::NegotiatorError;

use super::channel::ChannelInitializer;

/// Session description type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    /// Offer.
    Offer,
    /// Provisional answer.
    Pranswer,
    /// Answer.
    Answer,
    /// Rollback.
    Rollback,
}

/// A session description exchanged through signaling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    /// Description type.
    #[serde(rename = "type")]
    pub kind: SdpType,
    /// SDP text.
    pub sdp: String,
}

impl SessionDescription {
    /// Create a description.
    pub fn new(kind: SdpType, sdp: impl Into<String>) -> Self {
        Self {
            kind,
            sdp: sdp.into(),
        }
    }
}

/// An ICE candidate exchanged through signaling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    /// Candidate attribute line.
    pub candidate: String,
    /// Media stream identification tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    /// Media description index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_m_line_index: Option<u16>,
    /// ICE username fragment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}

/// Payload passed to [`Negotiator::start_connection`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationPayload {
    /// This side creates the channel and sends the offer.
    #[serde(default)]
    pub originator: bool,
    /// Ordered, fully reliable delivery requested.
    #[serde(default)]
    pub reliable: bool,
    /// Remote offer, on the answering side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp: Option<SessionDescription>,
}

impl NegotiationPayload {
    /// Default payload of the side opening the connection.
    pub fn originator(reliable: bool) -> Self {
        Self {
            originator: true,
            reliable,
            sdp: None,
        }
    }

    /// Payload of the side answering a remote offer.
    pub fn answering(offer: SessionDescription, reliable: bool) -> Self {
        Self {
            originator: false,
            reliable,
            sdp: Some(offer),
        }
    }
}

/// Establishes the underlying channel (ICE/SDP exchange).
///
/// Exclusively owned by one connection and cleaned up exactly once when it
/// closes. Failures are reported back as [`NegotiatorError`] and surface on
/// the connection's error channel.
#[async_trait]
pub trait Negotiator: Send {
    /// Begin establishing the channel; the channel is handed over through
    /// `initializer` when it exists.
    async fn start_connection(
        &mut self,
        payload: NegotiationPayload,
        initializer: ChannelInitializer,
    ) -> Result<(), NegotiatorError>;

    /// Apply a remote session description.
    async fn handle_sdp(
        &mut self,
        kind: SdpType,
        description: SessionDescription,
    ) -> Result<(), NegotiatorError>;

    /// Add a remote ICE candidate.
    async fn handle_candidate(&mut self, candidate: IceCandidate) -> Result<(), NegotiatorError>;

    /// Release the peer connection and everything it owns.
    fn cleanup(&mut self);
}
