//! Inbound negotiation protocol messages.
//!
//! Messages arrive from the rendezvous server as JSON objects of the form
//! `{ "type": "ANSWER", "payload": { "sdp": ... }, "src": "peer" }`.

use serde::{Deserialize, Serialize};

use super::negotiator::{IceCandidate, SessionDescription};

/// Type tag of a server message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum ServerMessageType {
    /// Connection to the server accepted.
    Open,
    /// Server-side error.
    Error,
    /// Requested peer id already in use.
    IdTaken,
    /// Invalid API key.
    InvalidKey,
    /// Remote peer left.
    Leave,
    /// Offer expired before delivery.
    Expire,
    /// Keepalive.
    Heartbeat,
    /// Remote ICE candidate.
    Candidate,
    /// Remote offer.
    Offer,
    /// Remote answer.
    Answer,
    /// Anything this version does not know.
    #[serde(other)]
    Unknown,
}

/// Body of a server message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    /// Session description, for offers and answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp: Option<SessionDescription>,
    /// ICE candidate, for candidate messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate: Option<IceCandidate>,
    /// Connection the message belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
}

/// A negotiation message routed to a connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMessage {
    /// Message type.
    #[serde(rename = "type")]
    pub kind: ServerMessageType,
    /// Message body.
    #[serde(default)]
    pub payload: MessagePayload,
    /// Sending peer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

impl ServerMessage {
    /// Answer message carrying `sdp`.
    pub fn answer(sdp: SessionDescription) -> Self {
        Self {
            kind: ServerMessageType::Answer,
            payload: MessagePayload {
                sdp: Some(sdp),
                ..MessagePayload::default()
            },
            src: None,
        }
    }

    /// Candidate message carrying `candidate`.
    pub fn candidate(candidate: IceCandidate) -> Self {
        Self {
            kind: ServerMessageType::Candidate,
            payload: MessagePayload {
                candidate: Some(candidate),
                ..MessagePayload::default()
            },
            src: None,
        }
    }

    /// Parse a message from JSON text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::SdpType;

    #[test]
    fn test_parse_answer() {
        let message = ServerMessage::from_json(
            r#"{"type":"ANSWER","payload":{"sdp":{"type":"answer","sdp":"v=0\r\n"},"connectionId":"dc_abc"},"src":"remote"}"#,
        )
        .unwrap();

        assert_eq!(message.kind, ServerMessageType::Answer);
        assert_eq!(message.src.as_deref(), Some("remote"));
        assert_eq!(message.payload.connection_id.as_deref(), Some("dc_abc"));
        assert_eq!(
            message.payload.sdp,
            Some(SessionDescription::new(SdpType::Answer, "v=0\r\n"))
        );
    }

    #[test]
    fn test_parse_candidate() {
        let message = ServerMessage::from_json(
            r#"{"type":"CANDIDATE","payload":{"candidate":{"candidate":"candidate:0","sdpMid":"0"}}}"#,
        )
        .unwrap();

        assert_eq!(message.kind, ServerMessageType::Candidate);
        let candidate = message.payload.candidate.unwrap();
        assert_eq!(candidate.candidate, "candidate:0");
        assert_eq!(candidate.sdp_mid.as_deref(), Some("0"));
    }

    #[test]
    fn test_parse_kebab_case_types() {
        let message = ServerMessage::from_json(r#"{"type":"ID-TAKEN"}"#).unwrap();
        assert_eq!(message.kind, ServerMessageType::IdTaken);
        assert_eq!(message.payload, MessagePayload::default());
    }

    #[test]
    fn test_parse_unknown_type() {
        let message = ServerMessage::from_json(r#"{"type":"GOSSIP","payload":{}}"#).unwrap();
        assert_eq!(message.kind, ServerMessageType::Unknown);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(ServerMessage::from_json("not json").is_err());
        assert!(ServerMessage::from_json(r#"{"payload":{}}"#).is_err());
    }
}
