//! Payload serialization.
//!
//! A connection is created with one [`Serialization`] kind for its whole
//! lifetime. Each kind has a [`PayloadEncoder`] that turns an application
//! [`Payload`] into the frames handed to the data channel.
//!
//! | Kind     | Wire form                                   | Oversized payloads |
//! |----------|---------------------------------------------|--------------------|
//! | `binary` | type byte + body, see [`binary`]            | chunked            |
//! | `json`   | JSON text                                   | `MessageTooBig`    |
//! | `none`   | bytes / text verbatim, JSON values as text  | sent as-is         |

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::chunk::Chunker;
use crate::core::{CONTROL_KEY, CONTROL_TYPE_CLOSE, ConnectionError};

pub mod binary;
mod json;
mod raw;

pub use binary::{BinaryDecoder, BinaryEncoder, DecodeError, InboundFrame};
pub use json::JsonEncoder;
pub use raw::RawEncoder;

/// Wire format of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Serialization {
    /// Self-describing binary frames with chunking.
    #[default]
    Binary,
    /// JSON text.
    Json,
    /// No serialization.
    #[serde(rename = "none")]
    Raw,
}

impl Serialization {
    /// Encoder for this kind.
    pub fn encoder(self) -> Box<dyn PayloadEncoder> {
        match self {
            Self::Binary => Box::new(BinaryEncoder),
            Self::Json => Box::new(JsonEncoder),
            Self::Raw => Box::new(RawEncoder),
        }
    }

    /// Wire-format name shown by `Display`; matches the serde name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Json => "json",
            Self::Raw => "none",
        }
    }
}

impl fmt::Display for Serialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application data handed to `send`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// Opaque bytes.
    Bytes(Vec<u8>),
    /// UTF-8 text.
    Text(String),
    /// Structured value.
    Json(Value),
}

impl Payload {
    /// In-band request asking the remote peer to close the connection.
    pub fn close_control() -> Self {
        Self::Json(json!({ CONTROL_KEY: { "type": CONTROL_TYPE_CLOSE } }))
    }

    /// Check whether this is the close control payload.
    pub fn is_close_control(&self) -> bool {
        match self {
            Self::Json(value) => {
                value
                    .get(CONTROL_KEY)
                    .and_then(|control| control.get("type"))
                    .and_then(Value::as_str)
                    == Some(CONTROL_TYPE_CLOSE)
            }
            _ => false,
        }
    }

    /// Render as JSON text.
    pub fn to_json_vec(&self) -> Result<Vec<u8>, ConnectionError> {
        Ok(serde_json::to_vec(self)?)
    }
}

impl From<Vec<u8>> for Payload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for Payload {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

/// Turns payloads into data channel frames for one serialization kind.
pub trait PayloadEncoder: Send + Sync + fmt::Debug {
    /// Kind implemented by this encoder.
    fn serialization(&self) -> Serialization;

    /// Encode `payload` into the frames to send, in order.
    ///
    /// `chunked` marks a payload the caller already sized for the channel;
    /// encoders that chunk skip the [`Chunker`] for it.
    fn encode(
        &self,
        payload: &Payload,
        chunked: bool,
        chunker: &mut Chunker,
    ) -> Result<Vec<Vec<u8>>, ConnectionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_control_literal() {
        let payload = Payload::close_control();
        assert!(payload.is_close_control());
        assert_eq!(
            payload.to_json_vec().unwrap(),
            br#"{"__peerData":{"type":"close"}}"#.to_vec()
        );
    }

    #[test]
    fn test_other_payloads_are_not_close_control() {
        assert!(!Payload::from("close").is_close_control());
        assert!(!Payload::Json(json!({ "__peerData": { "type": "open" } })).is_close_control());
    }

    #[test]
    fn test_serialization_names() {
        assert_eq!(serde_json::to_string(&Serialization::Raw).unwrap(), r#""none""#);
        assert_eq!(
            serde_json::from_str::<Serialization>(r#""json""#).unwrap(),
            Serialization::Json
        );
        assert_eq!(Serialization::default(), Serialization::Binary);
        assert_eq!(Serialization::Binary.to_string(), "binary");
    }

    #[test]
    fn test_encoder_kinds() {
        for kind in [Serialization::Binary, Serialization::Json, Serialization::Raw] {
            assert_eq!(kind.encoder().serialization(), kind);
        }
    }
}
