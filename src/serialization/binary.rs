//! Self-describing binary frames.
//!
//! ## Wire Format
//!
//! ```text
//! +0   Frame type (1 byte)
//!        0x00  bytes     body is the payload
//!        0x01  fragment  see crate::chunk
//!        0x02  text      body is UTF-8
//!        0x03  json      body is JSON text
//! +1   Body (variable)
//! ```
//!
//! A whole frame larger than the chunk threshold is split into fragment
//! frames; reassembling the fragments yields the original whole frame.

use thiserror::Error;

use crate::chunk::{Chunker, Fragment, FrameError, Reassembler};
use crate::core::{
    ConnectionError, FRAME_TYPE_BYTES, FRAME_TYPE_FRAGMENT, FRAME_TYPE_JSON, FRAME_TYPE_TEXT,
};

use super::{Payload, PayloadEncoder, Serialization};

/// Errors decoding an inbound binary frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Empty frame.
    #[error("empty frame")]
    Empty,

    /// Frame type byte is not known.
    #[error("unknown frame type: 0x{0:02x}")]
    UnknownFrameType(u8),

    /// Text frame is not valid UTF-8.
    #[error("invalid utf-8 text frame")]
    InvalidUtf8,

    /// JSON frame could not be parsed.
    #[error("invalid json frame: {0}")]
    InvalidJson(String),

    /// Fragment frame is malformed or inconsistent.
    #[error("fragment error: {0}")]
    Fragment(#[from] FrameError),
}

/// A decoded binary frame.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundFrame {
    /// A complete payload.
    Payload(Payload),
    /// One fragment of a chunked payload.
    Fragment(Fragment),
}

/// Encoder for [`Serialization::Binary`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryEncoder;

impl BinaryEncoder {
    /// Encode a payload as one whole frame.
    pub fn whole_frame(payload: &Payload) -> Result<Vec<u8>, ConnectionError> {
        let (frame_type, body) = match payload {
            Payload::Bytes(bytes) => (FRAME_TYPE_BYTES, bytes.clone()),
            Payload::Text(text) => (FRAME_TYPE_TEXT, text.as_bytes().to_vec()),
            Payload::Json(value) => (FRAME_TYPE_JSON, serde_json::to_vec(value)?),
        };

        let mut frame = Vec::with_capacity(1 + body.len());
        frame.push(frame_type);
        frame.extend_from_slice(&body);
        Ok(frame)
    }

    /// Decode one frame.
    pub fn decode(frame: &[u8]) -> Result<InboundFrame, DecodeError> {
        let (&frame_type, body) = frame.split_first().ok_or(DecodeError::Empty)?;

        let payload = match frame_type {
            FRAME_TYPE_BYTES => Payload::Bytes(body.to_vec()),
            FRAME_TYPE_TEXT => Payload::Text(
                String::from_utf8(body.to_vec()).map_err(|_| DecodeError::InvalidUtf8)?,
            ),
            FRAME_TYPE_JSON => Payload::Json(
                serde_json::from_slice(body).map_err(|e| DecodeError::InvalidJson(e.to_string()))?,
            ),
            FRAME_TYPE_FRAGMENT => return Ok(InboundFrame::Fragment(Fragment::decode(frame)?)),
            other => return Err(DecodeError::UnknownFrameType(other)),
        };

        Ok(InboundFrame::Payload(payload))
    }
}

impl PayloadEncoder for BinaryEncoder {
    fn serialization(&self) -> Serialization {
        Serialization::Binary
    }

    fn encode(
        &self,
        payload: &Payload,
        chunked: bool,
        chunker: &mut Chunker,
    ) -> Result<Vec<Vec<u8>>, ConnectionError> {
        let frame = Self::whole_frame(payload)?;

        if chunked || !chunker.needs_chunking(frame.len()) {
            return Ok(vec![frame]);
        }

        Ok(chunker
            .chunk(&frame)
            .iter()
            .map(Fragment::encode)
            .collect())
    }
}

/// Turns inbound binary frames back into payloads.
#[derive(Debug, Default)]
pub struct BinaryDecoder {
    reassembler: Reassembler,
}

impl BinaryDecoder {
    /// Create a decoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame.
    ///
    /// Returns a payload for whole frames and for the fragment completing a
    /// chunked payload, `None` while fragments are still missing.
    pub fn push(&mut self, frame: &[u8]) -> Result<Option<Payload>, DecodeError> {
        match BinaryEncoder::decode(frame)? {
            InboundFrame::Payload(payload) => Ok(Some(payload)),
            InboundFrame::Fragment(fragment) => match self.reassembler.push(fragment)? {
                Some(whole) => match BinaryEncoder::decode(&whole)? {
                    InboundFrame::Payload(payload) => Ok(Some(payload)),
                    // Fragments never nest.
                    InboundFrame::Fragment(_) => {
                        Err(DecodeError::UnknownFrameType(FRAME_TYPE_FRAGMENT))
                    }
                },
                None => Ok(None),
            },
        }
    }
}
