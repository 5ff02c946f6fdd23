//! Pass-through encoder.

use crate::chunk::Chunker;
use crate::core::ConnectionError;

use super::{Payload, PayloadEncoder, Serialization};

/// Sends bytes and text verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawEncoder;

impl PayloadEncoder for RawEncoder {
    fn serialization(&self) -> Serialization {
        Serialization::Raw
    }

    fn encode(
        &self,
        payload: &Payload,
        _chunked: bool,
        _chunker: &mut Chunker,
    ) -> Result<Vec<Vec<u8>>, ConnectionError> {
        let frame = match payload {
            Payload::Bytes(bytes) => bytes.clone(),
            Payload::Text(text) => text.as_bytes().to_vec(),
            Payload::Json(_) => payload.to_json_vec()?,
        };
        Ok(vec![frame])
    }
}
