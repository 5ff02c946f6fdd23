//! JSON text encoder.

use crate::chunk::Chunker;
use crate::core::ConnectionError;

use super::{Payload, PayloadEncoder, Serialization};

/// Sends every payload as one JSON text message.
///
/// JSON messages are never chunked; anything larger than the negotiated
/// size is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl PayloadEncoder for JsonEncoder {
    fn serialization(&self) -> Serialization {
        Serialization::Json
    }

    fn encode(
        &self,
        payload: &Payload,
        _chunked: bool,
        chunker: &mut Chunker,
    ) -> Result<Vec<Vec<u8>>, ConnectionError> {
        let text = payload.to_json_vec()?;
        if text.len() > chunker.threshold() {
            return Err(ConnectionError::MessageTooBig {
                size: text.len(),
                limit: chunker.threshold(),
            });
        }
        Ok(vec![text])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_values() {
        let mut chunker = Chunker::default();
        let frames = JsonEncoder
            .encode(&Payload::Json(json!({ "n": 1 })), false, &mut chunker)
            .unwrap();
        assert_eq!(frames, vec![br#"{"n":1}"#.to_vec()]);
    }

    #[test]
    fn test_json_text_and_bytes() {
        let mut chunker = Chunker::default();

        let frames = JsonEncoder.encode(&"hi".into(), false, &mut chunker).unwrap();
        assert_eq!(frames, vec![br#""hi""#.to_vec()]);

        let frames = JsonEncoder
            .encode(&vec![1u8, 2].into(), false, &mut chunker)
            .unwrap();
        assert_eq!(frames, vec![b"[1,2]".to_vec()]);
    }

    #[test]
    fn test_json_too_big() {
        let mut chunker = Chunker::default();
        let text = "a".repeat(chunker.threshold());
        let result = JsonEncoder.encode(&text.into(), false, &mut chunker);
        assert_eq!(
            result,
            Err(ConnectionError::MessageTooBig {
                size: chunker.threshold() + 2,
                limit: chunker.threshold(),
            })
        );
    }
}
