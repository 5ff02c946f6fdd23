//! Fragment frame encoding and decoding.

use thiserror::Error;

use crate::core::{FRAGMENT_HEADER_SIZE, FRAME_TYPE_FRAGMENT};

/// Errors decoding or reassembling fragments.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Frame shorter than the fragment header.
    #[error("frame too short: expected at least {expected}, got {actual}")]
    TooShort {
        /// Minimum bytes required.
        expected: usize,
        /// Actual bytes available.
        actual: usize,
    },

    /// Frame type byte is not a fragment.
    #[error("not a fragment frame: 0x{0:02x}")]
    UnknownFrameType(u8),

    /// Fragment index beyond the declared total.
    #[error("fragment index {index} out of range for total {total}")]
    IndexOutOfRange {
        /// Received index.
        index: u32,
        /// Declared total.
        total: u32,
    },

    /// Fragment declares a message of zero fragments.
    #[error("fragment total is zero")]
    ZeroTotal,

    /// Fragment declares more fragments than the size limit allows.
    #[error("fragment total {total} exceeds limit {limit}")]
    TooManyFragments {
        /// Declared total.
        total: u32,
        /// Largest accepted total.
        limit: usize,
    },

    /// Buffered fragments of one message exceed the size limit.
    #[error("reassembled message too large: {size} bytes (limit: {limit})")]
    MessageTooLarge {
        /// Bytes the message would occupy.
        size: usize,
        /// Size limit.
        limit: usize,
    },

    /// Fragment disagrees with earlier fragments of the same message.
    #[error("fragment total mismatch: expected {expected}, got {actual}")]
    TotalMismatch {
        /// Total recorded from the first fragment.
        expected: u32,
        /// Total carried by this fragment.
        actual: u32,
    },
}

/// One ordered piece of a chunked payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Identifier shared by every fragment of one payload.
    pub message_id: u32,
    /// Zero-based position of this fragment.
    pub index: u32,
    /// Number of fragments the payload was split into.
    pub total: u32,
    /// Slice of the original payload.
    pub data: Vec<u8>,
}

impl Fragment {
    /// Header size in bytes.
    pub const HEADER_SIZE: usize = FRAGMENT_HEADER_SIZE;

    /// Size of the encoded frame.
    pub fn wire_size(&self) -> usize {
        Self::HEADER_SIZE + self.data.len()
    }

    /// Check whether this is the last fragment of its payload.
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.total
    }

    /// Encode to wire format.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.wire_size());
        buf.push(FRAME_TYPE_FRAGMENT);
        buf.extend_from_slice(&self.message_id.to_le_bytes());
        buf.extend_from_slice(&self.index.to_le_bytes());
        buf.extend_from_slice(&self.total.to_le_bytes());
        buf.extend_from_slice(&self.data);
        buf
    }

    /// Decode from wire format.
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < Self::HEADER_SIZE {
            return Err(FrameError::TooShort {
                expected: Self::HEADER_SIZE,
                actual: bytes.len(),
            });
        }
        if bytes[0] != FRAME_TYPE_FRAGMENT {
            return Err(FrameError::UnknownFrameType(bytes[0]));
        }

        let message_id = read_u32(&bytes[1..5]);
        let index = read_u32(&bytes[5..9]);
        let total = read_u32(&bytes[9..13]);

        if total == 0 {
            return Err(FrameError::ZeroTotal);
        }
        if index >= total {
            return Err(FrameError::IndexOutOfRange { index, total });
        }

        Ok(Self {
            message_id,
            index,
            total,
            data: bytes[Self::HEADER_SIZE..].to_vec(),
        })
    }
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(bytes);
    u32::from_le_bytes(word)
}
