//! Outbound payload splitting.

use crate::core::MIN_SAFE_MESSAGE_SIZE;

use super::fragment::Fragment;

/// Splits payloads into fragments that fit the chunk threshold.
///
/// The threshold is the largest frame the channel accepts. It starts at
/// [`MIN_SAFE_MESSAGE_SIZE`] and follows the negotiated size once the
/// connection is open. Thresholds below [`MIN_SAFE_MESSAGE_SIZE`] are
/// raised to it, since every channel accepts that much.
#[derive(Debug, Clone)]
pub struct Chunker {
    threshold: usize,
    next_message_id: u32,
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(MIN_SAFE_MESSAGE_SIZE)
    }
}

impl Chunker {
    /// Create a chunker for frames of at most `threshold` bytes.
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold: threshold.max(MIN_SAFE_MESSAGE_SIZE),
            next_message_id: 0,
        }
    }

    /// Largest frame this chunker produces.
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Follow a newly negotiated message size.
    pub fn set_threshold(&mut self, threshold: usize) {
        self.threshold = threshold.max(MIN_SAFE_MESSAGE_SIZE);
    }

    /// Payload bytes carried by one fragment.
    pub fn chunk_size(&self) -> usize {
        self.threshold - Fragment::HEADER_SIZE
    }

    /// Check whether a payload of `len` bytes must be chunked.
    pub fn needs_chunking(&self, len: usize) -> bool {
        len > self.threshold
    }

    /// Split `payload` into ordered fragments.
    ///
    /// Always returns at least one fragment; every fragment carries the
    /// same message id and total.
    pub fn chunk(&mut self, payload: &[u8]) -> Vec<Fragment> {
        let message_id = self.next_message_id;
        self.next_message_id = self.next_message_id.wrapping_add(1);

        if payload.is_empty() {
            return vec![Fragment {
                message_id,
                index: 0,
                total: 1,
                data: Vec::new(),
            }];
        }

        let pieces: Vec<&[u8]> = payload.chunks(self.chunk_size()).collect();
        let total = pieces.len() as u32;

        pieces
            .into_iter()
            .enumerate()
            .map(|(index, data)| Fragment {
                message_id,
                index: index as u32,
                total,
                data: data.to_vec(),
            })
            .collect()
    }
}
