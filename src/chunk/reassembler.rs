//! Inbound fragment reassembly.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::core::{MAX_PENDING_MESSAGES, MAX_REASSEMBLED_MESSAGE_SIZE};

use super::fragment::{Fragment, FrameError};

/// Fragments received so far for one payload.
#[derive(Debug)]
struct PendingMessage {
    total: u32,
    bytes: usize,
    parts: BTreeMap<u32, Vec<u8>>,
}

impl PendingMessage {
    fn is_complete(&self) -> bool {
        self.parts.len() == self.total as usize
    }

    fn into_payload(self) -> Vec<u8> {
        let len = self.parts.values().map(Vec::len).sum();
        let mut payload = Vec::with_capacity(len);
        for part in self.parts.into_values() {
            payload.extend_from_slice(&part);
        }
        payload
    }
}

/// Rebuilds payloads from fragments in any arrival order.
///
/// Fragments are keyed by index, duplicates are ignored, and once more than
/// `max_pending` payloads are incomplete the oldest one is dropped. A message
/// growing past `max_message_size` bytes is discarded with an error.
#[derive(Debug)]
pub struct Reassembler {
    pending: HashMap<u32, PendingMessage>,
    /// Message ids in first-seen order, for eviction.
    order: VecDeque<u32>,
    max_pending: usize,
    max_message_size: usize,
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reassembler {
    /// Create a reassembler with the default pending limit.
    pub fn new() -> Self {
        Self::with_max_pending(MAX_PENDING_MESSAGES)
    }

    /// Create a reassembler keeping at most `max_pending` incomplete payloads.
    pub fn with_max_pending(max_pending: usize) -> Self {
        Self::with_limits(max_pending, MAX_REASSEMBLED_MESSAGE_SIZE)
    }

    /// Create a reassembler with explicit pending and per-message size limits.
    pub fn with_limits(max_pending: usize, max_message_size: usize) -> Self {
        Self {
            pending: HashMap::new(),
            order: VecDeque::new(),
            max_pending: max_pending.max(1),
            max_message_size: max_message_size.max(1),
        }
    }

    /// Largest payload buffered for one message.
    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    /// Number of incomplete payloads.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Decode a fragment frame and feed it in.
    pub fn push_frame(&mut self, frame: &[u8]) -> Result<Option<Vec<u8>>, FrameError> {
        self.push(Fragment::decode(frame)?)
    }

    /// Feed one fragment.
    ///
    /// Returns the full payload once its last missing fragment arrives.
    pub fn push(&mut self, fragment: Fragment) -> Result<Option<Vec<u8>>, FrameError> {
        if fragment.total == 0 {
            return Err(FrameError::ZeroTotal);
        }
        if fragment.index >= fragment.total {
            return Err(FrameError::IndexOutOfRange {
                index: fragment.index,
                total: fragment.total,
            });
        }
        // Every fragment but a lone empty one carries at least a byte.
        if fragment.total as usize > self.max_message_size {
            return Err(FrameError::TooManyFragments {
                total: fragment.total,
                limit: self.max_message_size,
            });
        }

        if !self.pending.contains_key(&fragment.message_id) {
            self.make_room();
            self.order.push_back(fragment.message_id);
        }

        let message = self
            .pending
            .entry(fragment.message_id)
            .or_insert_with(|| PendingMessage {
                total: fragment.total,
                bytes: 0,
                parts: BTreeMap::new(),
            });

        if message.total != fragment.total {
            return Err(FrameError::TotalMismatch {
                expected: message.total,
                actual: fragment.total,
            });
        }

        if message.parts.contains_key(&fragment.index) {
            return Ok(None);
        }

        let size = message.bytes + fragment.data.len();
        if size > self.max_message_size {
            self.discard(fragment.message_id);
            return Err(FrameError::MessageTooLarge {
                size,
                limit: self.max_message_size,
            });
        }
        message.bytes = size;
        message.parts.insert(fragment.index, fragment.data);

        if !message.is_complete() {
            return Ok(None);
        }

        Ok(self
            .discard(fragment.message_id)
            .map(PendingMessage::into_payload))
    }

    fn discard(&mut self, message_id: u32) -> Option<PendingMessage> {
        self.order.retain(|id| *id != message_id);
        self.pending.remove(&message_id)
    }

    /// Drop every incomplete payload.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.order.clear();
    }

    fn make_room(&mut self) {
        while self.pending.len() >= self.max_pending {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.pending.remove(&oldest);
                }
                None => break,
            }
        }
    }
}
