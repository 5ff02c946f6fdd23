//! Protocol constants.
//!
//! These values are shared with remote peers and MUST NOT be changed.

// =============================================================================
// MESSAGE SIZE
// =============================================================================

/// Message size every data channel implementation is required to accept.
///
/// Used as the negotiated size until both session descriptions are known,
/// and as the floor for every advertised size afterwards.
pub const MIN_SAFE_MESSAGE_SIZE: usize = 16 * 1024;

/// SDP attribute carrying the largest message a peer can receive.
pub const MAX_MESSAGE_SIZE_ATTRIBUTE: &str = "a=max-message-size:";

// =============================================================================
// CONNECTION IDENTITY
// =============================================================================

/// Prefix of generated data connection identifiers.
pub const CONNECTION_ID_PREFIX: &str = "dc_";

/// Length of the random token appended to [`CONNECTION_ID_PREFIX`].
pub const CONNECTION_ID_TOKEN_LEN: usize = 11;

// =============================================================================
// BINARY FRAMES
// =============================================================================

/// Whole binary payload.
pub const FRAME_TYPE_BYTES: u8 = 0x00;

/// One fragment of a chunked payload.
pub const FRAME_TYPE_FRAGMENT: u8 = 0x01;

/// Whole UTF-8 text payload.
pub const FRAME_TYPE_TEXT: u8 = 0x02;

/// Whole JSON payload.
pub const FRAME_TYPE_JSON: u8 = 0x03;

/// Fragment frame header size (type + message id + index + total).
pub const FRAGMENT_HEADER_SIZE: usize = 1 + 4 + 4 + 4;

/// Incomplete messages a reassembler keeps before evicting the oldest.
pub const MAX_PENDING_MESSAGES: usize = 64;

/// Largest payload a reassembler buffers for one message.
pub const MAX_REASSEMBLED_MESSAGE_SIZE: usize = 16 * 1024 * 1024;

// =============================================================================
// CONTROL PAYLOADS
// =============================================================================

/// Key of the in-band control object sent over the data channel.
pub const CONTROL_KEY: &str = "__peerData";

/// Control type asking the remote peer to close the connection.
pub const CONTROL_TYPE_CLOSE: &str = "close";
