//! Payload chunking.
//!
//! Payloads larger than the negotiated message size are split into ordered
//! fragments by the [`Chunker`] and put back together by the
//! [`Reassembler`], which orders by fragment index rather than arrival so
//! unordered channels are tolerated.
//!
//! ## Fragment Wire Format
//!
//! ```text
//! +0   Frame type (1 byte, 0x01)
//! +1   Message ID (4 bytes LE32)
//! +5   Fragment index (4 bytes LE32)
//! +9   Fragment total (4 bytes LE32)
//! +13  Fragment data (variable)
//! ```

mod chunker;
mod fragment;
mod reassembler;

pub use chunker::*;
pub use fragment::*;
pub use reassembler::*;
