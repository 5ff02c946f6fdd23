//! # peerlink
//!
//! Core of a peer-to-peer data connection running over a size-limited,
//! message-oriented data channel.
//!
//! - **Lifecycle**: explicit `Negotiating -> Open -> Closed` state machine
//! - **Sizing**: negotiates the largest message both ends accept from their
//!   session descriptions
//! - **Chunking**: splits oversized payloads into fragments and reassembles
//!   them on the way in
//!
//! ## Feature Flags
//!
//! - `connection` (default): the [`connection::DataConnection`] orchestrator
//!   and its negotiator/channel contracts (pulls in tokio)
//!
//! ## Modules
//!
//! - [`core`]: constants, error types and collaborator traits
//! - [`sizing`]: max-message-size negotiation
//! - [`chunk`]: fragment wire format, chunker and reassembler
//! - [`serialization`]: payload encoders
//! - [`connection`]: connection orchestrator (requires `connection` feature)
//!
//! ## Example Usage
//!
//! ```rust
//! use peerlink::prelude::*;
//!
//! let local = "v=0\r\na=max-message-size:262144\r\n";
//! let remote = "v=0\r\na=max-message-size:65536\r\n";
//! let size = determine_max_message_size(Some(local), Some(remote));
//! assert_eq!(size, 65536);
//!
//! let mut chunker = Chunker::new(size);
//! let fragments = chunker.chunk(&vec![7u8; 150_000]);
//! assert_eq!(fragments.len(), 3);
//!
//! let mut reassembler = Reassembler::new();
//! let mut whole = None;
//! for fragment in fragments {
//!     whole = reassembler.push(fragment).unwrap();
//! }
//! assert_eq!(whole.map(|data| data.len()), Some(150_000));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Always included
pub mod chunk;
pub mod core;
pub mod serialization;
pub mod sizing;

// Connection layer (feature-gated)
#[cfg(feature = "connection")]
#[cfg_attr(docsrs, doc(cfg(feature = "connection")))]
pub mod connection;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::chunk::{Chunker, Fragment, FrameError, Reassembler};
    pub use crate::core::*;
    pub use crate::serialization::{Payload, PayloadEncoder, Serialization};
    pub use crate::sizing::*;

    #[cfg(feature = "connection")]
    pub use crate::connection::{
        CloseOptions, ConnectionEvent, ConnectionEvents, ConnectionOptions, ConnectionPhase,
        DataChannel, DataConnection, Negotiator, RegistryHandle,
    };
}

// Re-export commonly used items at crate root
pub use crate::core::{ChannelError, ConnectionError, NegotiatorError};
pub use crate::serialization::{Payload, Serialization};

#[cfg(feature = "connection")]
pub use crate::connection::{ConnectionEvent, DataConnection};
