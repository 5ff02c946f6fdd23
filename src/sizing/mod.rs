//! Maximum message size negotiation.
//!
//! Both peers advertise the largest message they can receive through the
//! `a=max-message-size:<n>` attribute of their session description. The
//! usable size of a connection is the tightest bound of the two, floored at
//! [`MIN_SAFE_MESSAGE_SIZE`](crate::core::MIN_SAFE_MESSAGE_SIZE).
//!
//! Negotiation is an optimisation: every failure degrades to the safe
//! minimum instead of producing an error.

mod sdp;

pub use sdp::*;
