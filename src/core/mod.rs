//! Core traits, types, and constants.
//!
//! This module has no async dependencies and defines the pieces shared by
//! every other layer: protocol constants, error types, and the capabilities
//! a connection borrows from its surroundings (id generation, registry).

mod constants;
mod error;
mod id;
mod traits;

pub use constants::*;
pub use error::*;
pub use id::*;
pub use traits::*;
