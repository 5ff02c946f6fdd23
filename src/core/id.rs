//! Connection identifier generation.

use rand::Rng;
use rand::distributions::Alphanumeric;

use super::constants::{CONNECTION_ID_PREFIX, CONNECTION_ID_TOKEN_LEN};
use super::traits::IdGenerator;

/// Generates `dc_`-prefixed ids with a random lowercase alphanumeric token.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    /// Create a new generator.
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(CONNECTION_ID_TOKEN_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        format!("{CONNECTION_ID_PREFIX}{token}")
    }
}

/// Check whether `id` has the shape produced by [`RandomIdGenerator`].
pub fn is_generated_id(id: &str) -> bool {
    id.strip_prefix(CONNECTION_ID_PREFIX).is_some_and(|token| {
        token.len() == CONNECTION_ID_TOKEN_LEN
            && token
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    })
}
