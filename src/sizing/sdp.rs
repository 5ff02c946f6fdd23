//! Session description attribute parsing.

use tracing::debug;

use crate::core::{MAX_MESSAGE_SIZE_ATTRIBUTE, MIN_SAFE_MESSAGE_SIZE};

/// Extract the advertised `max-message-size` from a session description.
///
/// Returns `None` when the attribute is missing, malformed, or zero. A zero
/// size means "unknown" here, not "unlimited".
pub fn parse_max_message_size(description: &str) -> Option<usize> {
    let value = description
        .lines()
        .find_map(|line| line.strip_prefix(MAX_MESSAGE_SIZE_ATTRIBUTE))?;

    match value.trim().parse::<usize>() {
        Ok(0) => None,
        Ok(size) => Some(size),
        Err(_) => None,
    }
}

/// Usable message size for one side of the connection.
///
/// Missing descriptions and missing attributes both resolve to
/// [`MIN_SAFE_MESSAGE_SIZE`].
pub fn usable_message_size(description: Option<&str>) -> usize {
    match description.and_then(parse_max_message_size) {
        Some(size) => size.max(MIN_SAFE_MESSAGE_SIZE),
        None => {
            debug!(
                event = "max_message_size_unknown",
                has_description = description.is_some(),
                fallback = MIN_SAFE_MESSAGE_SIZE,
                "No usable max-message-size attribute"
            );
            MIN_SAFE_MESSAGE_SIZE
        }
    }
}

/// Negotiated maximum message size for a connection.
///
/// Only meaningful once both descriptions are final, i.e. after the data
/// channel reported ready.
pub fn determine_max_message_size(local: Option<&str>, remote: Option<&str>) -> usize {
    let local_size = usable_message_size(local);
    let remote_size = usable_message_size(remote);
    let negotiated = local_size.min(remote_size);

    debug!(
        event = "max_message_size_negotiated",
        local = local_size,
        remote = remote_size,
        negotiated,
        "Negotiated max message size"
    );

    negotiated
}
