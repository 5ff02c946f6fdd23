//! Capabilities a connection borrows from its owner.

/// Source of connection identifiers.
///
/// Injected through the connection options so tests can supply
/// deterministic ids.
pub trait IdGenerator: Send + Sync {
    /// Produce a new, non-empty connection identifier.
    fn generate(&self) -> String;
}

/// Registry that tracks live connections per remote peer.
///
/// Connections only hold a weak handle to their registry and call
/// [`remove_connection`](Self::remove_connection) exactly once on close.
pub trait ConnectionRegistry: Send + Sync {
    /// Forget the connection `connection_id` to `peer_id`.
    fn remove_connection(&self, peer_id: &str, connection_id: &str);
}
