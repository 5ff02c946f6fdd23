//! Non-owning handle to the connection registry.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::core::ConnectionRegistry;

/// Registry stand-in for connections created without one.
struct NoRegistry;

impl ConnectionRegistry for NoRegistry {
    fn remove_connection(&self, _peer_id: &str, _connection_id: &str) {}
}

/// Weak reference to the registry that owns a connection.
///
/// Never keeps the registry alive; removal is skipped when the registry is
/// already gone.
#[derive(Clone)]
pub struct RegistryHandle {
    inner: Weak<dyn ConnectionRegistry>,
}

impl RegistryHandle {
    /// Create a handle to `registry`.
    pub fn new<R: ConnectionRegistry + 'static>(registry: &Arc<R>) -> Self {
        let inner: Weak<R> = Arc::downgrade(registry);
        Self { inner }
    }

    /// Create a handle that is not attached to any registry.
    pub fn detached() -> Self {
        let inner: Weak<NoRegistry> = Weak::new();
        Self { inner }
    }

    /// Check if the registry is still alive.
    pub fn is_attached(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Deregister a connection. Returns `false` if the registry is gone.
    pub fn remove(&self, peer_id: &str, connection_id: &str) -> bool {
        match self.inner.upgrade() {
            Some(registry) => {
                registry.remove_connection(peer_id, connection_id);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for RegistryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        removed: Mutex<Vec<String>>,
    }

    impl ConnectionRegistry for Recorder {
        fn remove_connection(&self, peer_id: &str, connection_id: &str) {
            self.removed
                .lock()
                .unwrap()
                .push(format!("{peer_id}/{connection_id}"));
        }
    }

    #[test]
    fn test_remove_through_handle() {
        let registry = Arc::new(Recorder::default());
        let handle = RegistryHandle::new(&registry);

        assert!(handle.is_attached());
        assert!(handle.remove("alice", "dc_1"));
        assert_eq!(*registry.removed.lock().unwrap(), vec!["alice/dc_1"]);
    }

    #[test]
    fn test_handle_does_not_keep_registry_alive() {
        let registry = Arc::new(Recorder::default());
        let handle = RegistryHandle::new(&registry);
        drop(registry);

        assert!(!handle.is_attached());
        assert!(!handle.remove("alice", "dc_1"));
    }

    #[test]
    fn test_detached_handle() {
        let handle = RegistryHandle::detached();
        assert!(!handle.is_attached());
        assert!(!handle.remove("bob", "dc_2"));
    }
}
