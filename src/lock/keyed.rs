//! Ephemeral keyed lock store

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use uuid::Uuid;

/// Identifies one acquisition so a stale holder cannot release a newer one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LockToken(Uuid);

/// Keyed, TTL-bounded lock markers
pub trait KeyedLockStore: Send + Sync {
    /// Set the marker for `key` unless a live one exists
    fn try_acquire(&self, key: &str, ttl: Duration) -> Option<LockToken>;

    /// Clear the marker if it still belongs to `token`
    fn release(&self, key: &str, token: LockToken);

    /// Whether a live marker exists for `key`
    fn is_held(&self, key: &str) -> bool;
}

#[derive(Debug)]
struct Marker {
    token: LockToken,
    expires_at: Instant,
}

/// In-process lock store
#[derive(Debug, Default)]
pub struct MemoryKeyedLockStore {
    markers: Mutex<HashMap<String, Marker>>,
}

impl MemoryKeyedLockStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn markers(&self) -> MutexGuard<'_, HashMap<String, Marker>> {
        // A panic while holding the map cannot leave a marker half-written.
        self.markers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyedLockStore for MemoryKeyedLockStore {
    fn try_acquire(&self, key: &str, ttl: Duration) -> Option<LockToken> {
        let now = Instant::now();
        let mut markers = self.markers();
        markers.retain(|_, marker| marker.expires_at > now);

        if markers.contains_key(key) {
            return None;
        }
        let token = LockToken(Uuid::new_v4());
        markers.insert(
            key.to_string(),
            Marker {
                token,
                expires_at: now + ttl,
            },
        );
        Some(token)
    }

    fn release(&self, key: &str, token: LockToken) {
        let mut markers = self.markers();
        if markers.get(key).map(|m| m.token) == Some(token) {
            markers.remove(key);
        }
    }

    fn is_held(&self, key: &str) -> bool {
        self.markers()
            .get(key)
            .map(|m| m.expires_at > Instant::now())
            .unwrap_or(false)
    }
}
