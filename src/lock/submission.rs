//! Per-actor submission guard

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::keyed::{KeyedLockStore, LockToken};

/// Default marker lifetime
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

/// Hands out per-actor guards over a keyed lock store
#[derive(Clone)]
pub struct SubmissionLock {
    store: Arc<dyn KeyedLockStore>,
    ttl: Duration,
}

impl SubmissionLock {
    pub fn new(store: Arc<dyn KeyedLockStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    fn key(actor_id: &str) -> String {
        format!("submission:{}", actor_id)
    }

    /// Acquire the actor's marker, or `None` while another attempt is running
    pub fn acquire(&self, actor_id: &str) -> Option<SubmissionGuard> {
        let key = Self::key(actor_id);
        let token = self.store.try_acquire(&key, self.ttl)?;
        debug!(key = %key, "submission lock acquired");
        Some(SubmissionGuard {
            store: Arc::clone(&self.store),
            key,
            token,
        })
    }

    pub fn is_locked(&self, actor_id: &str) -> bool {
        self.store.is_held(&Self::key(actor_id))
    }
}

/// Releases the actor's marker on drop
pub struct SubmissionGuard {
    store: Arc<dyn KeyedLockStore>,
    key: String,
    token: LockToken,
}

impl SubmissionGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        self.store.release(&self.key, self.token);
        debug!(key = %self.key, "submission lock released");
    }
}
