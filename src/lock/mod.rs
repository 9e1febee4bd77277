//! # Submission Lock
//!
//! Per-actor reentry guard with TTL. A second concurrent attempt from the same
//! actor is dropped, not queued. The marker is released when the guard is
//! dropped, whatever the pipeline outcome.
//!
//! This is throttling only. Consistency comes from the store transaction.

mod keyed;
mod submission;

pub use keyed::{KeyedLockStore, LockToken, MemoryKeyedLockStore};
pub use submission::{SubmissionGuard, SubmissionLock, DEFAULT_TTL};
