//! # Notification Errors
//!
//! Never surfaced to the caller that produced the effect; the dispatcher
//! logs and swallows them.

use thiserror::Error;

/// Result type for notification backends
pub type NotifyResult<T> = Result<T, NotifyError>;

#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// Messaging API rejected or could not be reached
    #[error("Messaging error: {0}")]
    Messaging(String),

    /// Email could not be built or sent
    #[error("Email error: {0}")]
    Email(String),

    /// Certificate artifact could not be written
    #[error("Artifact error: {0}")]
    Artifact(String),
}
