//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Unique key already taken
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Record to update does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backend failure (poisoned lock, I/O, ...)
    #[error("Storage error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::Conflict(_) => 409,
            StoreError::NotFound(_) => 404,
            StoreError::Backend(_) => 500,
        }
    }
}
