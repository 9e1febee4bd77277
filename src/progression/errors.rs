//! # Progression Errors

use thiserror::Error;
use uuid::Uuid;

use crate::certificate::CertificateError;
use crate::store::StoreError;

/// Result type for progression operations
pub type ProgressionResult<T> = Result<T, ProgressionError>;

/// Any of these aborts the whole transaction
#[derive(Debug, Clone, Error)]
pub enum ProgressionError {
    #[error("Application not found: {0}")]
    ApplicationNotFound(Uuid),

    #[error("Submission not found: {0}")]
    SubmissionNotFound(Uuid),

    /// Completed applications never take new submissions or overrides
    #[error("Application {0} is already completed")]
    AlreadyCompleted(Uuid),

    #[error("Stage must be between 1 and 8, got {0}")]
    StageOutOfRange(u8),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Certificate(#[from] CertificateError),
}

impl ProgressionError {
    pub fn status_code(&self) -> u16 {
        match self {
            ProgressionError::ApplicationNotFound(_) => 404,
            ProgressionError::SubmissionNotFound(_) => 404,
            ProgressionError::AlreadyCompleted(_) => 409,
            ProgressionError::StageOutOfRange(_) => 400,
            ProgressionError::Store(e) => e.status_code(),
            ProgressionError::Certificate(e) => e.status_code(),
        }
    }
}
