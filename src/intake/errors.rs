//! # Intake Errors
//!
//! Synchronous rejections returned to the actor. Transaction failures are
//! collapsed to `System`; their details only go to the log.

use thiserror::Error;
use tracing::error;

use crate::program::Capability;
use crate::progression::ProgressionError;
use crate::store::StoreError;
use crate::validation::LinkRejection;

/// Result type for intake operations
pub type IntakeResult<T> = Result<T, IntakeError>;

#[derive(Debug, Clone, Error)]
pub enum IntakeError {
    #[error("Not permitted: {0:?} required")]
    Forbidden(Capability),

    #[error("No active application found for {0}")]
    NoActiveApplication(String),

    #[error("Invalid project link: {0}")]
    InvalidLink(#[from] LinkRejection),

    #[error("Your previous submission is still processing. Please wait a moment.")]
    AlreadyProcessing,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error")]
    System,
}

impl IntakeError {
    pub fn status_code(&self) -> u16 {
        match self {
            IntakeError::InvalidLink(_) | IntakeError::InvalidRequest(_) => 400,
            IntakeError::Forbidden(_) => 403,
            IntakeError::NoActiveApplication(_) | IntakeError::NotFound(_) => 404,
            IntakeError::AlreadyProcessing | IntakeError::Conflict(_) => 409,
            IntakeError::System => 500,
        }
    }
}

impl From<StoreError> for IntakeError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => IntakeError::Conflict(msg),
            StoreError::NotFound(msg) => IntakeError::NotFound(msg),
            StoreError::Backend(msg) => {
                error!(error = %msg, "store failure");
                IntakeError::System
            }
        }
    }
}

impl From<ProgressionError> for IntakeError {
    fn from(err: ProgressionError) -> Self {
        match err {
            ProgressionError::ApplicationNotFound(id) => {
                IntakeError::NotFound(format!("application {}", id))
            }
            ProgressionError::SubmissionNotFound(id) => {
                IntakeError::NotFound(format!("submission {}", id))
            }
            ProgressionError::AlreadyCompleted(id) => {
                IntakeError::Conflict(format!("application {} is already completed", id))
            }
            ProgressionError::StageOutOfRange(stage) => {
                IntakeError::InvalidRequest(format!("stage must be between 1 and 8, got {}", stage))
            }
            ProgressionError::Store(e) => IntakeError::from(e),
            ProgressionError::Certificate(e) => {
                error!(error = %e, "certificate failure aborted transaction");
                IntakeError::System
            }
        }
    }
}
