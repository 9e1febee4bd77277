//! # Audit Errors
//!
//! Setup errors for the audit engine. Probe failures are not errors: they
//! become zero-score reports.

use thiserror::Error;

/// Result type for audit setup
pub type AuditResult<T> = Result<T, AuditError>;

#[derive(Debug, Clone, Error)]
pub enum AuditError {
    /// Link could not be turned into a probe target
    #[error("Invalid audit target: {0}")]
    InvalidTarget(String),

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}
