//! # Certificate Errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for certificate operations
pub type CertificateResult<T> = Result<T, CertificateError>;

#[derive(Debug, Clone, Error)]
pub enum CertificateError {
    /// Renderer collaborator failed to produce the artifact
    #[error("Certificate rendering failed: {0}")]
    Render(String),

    /// Could not find an unused certificate id
    #[error("Could not allocate a unique certificate id after {0} attempts")]
    IdExhausted(usize),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CertificateError {
    pub fn status_code(&self) -> u16 {
        match self {
            CertificateError::Store(e) => e.status_code(),
            _ => 500,
        }
    }
}
