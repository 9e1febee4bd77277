//! Idempotent certificate issuance

use std::sync::Arc;

use tracing::info;

use crate::program::{Application, Certificate};
use crate::store::Transaction;

use super::errors::CertificateResult;
use super::id;
use super::renderer::{CertificateData, CertificateRenderer, RenderedArtifact};

/// Newly created certificate and its artifact
#[derive(Debug, Clone)]
pub struct IssuedCertificate {
    pub certificate: Certificate,
    pub artifact: RenderedArtifact,
}

/// Creates at most one certificate per application
#[derive(Clone)]
pub struct CertificateIssuer {
    renderer: Arc<dyn CertificateRenderer>,
}

impl CertificateIssuer {
    pub fn new(renderer: Arc<dyn CertificateRenderer>) -> Self {
        Self { renderer }
    }

    /// Issue a certificate inside the caller's transaction
    ///
    /// Returns `None` when the application already has one. Any error must
    /// abort the caller's transaction; nothing is written outside it.
    pub fn issue_within(
        &self,
        tx: &mut dyn Transaction,
        application: &Application,
    ) -> CertificateResult<Option<IssuedCertificate>> {
        if let Some(existing) = tx.certificate_for_application(application.id)? {
            info!(
                application_id = %application.id,
                certificate_id = %existing.certificate_id,
                "certificate already issued"
            );
            return Ok(None);
        }

        let certificate_id = id::allocate(&*tx)?;
        let certificate = Certificate::new(
            application.id,
            certificate_id,
            application.cohort_id,
            application.track,
            application.tier,
            application.full_name(),
        );
        tx.insert_certificate(certificate.clone())?;

        let artifact = self.renderer.render(&CertificateData::from(&certificate))?;
        info!(
            application_id = %application.id,
            certificate_id = %certificate.certificate_id,
            "certificate issued"
        );
        Ok(Some(IssuedCertificate {
            certificate,
            artifact,
        }))
    }
}
