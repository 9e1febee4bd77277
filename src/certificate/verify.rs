//! Public certificate verification

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::program::Track;
use crate::store::ProgramStore;

use super::errors::CertificateResult;
use super::id::is_well_formed;

/// Public view of a certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    pub valid: bool,
    pub name: String,
    pub track: Track,
    pub issued: DateTime<Utc>,
    pub certificate_id: String,
}

/// Look up a certificate by its public id
///
/// `valid` is false when the stored fields no longer match the hash taken at
/// issuance.
pub fn verify(store: &dyn ProgramStore, certificate_id: &str) -> CertificateResult<Option<Verification>> {
    let certificate_id = certificate_id.trim().to_ascii_uppercase();
    if !is_well_formed(&certificate_id) {
        return Ok(None);
    }
    let Some(cert) = store.certificate_by_public_id(&certificate_id)? else {
        return Ok(None);
    };
    Ok(Some(Verification {
        valid: cert.is_untampered(),
        name: cert.recipient_name.clone(),
        track: cert.track,
        issued: cert.issued_at,
        certificate_id: cert.certificate_id,
    }))
}
