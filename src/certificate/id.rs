//! Public certificate identifiers: `KNOW-<year>-<6 hex>`

use chrono::{Datelike, Utc};
use rand::RngCore;

use crate::store::Transaction;

use super::errors::{CertificateError, CertificateResult};

pub const PREFIX: &str = "KNOW";

/// Attempts before giving up on finding an unused id
pub const MAX_ATTEMPTS: usize = 8;

/// Random id for the given year
pub fn generate(year: i32) -> String {
    let mut suffix = [0u8; 3];
    rand::thread_rng().fill_bytes(&mut suffix);
    let hex: String = suffix.iter().map(|b| format!("{:02X}", b)).collect();
    format!("{}-{}-{}", PREFIX, year, hex)
}

/// Whether `id` has the certificate id shape
pub fn is_well_formed(id: &str) -> bool {
    let mut parts = id.split('-');
    let (Some(prefix), Some(year), Some(suffix), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    prefix == PREFIX
        && year.len() == 4
        && year.bytes().all(|b| b.is_ascii_digit())
        && suffix.len() == 6
        && suffix
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b))
}

/// Id not yet used by any certificate visible to `tx`
///
/// The suffix space is small, so collisions are retried rather than assumed
/// impossible.
pub fn allocate(tx: &dyn Transaction) -> CertificateResult<String> {
    let year = Utc::now().year();
    for _ in 0..MAX_ATTEMPTS {
        let candidate = generate(year);
        if tx.certificate_by_public_id(&candidate)?.is_none() {
            return Ok(candidate);
        }
    }
    Err(CertificateError::IdExhausted(MAX_ATTEMPTS))
}
