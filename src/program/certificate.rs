//! # Certificates
//!
//! Completion certificate record. At most one per application; immutable once
//! issued.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::track::{PackageTier, Track};

/// Certificate model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: Uuid,

    pub application_id: Uuid,

    /// Public identifier, e.g. `KNOW-2026-3FA9C1`
    pub certificate_id: String,

    pub cohort_id: Uuid,

    pub track: Track,

    /// Package tier the certificate was earned on
    pub level: PackageTier,

    /// Recipient name as printed on the artifact
    pub recipient_name: String,

    pub issued_at: DateTime<Utc>,

    /// SHA-256 over the printed fields, hex encoded
    pub verification_hash: String,
}

impl Certificate {
    pub fn new(
        application_id: Uuid,
        certificate_id: String,
        cohort_id: Uuid,
        track: Track,
        level: PackageTier,
        recipient_name: String,
    ) -> Self {
        let issued_at = Utc::now();
        let verification_hash =
            fingerprint(&certificate_id, &recipient_name, track, level, &issued_at);
        Self {
            id: Uuid::new_v4(),
            application_id,
            certificate_id,
            cohort_id,
            track,
            level,
            recipient_name,
            issued_at,
            verification_hash,
        }
    }

    /// Whether the printed fields still match the stored hash
    pub fn is_untampered(&self) -> bool {
        fingerprint(
            &self.certificate_id,
            &self.recipient_name,
            self.track,
            self.level,
            &self.issued_at,
        ) == self.verification_hash
    }
}

fn fingerprint(
    certificate_id: &str,
    recipient_name: &str,
    track: Track,
    level: PackageTier,
    issued_at: &DateTime<Utc>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(certificate_id.as_bytes());
    hasher.update(b"|");
    hasher.update(recipient_name.as_bytes());
    hasher.update(b"|");
    hasher.update(track.label().as_bytes());
    hasher.update(b"|");
    hasher.update(level.label().as_bytes());
    hasher.update(b"|");
    hasher.update(issued_at.to_rfc3339().as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Certificate {
        Certificate::new(
            Uuid::new_v4(),
            "KNOW-2026-ABC123".to_string(),
            Uuid::new_v4(),
            Track::BackendDevelopment,
            PackageTier::Premium,
            "Ada Lovelace".to_string(),
        )
    }

    #[test]
    fn test_hash_is_hex_sha256() {
        let cert = sample();
        assert_eq!(cert.verification_hash.len(), 64);
        assert!(cert.is_untampered());
    }

    #[test]
    fn test_tampering_detected() {
        let mut cert = sample();
        cert.recipient_name = "Someone Else".to_string();
        assert!(!cert.is_untampered());
    }
}
