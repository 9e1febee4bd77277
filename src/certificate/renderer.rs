//! Certificate artifact rendering

use chrono::{DateTime, Utc};

use crate::program::{Certificate, PackageTier, Track};

use super::errors::CertificateResult;

/// Fields printed on a certificate
#[derive(Debug, Clone)]
pub struct CertificateData {
    pub certificate_id: String,
    pub recipient_name: String,
    pub track: Track,
    pub level: PackageTier,
    pub issued_at: DateTime<Utc>,
}

impl From<&Certificate> for CertificateData {
    fn from(cert: &Certificate) -> Self {
        Self {
            certificate_id: cert.certificate_id.clone(),
            recipient_name: cert.recipient_name.clone(),
            track: cert.track,
            level: cert.level,
            issued_at: cert.issued_at,
        }
    }
}

/// Rendered certificate, ready to attach to an email
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Turns certificate data into a document
pub trait CertificateRenderer: Send + Sync {
    fn render(&self, data: &CertificateData) -> CertificateResult<RenderedArtifact>;
}

/// Minimal SVG certificate
#[derive(Debug, Clone, Default)]
pub struct SvgCertificateRenderer {
    pub verify_base_url: Option<String>,
}

impl SvgCertificateRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verify_url(base_url: impl Into<String>) -> Self {
        Self {
            verify_base_url: Some(base_url.into()),
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl CertificateRenderer for SvgCertificateRenderer {
    fn render(&self, data: &CertificateData) -> CertificateResult<RenderedArtifact> {
        let verify_line = match &self.verify_base_url {
            Some(base) => format!(
                "Verify at {}/certificates/{}/verify",
                base.trim_end_matches('/'),
                data.certificate_id
            ),
            None => format!("Certificate ID {}", data.certificate_id),
        };
        let svg = format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="1123" height="794" viewBox="0 0 1123 794">
  <rect x="20" y="20" width="1083" height="754" fill="#ffffff" stroke="#1f2937" stroke-width="4"/>
  <text x="561" y="170" font-size="48" text-anchor="middle" font-family="serif">Certificate of Completion</text>
  <text x="561" y="260" font-size="22" text-anchor="middle" font-family="sans-serif">This certifies that</text>
  <text x="561" y="340" font-size="44" text-anchor="middle" font-family="serif">{name}</text>
  <text x="561" y="410" font-size="22" text-anchor="middle" font-family="sans-serif">has completed all 8 stages of the {track} track</text>
  <text x="561" y="450" font-size="20" text-anchor="middle" font-family="sans-serif">{level} package</text>
  <text x="561" y="620" font-size="18" text-anchor="middle" font-family="sans-serif">Issued {issued}</text>
  <text x="561" y="660" font-size="16" text-anchor="middle" font-family="monospace">{verify}</text>
</svg>
"##,
            name = escape(&data.recipient_name),
            track = escape(data.track.label()),
            level = escape(data.level.label()),
            issued = data.issued_at.format("%B %-d, %Y"),
            verify = escape(&verify_line),
        );
        Ok(RenderedArtifact {
            file_name: format!("{}.svg", data.certificate_id),
            content_type: "image/svg+xml".to_string(),
            bytes: svg.into_bytes(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_contains_fields() {
        let data = CertificateData {
            certificate_id: "KNOW-2026-ABC123".to_string(),
            recipient_name: "Ada <Lovelace>".to_string(),
            track: Track::UiUxDesign,
            level: PackageTier::PremiumPro,
            issued_at: Utc::now(),
        };
        let artifact = SvgCertificateRenderer::with_verify_url("https://cohort.example/")
            .render(&data)
            .unwrap();
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert_eq!(artifact.file_name, "KNOW-2026-ABC123.svg");
        assert!(text.contains("Ada &lt;Lovelace&gt;"));
        assert!(text.contains("UI/UX Design"));
        assert!(text.contains("Premium Pro"));
        assert!(text.contains("https://cohort.example/certificates/KNOW-2026-ABC123/verify"));
    }
}
