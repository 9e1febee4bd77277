//! # Certificates
//!
//! Issuance runs inside the progression transaction: the existence check and
//! the insert share one transaction, so retries cannot duplicate a
//! certificate. Rendering is delegated to a [`CertificateRenderer`].

mod errors;
mod id;
mod issuer;
mod renderer;
mod verify;

pub use errors::{CertificateError, CertificateResult};
pub use id::{generate as generate_certificate_id, is_well_formed};
pub use issuer::{CertificateIssuer, IssuedCertificate};
pub use renderer::{CertificateData, CertificateRenderer, RenderedArtifact, SvgCertificateRenderer};
pub use verify::{verify, Verification};
