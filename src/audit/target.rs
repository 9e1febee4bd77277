//! Probe target normalization

use url::Url;

use super::errors::{AuditError, AuditResult};

/// Path expected to reject unauthenticated callers
pub const PROTECTED_PATH: &str = "/api/admin";

/// Path expected to reject an invalid payload
pub const MUTATION_PATH: &str = "/api/users";

/// Parse a submitted link, applying `https://` when no scheme is present
pub fn normalize(link: &str) -> AuditResult<Url> {
    let link = link.trim();
    if link.is_empty() {
        return Err(AuditError::InvalidTarget("empty link".to_string()));
    }
    let candidate = if link.contains("://") {
        link.to_string()
    } else {
        format!("https://{}", link)
    };
    let url = Url::parse(&candidate).map_err(|e| AuditError::InvalidTarget(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(AuditError::InvalidTarget(format!(
            "unsupported scheme '{}'",
            other
        ))),
    }
}

/// Same origin as `base`, at an absolute path
pub fn derived(base: &Url, path: &str) -> AuditResult<Url> {
    base.join(path)
        .map_err(|e| AuditError::InvalidTarget(e.to_string()))
}
