//! Track-specific link rules

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::Serialize;
use thiserror::Error;
use url::{Host, Url};

use crate::program::{LinkClass, Track};

/// Hosts accepted for design-track submissions (exact or subdomain)
pub const DESIGN_DOMAINS: &[&str] = &["figma.com", "framer.com"];

/// Hosts accepted for document-track submissions (exact or subdomain)
pub const DOCUMENT_DOMAINS: &[&str] = &[
    "docs.google.com",
    "drive.google.com",
    "notion.so",
    "notion.site",
    "onedrive.live.com",
    "dropbox.com",
];

/// Why a link was refused
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum LinkRejection {
    #[error("Link is empty")]
    Empty,

    #[error("Link is not a valid absolute URL: {0}")]
    Malformed(String),

    #[error("Only http and https links are accepted, got '{0}'")]
    UnsupportedScheme(String),

    #[error("Link has no host")]
    MissingHost,

    #[error("{track} submissions must be a Figma or Framer link")]
    NotDesignTool { track: String },

    #[error("{track} submissions must be a shared document (Google Docs/Drive, Notion, OneDrive or Dropbox)")]
    NotDocumentHost { track: String },

    #[error("Link points at a local or private address ({0}); deploy your project publicly")]
    NonPublicHost(String),
}

/// Result of validating one link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkCheck {
    pub valid: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<LinkRejection>,

    /// Non-blocking advisory shown alongside an accepted link
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl LinkCheck {
    fn accepted(warning: Option<String>) -> Self {
        Self {
            valid: true,
            error: None,
            warning,
        }
    }

    fn rejected(error: LinkRejection) -> Self {
        Self {
            valid: false,
            error: Some(error),
            warning: None,
        }
    }

    /// Convert into a `Result`, dropping any warning
    pub fn into_result(self) -> Result<Option<String>, LinkRejection> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.warning),
        }
    }
}

/// Validate a link for a track
pub fn validate(link: &str, track: Track) -> LinkCheck {
    match classify(link, track) {
        Ok(warning) => LinkCheck::accepted(warning),
        Err(rejection) => LinkCheck::rejected(rejection),
    }
}

fn classify(link: &str, track: Track) -> Result<Option<String>, LinkRejection> {
    let link = link.trim();
    if link.is_empty() {
        return Err(LinkRejection::Empty);
    }

    let url = Url::parse(link).map_err(|e| LinkRejection::Malformed(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(LinkRejection::UnsupportedScheme(other.to_string())),
    }
    let host = url.host().ok_or(LinkRejection::MissingHost)?;

    match track.link_class() {
        LinkClass::Engineering => {
            if let Some(reason) = non_public_reason(&host) {
                return Err(LinkRejection::NonPublicHost(reason));
            }
            Ok(None)
        }
        LinkClass::Design => {
            if !host_matches(&host, DESIGN_DOMAINS) {
                return Err(LinkRejection::NotDesignTool {
                    track: track.label().to_string(),
                });
            }
            Ok(None)
        }
        LinkClass::Document => {
            if !host_matches(&host, DOCUMENT_DOMAINS) {
                return Err(LinkRejection::NotDocumentHost {
                    track: track.label().to_string(),
                });
            }
            if has_share_segment(&url) {
                Ok(None)
            } else {
                Ok(Some(
                    "Link has no /view or /edit segment; make sure sharing is enabled so a reviewer can open it"
                        .to_string(),
                ))
            }
        }
    }
}

fn host_matches(host: &Host<&str>, allowed: &[&str]) -> bool {
    let Host::Domain(name) = host else {
        return false;
    };
    let name = name.trim_end_matches('.').to_ascii_lowercase();
    allowed
        .iter()
        .any(|domain| name == *domain || name.ends_with(&format!(".{}", domain)))
}

fn has_share_segment(url: &Url) -> bool {
    url.path_segments()
        .map(|mut segments| segments.any(|s| s == "view" || s == "edit"))
        .unwrap_or(false)
}

/// Names the loopback, private or link-local host `url` points at, if any
pub fn non_public_host(url: &Url) -> Option<String> {
    url.host().as_ref().and_then(non_public_reason)
}

fn non_public_reason(host: &Host<&str>) -> Option<String> {
    match host {
        Host::Domain(name) => {
            let name = name.trim_end_matches('.').to_ascii_lowercase();
            if name == "localhost" || name.ends_with(".localhost") || name.ends_with(".local") {
                Some(name)
            } else {
                None
            }
        }
        Host::Ipv4(ip) => is_non_public_ip(IpAddr::V4(*ip)).then(|| ip.to_string()),
        Host::Ipv6(ip) => is_non_public_ip(IpAddr::V6(*ip)).then(|| ip.to_string()),
    }
}

fn is_non_public_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_non_public_v4(v4),
        IpAddr::V6(v6) => {
            if let Some(mapped) = v6.to_ipv4_mapped() {
                return is_non_public_v4(mapped);
            }
            is_non_public_v6(v6)
        }
    }
}

fn is_non_public_v4(ip: Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified()
}

fn is_non_public_v6(ip: Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        || (first & 0xfe00) == 0xfc00 // unique local fc00::/7
        || (first & 0xffc0) == 0xfe80 // link local fe80::/10
}
