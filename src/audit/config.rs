//! Audit probe configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Audit probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Per-request timeout in milliseconds (default: 10000)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Redirects followed before giving up (default: 5)
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Largest response body read from a project (default: 2 MiB)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_redirects() -> usize {
    5
}

fn default_max_body_bytes() -> usize {
    2 * 1024 * 1024
}

fn default_user_agent() -> String {
    format!("cohortd-audit/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_redirects: default_max_redirects(),
            max_body_bytes: default_max_body_bytes(),
            user_agent: default_user_agent(),
        }
    }
}

impl AuditConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Config with a custom timeout
    pub fn with_timeout_ms(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            ..Default::default()
        }
    }
}
