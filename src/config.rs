//! # Service Configuration
//!
//! JSON configuration file with per-field defaults. Secrets may come from
//! the environment instead of the file:
//!
//! - `COHORTD_SMTP_PASSWORD` overrides `email.smtp_password`
//! - `COHORTD_BOT_TOKEN` overrides `messaging.bot_token`
//!
//! Leaving out `email` or `messaging` selects the recording mock backend.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audit::AuditConfig;
use crate::http_server::HttpServerConfig;
use crate::lock::DEFAULT_TTL;
use crate::notify::{EmailConfig, MessagingConfig};

pub const SMTP_PASSWORD_ENV: &str = "COHORTD_SMTP_PASSWORD";
pub const BOT_TOKEN_ENV: &str = "COHORTD_BOT_TOKEN";

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub audit: AuditConfig,

    /// Submission lock lifetime in seconds (default: 30)
    #[serde(default = "default_lock_ttl_secs")]
    pub lock_ttl_secs: u64,

    /// Where certificate artifacts are written before emailing
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,

    /// Base URL printed on certificates for verification
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Default log filter when RUST_LOG is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub email: Option<EmailConfig>,

    #[serde(default)]
    pub messaging: Option<MessagingConfig>,
}

fn default_lock_ttl_secs() -> u64 {
    DEFAULT_TTL.as_secs()
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("./certificates")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            http: HttpServerConfig::default(),
            audit: AuditConfig::default(),
            lock_ttl_secs: default_lock_ttl_secs(),
            artifact_dir: default_artifact_dir(),
            public_base_url: None,
            log_level: default_log_level(),
            email: None,
            messaging: None,
        }
    }
}

impl ServiceConfig {
    /// Load, apply environment secrets, and validate
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&content)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Override secrets from a variable lookup
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(email) = self.email.as_mut() {
            if let Some(password) = lookup(SMTP_PASSWORD_ENV) {
                email.smtp_password = password;
            }
        }
        if let Some(messaging) = self.messaging.as_mut() {
            if let Some(token) = lookup(BOT_TOKEN_ENV) {
                messaging.bot_token = token;
            }
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.lock_ttl_secs == 0 {
            return Err(ConfigError::Invalid("lock_ttl_secs must be > 0".to_string()));
        }
        if self.audit.timeout_ms == 0 {
            return Err(ConfigError::Invalid("audit.timeout_ms must be > 0".to_string()));
        }
        if let Some(email) = &self.email {
            if email.smtp_host.trim().is_empty() || email.from_email.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "email.smtp_host and email.from_email are required".to_string(),
                ));
            }
        }
        if let Some(messaging) = &self.messaging {
            if messaging.bot_token.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "messaging.bot_token is empty; set it in the file or via {}",
                    BOT_TOKEN_ENV
                )));
            }
        }
        Ok(())
    }

    pub fn lock_ttl(&self) -> Duration {
        Duration::from_secs(self.lock_ttl_secs)
    }
}
