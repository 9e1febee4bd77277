//! Notification backend configuration

use serde::{Deserialize, Serialize};

/// SMTP settings for certificate email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Empty for unauthenticated local relays
    #[serde(default)]
    pub smtp_user: String,

    /// Prefer COHORTD_SMTP_PASSWORD over storing this in the file
    #[serde(default)]
    pub smtp_password: String,

    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "Cohort Certificates".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_user: String::new(),
            smtp_password: String::new(),
            from_email: "certificates@cohort.local".to_string(),
            from_name: default_from_name(),
        }
    }
}

/// Chat API settings for participant direct messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagingConfig {
    /// `chat.postMessage` endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Prefer COHORTD_BOT_TOKEN over storing this in the file
    #[serde(default)]
    pub bot_token: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_api_url() -> String {
    "https://slack.com/api/chat.postMessage".to_string()
}

fn default_timeout_ms() -> u64 {
    5_000
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            bot_token: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}
