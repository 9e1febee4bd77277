//! CLI errors
//!
//! Every CLI error is fatal: main prints it with its code and exits non-zero.

use std::io;

use thiserror::Error;

use crate::audit::AuditError;
use crate::config::ConfigError;
use crate::services::StartupError;

/// Result type for CLI commands
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot start the async runtime: {0}")]
    Runtime(#[source] io::Error),

    #[error("service startup failed: {0}")]
    Startup(#[from] StartupError),

    #[error("audit client setup failed: {0}")]
    AuditClient(#[from] AuditError),

    #[error("HTTP server stopped: {0}")]
    Server(#[source] io::Error),

    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),

    #[error("cannot encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CliError {
    /// Stable code printed alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            CliError::Config(_) => "COHORTD_CLI_CONFIG_ERROR",
            CliError::Runtime(_) | CliError::Startup(_) | CliError::AuditClient(_) => {
                "COHORTD_CLI_BOOT_FAILED"
            }
            CliError::Server(_) => "COHORTD_CLI_SERVER_FAILED",
            CliError::Output(_) | CliError::Encode(_) => "COHORTD_CLI_IO_ERROR",
        }
    }
}
