//! CLI module for cohortd
//!
//! Provides command-line interface for:
//! - serve: Load config and run the HTTP API
//! - check-link: One-shot link validation
//! - audit: One-shot project audit

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{audit, check_link, init_logging, run, run_command, serve};
pub use errors::{CliError, CliResult};
