//! CLI command implementations
//!
//! `serve` loads configuration, initializes logging, assembles the services
//! and runs the HTTP server. `check-link` and `audit` are one-shot tools that
//! print JSON to stdout.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::audit::{AuditConfig, AuditEngine, AuditRequest, ProjectAuditor};
use crate::config::ServiceConfig;
use crate::http_server::HttpServer;
use crate::program::{PackageTier, Track};
use crate::services::Services;
use crate::validation;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a parsed command
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port),
        Command::CheckLink { track, link } => check_link(track, &link),
        Command::Audit {
            track,
            stage,
            tier,
            timeout_ms,
            link,
        } => audit(track, stage, tier, timeout_ms, &link),
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the configured level.
pub fn init_logging(level: &str) {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("cohortd={},tower_http=info,warn", level).into()),
        )
        .with(fmt::layer())
        .try_init();
}

/// Start the HTTP API
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = ServiceConfig::load(config_path)?;
    config.http.override_port(port);

    init_logging(&config.log_level);

    let rt = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;

    rt.block_on(async {
        let services = Services::from_config(&config)?;
        info!(
            config = %config_path.display(),
            messaging = config.messaging.is_some(),
            email = config.email.is_some(),
            "services assembled"
        );

        HttpServer::new(config.http.clone(), Arc::new(services))
            .start()
            .await
            .map_err(CliError::Server)
    })
}

/// Validate a link and print the result
pub fn check_link(track: Track, link: &str) -> CliResult<()> {
    let check = validation::validate(link, track);
    write_json(&check)
}

/// Audit a link once and print the report
pub fn audit(
    track: Track,
    stage: u8,
    tier: PackageTier,
    timeout_ms: Option<u64>,
    link: &str,
) -> CliResult<()> {
    init_logging("warn");

    let config = timeout_ms
        .map(AuditConfig::with_timeout_ms)
        .unwrap_or_default();

    let rt = tokio::runtime::Runtime::new().map_err(CliError::Runtime)?;

    let report = rt.block_on(async {
        let engine = AuditEngine::new(&config)?;
        Ok::<_, CliError>(
            engine
                .audit(&AuditRequest {
                    link: link.to_string(),
                    track,
                    stage,
                    tier,
                })
                .await,
        )
    })?;

    write_json(&report)
}

fn write_json<T: Serialize>(value: &T) -> CliResult<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
