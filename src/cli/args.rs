//! CLI argument definitions using clap
//!
//! Commands:
//! - cohortd serve --config <path>
//! - cohortd check-link --track <track> <link>
//! - cohortd audit --track <track> --stage <n> [--tier <tier>] <link>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::program::{PackageTier, Track};

/// cohortd - cohort internship program service
#[derive(Parser, Debug)]
#[command(name = "cohortd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP API
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./cohortd.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate a project link for a track and print the result
    CheckLink {
        /// Track name or slug, e.g. "frontend" or "UI/UX Design"
        #[arg(long)]
        track: Track,

        link: String,
    },

    /// Audit a deployed project once and print the report
    Audit {
        #[arg(long)]
        track: Track,

        /// Stage to audit against
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=8))]
        stage: u8,

        #[arg(long, default_value = "free")]
        tier: PackageTier,

        /// Request timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        link: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_audit() {
        let cli = Cli::try_parse_from([
            "cohortd",
            "audit",
            "--track",
            "backend",
            "--stage",
            "3",
            "https://api.example.com",
        ])
        .unwrap();
        match cli.command {
            Command::Audit {
                track, stage, tier, ..
            } => {
                assert_eq!(track, Track::BackendDevelopment);
                assert_eq!(stage, 3);
                assert_eq!(tier, PackageTier::Free);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_stage_out_of_range_rejected() {
        let result = Cli::try_parse_from([
            "cohortd", "audit", "--track", "frontend", "--stage", "9", "https://x.dev",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_track_rejected() {
        let result = Cli::try_parse_from(["cohortd", "check-link", "--track", "cooking", "x"]);
        assert!(result.is_err());
    }
}
