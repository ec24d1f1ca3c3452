//! cicd-public: distribute shared CI/CD templates to opted-in projects.
//!
//! # Usage
//!
//! ```text
//! cicd-public distribute [--source <dir>] [--search-root <dir>] [--dry-run] [-v] [--json] [--strict]
//! ```

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::distribute::DistributeArgs;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "cicd-public",
    version,
    about = "Distribute CI/CD templates to your projects",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Distribute CI/CD templates to all projects with the marker file.
    ///
    /// Searches for projects containing .github/workflows/default_cicd_public.yml
    /// and copies every file from the source .github/ directory into each one.
    Distribute(DistributeArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Distribute(args) => args.run(),
    }
}

/// Library diagnostics go to stderr; `RUST_LOG` overrides the `warn` default.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
