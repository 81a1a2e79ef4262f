//! pkgbump - package.json dependency range updater CLI tool
//!
//! Widens or refreshes the caret and tilde ranges declared in package.json
//! files, optionally across npm workspaces, bumping and aligning package
//! versions along the way.

use clap::Parser;
use pkgbump::cli::CliArgs;
use pkgbump::orchestrator::Orchestrator;
use pkgbump::output::{create_formatter, OutputConfig};
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status when no input changed
const EXIT_UNCHANGED: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(&args);

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `--debug`
fn init_logging(args: &CliArgs) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pkgbump={}", args.log_level())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let orchestrator = Orchestrator::new(args.clone())?;
    let summary = orchestrator.run().await?;

    let output_config = OutputConfig::from_cli(
        args.json,
        args.quiet,
        args.dry_run,
        io::stdout().is_terminal(),
    );
    let formatter = create_formatter(output_config);

    let mut stdout = io::stdout().lock();
    formatter.format(&summary, &mut stdout)?;
    stdout.flush()?;

    if summary.has_changes() || args.no_errors {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(EXIT_UNCHANGED))
    }
}
