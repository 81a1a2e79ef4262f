//! CLI argument parsing module for pkgbump

use crate::domain::BumpLevel;
use clap::Parser;
use semver::Version;

/// Parse an explicit alignment version
fn parse_version(s: &str) -> Result<Version, String> {
    let s = s.trim();
    let s = s.strip_prefix('v').unwrap_or(s);
    Version::parse(s).map_err(|e| format!("invalid version {}: {}", s, e))
}

/// Update dependency ranges in package.json files
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pkgbump",
    version,
    about = "Update dependency ranges in package.json files and workspaces"
)]
pub struct CliArgs {
    /// Manifest files or glob patterns
    #[arg(default_value = "package.json")]
    pub files: Vec<String>,

    /// Keep caret and tilde ranges within their semver bounds
    #[arg(short, long)]
    pub strict: bool,

    /// Only account for dev/peer/optional changes when dependencies changed
    #[arg(short, long)]
    pub quick: bool,

    /// Print debug logs
    #[arg(short, long)]
    pub debug: bool,

    /// Exit successfully even when nothing changed
    #[arg(short = 'n', long)]
    pub no_errors: bool,

    /// Bump the version of changed packages (default: patch)
    #[arg(
        short,
        long,
        value_enum,
        num_args = 0..=1,
        default_missing_value = "patch",
        value_name = "LEVEL"
    )]
    pub bump: Option<BumpLevel>,

    /// Compute and report changes without writing any file
    #[arg(short = 'x', long)]
    pub dry_run: bool,

    /// Also update packages listed in `workspaces`
    #[arg(short, long)]
    pub workspaces: bool,

    /// Give every workspace package the same version (default: the highest one)
    #[arg(
        short,
        long,
        num_args = 0..=1,
        value_name = "VERSION",
        value_parser = parse_version
    )]
    pub align: Option<Option<Version>>,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Only print the final summary
    #[arg(long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Returns true if a progress bar may be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }

    /// Log filter directive implied by the flags
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "warn"
        }
    }
}
