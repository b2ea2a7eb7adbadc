//! CLI argument parsing using clap.

use std::path::PathBuf;

use clap::Parser;

/// da-ddns: keep DirectAdmin-hosted A records pointed at the current
/// public IP.
///
/// Runs one reconciliation pass and exits; schedule it from cron or a
/// systemd timer.
#[derive(Debug, Parser)]
#[command(name = "da-ddns")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON settings file
    pub settings: PathBuf,

    /// Path to the cached-IP state file (default: external_ip.txt in
    /// the working directory)
    #[arg(long = "state-file")]
    pub state_file: Option<PathBuf>,

    /// Resolve and list, but log intended changes instead of performing
    /// them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }
}
