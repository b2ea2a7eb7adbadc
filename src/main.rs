//! da-ddns: DirectAdmin dynamic DNS reconciler
//!
//! Entry point for the da-ddns application.

use std::process::ExitCode;

use da_ddns::config::{Cli, Settings};
use da_ddns::state::DEFAULT_STATE_FILE;

mod app;
mod run;

use app::{exit_code, setup_tracing};

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    let settings = match Settings::load(&cli.settings) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return exit_code::CONFIG_ERROR;
        }
    };

    setup_tracing(cli.verbose);
    tracing::info!("{settings}");

    run_application(settings, &cli)
}

/// Runs the reconciliation pass on a fresh runtime.
fn run_application(settings: Settings, cli: &Cli) -> ExitCode {
    let state_file = cli
        .state_file
        .clone()
        .unwrap_or_else(|| DEFAULT_STATE_FILE.into());

    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    match runtime.block_on(run::execute(settings, state_file, cli.dry_run)) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!("Application error: {e}");
            exit_code::runtime_error()
        }
    }
}
