//! Configuration layer.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`])
//! - JSON settings file parsing and validation ([`Settings`])
//! - The notifier variant selected by the settings ([`NotifierSettings`])
//!
//! The settings file is the single source of truth for the DNS side;
//! the CLI only points at it and toggles run behavior (state file
//! location, dry-run, verbosity).

mod cli;
mod error;
mod settings;


pub use cli::Cli;
pub use error::ConfigError;
pub use settings::{NotifierSettings, Settings};
