//! Persistence of the last-known external IP between runs.
//!
//! The store holds exactly one datum: the dotted-quad the previous run
//! observed. Its absence means "first run". A broken state file is fatal:
//! silently starting fresh would re-fire the change notification on every
//! invocation.

mod file;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use file::FileStateStore;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Default cache file, resolved against the working directory.
pub const DEFAULT_STATE_FILE: &str = "external_ip.txt";

/// Errors that can occur reading or writing the cached IP.
#[derive(Debug, Error)]
pub enum StateError {
    /// The state file exists but could not be read.
    #[error("Failed to read state file '{}': {source}", path.display())]
    Read {
        /// Path to the state file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The state file could not be written.
    #[error("Failed to write state file '{}': {source}", path.display())]
    Write {
        /// Path to the state file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Abstraction over the cached-IP store.
///
/// Both operations are synchronous blocking file I/O; the file is a
/// handful of bytes and the process runs the flow exactly once.
pub trait StateStore: Send + Sync {
    /// Loads the previously stored IP.
    ///
    /// Returns `Ok(None)` when no state exists (first run).
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Read`] for any failure other than the file
    /// not existing.
    fn load(&self) -> Result<Option<String>, StateError>;

    /// Overwrites the stored IP with `ip`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::Write`] if the file cannot be written.
    fn save(&self, ip: &str) -> Result<(), StateError>;
}
