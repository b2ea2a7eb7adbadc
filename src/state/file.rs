//! File-based state persistence.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{StateError, StateStore};

/// File-backed implementation of [`StateStore`].
///
/// The file contains exactly the last-known external IP as plain text,
/// no structure, no trailing newline. Writes replace the file in place;
/// the intended deployment is a single cron-style invocation that is
/// never run concurrently with itself, so no locking or atomic-rename
/// ceremony is layered on top.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    /// Creates a new file-based state store at the given path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the state file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<Option<String>, StateError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StateError::Read {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn save(&self, ip: &str) -> Result<(), StateError> {
        std::fs::write(&self.path, ip).map_err(|e| StateError::Write {
            path: self.path.clone(),
            source: e,
        })
    }
}
