//! JSON file backend and file-level helpers.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::config::DEFAULT_STORE_FILE;
use super::{FlagBackend, StoreError};

/// A [`FlagBackend`] writing to a single file.
///
/// Writes replace the whole file.  The parent directory is never created: a
/// store bound to a path under a missing directory fails on its first save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FlagBackend for FileBackend {
    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read(&self) -> Result<Vec<u8>, StoreError> {
        std::fs::read(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn write(&self, contents: &[u8]) -> Result<(), StoreError> {
        std::fs::write(&self.path, contents).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

/// Deletes the store file at `path`.
///
/// Returns `Ok(false)` when there was no file to delete.  Live stores bound to
/// `path` keep their in-memory flags and recreate the file on their next save.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file exists but cannot be removed.
pub fn erase_store(path: impl AsRef<Path>) -> Result<bool, StoreError> {
    let path = path.as_ref();
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!(path = %path.display(), "erased flag store");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Deletes `store.json` in the current working directory, if present.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file exists but cannot be removed.
pub fn erase_default_store() -> Result<bool, StoreError> {
    erase_store(DEFAULT_STORE_FILE)
}
