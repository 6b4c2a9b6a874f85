//! In-memory backend for unit testing.
//!
//! Lets tests run a [`Store`](super::store::Store) without a file system,
//! count its saves, and force writes to fail.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{FlagBackend, StoreError};

/// A [`FlagBackend`] holding its contents in memory.
///
/// Clones share the same contents and counters, so a second store built from
/// a clone sees what the first one saved, like two stores on one file.
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    contents: Arc<Mutex<Option<Vec<u8>>>>,
    write_count: Arc<Mutex<u32>>,
    fail_writes: Arc<Mutex<bool>>,
    location: PathBuf,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryBackend {
    /// Creates an empty backend (as if the file did not exist).
    pub fn new() -> Self {
        Self {
            contents: Arc::new(Mutex::new(None)),
            write_count: Arc::new(Mutex::new(0)),
            fail_writes: Arc::new(Mutex::new(false)),
            location: PathBuf::from("<memory>"),
        }
    }

    /// Creates a backend pre-filled with `contents`.
    pub fn with_contents(contents: impl Into<Vec<u8>>) -> Self {
        let backend = Self::new();
        *lock(&backend.contents) = Some(contents.into());
        backend
    }

    /// Returns the current contents as UTF-8 text, if any were written.
    pub fn contents(&self) -> Option<String> {
        lock(&self.contents)
            .as_ref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Returns the number of successful writes.
    pub fn write_count(&self) -> u32 {
        *lock(&self.write_count)
    }

    /// Makes every following write fail with [`StoreError::Io`].
    pub fn set_fail_writes(&self, fail: bool) {
        *lock(&self.fail_writes) = fail;
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagBackend for MemoryBackend {
    fn exists(&self) -> bool {
        lock(&self.contents).is_some()
    }

    fn read(&self) -> Result<Vec<u8>, StoreError> {
        lock(&self.contents).clone().ok_or_else(|| StoreError::Io {
            path: self.location.clone(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }

    fn write(&self, contents: &[u8]) -> Result<(), StoreError> {
        if *lock(&self.fail_writes) {
            return Err(StoreError::Io {
                path: self.location.clone(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            });
        }
        *lock(&self.contents) = Some(contents.to_vec());
        *lock(&self.write_count) += 1;
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.location
    }
}
