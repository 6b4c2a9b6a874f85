//! Storage infrastructure: the flag store and where its bytes live.
//!
//! - `store` holds the [`store::Store`] type: the in-memory flag mapping and
//!   the save-on-every-mutation rule.
//! - `file` is the production [`FlagBackend`], one JSON file on disk.
//! - `mock` is an in-memory [`FlagBackend`] for tests.
//! - `config` reads [`config::StoreConfig`] from TOML.
//!
//! # Testability
//!
//! The `FlagBackend` trait lets unit tests run a real `Store` without touching
//! the file system and count exactly how many times it saved.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::toggle::InvalidState;

pub mod config;
pub mod file;
pub mod mock;
pub mod store;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A value outside `{0, 1}` was assigned to a flag.
    #[error(transparent)]
    InvalidState(#[from] InvalidState),

    /// The named flag is not in the store.
    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    /// The backing file could not be read or written.
    #[error("I/O error accessing flag store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file is not a JSON object.
    #[error("malformed flag store at {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The flag mapping could not be encoded as JSON.
    #[error("failed to encode flag store: {0}")]
    Encode(#[source] serde_json::Error),
}

impl StoreError {
    /// Returns `true` for failures to read, write or parse the backing file.
    pub fn is_io_failure(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Malformed { .. })
    }
}

/// Where a store's serialized flags live.
///
/// Each call acquires and releases whatever handle it needs; nothing stays
/// open between calls.
pub trait FlagBackend {
    /// Returns `true` if there is something to load.
    fn exists(&self) -> bool;
    /// Reads the full serialized contents.
    fn read(&self) -> Result<Vec<u8>, StoreError>;
    /// Replaces the full serialized contents.
    fn write(&self, contents: &[u8]) -> Result<(), StoreError>;
    /// Path used in log events and error messages.
    fn location(&self) -> &Path;
}
