//! Store configuration.
//!
//! [`StoreConfig`] says which file a store binds to and how it saves while
//! loading.  It is a plain struct: build it in code, or read it from a TOML
//! file with [`load_store_config`].
//!
//! ```toml
//! path = "flags/app.json"
//! load_mode = "per_entry"
//! ```
//!
//! Missing fields take their defaults, so an empty file is a valid config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name used when no path is given, relative to the working directory.
pub const DEFAULT_STORE_FILE: &str = "store.json";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// How many saves a store performs while loading its backing file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Every loaded entry goes through the normal assignment path, saving
    /// once per entry.
    PerEntry,
    /// Entries are loaded into memory, then saved once.  No save happens when
    /// the file held no entries.
    #[default]
    SingleSave,
}

/// Settings for opening a [`Store`](super::store::Store).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backing file.  Relative paths resolve against the working directory.
    #[serde(default = "default_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub load_mode: LoadMode,
}

fn default_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_FILE)
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            load_mode: LoadMode::default(),
        }
    }
}

impl StoreConfig {
    /// Config bound to `path` with the default load mode.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the TOML is malformed or a field has
    /// the wrong type.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Loads a [`StoreConfig`] from the TOML file at `path`, returning
/// `StoreConfig::default()` if the file does not exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_store_config(path: impl AsRef<Path>) -> Result<StoreConfig, ConfigError> {
    let path = path.as_ref();

    match std::fs::read_to_string(path) {
        Ok(content) => StoreConfig::from_toml_str(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StoreConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
