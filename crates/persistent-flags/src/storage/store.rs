//! The flag store.
//!
//! A [`Store`] owns a mapping from flag name to [`ToggleableValue`] and keeps
//! it in step with a backing file: every `set` and `delete` rewrites the whole
//! file before returning.  There is no batching and no close step.
//!
//! # File format
//!
//! ```json
//! {
//!     "debug_mode": 0,
//!     "feature_x": 1
//! }
//! ```
//!
//! Keys are written in sorted order with a four-space indent.
//!
//! # One store per file
//!
//! Nothing stops two stores from binding to the same file, but they do not
//! see each other's changes and the last one to save wins.  Callers that need
//! more must lock the file themselves.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::config::{LoadMode, StoreConfig};
use super::file::FileBackend;
use super::{FlagBackend, StoreError};
use crate::domain::toggle::ToggleableValue;

const INDENT: &[u8] = b"    ";

/// Named boolean flags persisted on every mutation.
///
/// Besides flags, a store can carry transient attributes: arbitrary JSON
/// values that live only in memory and are never written to the backing file.
/// Flags and transient attributes use separate namespaces.
///
/// # Examples
///
/// ```rust
/// use persistent_flags::{MemoryBackend, LoadMode, Store, ToggleableValue};
///
/// let mut store = Store::with_backend(MemoryBackend::new(), LoadMode::SingleSave).unwrap();
/// store.set("feature_x", true).unwrap();
/// assert_eq!(store.toggle("feature_x").unwrap(), ToggleableValue::Off);
/// assert!(!store.is_on("feature_x"));
/// ```
#[derive(Debug)]
pub struct Store<B: FlagBackend = FileBackend> {
    backend: B,
    load_mode: LoadMode,
    flags: BTreeMap<String, ToggleableValue>,
    transient: HashMap<String, Value>,
}

impl Store<FileBackend> {
    /// Opens the store at `path`, creating an empty file if none exists.
    ///
    /// # Errors
    ///
    /// See [`Store::load`].
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::with_config(&StoreConfig::at(path))
    }

    /// Opens `store.json` in the current working directory.
    ///
    /// # Errors
    ///
    /// See [`Store::load`].
    pub fn open_default() -> Result<Self, StoreError> {
        Self::with_config(&StoreConfig::default())
    }

    /// Opens the store described by `config`.
    ///
    /// # Errors
    ///
    /// See [`Store::load`].
    pub fn with_config(config: &StoreConfig) -> Result<Self, StoreError> {
        Self::with_backend(FileBackend::new(config.path.clone()), config.load_mode)
    }

    pub fn path(&self) -> &Path {
        self.backend.path()
    }
}

impl<B: FlagBackend> Store<B> {
    /// Binds a store to `backend` and loads it.
    ///
    /// # Errors
    ///
    /// See [`Store::load`].
    pub fn with_backend(backend: B, load_mode: LoadMode) -> Result<Self, StoreError> {
        let mut store = Self {
            backend,
            load_mode,
            flags: BTreeMap::new(),
            transient: HashMap::new(),
        };
        store.load()?;
        Ok(store)
    }

    /// Reads the backing file into the store.
    ///
    /// A missing file is first created empty.  Each entry's raw JSON value is
    /// read by truthiness (`false`, `0`, `""`, `[]`, `{}` and `null` are off,
    /// anything else is on), then stored as if assigned with [`Store::set`].
    /// Flags already in memory but absent from the file are kept.  How often
    /// the file is rewritten while loading depends on the [`LoadMode`].
    ///
    /// # Errors
    ///
    /// - [`StoreError::Io`] if the file cannot be created, read or rewritten.
    /// - [`StoreError::Malformed`] if the file is not a JSON object.
    pub fn load(&mut self) -> Result<(), StoreError> {
        if !self.backend.exists() {
            debug!(path = %self.backend.location().display(), "creating empty flag store");
            self.save()?;
        }

        let bytes = self.backend.read()?;
        let entries: Map<String, Value> =
            serde_json::from_slice(&bytes).map_err(|source| StoreError::Malformed {
                path: self.backend.location().to_path_buf(),
                source,
            })?;
        let count = entries.len();

        match self.load_mode {
            LoadMode::PerEntry => {
                for (name, raw) in entries {
                    self.set(name, is_truthy(&raw))?;
                }
            }
            LoadMode::SingleSave => {
                for (name, raw) in entries {
                    self.flags.insert(name, ToggleableValue::from(is_truthy(&raw)));
                }
                if count > 0 {
                    self.save()?;
                }
            }
        }

        debug!(
            path = %self.backend.location().display(),
            entries = count,
            mode = ?self.load_mode,
            "loaded flag store"
        );
        Ok(())
    }

    /// Writes every flag to the backing file, replacing its contents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be written.
    pub fn save(&self) -> Result<(), StoreError> {
        let mut buf = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
        self.flags.serialize(&mut ser).map_err(StoreError::Encode)?;

        self.backend.write(&buf)?;
        debug!(
            path = %self.backend.location().display(),
            flags = self.flags.len(),
            "saved flag store"
        );
        Ok(())
    }

    /// Sets a flag and saves.
    ///
    /// If the save fails the flag keeps its previous value (or stays absent).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be written.
    pub fn set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<ToggleableValue>,
    ) -> Result<(), StoreError> {
        let name = name.into();
        let value = value.into();
        trace!(flag = %name, %value, "set flag");

        let previous = self.flags.insert(name.clone(), value);
        if let Err(e) = self.save() {
            match previous {
                Some(old) => self.flags.insert(name, old),
                None => self.flags.remove(&name),
            };
            return Err(e);
        }
        Ok(())
    }

    /// Sets a flag from its integer form.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidState`] if `state` is not `0` or `1`; nothing is
    ///   stored or saved.
    /// - [`StoreError::Io`] if the file cannot be written.
    pub fn set_state(&mut self, name: impl Into<String>, state: i64) -> Result<(), StoreError> {
        let value = ToggleableValue::try_from(state)?;
        self.set(name, value)
    }

    /// Flips a flag, saves, and returns its new value.
    ///
    /// # Errors
    ///
    /// - [`StoreError::UnknownFlag`] if there is no flag called `name`.
    /// - [`StoreError::Io`] if the file cannot be written.
    pub fn toggle(&mut self, name: &str) -> Result<ToggleableValue, StoreError> {
        let next = self
            .get(name)
            .ok_or_else(|| StoreError::UnknownFlag(name.to_string()))?
            .toggle();
        self.set(name, next)?;
        Ok(next)
    }

    /// Removes a flag and saves, returning the value it had.
    ///
    /// If the save fails the flag is put back.
    ///
    /// # Errors
    ///
    /// - [`StoreError::UnknownFlag`] if there is no flag called `name`.
    /// - [`StoreError::Io`] if the file cannot be written.
    pub fn delete(&mut self, name: &str) -> Result<ToggleableValue, StoreError> {
        let removed = self
            .flags
            .remove(name)
            .ok_or_else(|| StoreError::UnknownFlag(name.to_string()))?;
        trace!(flag = %name, "delete flag");

        if let Err(e) = self.save() {
            self.flags.insert(name.to_string(), removed);
            return Err(e);
        }
        Ok(removed)
    }

    pub fn get(&self, name: &str) -> Option<ToggleableValue> {
        self.flags.get(name).copied()
    }

    /// Returns `true` if the flag exists and is on.
    pub fn is_on(&self, name: &str) -> bool {
        self.get(name).is_some_and(ToggleableValue::is_on)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.flags.contains_key(name)
    }

    /// Flag names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.flags.keys().map(String::as_str)
    }

    /// Flags and their values in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ToggleableValue)> {
        self.flags.iter().map(|(name, value)| (name.as_str(), *value))
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Stores an in-memory attribute that is never persisted.
    pub fn set_transient(&mut self, name: impl Into<String>, value: Value) {
        self.transient.insert(name.into(), value);
    }

    pub fn get_transient(&self, name: &str) -> Option<&Value> {
        self.transient.get(name)
    }

    pub fn remove_transient(&mut self, name: &str) -> Option<Value> {
        self.transient.remove(name)
    }

    /// Routes a dynamically typed assignment: JSON booleans become flags via
    /// [`Store::set`], every other value becomes a transient attribute.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if a boolean cannot be saved.
    pub fn assign(&mut self, name: impl Into<String>, value: Value) -> Result<(), StoreError> {
        match value {
            Value::Bool(b) => self.set(name, b),
            other => {
                self.set_transient(name, other);
                Ok(())
            }
        }
    }

    pub fn load_mode(&self) -> LoadMode {
        self.load_mode
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

/// JSON truthiness: empty, zero, `false` and `null` are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
