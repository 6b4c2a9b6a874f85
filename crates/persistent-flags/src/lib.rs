//! # persistent-flags
//!
//! Named on/off switches that survive restarts without a database.
//!
//! A [`Store`] binds to a JSON file (by default `store.json` in the working
//! directory), loads whatever flags it holds, and rewrites the whole file on
//! every `set` or `delete`.  Each flag is a [`ToggleableValue`]: an immutable
//! `0`/`1` state whose `toggle` returns the opposite value.
//!
//! ```rust,no_run
//! use persistent_flags::Store;
//!
//! # fn main() -> Result<(), persistent_flags::StoreError> {
//! let mut store = Store::open("flags.json")?;
//! store.set("feature_x", true)?;
//! store.toggle("feature_x")?;
//! assert!(!store.is_on("feature_x"));
//! # Ok(())
//! # }
//! ```
//!
//! - **`domain`** – the [`ToggleableValue`] type.  No I/O.
//! - **`storage`** – the [`Store`], its file and in-memory backends, and the
//!   TOML-readable [`StoreConfig`].
//!
//! The store is single-threaded and unlocked: bind at most one store to a
//! file at a time.

pub mod domain;
pub mod storage;

pub use domain::toggle::{InvalidState, ToggleableValue};
pub use storage::config::{
    load_store_config, ConfigError, LoadMode, StoreConfig, DEFAULT_STORE_FILE,
};
pub use storage::file::{erase_default_store, erase_store, FileBackend};
pub use storage::mock::MemoryBackend;
pub use storage::store::Store;
pub use storage::{FlagBackend, StoreError};
