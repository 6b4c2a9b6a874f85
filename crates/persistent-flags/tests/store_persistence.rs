//! Integration tests for file-backed flag stores.
//!
//! Every test works in its own temporary directory so that tests can run in
//! parallel without touching `store.json` in the working directory.

use std::path::{Path, PathBuf};

use persistent_flags::{
    erase_store, load_store_config, LoadMode, Store, StoreConfig, StoreError, ToggleableValue,
};
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

/// A temporary directory removed on drop.
struct TempDir(PathBuf);

impl TempDir {
    fn new() -> Self {
        init_tracing();
        let dir = std::env::temp_dir().join(format!("persistent_flags_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        Self(dir)
    }

    fn join(&self, name: &str) -> PathBuf {
        self.0.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.0).ok();
    }
}

fn init_tracing() {
    // Level is overridden by `RUST_LOG`.  Ignore the error from tests that
    // run after another one already installed the subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

fn read_json(path: &Path) -> Value {
    let text = std::fs::read_to_string(path).expect("read store file");
    serde_json::from_str(&text).expect("store file is valid JSON")
}

#[test]
fn test_open_creates_empty_file() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.join("store.json");

    // Act
    let store = Store::open(&path).expect("open");

    // Assert
    assert!(store.is_empty());
    assert_eq!(store.path(), path.as_path());
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "{}");
}

#[test]
fn test_set_then_reopen_reads_flag_back() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.join("store.json");
    let mut store = Store::open(&path).expect("open");

    // Act
    store.set("f", true).expect("set");
    store.save().expect("save");
    drop(store);
    let reopened = Store::open(&path).expect("reopen");

    // Assert
    assert_eq!(reopened.get("f"), Some(ToggleableValue::On));
    assert!(reopened.is_on("f"));
}

#[test]
fn test_file_holds_only_final_state() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.join("store.json");
    let mut store = Store::open(&path).expect("open");

    // Act
    store.set("f", false).expect("set false");
    store.set("f", true).expect("set true");

    // Assert
    assert_eq!(read_json(&path), json!({"f": 1}));
}

#[test]
fn test_round_trip_two_flags() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.join("flags.json");
    {
        let mut store = Store::open(&path).expect("open");
        store.set("a", true).expect("set a");
        store.set("b", false).expect("set b");
    }

    // Act
    let store = Store::open(&path).expect("reopen");

    // Assert
    assert_eq!(
        store.iter().collect::<Vec<_>>(),
        vec![("a", ToggleableValue::On), ("b", ToggleableValue::Off)]
    );
}

#[test]
fn test_delete_removes_flag_from_file_and_names() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.join("store.json");
    let mut store = Store::open(&path).expect("open");
    store.set("keep", true).expect("set keep");
    store.set("drop", true).expect("set drop");

    // Act
    store.delete("drop").expect("delete");

    // Assert
    assert_eq!(store.names().collect::<Vec<_>>(), vec!["keep"]);
    assert_eq!(read_json(&path), json!({"keep": 1}));
    let reopened = Store::open(&path).expect("reopen");
    assert!(!reopened.contains("drop"));
}

#[test]
fn test_delete_unknown_flag_is_unknown_flag_error() {
    let dir = TempDir::new();
    let mut store = Store::open(dir.join("store.json")).expect("open");

    let err = store.delete("nope").expect_err("unknown flag");

    assert!(matches!(err, StoreError::UnknownFlag(ref name) if name == "nope"));
    assert_eq!(err.to_string(), "unknown flag: nope");
}

#[test]
fn test_toggle_round_trips_through_file() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.join("store.json");
    let mut store = Store::open(&path).expect("open");
    store.set("debug_mode", false).expect("set");

    // Act
    let current = store.get("debug_mode").expect("present");
    store.set("debug_mode", current.toggle()).expect("reassign");

    // Assert
    assert_eq!(read_json(&path), json!({"debug_mode": 1}));
}

#[test]
fn test_transient_attributes_stay_out_of_file() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.join("store.json");
    let mut store = Store::open(&path).expect("open");

    // Act
    store.assign("flag", json!(true)).expect("assign bool");
    store.assign("label", json!("scratch")).expect("assign string");
    store.set_transient("count", json!(12));

    // Assert
    assert_eq!(read_json(&path), json!({"flag": 1}));
    assert_eq!(store.get_transient("label"), Some(&json!("scratch")));
}

#[test]
fn test_existing_file_with_booleans_is_loaded_and_normalized() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.join("store.json");
    std::fs::write(&path, r#"{"feature_x": true, "debug_mode": false}"#).expect("seed");

    // Act
    let store = Store::open(&path).expect("open");

    // Assert
    assert!(store.is_on("feature_x"));
    assert!(!store.is_on("debug_mode"));
    assert_eq!(
        std::fs::read_to_string(&path).expect("read"),
        "{\n    \"debug_mode\": 0,\n    \"feature_x\": 1\n}"
    );
}

#[test]
fn test_malformed_file_fails_to_open() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.join("store.json");
    std::fs::write(&path, "not json at all").expect("seed");

    // Act
    let err = Store::open(&path).expect_err("malformed");

    // Assert
    assert!(err.is_io_failure());
    assert!(matches!(err, StoreError::Malformed { .. }));
    // The broken file is left as it was.
    assert_eq!(std::fs::read_to_string(&path).expect("read"), "not json at all");
}

#[test]
fn test_missing_parent_directory_fails_with_io_error() {
    let dir = TempDir::new();
    let path = dir.join("missing").join("store.json");

    let err = Store::open(&path).expect_err("parent directory does not exist");

    assert!(matches!(err, StoreError::Io { .. }));
}

#[test]
fn test_erase_store_is_noop_then_removes_file() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.join("store.json");

    // Act / Assert – nothing to erase yet
    assert!(!erase_store(&path).expect("no-op"));

    let mut store = Store::open(&path).expect("open");
    store.set("f", true).expect("set");
    assert!(erase_store(&path).expect("erase"));
    assert!(!path.exists());

    // The live store keeps its flags and recreates the file on the next save.
    assert!(store.is_on("f"));
    store.set("g", false).expect("set after erase");
    assert_eq!(read_json(&path), json!({"f": 1, "g": 0}));
}

#[test]
fn test_second_store_on_same_file_wins_last_write() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.join("store.json");
    let mut first = Store::open(&path).expect("first");
    let mut second = Store::open(&path).expect("second");

    // Act
    first.set("a", true).expect("first writes");
    second.set("b", true).expect("second writes");

    // Assert – no merge: the second store never saw `a`
    assert_eq!(read_json(&path), json!({"b": 1}));
}

#[test]
fn test_store_from_toml_config() {
    // Arrange
    let dir = TempDir::new();
    let flags_path = dir.join("flags.json");
    let config_path = dir.join("flags.toml");
    std::fs::write(
        &config_path,
        format!("path = {}\nload_mode = \"per_entry\"\n", toml_string(&flags_path)),
    )
    .expect("write config");

    // Act
    let config = load_store_config(&config_path).expect("load config");
    let mut store = Store::with_config(&config).expect("open from config");
    store.set("from_config", true).expect("set");

    // Assert
    assert_eq!(config.load_mode, LoadMode::PerEntry);
    assert_eq!(store.load_mode(), LoadMode::PerEntry);
    assert_eq!(read_json(&flags_path), json!({"from_config": 1}));
}

#[test]
fn test_both_load_modes_read_the_same_flags() {
    // Arrange
    let dir = TempDir::new();
    let path = dir.join("store.json");
    std::fs::write(&path, r#"{"x": 1, "y": 0, "z": 1}"#).expect("seed");

    // Act
    let per_entry = Store::with_config(&StoreConfig {
        path: path.clone(),
        load_mode: LoadMode::PerEntry,
    })
    .expect("per entry");
    let single = Store::with_config(&StoreConfig::at(&path)).expect("single save");

    // Assert
    assert_eq!(
        per_entry.iter().collect::<Vec<_>>(),
        single.iter().collect::<Vec<_>>()
    );
}

fn toml_string(path: &Path) -> String {
    toml::Value::String(path.display().to_string()).to_string()
}
