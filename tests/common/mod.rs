//! Common test utilities for pathstore integration tests

#![allow(dead_code)]

use pathstore::{JsonStore, PathStore, StoreConfig};
use serde_json::{Value, json};
use std::path::PathBuf;
use tempfile::TempDir;

/// A guild-settings document in the shape bots typically keep
pub fn guild_document() -> Value {
    json!({
        "guild": {
            "123": {
                "settings": {"prefix": "!", "language": "EN"},
                "disabled_cogs": ["music", "fun"]
            }
        },
        "owners": [111, 222],
        "maintenance": false
    })
}

/// Test fixture that provides a temporary directory and a JSON store
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub store: JsonStore,
}

impl TestFixture {
    /// Store created with an empty document
    pub fn new() -> Self {
        Self::with_document(json!({}))
    }

    /// Store created with `document` as its default
    pub fn with_document(document: Value) -> Self {
        init_logging();
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config = StoreConfig::builder(temp_dir.path().join("data/db.json"))
            .default_document(document)
            .build();
        let store = PathStore::open(config).expect("Failed to open store");

        Self { temp_dir, store }
    }

    pub fn db_path(&self) -> PathBuf {
        self.temp_dir.path().join("data/db.json")
    }

    /// Read the raw file back as JSON, bypassing the store
    pub fn read_file(&self) -> Value {
        let content = std::fs::read_to_string(self.db_path()).expect("Failed to read db file");
        serde_json::from_str(&content).expect("db file is not valid JSON")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
