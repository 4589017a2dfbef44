//! Store configuration and its builder

use serde_json::Value;
use std::path::PathBuf;

use crate::storage::{JsonStorage, StorageBackend};

#[cfg(feature = "yaml")]
use crate::storage::YamlStorage;

/// Configuration for opening a [`PathStore`](crate::PathStore)
#[derive(Debug, Clone)]
pub struct StoreConfig<S: StorageBackend = JsonStorage> {
    /// Backing file
    pub path: PathBuf,

    /// Storage backend implementation
    pub storage: S,

    /// Create the file (and its parent directories) when it does not exist
    pub create_if_missing: bool,

    /// Document written on creation; an empty mapping when `None`
    pub default_document: Option<Value>,
}

impl StoreConfig<JsonStorage> {
    /// Create a new builder for a JSON-backed store
    ///
    /// # Example
    /// ```rust
    /// use pathstore::StoreConfig;
    /// use serde_json::json;
    ///
    /// let config = StoreConfig::builder("data/guilds.json")
    ///     .default_document(json!({"guilds": {}}))
    ///     .build();
    /// assert!(config.create_if_missing);
    /// ```
    pub fn builder(path: impl Into<PathBuf>) -> StoreConfigBuilder<JsonStorage> {
        StoreConfigBuilder::new(path)
    }
}

#[cfg(feature = "yaml")]
impl StoreConfig<YamlStorage> {
    /// Create a new builder for a YAML-backed store
    pub fn yaml(path: impl Into<PathBuf>) -> StoreConfigBuilder<YamlStorage> {
        StoreConfigBuilder::new(path).with_storage(YamlStorage::new())
    }
}

/// Builder for creating StoreConfig with a fluent API
#[derive(Debug, Clone)]
pub struct StoreConfigBuilder<S: StorageBackend = JsonStorage> {
    path: PathBuf,
    storage: S,
    create_if_missing: bool,
    default_document: Option<Value>,
}

impl StoreConfigBuilder<JsonStorage> {
    /// Create a new builder for the given file
    ///
    /// Supports `~` expansion for home directory.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        let expanded = if path.starts_with("~") {
            if let Some(home) = dirs::home_dir() {
                home.join(path.strip_prefix("~").unwrap_or(&path))
            } else {
                path
            }
        } else {
            path
        };

        Self {
            path: expanded,
            storage: JsonStorage::new(),
            create_if_missing: true,
            default_document: None,
        }
    }

    /// Use compact JSON (no pretty printing)
    pub fn compact_json(mut self) -> Self {
        self.storage = JsonStorage::compact();
        self
    }
}

impl<S: StorageBackend> StoreConfigBuilder<S> {
    /// Swap the storage backend
    pub fn with_storage<T: StorageBackend>(self, storage: T) -> StoreConfigBuilder<T> {
        StoreConfigBuilder {
            path: self.path,
            storage,
            create_if_missing: self.create_if_missing,
            default_document: self.default_document,
        }
    }

    /// Whether a missing file is created (default) or reported as `Error::NotFound`
    pub fn create_if_missing(mut self, create: bool) -> Self {
        self.create_if_missing = create;
        self
    }

    /// Document to write when the file is created
    pub fn default_document(mut self, document: Value) -> Self {
        self.default_document = Some(document);
        self
    }

    /// Build the StoreConfig
    pub fn build(self) -> StoreConfig<S> {
        StoreConfig {
            path: self.path,
            storage: self.storage,
            create_if_missing: self.create_if_missing,
            default_document: self.default_document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_basic() {
        let config = StoreConfig::builder("db/data.json").build();

        assert_eq!(config.path, PathBuf::from("db/data.json"));
        assert!(config.create_if_missing);
        assert!(config.default_document.is_none());
        assert_eq!(config.storage.extension(), "json");
    }

    #[test]
    fn test_builder_with_options() {
        let config = StoreConfig::builder("/tmp/data.json")
            .compact_json()
            .create_if_missing(false)
            .default_document(json!({"a": 1}))
            .build();

        assert!(!config.create_if_missing);
        assert_eq!(config.default_document, Some(json!({"a": 1})));
    }

    #[test]
    fn test_tilde_expansion() {
        let config = StoreConfig::builder("~/data.json").build();
        if let Some(home) = dirs::home_dir() {
            assert_eq!(config.path, home.join("data.json"));
        }
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn test_yaml_builder() {
        let config = StoreConfig::yaml("lang/en.yml").create_if_missing(false).build();
        assert_eq!(config.storage.extension(), "yml");
        assert!(!config.create_if_missing);
    }
}
