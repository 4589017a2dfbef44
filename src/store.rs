//! The path-addressed document store
//!
//! Every call reads the whole file, and every mutation writes the whole file
//! back. Nothing is cached between calls, so two writers racing on the same
//! file lose updates (last write wins). Callers that share a file across
//! threads must serialize access themselves.

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::path::{assign, detach, resolve};
use crate::property::PropertyBinding;
use crate::storage::{JsonStorage, StorageBackend};
use crate::sync::RwLockExt;

#[cfg(feature = "yaml")]
use crate::storage::YamlStorage;

use log::{debug, info};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Document store backed by a single JSON or YAML file.
///
/// # Example
///
/// ```rust,no_run
/// use pathstore::PathStore;
///
/// # fn example() -> pathstore::Result<()> {
/// let store = PathStore::json("data/guilds.json")?;
/// store.set("guild.123.settings.prefix", "!")?;
///
/// let prefix: Option<String> = store.get_as("guild.123.settings.prefix")?;
/// assert_eq!(prefix.as_deref(), Some("!"));
///
/// assert!(store.remove("guild.123.settings.prefix")?);
/// assert!(!store.exists("guild.123.settings.prefix")?);
/// # Ok(())
/// # }
/// ```
pub struct PathStore<S: StorageBackend = JsonStorage> {
    path: PathBuf,
    storage: S,
    properties: RwLock<HashMap<String, PropertyBinding>>,
}

impl PathStore<JsonStorage> {
    /// Open (creating if missing) a pretty-printed JSON store
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn json(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(StoreConfig::builder(path).build())
    }
}

#[cfg(feature = "yaml")]
impl PathStore<YamlStorage> {
    /// Open (creating if missing) a YAML store
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn yaml(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(StoreConfig::yaml(path).build())
    }
}

impl<S: StorageBackend> PathStore<S> {
    /// Open a store from its configuration.
    ///
    /// If the file is absent it is created with the default document (or an
    /// empty mapping) when `create_if_missing` is set.
    ///
    /// # Errors
    ///
    /// * `Error::NotFound` - the file is absent and creation is disabled
    /// * `Error::InvalidDocument` - the default document is not a mapping
    /// * I/O errors while creating the file
    pub fn open(config: StoreConfig<S>) -> Result<Self> {
        let StoreConfig {
            path,
            storage,
            create_if_missing,
            default_document,
        } = config;

        match std::fs::metadata(&path) {
            Ok(_) => debug!("Opened existing store {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if !create_if_missing {
                    return Err(Error::NotFound(path));
                }

                let document = default_document.unwrap_or_else(|| Value::Object(Map::new()));
                if !document.is_object() {
                    return Err(Error::InvalidDocument(format!(
                        "default document for {} must be a mapping",
                        path.display()
                    )));
                }

                storage.write(&path, &document)?;
                info!("Created store {}", path.display());
            }
            Err(e) => return Err(Error::FileRead { path, source: e }),
        }

        Ok(Self {
            path,
            storage,
            properties: RwLock::new(HashMap::new()),
        })
    }

    /// Backing file of this store
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encoder used for the backing file
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Read and decode the whole file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn load(&self) -> Result<Value> {
        let document: Value = self.storage.read(&self.path)?;
        // An emptied file decodes to null
        if document.is_null() {
            return Ok(Value::Object(Map::new()));
        }
        Ok(document)
    }

    /// Encode and write the whole document
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be encoded or written.
    pub fn save(&self, document: &Value) -> Result<()> {
        self.storage.write(&self.path, document)?;
        debug!("Saved {}", self.path.display());
        Ok(())
    }

    /// The whole document
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn document(&self) -> Result<Value> {
        self.load()
    }

    /// Value at `path`, or `None` when any segment does not resolve.
    ///
    /// A stored `null` is reported as `None`.
    ///
    /// # Errors
    ///
    /// Only I/O and decoding errors; navigation misses are never errors.
    pub fn get(&self, path: &str) -> Result<Option<Value>> {
        let document = self.load()?;
        let resolved = resolve(&document, path);
        if !resolved.is_found() {
            debug!("'{path}' not found in {}", self.path.display());
        }
        Ok(resolved.present().cloned())
    }

    /// Value at `path` deserialized as `T`
    ///
    /// # Errors
    ///
    /// Returns `Error::Cast` if a present value does not deserialize as `T`.
    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        self.get(path)?
            .map(|value| {
                serde_json::from_value(value).map_err(|e| Error::Cast {
                    path: path.to_string(),
                    reason: e.to_string(),
                })
            })
            .transpose()
    }

    /// Value at `path` passed through a caller-supplied cast.
    ///
    /// The cast only runs on present values and its error is returned as-is.
    ///
    /// # Errors
    ///
    /// Store errors converted into `E`, or whatever `cast` returns.
    pub fn get_with<T, E, F>(&self, path: &str, cast: F) -> std::result::Result<Option<T>, E>
    where
        F: FnOnce(Value) -> std::result::Result<T, E>,
        E: From<Error>,
    {
        match self.get(path)? {
            Some(value) => cast(value).map(Some),
            None => Ok(None),
        }
    }

    /// Whether `path` holds a present (non-null) value
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.get(path)?.is_some())
    }

    /// Assign `value` at `path`, creating missing intermediate mappings.
    ///
    /// # Errors
    ///
    /// * `Error::IndexOutOfRange` / `Error::InvalidIndex` - a sequence segment
    ///   does not address an existing element
    /// * `Error::NotAContainer` - the path runs through a scalar
    /// * serialization and I/O errors
    pub fn set(&self, path: &str, value: impl Serialize) -> Result<()> {
        self.write(path, serde_json::to_value(value)?, false)?;
        Ok(())
    }

    /// Assign `value` at `path` only if nothing is stored there yet.
    ///
    /// Returns whether the value was written. A key holding `null` counts as
    /// already set.
    ///
    /// # Errors
    ///
    /// Same as [`PathStore::set`].
    pub fn set_default(&self, path: &str, value: impl Serialize) -> Result<bool> {
        self.write(path, serde_json::to_value(value)?, true)
    }

    fn write(&self, path: &str, value: Value, only_if_absent: bool) -> Result<bool> {
        let mut document = self.load()?;
        let changed = assign(&mut document, path, value, only_if_absent)?;
        if changed {
            self.save(&document)?;
        } else {
            debug!("'{path}' already set in {}, skipping", self.path.display());
        }
        Ok(changed)
    }

    /// Remove the key (or sequence element) at `path`.
    ///
    /// Returns `false`, without touching the file, when the path does not resolve.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or written.
    pub fn remove(&self, path: &str) -> Result<bool> {
        let mut document = self.load()?;
        if detach(&mut document, path).is_none() {
            debug!("Nothing to remove at '{path}' in {}", self.path.display());
            return Ok(false);
        }
        self.save(&document)?;
        Ok(true)
    }

    /// Delete the backing file. Does nothing unless `confirm` is true.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileDelete` if the file cannot be removed.
    pub fn delete(&self, confirm: bool) -> Result<()> {
        if !confirm {
            return Ok(());
        }
        std::fs::remove_file(&self.path).map_err(|e| Error::FileDelete {
            path: self.path.clone(),
            source: e,
        })?;
        info!("Deleted store {}", self.path.display());
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    /// Register a property, replacing any binding with the same name.
    ///
    /// If the binding carries a default value it is written when the path is
    /// still unset. The default goes through the binding's validator first.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` if the validator rejects the default (the
    /// property is then left unbound), or an error if writing it fails.
    pub fn bind_property(&self, binding: PropertyBinding) -> Result<()> {
        if let Some(default) = binding.default() {
            binding.check(default)?;
            self.write(binding.path_str(), default.clone(), true)?;
        }
        debug!("Bound property '{}' to '{}'", binding.name(), binding.path_str());
        self.properties
            .write_recovered()
            .insert(binding.name().to_string(), binding);
        Ok(())
    }

    /// Forget a property. Returns whether it was bound.
    pub fn unbind_property(&self, name: &str) -> bool {
        self.properties.write_recovered().remove(name).is_some()
    }

    /// Names of all bound properties, sorted
    pub fn properties(&self) -> Vec<String> {
        let mut names: Vec<String> = self.properties.read_recovered().keys().cloned().collect();
        names.sort();
        names
    }

    fn binding(&self, name: &str) -> Result<PropertyBinding> {
        self.properties
            .read_recovered()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::PropertyNotBound(name.to_string()))
    }

    /// Read a property: `get` on its path, then cast and read transform
    ///
    /// # Errors
    ///
    /// * `Error::PropertyNotBound` - no such property
    /// * `Error::Cast` - the binding's cast rejected the value
    pub fn get_property(&self, name: &str) -> Result<Option<Value>> {
        let binding = self.binding(name)?;
        binding.read(self.get(binding.path_str())?)
    }

    /// Write a property after running its validator
    ///
    /// # Errors
    ///
    /// * `Error::PropertyNotBound` - no such property
    /// * `Error::Validation` - the validator rejected `value`; the file is untouched
    pub fn set_property(&self, name: &str, value: impl Serialize) -> Result<()> {
        let binding = self.binding(name)?;
        let value = serde_json::to_value(value)?;
        binding.check(&value)?;
        self.write(binding.path_str(), value, false)?;
        Ok(())
    }
}

impl<S: StorageBackend + std::fmt::Debug> std::fmt::Debug for PathStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathStore")
            .field("path", &self.path)
            .field("storage", &self.storage)
            .field("properties", &self.properties())
            .finish()
    }
}
