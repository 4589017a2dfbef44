//! # pathstore - flat-file documents with dotted-path access
//!
//! A small document store backed by one JSON or YAML file. Values are
//! addressed with dot-separated paths whose segments are mapping keys or,
//! inside sequences, integer indices.
//!
//! ## Features
//!
//! - **Path access**: `get`, `set`, `set_default`, `exists`, `remove` over nested documents
//! - **Absence is not an error**: a missing key, bad index or scalar along the path reads as `None`
//! - **Property bindings**: named shortcuts with cast, read transform and write validator
//! - **Translations**: YAML language files with `{placeholder}` substitution (`yaml` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pathstore::{PathStore, StoreConfig};
//! use serde_json::json;
//!
//! # fn example() -> pathstore::Result<()> {
//! let store = PathStore::open(
//!     StoreConfig::builder("data/bot.json")
//!         .default_document(json!({"guilds": {}}))
//!         .build(),
//! )?;
//!
//! store.set("guilds.123.prefix", "?")?;
//! assert_eq!(store.get("guilds.123.prefix")?, Some(json!("?")));
//! assert_eq!(store.get("guilds.456.prefix")?, None);
//! # Ok(())
//! # }
//! ```
//!
//! ## Properties
//!
//! ```rust,no_run
//! use pathstore::{PathStore, PropertyBinding};
//!
//! # fn example() -> pathstore::Result<()> {
//! let store = PathStore::json("data/bot.json")?;
//! store.bind_property(
//!     PropertyBinding::new("prefix")
//!         .path("settings.prefix")
//!         .validator(|v| v.as_str().is_some_and(|s| s.len() <= 3))
//!         .default_value("!"),
//! )?;
//!
//! store.set_property("prefix", "?")?;
//! assert!(store.set_property("prefix", "toolong").is_err());
//! # Ok(())
//! # }
//! ```
//!
//! ## Concurrency
//!
//! Every call reads the file and every mutation rewrites it whole. There is no
//! locking: callers sharing a file between threads must serialize writers.

mod error;
mod path;
mod property;
mod store;
mod sync;

pub mod config;
pub mod storage;

#[cfg(feature = "yaml")]
pub mod translation;

pub use config::{StoreConfig, StoreConfigBuilder};
pub use error::{Error, Result};
pub use path::{Resolved, resolve};
pub use property::{Cast, PropertyBinding, ReadTransform, WriteValidator};
pub use storage::{JsonStorage, StorageBackend};
pub use store::PathStore;

#[cfg(feature = "yaml")]
pub use storage::YamlStorage;

#[cfg(feature = "yaml")]
pub use translation::{Placeholders, Translation, set_placeholders};

/// Store persisted as pretty-printed JSON
pub type JsonStore = PathStore<JsonStorage>;

/// Store persisted as YAML
#[cfg(feature = "yaml")]
pub type YamlStore = PathStore<YamlStorage>;
