//! Named property bindings over fixed document paths
//!
//! A binding is an explicit registry entry: reading it performs a `get` on its
//! path followed by the optional cast and read transform, writing it runs the
//! optional validator and then performs a `set`.

use crate::error::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Converts a resolved value before it is handed to the caller
pub type Cast = Arc<dyn Fn(Value) -> std::result::Result<Value, String> + Send + Sync>;

/// Post-processes the (possibly absent) value read through a property
pub type ReadTransform = Arc<dyn Fn(Option<Value>) -> Option<Value> + Send + Sync>;

/// Decides whether a value may be written through a property
pub type WriteValidator = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Definition of a named shortcut to a document path.
///
/// # Example
///
/// ```rust
/// use pathstore::PropertyBinding;
///
/// let prefix = PropertyBinding::new("prefix")
///     .path("settings.prefix")
///     .cast_to::<String>()
///     .validator(|v| v.as_str().is_some_and(|s| !s.is_empty()))
///     .default_value("!");
/// assert_eq!(prefix.path_str(), "settings.prefix");
/// ```
#[derive(Clone)]
pub struct PropertyBinding {
    name: String,
    path: String,
    cast: Option<Cast>,
    read_transform: Option<ReadTransform>,
    write_validator: Option<WriteValidator>,
    default: Option<Value>,
}

impl PropertyBinding {
    /// Create a binding whose path is the property name itself
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
            cast: None,
            read_transform: None,
            write_validator: None,
            default: None,
        }
    }

    /// Bind to a different path than the property name
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Apply a cast to present values on read
    pub fn cast<F>(mut self, cast: F) -> Self
    where
        F: Fn(Value) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        self.cast = Some(Arc::new(cast));
        self
    }

    /// Cast through `T`: values that do not deserialize as `T` are rejected on read,
    /// the rest come back in `T`'s canonical form.
    pub fn cast_to<T>(self) -> Self
    where
        T: DeserializeOwned + Serialize + 'static,
    {
        self.cast(|value| {
            let typed: T = serde_json::from_value(value).map_err(|e| e.to_string())?;
            serde_json::to_value(typed).map_err(|e| e.to_string())
        })
    }

    /// Transform the value after it has been read and cast
    pub fn read_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(Option<Value>) -> Option<Value> + Send + Sync + 'static,
    {
        self.read_transform = Some(Arc::new(transform));
        self
    }

    /// Reject writes for which `validator` returns false
    pub fn validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.write_validator = Some(Arc::new(validator));
        self
    }

    /// Value written when the property is bound and its path holds nothing yet
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path_str(&self) -> &str {
        &self.path
    }

    pub(crate) fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Run cast (present values only) and then the read transform
    pub(crate) fn read(&self, raw: Option<Value>) -> Result<Option<Value>> {
        let cast = match (raw, &self.cast) {
            (Some(value), Some(cast)) => Some(cast(value).map_err(|reason| Error::Cast {
                path: self.path.clone(),
                reason,
            })?),
            (raw, _) => raw,
        };

        Ok(match &self.read_transform {
            Some(transform) => transform(cast),
            None => cast,
        })
    }

    pub(crate) fn check(&self, value: &Value) -> Result<()> {
        match &self.write_validator {
            Some(validator) if !validator(value) => Err(Error::Validation {
                property: self.name.clone(),
                value: value.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for PropertyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyBinding")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("cast", &self.cast.as_ref().map(|_| "Some(Fn)"))
            .field("read_transform", &self.read_transform.as_ref().map(|_| "Some(Fn)"))
            .field("write_validator", &self.write_validator.as_ref().map(|_| "Some(Fn)"))
            .field("default", &self.default)
            .finish()
    }
}
