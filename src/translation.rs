//! YAML-backed translations with `{placeholder}` substitution
//!
//! Each translation file lives at `<root>/<LANGUAGE>/<file>.yml` and is read
//! through a [`PathStore`], so translated strings are addressed with the same
//! dotted paths (`errors.unexpected.title`).

use crate::config::StoreConfig;
use crate::error::Result;
use crate::storage::YamlStorage;
use crate::store::PathStore;

use log::info;
use serde_json::Value;
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Ordered set of placeholder names and their replacement text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    entries: Vec<(String, String)>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a placeholder, replacing an earlier one with the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Display) {
        let name = name.into();
        let value = value.to_string();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Builder form of [`Placeholders::insert`]
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
        self.insert(name, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for Placeholders {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut placeholders = Self::new();
        for (k, v) in iter {
            placeholders.insert(k, v);
        }
        placeholders
    }
}

/// How replacement text is escaped before it is spliced in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Escape {
    None,
    /// Backslashes and double quotes only
    Quotes,
    /// Full JSON string escaping, for substituting inside encoded JSON
    Json,
}

fn escape_value(value: &str, escape: Escape) -> String {
    match escape {
        Escape::None => value.to_string(),
        Escape::Quotes => value.replace('\\', "\\\\").replace('"', "\\\""),
        Escape::Json => {
            let quoted = Value::String(value.to_string()).to_string();
            quoted[1..quoted.len() - 1].to_string()
        }
    }
}

/// Replace every `{name}` in `text`.
///
/// `globals` are applied first under their own names, then `locals` with their
/// names lower-cased. With `escape`, backslashes and double quotes in the
/// replacement text are backslash-escaped.
pub fn set_placeholders(
    text: &str,
    globals: &Placeholders,
    locals: &Placeholders,
    escape: bool,
) -> String {
    let escape = if escape { Escape::Quotes } else { Escape::None };
    substitute(text, globals, locals, escape)
}

fn substitute(text: &str, globals: &Placeholders, locals: &Placeholders, escape: Escape) -> String {
    let mut out = text.to_string();
    for (name, value) in globals.iter() {
        out = out.replace(&format!("{{{name}}}"), &escape_value(value, escape));
    }
    for (name, value) in locals.iter() {
        let name = name.to_lowercase();
        out = out.replace(&format!("{{{name}}}"), &escape_value(value, escape));
    }
    out
}

/// A translation file for one language.
///
/// # Example
///
/// ```rust,no_run
/// use pathstore::{Placeholders, Translation};
///
/// # fn example() -> pathstore::Result<()> {
/// let errors = Translation::open("./translations", "Errors", "EN")?;
/// let text = errors.text(
///     "unexpected.description",
///     &Placeholders::new().with("name", "KeyError"),
/// )?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Translation {
    root: PathBuf,
    file: String,
    language: String,
    store: PathStore<YamlStorage>,
    globals: Placeholders,
    escape: bool,
}

impl Translation {
    /// Backing file for `file` in `language`
    pub fn file_path(root: &Path, language: &str, file: &str) -> PathBuf {
        root.join(language).join(format!("{}.yml", file.to_lowercase()))
    }

    fn open_store(root: &Path, language: &str, file: &str) -> Result<PathStore<YamlStorage>> {
        PathStore::open(StoreConfig::yaml(Self::file_path(root, language, file)).build())
    }

    /// Open (creating if missing) the translation file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or read.
    pub fn open(
        root: impl Into<PathBuf>,
        file: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self> {
        let root = root.into();
        let file = file.into();
        let language = language.into();
        let store = Self::open_store(&root, &language, &file)?;

        Ok(Self {
            root,
            file,
            language,
            store,
            globals: Placeholders::new(),
            escape: true,
        })
    }

    /// Placeholders applied to every lookup, before call-site ones
    #[must_use]
    pub fn with_globals(mut self, globals: Placeholders) -> Self {
        self.globals = globals;
        self
    }

    pub fn globals_mut(&mut self) -> &mut Placeholders {
        &mut self.globals
    }

    /// Toggle quote escaping in [`Translation::get`] (on by default)
    #[must_use]
    pub fn escape(mut self, escape: bool) -> Self {
        self.escape = escape;
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Point the translation at another language's file
    ///
    /// # Errors
    ///
    /// Returns an error if the new file cannot be created.
    pub fn set_language(&mut self, language: impl Into<String>) -> Result<()> {
        let language = language.into();
        self.store = Self::open_store(&self.root, &language, &self.file)?;
        info!("Translation '{}' switched from {} to {}", self.file, self.language, language);
        self.language = language;
        Ok(())
    }

    /// The underlying store
    pub fn store(&self) -> &PathStore<YamlStorage> {
        &self.store
    }

    /// Value at `path` without substitution
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn raw(&self, path: &str) -> Result<Option<Value>> {
        self.store.get(path)
    }

    /// Value at `path`; strings get their placeholders substituted
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn get(&self, path: &str, placeholders: &Placeholders) -> Result<Option<Value>> {
        Ok(self.store.get(path)?.map(|value| match value {
            Value::String(text) => {
                Value::String(set_placeholders(&text, &self.globals, placeholders, self.escape))
            }
            other => other,
        }))
    }

    /// String at `path` with placeholders substituted; `None` for non-strings
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn text(&self, path: &str, placeholders: &Placeholders) -> Result<Option<String>> {
        Ok(self
            .get(path, placeholders)?
            .and_then(|value| value.as_str().map(str::to_string)))
    }

    /// Value at `path` (whole file when `None`) with placeholders substituted
    /// in every nested string.
    ///
    /// The value is encoded as JSON, substituted as text and decoded again, so
    /// placeholders in mapping keys are replaced too.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the substituted text no
    /// longer decodes.
    pub fn get_json(&self, path: Option<&str>, placeholders: &Placeholders) -> Result<Option<Value>> {
        let value = match path {
            Some(path) => self.store.get(path)?,
            None => Some(self.store.document()?),
        };
        let Some(value) = value else {
            return Ok(None);
        };

        let encoded = serde_json::to_string(&value)?;
        let substituted = substitute(&encoded, &self.globals, placeholders, Escape::Json);
        Ok(Some(serde_json::from_str(&substituted)?))
    }
}
