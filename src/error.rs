//! Error types for pathstore

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pathstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pathstore
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to delete file '{path}': {source}")]
    FileDelete {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("\"{}\" does not exist", .0.display())]
    NotFound(PathBuf),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to parse {format} document: {reason}")]
    Parse { format: &'static str, reason: String },

    #[cfg(feature = "yaml")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Cannot cast value at '{path}': {reason}")]
    Cast { path: String, reason: String },

    // -------------------------------------------------------------------------
    // Write Navigation Errors
    // -------------------------------------------------------------------------
    #[error("Segment '{segment}' of '{path}' is not a sequence index")]
    InvalidIndex { path: String, segment: String },

    #[error("Index {index} of '{path}' is out of range (length {len})")]
    IndexOutOfRange {
        path: String,
        index: i64,
        len: usize,
    },

    #[error("Segment '{segment}' of '{path}' holds a scalar and cannot be descended into")]
    NotAContainer { path: String, segment: String },

    // -------------------------------------------------------------------------
    // Property Errors
    // -------------------------------------------------------------------------
    #[error("Property '{0}' is not bound")]
    PropertyNotBound(String),

    #[error("value '{value}' is not acceptable by '{property}'")]
    Validation { property: String, value: String },
}

impl Error {
    /// Check if this is a "file not found" error
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if a write could not walk its path
    #[must_use]
    pub fn is_navigation_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidIndex { .. } | Error::IndexOutOfRange { .. } | Error::NotAContainer { .. }
        )
    }
}
