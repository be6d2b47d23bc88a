//! Storage-specific errors

use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing store could not be read, or the stored value did not parse
    #[error("Failed to read '{key}': {reason}")]
    Read { key: String, reason: String },

    /// The backing store rejected a write (quota exceeded, read-only, ...)
    #[error("Failed to write '{key}': {reason}")]
    Write { key: String, reason: String },

    /// Value could not be serialized before writing
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Key contains characters the backend cannot store
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// No backing store is available in this environment
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    /// Create a read error
    pub fn read(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Read {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a write error
    pub fn write(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Write {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
