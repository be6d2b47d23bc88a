//! Typed JSON load/save on top of a [`KeyValueStore`]
//!
//! `load` never fails: a missing key, an unreadable backend or corrupt JSON
//! all come back as `None` and are logged. `save` reports backend rejections
//! so the caller can log them; callers treat them as non-fatal.

use crate::backend::KeyValueStore;
use crate::error::{Result, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

/// Load and decode the value stored under `key`
///
/// Returns `None` (and logs) when the key is missing, the backend fails, or
/// the stored text is not valid JSON for `T`.
pub fn load<T, S>(store: &S, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match try_load(store, key) {
        Ok(Some(value)) => Some(value),
        Ok(None) => {
            debug!(key, "no stored value");
            None
        }
        Err(e) => {
            warn!(key, error = %e, "ignoring unreadable stored value");
            None
        }
    }
}

/// Load and decode the value stored under `key`, reporting failures
///
/// # Errors
///
/// `StorageError::Read` when the backend fails or the JSON does not decode.
pub fn try_load<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| StorageError::read(key, e.to_string()))
}

/// Encode `value` as JSON and store it under `key`
///
/// # Errors
///
/// `StorageError::Write` when the backend rejects the write,
/// `StorageError::Serialization` when `value` cannot be encoded.
pub fn save<T, S>(store: &S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw =
        serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
    store.set(key, &raw)
}
