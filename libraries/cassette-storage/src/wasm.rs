//! Browser `localStorage` backend

use crate::backend::KeyValueStore;
use crate::error::{Result, StorageError};
use web_sys::Storage;

/// [`KeyValueStore`] over `window.localStorage`
pub struct LocalStorageStore {
    storage: Storage,
}

impl LocalStorageStore {
    /// Open the page's `localStorage`
    ///
    /// Fails when there is no window (worker context) or storage access is
    /// blocked (privacy mode, sandboxed iframe).
    pub fn open() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))?;

        Ok(Self { storage })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| StorageError::read(key, format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        // QuotaExceededError surfaces here
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::write(key, format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| StorageError::write(key, format!("{e:?}")))
    }
}
