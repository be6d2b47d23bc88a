//! Cassette - Local Persistence
//!
//! Typed load/save of the records that survive a reload: the recently-played
//! history and the player display settings. Audio data is never persisted.
//!
//! This crate provides:
//! - A [`KeyValueStore`] trait with in-memory, file and (feature `wasm`)
//!   browser `localStorage` backends
//! - JSON [`load`]/[`save`] that tolerate missing and corrupt data
//! - Persisted record types ([`HistoryEntry`], [`PlayerDisplaySettings`])
//! - [`PlayerSettingsStore`], which merges stored settings over the defaults
//!
//! # Example
//!
//! ```rust
//! use cassette_storage::{load, save, MemoryStore, HistoryEntry, RECENTLY_PLAYED_KEY};
//!
//! let store = MemoryStore::new();
//! let history = vec![HistoryEntry {
//!     id: "1700000000000".to_string(),
//!     title: "My Song".to_string(),
//!     artist: "Artist Name".to_string(),
//!     album_art_url: None,
//! }];
//!
//! save(&store, RECENTLY_PLAYED_KEY, &history).unwrap();
//! let restored: Option<Vec<HistoryEntry>> = load(&store, RECENTLY_PLAYED_KEY);
//! assert_eq!(restored, Some(history));
//! ```

mod backend;
mod error;
mod records;
mod settings;
mod typed;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use error::{Result, StorageError};
pub use records::{
    HistoryEntry, APPEARANCE_SETTINGS_KEY, HISTORY_LIMIT, PLAYER_SETTINGS_KEY,
    RECENTLY_PLAYED_KEY,
};
pub use settings::{
    is_hex_color, PlayerDisplaySettings, PlayerSettingsStore, ARTWORK_SIZE_RANGE,
    CORNER_RADIUS_RANGE, FULL_VIEW_ARTWORK_SIZE_RANGE, MINI_PLAYER_HEIGHT_RANGE,
    SETTINGS_VERSION,
};
pub use typed::{load, save, try_load};
