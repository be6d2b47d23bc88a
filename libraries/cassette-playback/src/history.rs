//! Recently-played history
//!
//! Most recent first, deduplicated by track id, bounded in size.

use crate::types::{Track, TrackId};
use cassette_storage::{HistoryEntry, HISTORY_LIMIT};
use std::collections::VecDeque;

/// Bounded, deduplicated play history
///
/// Replaying a track moves its entry to the front instead of adding a second
/// one. When full, the oldest entry is discarded.
#[derive(Debug, Clone)]
pub struct History {
    /// History buffer (most recent = front)
    entries: VecDeque<HistoryEntry>,

    /// Maximum history size
    max_size: usize,
}

impl History {
    /// Create new history with specified maximum size
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_size),
            max_size,
        }
    }

    /// Rebuild history from loaded entries (most recent first)
    ///
    /// Loaded data is not trusted: later duplicates are dropped and the list
    /// is cut to `max_size`.
    pub fn from_entries(entries: Vec<HistoryEntry>, max_size: usize) -> Self {
        let mut history = Self::new(max_size);
        for entry in entries {
            if history.entries.len() >= max_size {
                break;
            }
            if !history.contains(&entry.id) {
                history.entries.push_back(entry);
            }
        }
        history
    }

    /// Move `track` to the front, inserting it if absent
    pub fn promote(&mut self, track: &Track) {
        self.evict(&track.id);
        self.entries.push_front(track.to_history_entry());
        self.entries.truncate(self.max_size);
    }

    /// Remove the entry for `id`
    ///
    /// Returns true if an entry was removed.
    pub fn evict(&mut self, id: &TrackId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id.as_str());
        self.entries.len() != before
    }

    /// Check if an entry with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// All entries, most recent first
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Entries as source-less tracks (the "Recently Played" list)
    pub fn as_tracks(&self) -> Vec<Track> {
        self.entries.iter().map(Track::from).collect()
    }

    /// Most recent entry
    pub fn front(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    /// Get number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get maximum history size
    pub fn max_size(&self) -> usize {
        self.max_size
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT)
    }
}
