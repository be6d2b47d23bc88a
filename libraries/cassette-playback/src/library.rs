//! Tracks imported in the current session
//!
//! The library is the only place live source handles come from. Restored
//! history entries are resolved against it by id.

use crate::error::{PlaybackError, Result};
use crate::types::{AudioHandle, Track, TrackId};
use chrono::Utc;
use std::collections::HashMap;
use tracing::info;

/// Title used when an imported file has none
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Artist used when an imported file has none
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// A file handed over by the import dialog
#[derive(Debug, Clone)]
pub struct ImportedFile {
    /// User-supplied (or file-name derived) title
    pub title: String,

    /// User-supplied artist
    pub artist: String,

    /// Artwork reference
    pub album_art_url: Option<String>,

    /// Playable source
    pub source: AudioHandle,
}

/// Imported tracks, in import order
#[derive(Debug, Default)]
pub struct Library {
    tracks: Vec<Track>,
    index: HashMap<TrackId, usize>,
    last_id_millis: i64,
}

impl Library {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Import a file, assigning an id from the current time
    pub fn import(&mut self, file: ImportedFile) -> Track {
        self.import_at(file, Utc::now().timestamp_millis())
    }

    /// Import a file, assigning an id from `timestamp_millis`
    ///
    /// Ids are bumped past the last assigned one so that several imports in
    /// the same millisecond stay unique.
    pub fn import_at(&mut self, file: ImportedFile, timestamp_millis: i64) -> Track {
        let millis = timestamp_millis.max(self.last_id_millis + 1);
        self.last_id_millis = millis;

        let track = Track {
            id: TrackId::new(millis.to_string()),
            title: non_empty_or(&file.title, UNKNOWN_TITLE),
            artist: non_empty_or(&file.artist, UNKNOWN_ARTIST),
            album_art_url: file.album_art_url.filter(|url| !url.trim().is_empty()),
            source: Some(file.source),
        };

        info!(id = %track.id, title = %track.title, "imported track");

        self.index.insert(track.id.clone(), self.tracks.len());
        self.tracks.push(track.clone());
        track
    }

    /// Get an imported track by id
    pub fn get(&self, id: &TrackId) -> Option<&Track> {
        self.index.get(id).and_then(|&i| self.tracks.get(i))
    }

    /// Resolve `track` to a live track
    ///
    /// A track that still carries its source is returned as-is; otherwise the
    /// imported track with the same id is used.
    ///
    /// # Errors
    ///
    /// `PlaybackError::StaleTrack` when no live source exists for the id.
    pub fn resolve(&self, track: &Track) -> Result<Track> {
        if track.is_live() {
            return Ok(track.clone());
        }

        self.get(&track.id)
            .filter(|t| t.is_live())
            .cloned()
            .ok_or_else(|| PlaybackError::StaleTrack {
                id: track.id.clone(),
            })
    }

    /// All imported tracks (the "Songs" list)
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of imported tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if nothing was imported
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}
