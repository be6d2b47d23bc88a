//! Core types for playback management

use cassette_storage::{HistoryEntry, HISTORY_LIMIT, RECENTLY_PLAYED_KEY};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Track identifier
///
/// Derived from the import timestamp; unique and stable for the session that
/// imported the track.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TrackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Opaque handle to a decodable audio source
///
/// In a browser this is the object URL of the imported file. Handles are
/// only valid in the session that created them and are never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioHandle(Rc<str>);

impl AudioHandle {
    /// Wrap a source reference
    pub fn new(source: impl AsRef<str>) -> Self {
        Self(Rc::from(source.as_ref()))
    }

    /// Source reference handed to the output device
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An imported track
///
/// Immutable once imported. A track without a `source` came from a previous
/// session (restored history); it must be resolved against the library before
/// it can play.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Artwork reference for display
    pub album_art_url: Option<String>,

    /// Playable source, if it is still alive
    pub source: Option<AudioHandle>,
}

impl Track {
    /// Whether this track can be handed to the output device as-is
    pub fn is_live(&self) -> bool {
        self.source.is_some()
    }

    /// Persistable projection (drops the source handle)
    pub fn to_history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            id: self.id.as_str().to_string(),
            title: self.title.clone(),
            artist: self.artist.clone(),
            album_art_url: self.album_art_url.clone(),
        }
    }
}

impl From<&HistoryEntry> for Track {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: TrackId::new(entry.id.clone()),
            title: entry.title.clone(),
            artist: entry.artist.clone(),
            album_art_url: entry.album_art_url.clone(),
            source: None,
        }
    }
}

/// Playback state
///
/// Derived from the session's current track and play flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    /// No track loaded
    Idle,

    /// Currently playing
    Playing,

    /// Track loaded but paused
    Paused,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    Off,

    /// Wrap to the start of the queue
    All,

    /// Restart the current track when it ends naturally
    One,
}

impl RepeatMode {
    /// Next mode in the `Off -> All -> One -> Off` cycle
    pub fn cycled(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

/// Configuration for the playback session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Maximum history size (default: 50)
    pub history_limit: usize,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Store key for the recently-played history
    pub history_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_limit: HISTORY_LIMIT,
            repeat: RepeatMode::Off,
            shuffle: false,
            history_key: RECENTLY_PLAYED_KEY.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.repeat, RepeatMode::Off);
        assert!(!config.shuffle);
        assert_eq!(config.history_key, "recentlyPlayedSongs");
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"repeat":"all"}"#).unwrap();
        assert_eq!(config.repeat, RepeatMode::All);
        assert_eq!(config.history_limit, 50);
    }

    #[test]
    fn repeat_cycle_order() {
        assert_eq!(RepeatMode::Off.cycled(), RepeatMode::All);
        assert_eq!(RepeatMode::All.cycled(), RepeatMode::One);
        assert_eq!(RepeatMode::One.cycled(), RepeatMode::Off);
    }

    #[test]
    fn history_projection_drops_source() {
        let track = Track {
            id: TrackId::new("1"),
            title: "Song".to_string(),
            artist: "Band".to_string(),
            album_art_url: Some("blob:art".to_string()),
            source: Some(AudioHandle::new("blob:audio")),
        };

        let entry = track.to_history_entry();
        let restored = Track::from(&entry);

        assert_eq!(restored.id, track.id);
        assert_eq!(restored.album_art_url, track.album_art_url);
        assert!(!restored.is_live());
    }
}
