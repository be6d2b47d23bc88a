//! Playback Events
//!
//! Event-based communication for UI synchronization. The session records an
//! event for every observable change; the owner drains them after each input
//! and re-renders, syncs the now-playing surface, or shows a notice.

use crate::types::{PlaybackState, RepeatMode, TrackId};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlaybackEvent {
    /// Playback state changed (idle, playing, paused)
    StateChanged {
        /// The new playback state
        state: PlaybackState,
    },

    /// A different track became current
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Position changed (device tick or seek)
    ProgressChanged {
        /// Position in seconds
        position_secs: f64,
    },

    /// Duration of the current track became known
    DurationChanged {
        /// Duration in seconds
        duration_secs: f64,
    },

    /// Queue replaced
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Shuffle toggled
    ShuffleChanged {
        /// Whether shuffle is now on
        active: bool,
    },

    /// Repeat mode cycled
    RepeatChanged {
        /// New repeat mode
        mode: RepeatMode,
    },

    /// Recently-played history changed
    HistoryChanged {
        /// New history length
        length: usize,
    },

    /// Full player view opened or closed
    FullViewChanged {
        /// Whether the full view is open
        open: bool,
    },

    /// A track without a live source was requested and removed from history
    ///
    /// The view layer should tell the user the file must be imported again.
    StaleTrackEvicted {
        /// ID of the evicted track
        track_id: TrackId,
        /// Title for the notice
        title: String,
    },

    /// Recoverable error (device refused to play, ...)
    Error {
        /// Error message
        message: String,
    },
}

impl PlaybackEvent {
    /// Whether the now-playing surface must be refreshed after this event
    pub fn affects_transport(&self) -> bool {
        matches!(
            self,
            PlaybackEvent::StateChanged { .. }
                | PlaybackEvent::TrackChanged { .. }
                | PlaybackEvent::QueueChanged { .. }
                | PlaybackEvent::ShuffleChanged { .. }
                | PlaybackEvent::RepeatChanged { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_relevance() {
        assert!(PlaybackEvent::StateChanged {
            state: PlaybackState::Paused
        }
        .affects_transport());
        assert!(PlaybackEvent::ShuffleChanged { active: true }.affects_transport());
        assert!(!PlaybackEvent::ProgressChanged { position_secs: 1.0 }.affects_transport());
        assert!(!PlaybackEvent::FullViewChanged { open: true }.affects_transport());
        assert!(!PlaybackEvent::HistoryChanged { length: 1 }.affects_transport());
    }

    #[test]
    fn serializes_with_type_tag() {
        let event = PlaybackEvent::TrackChanged {
            track_id: TrackId::new("2"),
            previous_track_id: Some(TrackId::new("1")),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "trackChanged");
        assert_eq!(json["track_id"], "2");
        assert_eq!(json["previous_track_id"], "1");
    }
}
