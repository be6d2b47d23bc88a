//! Error types for playback management

use crate::types::TrackId;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Track has no live source in this session (restored from an older one)
    #[error("Track {id} is no longer available")]
    StaleTrack { id: TrackId },

    /// Output device refused to start playback (e.g. autoplay policy)
    #[error("Output device rejected playback: {0}")]
    DeviceRejected(String),

    /// No track with this id was imported
    #[error("Track not found: {0}")]
    TrackNotFound(TrackId),

    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// Seek target is not a finite number
    #[error("Invalid seek position: {0}")]
    InvalidSeekPosition(f64),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
