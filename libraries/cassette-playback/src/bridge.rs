//! Now-playing surface integration
//!
//! Mirrors the session to the platform "now playing" surface (lock screen,
//! media keys, headset buttons) and routes the surface's transport actions
//! back into the session.

use crate::device::AudioOutput;
use crate::error::Result;
use crate::session::PlaybackSession;
use crate::types::Track;
use tracing::debug;

/// Transport actions the surface can send
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportAction {
    /// Resume playback
    Play,
    /// Pause playback
    Pause,
    /// Skip to next track
    NextTrack,
    /// Go to previous track
    PreviousTrack,
}

impl TransportAction {
    /// Every action the bridge handles
    pub const ALL: [TransportAction; 4] = [
        TransportAction::Play,
        TransportAction::Pause,
        TransportAction::NextTrack,
        TransportAction::PreviousTrack,
    ];

    /// Action name as used by the browser Media Session API
    pub fn as_str(self) -> &'static str {
        match self {
            TransportAction::Play => "play",
            TransportAction::Pause => "pause",
            TransportAction::NextTrack => "nexttrack",
            TransportAction::PreviousTrack => "previoustrack",
        }
    }

    /// Parse a Media Session action name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.as_str() == name)
    }
}

/// Display metadata for the surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NowPlayingMetadata {
    /// Track title
    pub title: String,
    /// Artist name
    pub artist: String,
    /// Artwork reference
    pub artwork: Option<String>,
}

impl From<&Track> for NowPlayingMetadata {
    fn from(track: &Track) -> Self {
        Self {
            title: track.title.clone(),
            artist: track.artist.clone(),
            artwork: track.album_art_url.clone(),
        }
    }
}

/// Playback state as shown on the surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfacePlaybackState {
    /// Nothing loaded
    None,
    /// Track loaded, not playing
    Paused,
    /// Track playing
    Playing,
}

impl SurfacePlaybackState {
    /// State name as used by the browser Media Session API
    pub fn as_str(self) -> &'static str {
        match self {
            SurfacePlaybackState::None => "none",
            SurfacePlaybackState::Paused => "paused",
            SurfacePlaybackState::Playing => "playing",
        }
    }
}

/// Platform "now playing" surface
///
/// Implementations must tolerate repeated calls with the same values.
pub trait NowPlayingSurface {
    /// Show metadata for the current track
    fn set_metadata(&mut self, metadata: &NowPlayingMetadata);

    /// Show the playback state
    fn set_playback_state(&mut self, state: SurfacePlaybackState);

    /// (Re)register handlers for `actions`
    fn register_actions(&mut self, actions: &[TransportAction]);

    /// Remove published metadata
    fn clear(&mut self);
}

/// Keeps a [`NowPlayingSurface`] in step with a [`PlaybackSession`]
pub struct TransportBridge<S: NowPlayingSurface> {
    surface: S,
}

impl<S: NowPlayingSurface> TransportBridge<S> {
    /// Create a bridge over `surface`
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// Publish the session's current track and state
    ///
    /// Safe to call after every change.
    pub fn sync<D: AudioOutput>(&mut self, session: &PlaybackSession<D>) {
        let Some(track) = session.current_track() else {
            debug!("clearing now-playing surface");
            self.surface.clear();
            self.surface.set_playback_state(SurfacePlaybackState::None);
            return;
        };

        let state = if session.is_playing() {
            SurfacePlaybackState::Playing
        } else {
            SurfacePlaybackState::Paused
        };

        self.surface.set_metadata(&NowPlayingMetadata::from(track));
        self.surface.set_playback_state(state);
        self.surface.register_actions(&TransportAction::ALL);
    }

    /// Apply an action received from the surface
    ///
    /// `Play` only resumes a paused session and `Pause` only pauses a playing
    /// one, so repeated presses do not flip the state back.
    pub fn handle_action<D: AudioOutput>(
        &self,
        action: TransportAction,
        session: &mut PlaybackSession<D>,
    ) -> Result<()> {
        debug!(action = action.as_str(), "transport action");

        match action {
            TransportAction::Play => {
                if !session.is_playing() {
                    session.toggle_play_pause();
                }
                Ok(())
            }
            TransportAction::Pause => {
                if session.is_playing() {
                    session.toggle_play_pause();
                }
                Ok(())
            }
            TransportAction::NextTrack => session.play_next(),
            TransportAction::PreviousTrack => session.play_previous(),
        }
    }

    /// The underlying surface
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The underlying surface, mutably
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

/// Surface that records what was published (tests)
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub metadata: Option<NowPlayingMetadata>,
    pub state: Option<SurfacePlaybackState>,
    pub registered: Vec<TransportAction>,
    pub registrations: usize,
    pub clears: usize,
}

#[cfg(test)]
impl NowPlayingSurface for RecordingSurface {
    fn set_metadata(&mut self, metadata: &NowPlayingMetadata) {
        self.metadata = Some(metadata.clone());
    }

    fn set_playback_state(&mut self, state: SurfacePlaybackState) {
        self.state = Some(state);
    }

    fn register_actions(&mut self, actions: &[TransportAction]) {
        self.registered = actions.to_vec();
        self.registrations += 1;
    }

    fn clear(&mut self) {
        self.metadata = None;
        self.clears += 1;
    }
}
