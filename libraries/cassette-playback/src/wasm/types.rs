//! WASM-compatible type definitions
//!
//! Plain serde views of session state handed to JavaScript through
//! `serde-wasm-bindgen`. Source handles never cross this boundary.

use crate::device::AudioOutput;
use crate::session::PlaybackSession;
use crate::types::{PlaybackState, RepeatMode, Track};
use serde::Serialize;

/// Track as seen by the view layer
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WasmTrack {
    id: String,
    title: String,
    artist: String,
    album_art_url: Option<String>,
    /// False for history entries from an earlier session
    playable: bool,
}

impl From<&Track> for WasmTrack {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.to_string(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            album_art_url: track.album_art_url.clone(),
            playable: track.is_live(),
        }
    }
}

/// Everything the view needs to render the player
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct WasmSnapshot {
    state: PlaybackState,
    current_track: Option<WasmTrack>,
    progress_secs: f64,
    duration_secs: f64,
    shuffle: bool,
    repeat: RepeatMode,
    full_view_open: bool,
    queue: Vec<WasmTrack>,
    active_queue: Vec<WasmTrack>,
    library: Vec<WasmTrack>,
    history: Vec<WasmTrack>,
}

impl WasmSnapshot {
    /// Capture the session's observable state
    pub fn capture<D: AudioOutput>(session: &PlaybackSession<D>) -> Self {
        let views = |tracks: &[Track]| tracks.iter().map(WasmTrack::from).collect::<Vec<_>>();

        Self {
            state: session.state(),
            current_track: session.current_track().map(WasmTrack::from),
            progress_secs: session.progress_secs(),
            duration_secs: session.duration_secs(),
            shuffle: session.is_shuffle_active(),
            repeat: session.repeat_mode(),
            full_view_open: session.is_full_view_open(),
            queue: views(session.queue()),
            active_queue: views(session.active_queue()),
            library: views(session.library().tracks()),
            history: session
                .history()
                .as_tracks()
                .iter()
                .map(|track| WasmTrack {
                    playable: session.library().resolve(track).is_ok(),
                    ..WasmTrack::from(track)
                })
                .collect(),
        }
    }
}
