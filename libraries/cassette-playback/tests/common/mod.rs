//! Shared test doubles for integration tests

#![allow(dead_code)]

use cassette_playback::{
    AudioHandle, AudioOutput, ImportedFile, NowPlayingMetadata, NowPlayingSurface,
    PlayAttempt, PlaybackError, PlaybackSession, Result, SessionConfig, SurfacePlaybackState,
    Track, TransportAction,
};
use cassette_storage::{KeyValueStore, MemoryStore};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::rc::Rc;

/// Command received by [`RecordingOutput`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetSource(String),
    Play,
    Pause,
    Seek(f64),
}

/// Output device that records every command
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub calls: Vec<Call>,
    pub position: f64,
    pub reject_play: bool,
    pub plays: u64,
}

impl RecordingOutput {
    pub fn sources(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::SetSource(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Token returned by the most recent `play()`
    pub fn last_attempt(&self) -> PlayAttempt {
        PlayAttempt::new(self.plays)
    }
}

impl AudioOutput for RecordingOutput {
    fn set_source(&mut self, source: &AudioHandle) {
        self.position = 0.0;
        self.calls.push(Call::SetSource(source.as_str().to_string()));
    }

    fn play(&mut self) -> Result<PlayAttempt> {
        self.calls.push(Call::Play);
        if self.reject_play {
            return Err(PlaybackError::DeviceRejected("NotAllowedError".to_string()));
        }
        self.plays += 1;
        Ok(self.last_attempt())
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.position = seconds;
        self.calls.push(Call::Seek(seconds));
    }
}

/// Now-playing surface that records what was published
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub metadata: Option<NowPlayingMetadata>,
    pub state: Option<SurfacePlaybackState>,
    pub registered: Vec<TransportAction>,
    pub syncs: usize,
}

impl NowPlayingSurface for RecordingSurface {
    fn set_metadata(&mut self, metadata: &NowPlayingMetadata) {
        self.metadata = Some(metadata.clone());
    }

    fn set_playback_state(&mut self, state: SurfacePlaybackState) {
        self.state = Some(state);
        self.syncs += 1;
    }

    fn register_actions(&mut self, actions: &[TransportAction]) {
        self.registered = actions.to_vec();
    }

    fn clear(&mut self) {
        self.metadata = None;
        self.registered.clear();
    }
}

pub fn session_with(store: Rc<dyn KeyValueStore>, seed: u64) -> PlaybackSession<RecordingOutput> {
    PlaybackSession::with_rng(
        RecordingOutput::default(),
        store,
        SessionConfig::default(),
        Box::new(StdRng::seed_from_u64(seed)),
    )
}

pub fn session() -> PlaybackSession<RecordingOutput> {
    session_with(Rc::new(MemoryStore::new()), 42)
}

pub fn import(session: &mut PlaybackSession<RecordingOutput>, title: &str) -> Track {
    session.import(ImportedFile {
        title: title.to_string(),
        artist: "Test Artist".to_string(),
        album_art_url: None,
        source: AudioHandle::new(format!("blob:{title}")),
    })
}

/// Import `titles` and return them in order
pub fn import_all(session: &mut PlaybackSession<RecordingOutput>, titles: &[&str]) -> Vec<Track> {
    titles.iter().map(|title| import(session, title)).collect()
}

pub fn current_title<D: AudioOutput>(session: &PlaybackSession<D>) -> Option<&str> {
    session.current_track().map(|t| t.title.as_str())
}

pub fn titles(tracks: &[Track]) -> Vec<&str> {
    tracks.iter().map(|t| t.title.as_str()).collect()
}
