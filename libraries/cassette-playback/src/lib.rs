//! Cassette - Playback Session
//!
//! The core of a local-file music player: what is playing, what plays next,
//! and what was played recently.
//!
//! This crate provides:
//! - A library of imported tracks with session-scoped source handles
//! - Queue navigation with anchored shuffle and repeat modes (Off, All, One)
//! - The [`PlaybackSession`] state machine driving a single [`AudioOutput`]
//! - Recently-played [`History`], persisted through `cassette-storage`
//! - A [`TransportBridge`] to the platform "now playing" surface
//! - An event-driven [`Player`] facade
//!
//! # Architecture
//!
//! `cassette-playback` does no decoding or rendering itself. The platform
//! supplies an [`AudioOutput`] (an `<audio>` element in the browser) and a
//! [`NowPlayingSurface`]; the session commands the device and reacts to the
//! [`DeviceSignal`]s it reports. Everything runs on one thread, one input at a
//! time.
//!
//! # Example: Playing a Queue
//!
//! ```rust
//! use cassette_playback::{
//!     AudioHandle, AudioOutput, ImportedFile, PlayAttempt, PlaybackSession, PlaybackState,
//!     Result, SessionConfig,
//! };
//! use cassette_storage::MemoryStore;
//! use std::rc::Rc;
//!
//! #[derive(Default)]
//! struct SilentOutput {
//!     position: f64,
//! }
//!
//! impl AudioOutput for SilentOutput {
//!     fn set_source(&mut self, _source: &AudioHandle) {
//!         self.position = 0.0;
//!     }
//!     fn play(&mut self) -> Result<PlayAttempt> {
//!         Ok(PlayAttempt::new(0))
//!     }
//!     fn pause(&mut self) {}
//!     fn current_time(&self) -> f64 {
//!         self.position
//!     }
//!     fn set_current_time(&mut self, seconds: f64) {
//!         self.position = seconds;
//!     }
//! }
//!
//! let mut session = PlaybackSession::new(
//!     SilentOutput::default(),
//!     Rc::new(MemoryStore::new()),
//!     SessionConfig::default(),
//! );
//!
//! let first = session.import(ImportedFile {
//!     title: "First".to_string(),
//!     artist: "Artist".to_string(),
//!     album_art_url: None,
//!     source: AudioHandle::new("blob:first"),
//! });
//! let second = session.import(ImportedFile {
//!     title: "Second".to_string(),
//!     artist: "Artist".to_string(),
//!     album_art_url: None,
//!     source: AudioHandle::new("blob:second"),
//! });
//!
//! session.play(&first, Some(vec![first.clone(), second.clone()])).unwrap();
//! assert_eq!(session.state(), PlaybackState::Playing);
//!
//! session.play_next().unwrap();
//! assert_eq!(session.current_track().map(|t| &t.id), Some(&second.id));
//! assert_eq!(session.history().len(), 2);
//! ```

pub mod bridge;
pub mod device;
pub mod error;
pub mod events;
pub mod history;
pub mod library;
pub mod player;
pub mod queue;
pub mod session;
pub mod shuffle;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use bridge::{
    NowPlayingMetadata, NowPlayingSurface, SurfacePlaybackState, TransportAction,
    TransportBridge,
};
pub use device::{AudioOutput, DeviceSignal, PlayAttempt};
pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use history::History;
pub use library::{ImportedFile, Library, UNKNOWN_ARTIST, UNKNOWN_TITLE};
pub use player::{Command, Input, Player};
pub use queue::{compute_next, compute_previous, NextStep, PlayQueue};
pub use session::PlaybackSession;
pub use shuffle::build_shuffled_queue;
pub use types::{AudioHandle, PlaybackState, RepeatMode, SessionConfig, Track, TrackId};

#[cfg(feature = "wasm")]
pub use wasm::WasmPlayer;
