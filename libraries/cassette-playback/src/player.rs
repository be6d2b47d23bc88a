//! Event-driven player facade
//!
//! A [`Player`] is the one object the view layer talks to. It owns the
//! session and the now-playing bridge and processes one [`Input`] at a time,
//! returning the events that input produced.

use crate::bridge::{NowPlayingSurface, TransportAction, TransportBridge};
use crate::device::{AudioOutput, DeviceSignal};
use crate::error::Result;
use crate::events::PlaybackEvent;
use crate::session::PlaybackSession;
use crate::types::{Track, TrackId};
use tracing::warn;

/// User intent from the view layer
#[derive(Debug, Clone)]
pub enum Command {
    /// Play a track, optionally replacing the queue
    Play {
        track: Track,
        queue: Option<Vec<Track>>,
    },
    /// Play an imported or previously played track by id
    PlayById {
        id: TrackId,
        queue: Option<Vec<TrackId>>,
    },
    /// Play a history entry with the history as the queue
    PlayFromHistory(TrackId),
    /// Pause or resume
    TogglePlayPause,
    /// Skip forward
    Next,
    /// Skip back
    Previous,
    /// Seek to a position in seconds
    Seek(f64),
    /// Toggle shuffle
    ToggleShuffle,
    /// Cycle repeat mode
    ToggleRepeat,
    /// Open the full player view
    OpenFullView,
    /// Close the full player view
    CloseFullView,
}

/// Anything that can drive the session
#[derive(Debug, Clone)]
pub enum Input {
    /// User intent
    Command(Command),
    /// Output device report
    Device(DeviceSignal),
    /// Now-playing surface action
    Transport(TransportAction),
}

/// Session plus now-playing bridge
pub struct Player<D: AudioOutput, S: NowPlayingSurface> {
    session: PlaybackSession<D>,
    bridge: TransportBridge<S>,
}

impl<D: AudioOutput, S: NowPlayingSurface> Player<D, S> {
    /// Create a player and publish the initial (empty) state
    pub fn new(session: PlaybackSession<D>, surface: S) -> Self {
        let mut bridge = TransportBridge::new(surface);
        bridge.sync(&session);
        Self { session, bridge }
    }

    /// Process one input to completion
    ///
    /// Returns the events it produced; the bridge is already synced. Events
    /// are returned even when the input fails, since a failed play still
    /// evicts the stale entry.
    pub fn handle(&mut self, input: Input) -> (Vec<PlaybackEvent>, Result<()>) {
        let result = self.apply(input);

        let events = self.session.drain_events();
        if events.iter().any(PlaybackEvent::affects_transport) {
            self.bridge.sync(&self.session);
        }

        if let Err(e) = &result {
            warn!(error = %e, "input failed");
        }

        (events, result)
    }

    fn apply(&mut self, input: Input) -> Result<()> {
        match input {
            Input::Command(command) => self.apply_command(command),
            Input::Device(signal) => {
                self.session.handle_signal(signal);
                Ok(())
            }
            Input::Transport(action) => self.bridge.handle_action(action, &mut self.session),
        }
    }

    fn apply_command(&mut self, command: Command) -> Result<()> {
        let session = &mut self.session;
        match command {
            Command::Play { track, queue } => return session.play(&track, queue),
            Command::PlayById { id, queue } => return session.play_by_id(&id, queue.as_deref()),
            Command::PlayFromHistory(id) => return session.play_from_history(&id),
            Command::TogglePlayPause => session.toggle_play_pause(),
            Command::Next => return session.play_next(),
            Command::Previous => return session.play_previous(),
            Command::Seek(seconds) => return session.seek(seconds),
            Command::ToggleShuffle => session.toggle_shuffle(),
            Command::ToggleRepeat => session.toggle_repeat(),
            Command::OpenFullView => session.open_full_view(),
            Command::CloseFullView => session.close_full_view(),
        }
        Ok(())
    }

    /// The session
    pub fn session(&self) -> &PlaybackSession<D> {
        &self.session
    }

    /// The session, mutably (imports, lookups)
    ///
    /// Events recorded through this handle are returned by the next
    /// [`Player::handle`] call.
    pub fn session_mut(&mut self) -> &mut PlaybackSession<D> {
        &mut self.session
    }

    /// The now-playing bridge
    pub fn bridge(&self) -> &TransportBridge<S> {
        &self.bridge
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{RecordingSurface, SurfacePlaybackState};
    use crate::device::DummyOutput;
    use crate::library::ImportedFile;
    use crate::types::{AudioHandle, PlaybackState, SessionConfig};
    use cassette_storage::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::rc::Rc;

    fn player() -> Player<DummyOutput, RecordingSurface> {
        let session = PlaybackSession::with_rng(
            DummyOutput::default(),
            Rc::new(MemoryStore::new()),
            SessionConfig::default(),
            Box::new(StdRng::seed_from_u64(2)),
        );
        Player::new(session, RecordingSurface::default())
    }

    fn import(player: &mut Player<DummyOutput, RecordingSurface>, title: &str) -> Track {
        player.session_mut().import(ImportedFile {
            title: title.to_string(),
            artist: "Artist".to_string(),
            album_art_url: None,
            source: AudioHandle::new(format!("blob:{title}")),
        })
    }

    #[test]
    fn new_player_clears_surface() {
        let player = player();
        assert_eq!(player.bridge().surface().clears, 1);
    }

    #[test]
    fn play_command_syncs_surface() {
        let mut player = player();
        let a = import(&mut player, "a");

        let (events, result) = player.handle(Input::Command(Command::Play {
            track: a.clone(),
            queue: None,
        }));

        assert!(result.is_ok());
        assert!(events.contains(&PlaybackEvent::StateChanged {
            state: PlaybackState::Playing
        }));
        let surface = player.bridge().surface();
        assert_eq!(surface.state, Some(SurfacePlaybackState::Playing));
        assert_eq!(surface.metadata.as_ref().map(|m| m.title.as_str()), Some("a"));
    }

    #[test]
    fn progress_ticks_do_not_touch_surface() {
        let mut player = player();
        let a = import(&mut player, "a");
        player.handle(Input::Command(Command::Play {
            track: a,
            queue: None,
        }));
        let registrations = player.bridge().surface().registrations;

        let (events, _) = player.handle(Input::Device(DeviceSignal::TimeUpdate(1.5)));

        assert_eq!(events, vec![PlaybackEvent::ProgressChanged { position_secs: 1.5 }]);
        assert_eq!(player.bridge().surface().registrations, registrations);
    }

    #[test]
    fn transport_pause_is_reflected_on_surface() {
        let mut player = player();
        let a = import(&mut player, "a");
        player.handle(Input::Command(Command::Play {
            track: a,
            queue: None,
        }));

        let (_, result) = player.handle(Input::Transport(TransportAction::Pause));

        assert!(result.is_ok());
        assert_eq!(player.session().state(), PlaybackState::Paused);
        assert_eq!(
            player.bridge().surface().state,
            Some(SurfacePlaybackState::Paused)
        );
    }

    #[test]
    fn failed_command_still_returns_events() {
        let mut player = player();
        let ghost = Track {
            id: "404".into(),
            title: "Ghost".to_string(),
            artist: "Nobody".to_string(),
            album_art_url: None,
            source: None,
        };

        let (events, result) = player.handle(Input::Command(Command::Play {
            track: ghost,
            queue: None,
        }));

        assert!(result.is_err());
        assert!(events
            .iter()
            .any(|e| matches!(e, PlaybackEvent::StaleTrackEvicted { .. })));
    }
}
