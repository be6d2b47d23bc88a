//! Playback session - core orchestration
//!
//! Ties user intents (play, next, previous, seek, shuffle, repeat) and device
//! signals to the output device, the play queue and the persisted history.
//!
//! All mutation goes through the methods below, one input at a time. Between
//! two calls the session is always consistent: a playing session has a current
//! track, the shuffled order is derived from the current queue, and the
//! history is at most `history_limit` long.

use crate::{
    device::{AudioOutput, DeviceSignal, PlayAttempt},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    history::History,
    library::{ImportedFile, Library},
    queue::{NextStep, PlayQueue},
    types::{PlaybackState, RepeatMode, SessionConfig, Track, TrackId},
};
use cassette_storage::{load, save, HistoryEntry, KeyValueStore};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Central playback state machine
///
/// Owns:
/// - The output device (exclusively)
/// - The library of tracks imported this session
/// - Queue and shuffled order
/// - Recently-played history (persisted on every change)
/// - Repeat mode, progress and presentational flags
pub struct PlaybackSession<D: AudioOutput> {
    // Collaborators
    device: D,
    // Latest play() not yet superseded by a new source or a pause
    live_attempt: Option<PlayAttempt>,
    store: Rc<dyn KeyValueStore>,
    history_key: String,

    // Tracks
    library: Library,
    history: History,
    queue: PlayQueue,

    // State
    current_track: Option<Track>,
    is_playing: bool,
    progress_secs: f64,
    duration_secs: f64,
    repeat: RepeatMode,
    full_view_open: bool,

    // Randomness for shuffle (injectable for tests)
    rng: Box<dyn RngCore>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl<D: AudioOutput> PlaybackSession<D> {
    /// Create a session, restoring history from `store`
    pub fn new(device: D, store: Rc<dyn KeyValueStore>, config: SessionConfig) -> Self {
        Self::with_rng(device, store, config, Box::new(StdRng::from_entropy()))
    }

    /// Create a session with an explicit randomness source
    pub fn with_rng(
        device: D,
        store: Rc<dyn KeyValueStore>,
        config: SessionConfig,
        rng: Box<dyn RngCore>,
    ) -> Self {
        let entries: Vec<HistoryEntry> =
            load(store.as_ref(), &config.history_key).unwrap_or_default();
        let history = History::from_entries(entries, config.history_limit);
        debug!(entries = history.len(), "restored play history");

        Self {
            device,
            live_attempt: None,
            store,
            history_key: config.history_key,
            library: Library::new(),
            history,
            queue: PlayQueue::new(config.shuffle),
            current_track: None,
            is_playing: false,
            progress_secs: 0.0,
            duration_secs: 0.0,
            repeat: config.repeat,
            full_view_open: false,
            rng,
            pending_events: Vec::new(),
        }
    }

    // ===== Library =====

    /// Import a file into this session's library
    pub fn import(&mut self, file: ImportedFile) -> Track {
        self.library.import(file)
    }

    /// Tracks imported this session
    pub fn library(&self) -> &Library {
        &self.library
    }

    // ===== Playback Control =====

    /// Play `track`, optionally replacing the queue with the list it was
    /// picked from
    ///
    /// Playing the track that is already current toggles pause/resume instead
    /// of restarting it. While shuffle is on, any other track becomes the
    /// anchor of a freshly shuffled order.
    ///
    /// # Errors
    ///
    /// `PlaybackError::StaleTrack` when `track` has no live source. The entry
    /// is evicted from history and nothing else changes.
    pub fn play(&mut self, track: &Track, originating_queue: Option<Vec<Track>>) -> Result<()> {
        let resolved = match self.library.resolve(track) {
            Ok(resolved) => resolved,
            Err(e) => {
                self.evict_stale(track);
                return Err(e);
            }
        };

        let same_track = self.is_current(&resolved.id);

        if let Some(tracks) = originating_queue {
            let tracks: Vec<Track> = tracks
                .into_iter()
                .map(|t| self.library.resolve(&t).unwrap_or(t))
                .collect();
            self.queue
                .replace(tracks, Some(&resolved), &mut *self.rng);
            self.emit(PlaybackEvent::QueueChanged {
                length: self.queue.queue().len(),
            });
        } else if self.queue.is_shuffle_active() && !same_track {
            self.queue
                .rebuild_shuffled(Some(&resolved), &mut *self.rng);
        }

        if same_track {
            self.toggle_play_pause();
            return Ok(());
        }

        self.start(resolved)
    }

    /// Play an imported (or previously played) track by id
    ///
    /// Queue ids that are unknown are skipped.
    ///
    /// # Errors
    ///
    /// `PlaybackError::TrackNotFound` when `id` is neither imported nor in
    /// history; otherwise as [`PlaybackSession::play`].
    pub fn play_by_id(&mut self, id: &TrackId, queue_ids: Option<&[TrackId]>) -> Result<()> {
        let track = self
            .lookup(id)
            .ok_or_else(|| PlaybackError::TrackNotFound(id.clone()))?;
        let queue = queue_ids.map(|ids| ids.iter().filter_map(|id| self.lookup(id)).collect());
        self.play(&track, queue)
    }

    /// Play a history entry with the "Recently Played" list as the queue
    ///
    /// # Errors
    ///
    /// As [`PlaybackSession::play_by_id`].
    pub fn play_from_history(&mut self, id: &TrackId) -> Result<()> {
        let track = self
            .history
            .as_tracks()
            .into_iter()
            .find(|t| &t.id == id)
            .ok_or_else(|| PlaybackError::TrackNotFound(id.clone()))?;
        let queue = self.history.as_tracks();
        self.play(&track, Some(queue))
    }

    /// Pause if playing, resume if paused (no-op when idle)
    pub fn toggle_play_pause(&mut self) {
        if self.current_track.is_none() {
            debug!("toggle play/pause with no current track");
            return;
        }

        if self.is_playing {
            self.pause_device();
        } else {
            self.resume_device();
        }

        self.emit_state_changed();
    }

    /// Skip to the next track in the active queue
    ///
    /// At the end of the queue (without repeat-all), or when the current track
    /// is no longer in the active queue, playback pauses and the current track
    /// stays loaded. Repeat-one does not apply to explicit skips.
    ///
    /// # Errors
    ///
    /// `PlaybackError::StaleTrack` when the next track has no live source.
    pub fn play_next(&mut self) -> Result<()> {
        let Some(current_id) = self.current_track.as_ref().map(|t| t.id.clone()) else {
            return Ok(());
        };

        let next = match self.queue.next_after(&current_id, self.repeat) {
            NextStep::Advance(track) => Some(track.clone()),
            NextStep::EndOfQueue => {
                debug!(id = %current_id, "reached end of queue");
                None
            }
            NextStep::NotInQueue => {
                debug!(id = %current_id, "current track is not in the active queue");
                None
            }
        };

        match next {
            Some(track) => self.advance_to(&track),
            None => {
                self.stop_at_end();
                Ok(())
            }
        }
    }

    /// Go to the previous track in the active queue
    ///
    /// Wraps from the first track to the last regardless of repeat mode.
    ///
    /// # Errors
    ///
    /// `PlaybackError::StaleTrack` when the previous track has no live source.
    pub fn play_previous(&mut self) -> Result<()> {
        let Some(current_id) = self.current_track.as_ref().map(|t| t.id.clone()) else {
            return Ok(());
        };

        let Some(previous) = self.queue.previous_before(&current_id).cloned() else {
            debug!(id = %current_id, "current track is not in the active queue");
            return Ok(());
        };

        self.advance_to(&previous)
    }

    // ===== Seek =====

    /// Seek the current track to `seconds`
    ///
    /// Progress is updated immediately; clamping is left to the device.
    pub fn seek(&mut self, seconds: f64) -> Result<()> {
        if !seconds.is_finite() {
            return Err(PlaybackError::InvalidSeekPosition(seconds));
        }
        if self.current_track.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }

        self.device.set_current_time(seconds);
        self.progress_secs = seconds;
        self.emit(PlaybackEvent::ProgressChanged {
            position_secs: seconds,
        });
        Ok(())
    }

    // ===== Shuffle & Repeat =====

    /// Toggle shuffle
    ///
    /// Turning it on builds a new order anchored at the current track;
    /// turning it off discards the shuffled order.
    pub fn toggle_shuffle(&mut self) {
        if self.queue.is_shuffle_active() {
            self.queue.disable_shuffle();
        } else {
            self.queue
                .enable_shuffle(self.current_track.as_ref(), &mut *self.rng);
        }

        let active = self.queue.is_shuffle_active();
        debug!(active, "shuffle toggled");
        self.emit(PlaybackEvent::ShuffleChanged { active });
    }

    /// Cycle repeat mode `Off -> All -> One -> Off`
    pub fn toggle_repeat(&mut self) {
        self.repeat = self.repeat.cycled();
        debug!(mode = ?self.repeat, "repeat mode changed");
        self.emit(PlaybackEvent::RepeatChanged { mode: self.repeat });
    }

    // ===== View =====

    /// Open the full player view
    pub fn open_full_view(&mut self) {
        self.set_full_view(true);
    }

    /// Close the full player view
    pub fn close_full_view(&mut self) {
        self.set_full_view(false);
    }

    fn set_full_view(&mut self, open: bool) {
        if self.full_view_open != open {
            self.full_view_open = open;
            self.emit(PlaybackEvent::FullViewChanged { open });
        }
    }

    // ===== Device Signals =====

    /// React to a signal from the output device
    pub fn handle_signal(&mut self, signal: DeviceSignal) {
        match signal {
            DeviceSignal::TimeUpdate(seconds) if seconds.is_finite() => {
                self.progress_secs = seconds;
                self.emit(PlaybackEvent::ProgressChanged {
                    position_secs: seconds,
                });
            }
            DeviceSignal::DurationKnown(seconds) if seconds.is_finite() => {
                self.duration_secs = seconds;
                self.emit(PlaybackEvent::DurationChanged {
                    duration_secs: seconds,
                });
            }
            DeviceSignal::TimeUpdate(_) | DeviceSignal::DurationKnown(_) => {
                debug!(?signal, "ignoring non-finite time from device");
            }
            DeviceSignal::Ended => self.on_ended(),
            DeviceSignal::PlayRejected { attempt, reason } => {
                if self.live_attempt != Some(attempt) {
                    debug!(attempt = attempt.id(), %reason, "ignoring refusal of a superseded play");
                    return;
                }
                self.live_attempt = None;
                let was_playing = self.is_playing;
                self.on_play_rejected(&reason);
                if was_playing {
                    self.emit_state_changed();
                }
            }
        }
    }

    fn on_ended(&mut self) {
        if self.current_track.is_none() {
            return;
        }

        if self.repeat == RepeatMode::One {
            self.device.set_current_time(0.0);
            self.progress_secs = 0.0;
            self.emit(PlaybackEvent::ProgressChanged { position_secs: 0.0 });
            self.resume_device();
            self.emit_state_changed();
            return;
        }

        if let Err(e) = self.play_next() {
            warn!(error = %e, "could not advance after track ended");
        }
    }

    // ===== State Queries =====

    /// Get current playback state
    pub fn state(&self) -> PlaybackState {
        match (&self.current_track, self.is_playing) {
            (None, _) => PlaybackState::Idle,
            (Some(_), true) => PlaybackState::Playing,
            (Some(_), false) => PlaybackState::Paused,
        }
    }

    /// Currently loaded track
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Whether playback is (believed to be) running
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Position of the current track in seconds
    pub fn progress_secs(&self) -> f64 {
        self.progress_secs
    }

    /// Duration of the current track in seconds (0 until known)
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Queue in browsing order
    pub fn queue(&self) -> &[Track] {
        self.queue.queue()
    }

    /// Shuffled order (empty while shuffle is off)
    pub fn shuffled_queue(&self) -> &[Track] {
        self.queue.shuffled()
    }

    /// Queue currently governing next/previous
    pub fn active_queue(&self) -> &[Track] {
        self.queue.active()
    }

    /// Check if shuffle is on
    pub fn is_shuffle_active(&self) -> bool {
        self.queue.is_shuffle_active()
    }

    /// Current repeat mode
    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    /// Whether the full player view is open
    pub fn is_full_view_open(&self) -> bool {
        self.full_view_open
    }

    /// Recently-played history
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The output device
    pub fn device(&self) -> &D {
        &self.device
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns all events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    fn is_current(&self, id: &TrackId) -> bool {
        self.current_track.as_ref().is_some_and(|t| &t.id == id)
    }

    /// Imported track, or the history projection of a played one
    fn lookup(&self, id: &TrackId) -> Option<Track> {
        self.library.get(id).cloned().or_else(|| {
            self.history
                .as_tracks()
                .into_iter()
                .find(|t| &t.id == id)
        })
    }

    /// Move to `track` from next/previous (restarts even if it is current)
    fn advance_to(&mut self, track: &Track) -> Result<()> {
        match self.library.resolve(track) {
            Ok(resolved) => self.start(resolved),
            Err(e) => {
                self.evict_stale(track);
                self.stop_at_end();
                Err(e)
            }
        }
    }

    /// Load `track` into the device and start it
    fn start(&mut self, track: Track) -> Result<()> {
        let Some(source) = track.source.clone() else {
            return Err(PlaybackError::StaleTrack { id: track.id });
        };

        info!(id = %track.id, title = %track.title, "now playing");

        self.history.promote(&track);
        let previous_track_id = self
            .current_track
            .replace(track.clone())
            .map(|previous| previous.id);
        self.progress_secs = 0.0;
        self.duration_secs = 0.0;

        self.device.set_source(&source);
        self.live_attempt = None;
        self.emit(PlaybackEvent::TrackChanged {
            track_id: track.id,
            previous_track_id,
        });

        self.resume_device();
        self.emit_state_changed();
        self.persist_history();
        Ok(())
    }

    /// Ask the device to play, reverting the play flag if it refuses
    fn resume_device(&mut self) {
        self.is_playing = true;
        match self.device.play() {
            Ok(attempt) => self.live_attempt = Some(attempt),
            Err(e) => {
                self.live_attempt = None;
                self.on_play_rejected(&e.to_string());
            }
        }
    }

    fn pause_device(&mut self) {
        self.device.pause();
        self.live_attempt = None;
        self.is_playing = false;
    }

    fn on_play_rejected(&mut self, reason: &str) {
        warn!(reason, "output device refused to play");
        self.is_playing = false;
        self.emit(PlaybackEvent::Error {
            message: format!("Playback was blocked: {reason}"),
        });
    }

    /// Pause at the end of the queue, keeping the current track loaded
    fn stop_at_end(&mut self) {
        if self.is_playing {
            self.pause_device();
            self.emit_state_changed();
        }
    }

    fn evict_stale(&mut self, track: &Track) {
        warn!(id = %track.id, title = %track.title, "track has no live source");

        if self.history.evict(&track.id) {
            self.persist_history();
        }

        self.emit(PlaybackEvent::StaleTrackEvicted {
            track_id: track.id.clone(),
            title: track.title.clone(),
        });
    }

    /// Save history; a failed write is logged and otherwise ignored
    fn persist_history(&mut self) {
        if let Err(e) = save(self.store.as_ref(), &self.history_key, &self.history.entries()) {
            warn!(error = %e, "failed to persist play history");
        }

        self.emit(PlaybackEvent::HistoryChanged {
            length: self.history.len(),
        });
    }

    fn emit_state_changed(&mut self) {
        let state = self.state();
        self.emit(PlaybackEvent::StateChanged { state });
    }

    fn emit(&mut self, event: PlaybackEvent) {
        self.pending_events.push(event);
    }
}
