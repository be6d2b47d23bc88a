//! WASM-compatible player wrapper

use super::media_session::{ActionSink, MediaSessionSurface};
use super::output::{describe, HtmlAudioOutput, SignalSink};
use super::types::{WasmSnapshot, WasmTrack};
use crate::bridge::TransportAction;
use crate::device::DeviceSignal;
use crate::events::PlaybackEvent;
use crate::library::ImportedFile;
use crate::player::{Command, Input, Player};
use crate::session::PlaybackSession;
use crate::types::{AudioHandle, SessionConfig, TrackId};
use crate::PlaybackError;
use cassette_storage::wasm::LocalStorageStore;
use cassette_storage::{KeyValueStore, MemoryStore, PlayerSettingsStore};
use js_sys::Function;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;

type BrowserPlayer = Player<HtmlAudioOutput, MediaSessionSurface>;

/// State shared between the JS handle and the DOM callbacks
struct Shared {
    player: RefCell<Option<BrowserPlayer>>,
    settings: RefCell<PlayerSettingsStore>,
    on_change: RefCell<Option<Function>>,
    on_notice: RefCell<Option<Function>>,
}

/// Browser music player
///
/// Owns one `<audio>` element and binds to `navigator.mediaSession`. All
/// state changes are reported through `onChange` with the list of events;
/// messages meant for the user (stale tracks, blocked playback) go to
/// `onNotice`.
#[wasm_bindgen]
pub struct WasmPlayer {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl WasmPlayer {
    /// Create a player backed by `localStorage`
    ///
    /// Falls back to in-memory storage when `localStorage` is unavailable.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<WasmPlayer, JsValue> {
        // Enable panic hooks for better error messages in console
        console_error_panic_hook::set_once();

        let store: Rc<dyn KeyValueStore> = match LocalStorageStore::open() {
            Ok(store) => Rc::new(store),
            Err(e) => {
                web_sys::console::warn_1(&format!("Cassette: {e}; settings will not persist").into());
                Rc::new(MemoryStore::new())
            }
        };

        let shared = Rc::new(Shared {
            player: RefCell::new(None),
            settings: RefCell::new(PlayerSettingsStore::load(Rc::clone(&store))),
            on_change: RefCell::new(None),
            on_notice: RefCell::new(None),
        });

        let weak = Rc::downgrade(&shared);
        let signal_sink: SignalSink = {
            let weak = Weak::clone(&weak);
            Rc::new(move |signal: DeviceSignal| dispatch_weak(&weak, Input::Device(signal)))
        };
        let action_sink: ActionSink =
            Rc::new(move |action: TransportAction| dispatch_weak(&weak, Input::Transport(action)));

        let output = HtmlAudioOutput::create(signal_sink)?;
        let surface = MediaSessionSurface::new(action_sink);
        let session = PlaybackSession::new(output, store, SessionConfig::default());
        *shared.player.borrow_mut() = Some(Player::new(session, surface));

        Ok(Self { shared })
    }

    // ===== Library =====

    /// Import a file (object URL plus user-supplied metadata)
    #[wasm_bindgen(js_name = importTrack)]
    pub fn import_track(
        &self,
        source_url: &str,
        title: &str,
        artist: &str,
        album_art_url: Option<String>,
    ) -> Result<JsValue, JsValue> {
        let track = self.with_player(|player| {
            player.session_mut().import(ImportedFile {
                title: title.to_string(),
                artist: artist.to_string(),
                album_art_url,
                source: AudioHandle::new(source_url),
            })
        })?;

        self.notify_change(&[]);
        serde_wasm_bindgen::to_value(&WasmTrack::from(&track)).map_err(JsValue::from)
    }

    // ===== Playback Control =====

    /// Play an imported or recently played track
    ///
    /// `queue_ids` is an optional array of ids the track was picked from.
    pub fn play(&self, id: &str, queue_ids: JsValue) -> Result<(), JsValue> {
        let queue: Option<Vec<String>> = if queue_ids.is_undefined() || queue_ids.is_null() {
            None
        } else {
            serde_wasm_bindgen::from_value(queue_ids)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse queue ids: {e}")))?
        };

        self.run(Command::PlayById {
            id: TrackId::new(id),
            queue: queue.map(|ids| ids.into_iter().map(TrackId::from).collect()),
        })
    }

    /// Play a "Recently Played" entry with the history as the queue
    #[wasm_bindgen(js_name = playFromHistory)]
    pub fn play_from_history(&self, id: &str) -> Result<(), JsValue> {
        self.run(Command::PlayFromHistory(TrackId::new(id)))
    }

    /// Pause or resume
    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&self) -> Result<(), JsValue> {
        self.run(Command::TogglePlayPause)
    }

    /// Skip to next track
    pub fn next(&self) -> Result<(), JsValue> {
        self.run(Command::Next)
    }

    /// Go to previous track
    pub fn previous(&self) -> Result<(), JsValue> {
        self.run(Command::Previous)
    }

    /// Seek to position in seconds
    pub fn seek(&self, position_secs: f64) -> Result<(), JsValue> {
        self.run(Command::Seek(position_secs))
    }

    // ===== Shuffle & Repeat =====

    /// Toggle shuffle
    #[wasm_bindgen(js_name = toggleShuffle)]
    pub fn toggle_shuffle(&self) -> Result<(), JsValue> {
        self.run(Command::ToggleShuffle)
    }

    /// Cycle repeat mode (off, all, one)
    #[wasm_bindgen(js_name = toggleRepeat)]
    pub fn toggle_repeat(&self) -> Result<(), JsValue> {
        self.run(Command::ToggleRepeat)
    }

    // ===== View =====

    /// Open the full player view
    #[wasm_bindgen(js_name = openFullView)]
    pub fn open_full_view(&self) -> Result<(), JsValue> {
        self.run(Command::OpenFullView)
    }

    /// Close the full player view
    #[wasm_bindgen(js_name = closeFullView)]
    pub fn close_full_view(&self) -> Result<(), JsValue> {
        self.run(Command::CloseFullView)
    }

    // ===== State Queries =====

    /// Current state as a plain object
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        let snapshot = self.with_player(|player| WasmSnapshot::capture(player.session()))?;
        serde_wasm_bindgen::to_value(&snapshot).map_err(JsValue::from)
    }

    /// Recently played entries, most recent first
    pub fn history(&self) -> Result<JsValue, JsValue> {
        let entries = self.with_player(|player| player.session().history().entries())?;
        serde_wasm_bindgen::to_value(&entries).map_err(JsValue::from)
    }

    // ===== Settings =====

    /// Current display settings
    pub fn settings(&self) -> Result<JsValue, JsValue> {
        let settings = self.shared.settings.borrow().get().clone();
        serde_wasm_bindgen::to_value(&settings).map_err(JsValue::from)
    }

    /// Merge a partial settings object and persist
    ///
    /// Invalid fields are ignored. The change is kept in memory even if
    /// saving fails; the error is still returned.
    #[wasm_bindgen(js_name = updateSettings)]
    pub fn update_settings(&self, patch: JsValue) -> Result<JsValue, JsValue> {
        let patch: serde_json::Value = serde_wasm_bindgen::from_value(patch)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse settings: {e}")))?;

        self.shared
            .settings
            .borrow_mut()
            .apply_patch(&patch)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.settings()
    }

    /// Restore default settings and persist
    #[wasm_bindgen(js_name = resetSettings)]
    pub fn reset_settings(&self) -> Result<JsValue, JsValue> {
        self.shared
            .settings
            .borrow_mut()
            .reset()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.settings()
    }

    // ===== Event Listeners =====

    /// Register change callback, called with the array of events
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: Function) {
        *self.shared.on_change.borrow_mut() = Some(callback);
    }

    /// Register notice callback, called with a message for the user
    #[wasm_bindgen(js_name = onNotice)]
    pub fn on_notice(&self, callback: Function) {
        *self.shared.on_notice.borrow_mut() = Some(callback);
    }

    // ===== Internal =====

    fn run(&self, command: Command) -> Result<(), JsValue> {
        dispatch(&self.shared, Input::Command(command))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    fn with_player<T>(&self, f: impl FnOnce(&mut BrowserPlayer) -> T) -> Result<T, JsValue> {
        let mut player = self
            .shared
            .player
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("player is busy"))?;
        let player = player
            .as_mut()
            .ok_or_else(|| JsValue::from_str("player is not initialized"))?;
        Ok(f(player))
    }

    fn notify_change(&self, events: &[PlaybackEvent]) {
        notify(&self.shared, events);
    }
}

fn dispatch_weak(shared: &Weak<Shared>, input: Input) {
    if let Some(shared) = shared.upgrade() {
        // Already logged by the player; stale tracks also raised a notice
        let _ = dispatch(&shared, input);
    }
}

/// Run one input, then tell JavaScript about it
///
/// The player borrow is released before any callback runs, so callbacks may
/// call back into the player.
fn dispatch(shared: &Shared, input: Input) -> Result<(), PlaybackError> {
    let outcome = match shared.player.try_borrow_mut() {
        Ok(mut player) => player.as_mut().map(|player| player.handle(input)),
        Err(_) => {
            tracing::warn!(?input, "player busy; dropping input");
            None
        }
    };

    let Some((events, result)) = outcome else {
        return Ok(());
    };

    notify(shared, &events);
    result
}

fn notify(shared: &Shared, events: &[PlaybackEvent]) {
    for event in events {
        let message = match event {
            PlaybackEvent::StaleTrackEvicted { title, .. } => format!(
                "\"{title}\" is no longer available. Please import the file again."
            ),
            PlaybackEvent::Error { message } => message.clone(),
            _ => continue,
        };
        notice(shared, &message);
    }

    let callback = shared.on_change.borrow().clone();
    if let Some(callback) = callback {
        match serde_wasm_bindgen::to_value(events) {
            Ok(value) => {
                if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                    web_sys::console::error_1(&format!("onChange failed: {}", describe(&e)).into());
                }
            }
            Err(e) => tracing::warn!(error = %e, "could not serialize events"),
        }
    }
}

fn notice(shared: &Shared, message: &str) {
    let callback = shared.on_notice.borrow().clone();
    match callback {
        Some(callback) => {
            if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(message)) {
                web_sys::console::error_1(&format!("onNotice failed: {}", describe(&e)).into());
            }
        }
        None => web_sys::console::warn_1(&message.into()),
    }
}
