//! Player display settings
//!
//! A flat record of presentation parameters. The canonical defaults live in
//! [`PlayerDisplaySettings::default`]; a stored record is never trusted as a
//! whole. Loading starts from the defaults and overlays each known field of
//! the stored JSON object individually, so fields added in newer versions are
//! backfilled and malformed fields fall back to their default.

use crate::backend::KeyValueStore;
use crate::error::Result;
use crate::records::PLAYER_SETTINGS_KEY;
use crate::typed;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ops::RangeInclusive;
use std::rc::Rc;
use tracing::{debug, warn};

/// Current version of the persisted settings record
pub const SETTINGS_VERSION: u32 = 1;

/// Allowed mini player height in pixels
pub const MINI_PLAYER_HEIGHT_RANGE: RangeInclusive<u32> = 48..=120;

/// Allowed mini player artwork size in pixels
pub const ARTWORK_SIZE_RANGE: RangeInclusive<u32> = 32..=96;

/// Allowed full view artwork size in pixels
pub const FULL_VIEW_ARTWORK_SIZE_RANGE: RangeInclusive<u32> = 160..=480;

/// Allowed corner radius in pixels
pub const CORNER_RADIUS_RANGE: RangeInclusive<u32> = 0..=32;

/// Presentation parameters for the mini and full player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDisplaySettings {
    /// Record version (see [`SETTINGS_VERSION`])
    pub version: u32,

    /// Accent colour for buttons and highlights (`#rgb` / `#rrggbb`)
    pub accent_color: String,

    /// Player background colour
    pub background_color: String,

    /// Primary text colour (title)
    pub text_color: String,

    /// Secondary text colour (artist, time labels)
    pub secondary_text_color: String,

    /// Filled part of the progress bar
    pub progress_color: String,

    /// Unfilled part of the progress bar
    pub progress_track_color: String,

    /// Mini player height in pixels
    pub mini_player_height: u32,

    /// Mini player artwork size in pixels
    pub artwork_size: u32,

    /// Full view artwork size in pixels
    pub full_view_artwork_size: u32,

    /// Corner radius in pixels
    pub corner_radius: u32,

    /// Show artwork in the mini player
    pub show_artwork: bool,

    /// Show the progress bar in the mini player
    pub show_progress_bar: bool,

    /// Show elapsed/total time labels
    pub show_time_labels: bool,

    /// Show the shuffle button
    pub show_shuffle_button: bool,

    /// Show the repeat button
    pub show_repeat_button: bool,

    /// Blur the artwork behind the full view
    pub blur_background: bool,
}

impl Default for PlayerDisplaySettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            accent_color: "#1db954".to_string(),
            background_color: "#181818".to_string(),
            text_color: "#ffffff".to_string(),
            secondary_text_color: "#b3b3b3".to_string(),
            progress_color: "#1db954".to_string(),
            progress_track_color: "#4d4d4d".to_string(),
            mini_player_height: 64,
            artwork_size: 48,
            full_view_artwork_size: 320,
            corner_radius: 8,
            show_artwork: true,
            show_progress_bar: true,
            show_time_labels: true,
            show_shuffle_button: true,
            show_repeat_button: true,
            blur_background: false,
        }
    }
}

impl PlayerDisplaySettings {
    /// Build settings from a stored (possibly partial or foreign) record
    pub fn from_stored(stored: &Value) -> Self {
        Self::default().overlaid(stored)
    }

    /// Overlay the known fields of `patch` onto a copy of `self`
    ///
    /// Non-object patches are ignored. Each field is decoded on its own;
    /// a field with the wrong type or an invalid value keeps its current
    /// value.
    pub fn overlaid(&self, patch: &Value) -> Self {
        let mut next = self.clone();

        let Some(map) = patch.as_object() else {
            warn!("ignoring settings record that is not an object");
            return next;
        };

        if let Some(stored_version) = map.get("version").and_then(Value::as_u64) {
            if stored_version > u64::from(SETTINGS_VERSION) {
                debug!(stored_version, "settings record is newer than this build");
            }
        }

        overlay(map, "accentColor", &mut next.accent_color);
        overlay(map, "backgroundColor", &mut next.background_color);
        overlay(map, "textColor", &mut next.text_color);
        overlay(map, "secondaryTextColor", &mut next.secondary_text_color);
        overlay(map, "progressColor", &mut next.progress_color);
        overlay(map, "progressTrackColor", &mut next.progress_track_color);
        overlay(map, "miniPlayerHeight", &mut next.mini_player_height);
        overlay(map, "artworkSize", &mut next.artwork_size);
        overlay(map, "fullViewArtworkSize", &mut next.full_view_artwork_size);
        overlay(map, "cornerRadius", &mut next.corner_radius);
        overlay(map, "showArtwork", &mut next.show_artwork);
        overlay(map, "showProgressBar", &mut next.show_progress_bar);
        overlay(map, "showTimeLabels", &mut next.show_time_labels);
        overlay(map, "showShuffleButton", &mut next.show_shuffle_button);
        overlay(map, "showRepeatButton", &mut next.show_repeat_button);
        overlay(map, "blurBackground", &mut next.blur_background);

        next.version = SETTINGS_VERSION;
        next.sanitize_against(self);
        next
    }

    /// Reset every invalid field to its default
    pub fn sanitize(&mut self) {
        self.sanitize_against(&Self::default());
    }

    /// Reset every invalid field to the value it has in `fallback`
    fn sanitize_against(&mut self, fallback: &Self) {
        let colors = [
            (&mut self.accent_color, &fallback.accent_color),
            (&mut self.background_color, &fallback.background_color),
            (&mut self.text_color, &fallback.text_color),
            (&mut self.secondary_text_color, &fallback.secondary_text_color),
            (&mut self.progress_color, &fallback.progress_color),
            (&mut self.progress_track_color, &fallback.progress_track_color),
        ];
        for (color, fallback) in colors {
            if !is_hex_color(color) {
                warn!(value = %color, "invalid colour in player settings");
                color.clone_from(fallback);
            }
        }

        let sizes = [
            (
                &mut self.mini_player_height,
                fallback.mini_player_height,
                MINI_PLAYER_HEIGHT_RANGE,
            ),
            (&mut self.artwork_size, fallback.artwork_size, ARTWORK_SIZE_RANGE),
            (
                &mut self.full_view_artwork_size,
                fallback.full_view_artwork_size,
                FULL_VIEW_ARTWORK_SIZE_RANGE,
            ),
            (&mut self.corner_radius, fallback.corner_radius, CORNER_RADIUS_RANGE),
        ];
        for (size, fallback, range) in sizes {
            if !range.contains(size) {
                warn!(value = *size, "size out of range in player settings");
                *size = fallback;
            }
        }
    }
}

/// Decode `map[key]` into `slot`, leaving `slot` untouched on failure
fn overlay<T: DeserializeOwned>(map: &Map<String, Value>, key: &str, slot: &mut T) {
    let Some(raw) = map.get(key) else {
        return;
    };

    match T::deserialize(raw) {
        Ok(value) => *slot = value,
        Err(e) => warn!(key, error = %e, "ignoring malformed settings field"),
    }
}

/// `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };

    matches!(digits.len(), 3 | 4 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Player settings backed by a [`KeyValueStore`]
///
/// Every change is written through immediately. A rejected write is logged
/// and returned; the in-memory settings keep the change either way.
pub struct PlayerSettingsStore {
    store: Rc<dyn KeyValueStore>,
    current: PlayerDisplaySettings,
}

impl PlayerSettingsStore {
    /// Load settings from `store`, merged over the defaults
    pub fn load(store: Rc<dyn KeyValueStore>) -> Self {
        let current = typed::load::<Value, _>(store.as_ref(), PLAYER_SETTINGS_KEY)
            .map(|stored| PlayerDisplaySettings::from_stored(&stored))
            .unwrap_or_default();

        Self { store, current }
    }

    /// Current settings
    pub fn get(&self) -> &PlayerDisplaySettings {
        &self.current
    }

    /// Modify settings in place and persist
    pub fn update(&mut self, change: impl FnOnce(&mut PlayerDisplaySettings)) -> Result<()> {
        change(&mut self.current);
        self.current.sanitize();
        self.persist()
    }

    /// Overlay a partial JSON record onto the current settings and persist
    pub fn apply_patch(&mut self, patch: &Value) -> Result<()> {
        self.current = self.current.overlaid(patch);
        self.persist()
    }

    /// Restore defaults and persist
    pub fn reset(&mut self) -> Result<()> {
        self.current = PlayerDisplaySettings::default();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let result = typed::save(self.store.as_ref(), PLAYER_SETTINGS_KEY, &self.current);
        if let Err(e) = &result {
            warn!(error = %e, "failed to persist player settings");
        }
        result
    }
}
