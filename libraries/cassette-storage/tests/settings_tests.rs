//! Integration tests for the player settings store

use cassette_storage::{
    load, KeyValueStore, MemoryStore, PlayerDisplaySettings, PlayerSettingsStore,
    StorageError, PLAYER_SETTINGS_KEY,
};
use serde_json::{json, Value};
use std::rc::Rc;

#[test]
fn empty_store_yields_defaults() {
    let store: Rc<dyn KeyValueStore> = Rc::new(MemoryStore::new());
    let settings = PlayerSettingsStore::load(store);
    assert_eq!(settings.get(), &PlayerDisplaySettings::default());
}

#[test]
fn corrupt_record_yields_defaults() {
    let memory = Rc::new(MemoryStore::new());
    memory.set(PLAYER_SETTINGS_KEY, "{ definitely not json").unwrap();

    let settings = PlayerSettingsStore::load(memory);
    assert_eq!(settings.get(), &PlayerDisplaySettings::default());
}

#[test]
fn stored_partial_record_is_merged() {
    let memory = Rc::new(MemoryStore::new());
    memory
        .set(
            PLAYER_SETTINGS_KEY,
            r##"{"accentColor":"#ff8800","miniPlayerHeight":80}"##,
        )
        .unwrap();

    let settings = PlayerSettingsStore::load(memory);
    assert_eq!(settings.get().accent_color, "#ff8800");
    assert_eq!(settings.get().mini_player_height, 80);
    assert!(settings.get().show_time_labels);
}

#[test]
fn update_persists_every_change() {
    let memory = Rc::new(MemoryStore::new());
    let mut settings = PlayerSettingsStore::load(memory.clone());

    settings
        .update(|s| {
            s.blur_background = true;
            s.corner_radius = 16;
        })
        .unwrap();

    let stored: Value = load(memory.as_ref(), PLAYER_SETTINGS_KEY).unwrap();
    assert_eq!(stored["blurBackground"], json!(true));
    assert_eq!(stored["cornerRadius"], json!(16));

    // A fresh load sees the same settings
    let reloaded = PlayerSettingsStore::load(memory);
    assert_eq!(reloaded.get(), settings.get());
}

#[test]
fn update_sanitizes_invalid_values() {
    let memory = Rc::new(MemoryStore::new());
    let mut settings = PlayerSettingsStore::load(memory);

    settings
        .update(|s| {
            s.text_color = "blue".to_string();
            s.artwork_size = 1000;
        })
        .unwrap();

    let defaults = PlayerDisplaySettings::default();
    assert_eq!(settings.get().text_color, defaults.text_color);
    assert_eq!(settings.get().artwork_size, defaults.artwork_size);
}

#[test]
fn patch_applies_over_current_settings() {
    let memory = Rc::new(MemoryStore::new());
    let mut settings = PlayerSettingsStore::load(memory);

    settings.apply_patch(&json!({ "showArtwork": false })).unwrap();
    settings
        .apply_patch(&json!({ "accentColor": "#000", "showArtwork": "bogus" }))
        .unwrap();

    assert_eq!(settings.get().accent_color, "#000");
    // Bogus value keeps the current (patched) value, not the default
    assert!(!settings.get().show_artwork);
}

#[test]
fn rejected_write_keeps_in_memory_change() {
    let memory = Rc::new(MemoryStore::with_quota(16));
    let mut settings = PlayerSettingsStore::load(memory.clone());

    let err = settings.update(|s| s.show_repeat_button = false).unwrap_err();
    assert!(matches!(err, StorageError::Write { .. }));

    assert!(!settings.get().show_repeat_button);
    assert!(memory.is_empty());
}

#[test]
fn reset_restores_defaults() {
    let memory = Rc::new(MemoryStore::new());
    let mut settings = PlayerSettingsStore::load(memory);

    settings.update(|s| s.show_artwork = false).unwrap();
    settings.reset().unwrap();
    assert_eq!(settings.get(), &PlayerDisplaySettings::default());
}
