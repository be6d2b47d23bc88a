//! Integration tests for the file-backed store
//!
//! Exercises real files in a temporary directory.

use cassette_storage::{
    load, save, FileStore, HistoryEntry, KeyValueStore, StorageError, RECENTLY_PLAYED_KEY,
};
use tempfile::TempDir;

fn entry(id: &str) -> HistoryEntry {
    HistoryEntry {
        id: id.to_string(),
        title: format!("Song {id}"),
        artist: "Artist".to_string(),
        album_art_url: None,
    }
}

#[test]
fn history_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let history = vec![entry("3"), entry("2"), entry("1")];

    {
        let store = FileStore::new(dir.path());
        save(&store, RECENTLY_PLAYED_KEY, &history).unwrap();
    }

    let reopened = FileStore::new(dir.path());
    let restored: Option<Vec<HistoryEntry>> = load(&reopened, RECENTLY_PLAYED_KEY);
    assert_eq!(restored, Some(history));
}

#[test]
fn root_directory_created_on_first_write() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("nested").join("store");
    let store = FileStore::new(&root);

    assert_eq!(store.get("playerSettings").unwrap(), None);
    store.set("playerSettings", "{}").unwrap();

    assert!(root.join("playerSettings.json").exists());
    // No temp file left behind
    assert!(!root.join("playerSettings.json.tmp").exists());
}

#[test]
fn overwrite_replaces_value() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());

    store.set("k", "first").unwrap();
    store.set("k", "second").unwrap();
    assert_eq!(store.get("k").unwrap().as_deref(), Some("second"));
}

#[test]
fn corrupt_file_loads_none() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("recentlyPlayedSongs.json"), "[{\"id\":").unwrap();

    let store = FileStore::new(dir.path());
    let restored: Option<Vec<HistoryEntry>> = load(&store, RECENTLY_PLAYED_KEY);
    assert!(restored.is_none());
}

#[test]
fn remove_missing_key_is_ok() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path());

    store.remove("never-written").unwrap();
    store.set("k", "v").unwrap();
    store.remove("k").unwrap();
    assert_eq!(store.get("k").unwrap(), None);
}

#[test]
fn write_into_file_path_fails_as_write_error() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let store = FileStore::new(&blocker);
    let err = store.set("k", "v").unwrap_err();
    assert!(matches!(err, StorageError::Write { .. }));
}

#[test]
fn unreadable_entry_fails_as_read_error_naming_key() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(format!("{RECENTLY_PLAYED_KEY}.json"))).unwrap();
    let store = FileStore::new(dir.path());

    let err = store.get(RECENTLY_PLAYED_KEY).unwrap_err();

    assert!(matches!(err, StorageError::Read { ref key, .. } if key == RECENTLY_PLAYED_KEY));
}
