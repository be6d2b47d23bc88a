//! Persisted record types

use serde::{Deserialize, Deserializer, Serialize};

/// Key for the recently-played history (JSON array, most recent first)
pub const RECENTLY_PLAYED_KEY: &str = "recentlyPlayedSongs";

/// Key for the player display settings record
pub const PLAYER_SETTINGS_KEY: &str = "playerSettings";

/// Key for the appearance theme record (owned by the view layer)
pub const APPEARANCE_SETTINGS_KEY: &str = "appearanceSettings";

/// Maximum number of persisted history entries
pub const HISTORY_LIMIT: usize = 50;

/// Persisted projection of a played track
///
/// Carries display metadata only. The playable source handle does not survive
/// a reload, so a restored entry must be resolved against the tracks imported
/// in the current session before it can play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Track id (stable for the session that imported it)
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub id: String,

    /// Track title
    pub title: String,

    /// Artist name
    #[serde(default)]
    pub artist: String,

    /// Artwork reference, if the track had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_art_url: Option<String>,
}

/// Older records stored numeric timestamp ids
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Integer(u64),
        Float(f64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Integer(n) => n.to_string(),
        RawId::Float(f) => format!("{f}"),
    })
}
