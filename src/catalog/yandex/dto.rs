//! Yandex Music API Data Transfer Objects
//!
//! These types match what the Yandex Music playlist endpoint returns.
//! DO NOT use these types outside the yandex module - convert to domain types.
//!
//! Example response (trimmed):
//! ```json
//! {
//!   "result": {
//!     "kind": 1003,
//!     "title": "Road trip",
//!     "tracks": [{
//!       "id": 123,
//!       "track": {
//!         "id": "38634572",
//!         "title": "Группа крови",
//!         "artists": [{"id": 41114, "name": "Кино"}]
//!       }
//!     }]
//!   }
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level playlist response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistResponse {
    pub result: Option<Playlist>,
}

/// Playlist body
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Playlist {
    /// Playlist title
    pub title: Option<String>,
    /// Entries, in playlist order
    #[serde(default)]
    pub tracks: Vec<PlaylistEntry>,
}

/// One playlist entry; the full track object may be missing for removed tracks
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaylistEntry {
    pub track: Option<Track>,
}

/// Track info
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Track {
    /// Track ID (the API sends either a string or a number)
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
}

/// Artist info
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Artist {
    pub name: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
