//! Apple Music API Data Transfer Objects
//!
//! These types match what the Apple Music catalog endpoints return.
//! DO NOT use these types outside the apple module - convert to domain types.
//!
//! Search response (trimmed):
//! ```json
//! {
//!   "results": {
//!     "songs": {
//!       "href": "/v1/catalog/ru/search?limit=5&term=...&types=songs",
//!       "data": [{
//!         "id": "1440857781",
//!         "type": "songs",
//!         "attributes": {"name": "Numb", "artistName": "Linkin Park", "albumName": "Meteora"}
//!       }]
//!     }
//!   }
//! }
//! ```
//!
//! When nothing matches, `results` comes back as an empty object.

use serde::{Deserialize, Serialize};

/// `GET catalog/{storefront}/search`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: SearchResults,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SearchResults {
    pub songs: Option<SongPage>,
}

/// A page of song resources
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SongPage {
    #[serde(default)]
    pub data: Vec<Song>,
}

/// `GET catalog/{storefront}/songs/{id}`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SongsResponse {
    #[serde(default)]
    pub data: Vec<Song>,
}

/// Song resource
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Song {
    pub id: String,
    pub attributes: Option<SongAttributes>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SongAttributes {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist_name: String,
    pub album_name: Option<String>,
}
