//! Trait definitions for the source and destination catalogs.
//!
//! The sync driver only ever talks to these traits, so tests can swap in
//! mock implementations while production uses the HTTP clients.
//!
//! # Example
//!
//! ```ignore
//! use music_export::catalog::traits::DestinationCatalog;
//!
//! async fn first_match<D: DestinationCatalog>(dest: &D) -> Option<String> {
//!     dest.search_one("Kino Blood Type").await.ok()?.track_id
//! }
//! ```

use async_trait::async_trait;

use super::domain::{CatalogError, MatchResult, TrackMetadata, TrackQuery};

/// Where the tracks come from.
#[async_trait]
pub trait SourceCatalog: Send + Sync {
    /// Fetch every track of the configured playlist, in playlist order.
    async fn list_playlist_tracks(&self) -> Result<Vec<TrackQuery>, CatalogError>;
}

/// Where the tracks go.
#[async_trait]
pub trait DestinationCatalog: Send + Sync {
    /// Search the catalog and return at most one best match.
    async fn search_one(&self, query_text: &str) -> Result<MatchResult, CatalogError>;

    /// Add a catalog track to the user's personal library.
    async fn add_to_library(&self, track_id: &str) -> Result<(), CatalogError>;

    /// Fetch display metadata for a catalog track.
    async fn get_metadata(&self, track_id: &str) -> Result<TrackMetadata, CatalogError>;
}

// Implement traits for real clients

#[async_trait]
impl SourceCatalog for super::yandex::YandexMusicClient {
    async fn list_playlist_tracks(&self) -> Result<Vec<TrackQuery>, CatalogError> {
        self.playlist_tracks().await
    }
}

#[async_trait]
impl DestinationCatalog for super::apple::AppleMusicClient {
    async fn search_one(&self, query_text: &str) -> Result<MatchResult, CatalogError> {
        self.find_best_match(query_text).await
    }

    async fn add_to_library(&self, track_id: &str) -> Result<(), CatalogError> {
        self.add_to_library(track_id).await
    }

    async fn get_metadata(&self, track_id: &str) -> Result<TrackMetadata, CatalogError> {
        self.song_metadata(track_id).await
    }
}
