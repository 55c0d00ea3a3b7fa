//! Internal domain models shared by the catalog clients and the sync driver.
//!
//! These types are OUR types - they don't change when a streaming service
//! changes its API. Every response gets converted into these via adapters.

use serde::{Deserialize, Serialize};

/// A track to look up on the destination catalog.
///
/// One per source playlist entry. Never modified after the source client
/// produces it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrackQuery {
    /// Artist name(s), joined with ", " when there is more than one
    pub artist: String,
    /// Track title
    pub title: String,
}

impl TrackQuery {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }

    /// Free-text search string sent to the destination catalog
    pub fn search_text(&self) -> String {
        match (self.artist.trim(), self.title.trim()) {
            ("", title) => title.to_string(),
            (artist, "") => artist.to_string(),
            (artist, title) => format!("{} {}", artist, title),
        }
    }
}

impl std::fmt::Display for TrackQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

/// Result of a destination catalog search.
///
/// "Nothing matched" is a normal outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Destination catalog identifier of the best match
    pub track_id: Option<String>,
}

impl MatchResult {
    pub fn found(track_id: impl Into<String>) -> Self {
        Self {
            track_id: Some(track_id.into()),
        }
    }

    pub fn not_found() -> Self {
        Self { track_id: None }
    }

    pub fn is_found(&self) -> bool {
        self.track_id.is_some()
    }
}

/// Display metadata for a destination catalog track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    pub artist_name: String,
    pub title: String,
}

impl std::fmt::Display for TrackMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.artist_name, self.title)
    }
}

/// Errors returned by the catalog clients.
///
/// The driver turns these into per-track outcome data for searches and
/// library additions; only a failed playlist fetch is fatal.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Not authorized (HTTP {0}) - check the auth token")]
    Unauthorized(u16),

    #[error("Rate limited - try again later")]
    RateLimited,

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("No matching track in catalog")]
    NoMatches,
}

impl CatalogError {
    /// Whether re-running the batch later could plausibly succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::RateLimited => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
