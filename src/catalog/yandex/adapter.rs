//! Adapter layer: Convert Yandex Music DTOs to domain models
//!
//! This is the ONLY place where Yandex DTO types become domain types.

use super::dto;
use crate::catalog::domain::{CatalogError, TrackQuery};

/// Convert a playlist response into track queries, keeping playlist order.
///
/// Entries without a track object or without a title can't be searched for
/// and are skipped.
pub fn to_track_queries(response: dto::PlaylistResponse) -> Result<Vec<TrackQuery>, CatalogError> {
    let playlist = response
        .result
        .ok_or_else(|| CatalogError::InvalidResponse("missing \"result\" object".to_string()))?;

    let mut queries = Vec::with_capacity(playlist.tracks.len());
    for (position, entry) in playlist.tracks.into_iter().enumerate() {
        let Some(track) = entry.track else {
            tracing::warn!(position, "Skipping playlist entry without track data");
            continue;
        };
        if track.title.trim().is_empty() {
            tracing::warn!(position, id = %track.id, "Skipping track without a title");
            continue;
        }
        queries.push(TrackQuery {
            artist: join_artists(&track.artists),
            title: track.title.trim().to_string(),
        });
    }

    Ok(queries)
}

/// "A, B, C" from the artist list
fn join_artists(artists: &[dto::Artist]) -> String {
    artists
        .iter()
        .map(|a| a.name.trim())
        .filter(|name| !name.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
