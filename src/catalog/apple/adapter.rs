//! Adapter layer: Convert Apple Music DTOs to domain models
//!
//! This is the ONLY place where Apple DTO types become domain types.

use super::dto;
use crate::catalog::domain::{CatalogError, MatchResult, TrackMetadata};
use crate::catalog::matching;

/// Pick the best song for `query_text` out of a search response.
///
/// Candidates are compared on "artist title". A song without attributes can
/// still match on its position alone when it's the only result.
pub fn to_match_result(
    response: dto::SearchResponse,
    query_text: &str,
    min_score: f32,
) -> MatchResult {
    let songs = response.results.songs.map(|page| page.data).unwrap_or_default();
    if songs.is_empty() {
        return MatchResult::not_found();
    }

    if let [only] = songs.as_slice()
        && only.attributes.is_none()
    {
        return MatchResult::found(only.id.clone());
    }

    let labels: Vec<String> = songs.iter().map(candidate_label).collect();
    match matching::best_candidate(query_text, labels.iter().map(String::as_str), min_score) {
        Some(i) => {
            tracing::debug!(
                query = query_text,
                candidate = %labels[i],
                of = songs.len(),
                "Picked search candidate"
            );
            MatchResult::found(songs[i].id.clone())
        }
        None => {
            tracing::debug!(query = query_text, candidates = songs.len(), "No candidate close enough");
            MatchResult::not_found()
        }
    }
}

/// Convert a songs lookup into display metadata
pub fn to_metadata(response: dto::SongsResponse) -> Result<TrackMetadata, CatalogError> {
    let song = response.data.into_iter().next().ok_or(CatalogError::NoMatches)?;
    let attributes = song.attributes.ok_or_else(|| {
        CatalogError::InvalidResponse(format!("song {} has no attributes", song.id))
    })?;

    Ok(TrackMetadata {
        artist_name: attributes.artist_name,
        title: attributes.name,
    })
}

fn candidate_label(song: &dto::Song) -> String {
    match song.attributes {
        Some(ref a) => format!("{} {}", a.artist_name, a.name),
        None => String::new(),
    }
}
