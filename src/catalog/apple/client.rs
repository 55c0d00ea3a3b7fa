//! Apple Music HTTP client
//!
//! Talks to the same API the Apple Music web player uses. Catalog requests
//! need the developer token (`authorization`) and a matching `origin`;
//! library writes additionally need the user's `media-user-token`.
//!
//! ## Query encoding
//! The library endpoint takes bracketed parameter names (`ids[songs]`,
//! `art[url]`). The URL is built by hand so the brackets go out literally.

use super::{adapter, dto};
use crate::catalog::domain::{CatalogError, MatchResult, TrackMetadata};
use crate::catalog::http;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://amp-api.music.apple.com/v1";
/// Origin the API expects for web player tokens
pub const DEFAULT_ORIGIN: &str = "https://music.apple.com";
/// Default catalog storefront
pub const DEFAULT_STOREFRONT: &str = "ru";

const MEDIA_USER_TOKEN_HEADER: &str = "media-user-token";

/// Connection settings for the destination library
#[derive(Debug, Clone)]
pub struct AppleMusicConfig {
    pub auth_token: String,
    pub media_user_token: String,
    pub origin: String,
    pub base_url: String,
    pub storefront: String,
    /// How many search candidates to fetch and rank
    pub search_limit: u32,
    /// Candidates scoring below this are ignored
    pub min_match_score: f32,
}

impl AppleMusicConfig {
    /// Config with default endpoints and the given tokens
    pub fn new(auth_token: impl Into<String>, media_user_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
            media_user_token: media_user_token.into(),
            origin: DEFAULT_ORIGIN.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            storefront: DEFAULT_STOREFRONT.to_string(),
            search_limit: 5,
            min_match_score: 0.0,
        }
    }
}

/// Apple Music API client
pub struct AppleMusicClient {
    http_client: reqwest::Client,
    config: AppleMusicConfig,
}

impl AppleMusicClient {
    /// Create a client on top of a shared HTTP client
    pub fn new(config: AppleMusicConfig, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Search the catalog and pick the closest song
    pub async fn find_best_match(&self, query_text: &str) -> Result<MatchResult, CatalogError> {
        let response = self.send_search_request(query_text).await?;
        Ok(adapter::to_match_result(
            response,
            query_text,
            self.config.min_match_score,
        ))
    }

    /// Look up artist and title for a catalog song
    pub async fn song_metadata(&self, track_id: &str) -> Result<TrackMetadata, CatalogError> {
        let url = self.song_url(track_id);
        let response = self
            .catalog_request(self.http_client.get(&url))
            .send()
            .await
            .map_err(http::network_error)?;

        let response = http::check_status(response).await?;
        let songs: dto::SongsResponse = http::parse_json(response).await?;
        adapter::to_metadata(songs)
    }

    /// Add a catalog song to the user's library
    pub async fn add_to_library(&self, track_id: &str) -> Result<(), CatalogError> {
        let url = self.library_url(track_id);
        let response = self
            .catalog_request(self.http_client.post(&url))
            .header(MEDIA_USER_TOKEN_HEADER, &self.config.media_user_token)
            .send()
            .await
            .map_err(http::network_error)?;

        http::check_status(response).await?;
        tracing::debug!(track_id, "Added to library");
        Ok(())
    }

    async fn send_search_request(
        &self,
        query_text: &str,
    ) -> Result<dto::SearchResponse, CatalogError> {
        let url = self.search_url(query_text);
        let response = self
            .catalog_request(self.http_client.get(&url))
            .send()
            .await
            .map_err(http::network_error)?;

        let response = http::check_status(response).await?;
        http::parse_json(response).await
    }

    /// Headers every request needs
    fn catalog_request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header(reqwest::header::AUTHORIZATION, &self.config.auth_token)
            .header(reqwest::header::ORIGIN, &self.config.origin)
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn search_url(&self, query_text: &str) -> String {
        format!(
            "{}/catalog/{}/search?limit={}&term={}&types=songs",
            self.base(),
            urlencoding::encode(&self.config.storefront),
            self.config.search_limit.max(1),
            urlencoding::encode(query_text)
        )
    }

    fn song_url(&self, track_id: &str) -> String {
        format!(
            "{}/catalog/{}/songs/{}",
            self.base(),
            urlencoding::encode(&self.config.storefront),
            urlencoding::encode(track_id)
        )
    }

    fn library_url(&self, track_id: &str) -> String {
        format!(
            "{}/me/library?art[url]=f&ids[songs]={}",
            self.base(),
            urlencoding::encode(track_id)
        )
    }
}
