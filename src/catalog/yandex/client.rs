//! Yandex Music HTTP client
//!
//! Reads the tracks of a user's playlist. The auth token is sent verbatim in
//! the `Authorization` header, so include the `OAuth ` prefix in the config.

use super::{adapter, dto};
use crate::catalog::domain::{CatalogError, TrackQuery};
use crate::catalog::http;

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.music.yandex.net";

/// Connection settings for the playlist source
#[derive(Debug, Clone)]
pub struct YandexMusicConfig {
    pub auth_token: String,
    pub user_id: String,
    pub playlist_id: String,
    pub base_url: String,
}

/// Yandex Music API client
pub struct YandexMusicClient {
    http_client: reqwest::Client,
    config: YandexMusicConfig,
}

impl YandexMusicClient {
    /// Create a client on top of a shared HTTP client
    pub fn new(config: YandexMusicConfig, http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Fetch the configured playlist as track queries
    pub async fn playlist_tracks(&self) -> Result<Vec<TrackQuery>, CatalogError> {
        let response = self.send_playlist_request().await?;
        let queries = adapter::to_track_queries(response)?;
        tracing::info!(
            playlist = %self.config.playlist_id,
            tracks = queries.len(),
            "Fetched source playlist"
        );
        Ok(queries)
    }

    fn playlist_url(&self) -> String {
        format!(
            "{}/users/{}/playlists/{}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.user_id),
            urlencoding::encode(&self.config.playlist_id)
        )
    }

    async fn send_playlist_request(&self) -> Result<dto::PlaylistResponse, CatalogError> {
        let url = self.playlist_url();
        tracing::debug!(%url, "Requesting playlist");

        let response = self
            .http_client
            .get(&url)
            .header(reqwest::header::AUTHORIZATION, &self.config.auth_token)
            .send()
            .await
            .map_err(http::network_error)?;

        let response = http::check_status(response).await?;
        http::parse_json(response).await
    }
}
