//! Configuration system using TOML files.
//!
//! Config is stored in the OS-standard config directory:
//! - Windows: %APPDATA%\music-export\config.toml
//! - macOS: ~/Library/Application Support/music-export/config.toml
//! - Linux: ~/.config/music-export/config.toml
//!
//! Credentials can also come from CLI flags or environment variables (and a
//! `.env` file); those win over the file. Only the CLI layer reads the
//! environment - the clients get plain config structs built here.

use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::{AppleMusicConfig, YandexMusicConfig, apple, yandex};
use crate::error::Error;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Destination library settings
    pub apple_music: AppleMusicSection,

    /// Source playlist settings
    pub yandex_music: YandexMusicSection,

    /// Batch behaviour
    pub sync: SyncSection,
}

/// Apple Music credentials and endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppleMusicSection {
    /// Developer token, sent as `authorization` (include the `Bearer ` prefix)
    pub auth_token: Option<String>,
    /// User token, needed to write to the library
    pub media_user_token: Option<String>,
    pub base_url: String,
    pub origin: String,
    /// Catalog storefront (country code)
    pub storefront: String,
    /// Search candidates to fetch and rank per track
    pub search_limit: u32,
    /// Minimum similarity (0.0 - 1.0) for a candidate to count as a match
    pub min_match_score: f32,
}

impl Default for AppleMusicSection {
    fn default() -> Self {
        Self {
            auth_token: None,
            media_user_token: None,
            base_url: apple::DEFAULT_BASE_URL.to_string(),
            origin: apple::DEFAULT_ORIGIN.to_string(),
            storefront: apple::DEFAULT_STOREFRONT.to_string(),
            search_limit: 5,
            min_match_score: 0.0,
        }
    }
}

/// Yandex Music credentials and playlist
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YandexMusicSection {
    /// OAuth token, sent as `Authorization` (include the `OAuth ` prefix)
    pub auth_token: Option<String>,
    /// Playlist owner
    pub user_id: Option<String>,
    /// Playlist kind
    pub playlist_id: Option<String>,
    pub base_url: String,
}

impl Default for YandexMusicSection {
    fn default() -> Self {
        Self {
            auth_token: None,
            user_id: None,
            playlist_id: None,
            base_url: yandex::DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Sync batch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncSection {
    /// Max per-track workflows running at once
    pub max_concurrency: usize,
    /// Per-request HTTP timeout
    pub request_timeout_secs: u64,
    /// Cancel the batch after this many seconds (unset = no deadline)
    pub deadline_secs: Option<u64>,
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            request_timeout_secs: 30,
            deadline_secs: None,
        }
    }
}

/// Values from CLI flags / environment that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub apple_auth_token: Option<String>,
    pub apple_media_user_token: Option<String>,
    pub yandex_auth_token: Option<String>,
    pub yandex_user_id: Option<String>,
    pub yandex_playlist_id: Option<String>,
    pub max_concurrency: Option<usize>,
    pub deadline_secs: Option<u64>,
}

/// Environment variable names, as shown to the user for missing settings
pub mod env_vars {
    pub const APPLE_AUTH_TOKEN: &str = "APPLE_MUSIC_AUTH_TOKEN";
    pub const APPLE_MEDIA_USER_TOKEN: &str = "APPLE_MUSIC_MEDIA_USER_TOKEN";
    pub const YANDEX_AUTH_TOKEN: &str = "YANDEX_MUSIC_AUTH_TOKEN";
    pub const YANDEX_USER_ID: &str = "YANDEX_MUSIC_USER_ID";
    pub const YANDEX_PLAYLIST_ID: &str = "YANDEX_MUSIC_PLAYLIST_ID";
}

impl Config {
    /// Apply flag/env values on top of the file values
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        fn set<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        set(&mut self.apple_music.auth_token, non_blank(overrides.apple_auth_token));
        set(
            &mut self.apple_music.media_user_token,
            non_blank(overrides.apple_media_user_token),
        );
        set(&mut self.yandex_music.auth_token, non_blank(overrides.yandex_auth_token));
        set(&mut self.yandex_music.user_id, non_blank(overrides.yandex_user_id));
        set(&mut self.yandex_music.playlist_id, non_blank(overrides.yandex_playlist_id));
        if let Some(n) = overrides.max_concurrency {
            self.sync.max_concurrency = n;
        }
        set(&mut self.sync.deadline_secs, overrides.deadline_secs);
        self
    }

    /// Client config for the destination.
    ///
    /// `library_access` also requires the media user token (needed for adds).
    pub fn apple_music(&self, library_access: bool) -> Result<AppleMusicConfig, Error> {
        let section = &self.apple_music;
        let mut missing = Vec::new();
        if is_blank(&section.auth_token) {
            missing.push(env_vars::APPLE_AUTH_TOKEN);
        }
        if library_access && is_blank(&section.media_user_token) {
            missing.push(env_vars::APPLE_MEDIA_USER_TOKEN);
        }
        if !missing.is_empty() {
            return Err(missing_settings("Apple Music", &missing));
        }
        if section.search_limit == 0 {
            return Err(Error::config("apple_music.search_limit must be at least 1"));
        }
        if !(0.0..=1.0).contains(&section.min_match_score) {
            return Err(Error::config(
                "apple_music.min_match_score must be between 0.0 and 1.0",
            ));
        }

        Ok(AppleMusicConfig {
            origin: section.origin.clone(),
            base_url: section.base_url.clone(),
            storefront: section.storefront.clone(),
            search_limit: section.search_limit,
            min_match_score: section.min_match_score,
            ..AppleMusicConfig::new(
                section.auth_token.clone().unwrap_or_default(),
                section.media_user_token.clone().unwrap_or_default(),
            )
        })
    }

    /// Client config for the source
    pub fn yandex_music(&self) -> Result<YandexMusicConfig, Error> {
        let section = &self.yandex_music;
        let mut missing = Vec::new();
        if is_blank(&section.auth_token) {
            missing.push(env_vars::YANDEX_AUTH_TOKEN);
        }
        if is_blank(&section.user_id) {
            missing.push(env_vars::YANDEX_USER_ID);
        }
        if is_blank(&section.playlist_id) {
            missing.push(env_vars::YANDEX_PLAYLIST_ID);
        }
        if !missing.is_empty() {
            return Err(missing_settings("Yandex Music", &missing));
        }

        Ok(YandexMusicConfig {
            auth_token: section.auth_token.clone().unwrap_or_default(),
            user_id: section.user_id.clone().unwrap_or_default(),
            playlist_id: section.playlist_id.clone().unwrap_or_default(),
            base_url: section.base_url.clone(),
        })
    }

    pub fn max_concurrency(&self) -> Result<NonZeroUsize, Error> {
        NonZeroUsize::new(self.sync.max_concurrency)
            .ok_or_else(|| Error::config("sync.max_concurrency must be at least 1"))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.sync.request_timeout_secs.max(1))
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.sync.deadline_secs.map(Duration::from_secs)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}

fn missing_settings(service: &str, names: &[&str]) -> Error {
    Error::config(format!(
        "missing {} settings: {} (set the environment variables, pass the flags, or edit the config file)",
        service,
        names.join(", ")
    ))
}

// ============================================================================
// Config File Operations
// ============================================================================

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("music-export"))
}

/// Get the full path to the config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load configuration from the default location
///
/// Returns default config if the file doesn't exist or can't be parsed.
pub fn load() -> Config {
    match config_path() {
        Some(path) => load_from(&path),
        None => {
            tracing::warn!("Could not determine config directory, using defaults");
            Config::default()
        }
    }
}

/// Load configuration from a specific file
///
/// Logs warnings but doesn't fail - we always return a usable config.
pub fn load_from(path: &Path) -> Config {
    if !path.exists() {
        tracing::debug!("No config file found at {:?}, using defaults", path);
        return Config::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str(&contents) {
            Ok(config) => {
                tracing::debug!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::error!("Failed to parse config file {:?}: {}", path, e);
                tracing::warn!("Using default configuration");
                Config::default()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file {:?}: {}", path, e);
            Config::default()
        }
    }
}

/// Save configuration to a specific file
///
/// Creates the parent directory if it doesn't exist.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::CreateDir(dir.to_path_buf(), e))?;
    }

    let contents = toml::to_string_pretty(config).map_err(ConfigError::Serialize)?;

    // Write atomically (write to temp, then rename)
    let temp_path = path.with_extension("toml.tmp");
    std::fs::write(&temp_path, &contents).map_err(|e| ConfigError::Write(temp_path.clone(), e))?;
    std::fs::rename(&temp_path, path)
        .map_err(|e| ConfigError::Rename(temp_path, path.to_path_buf(), e))?;

    tracing::info!("Saved config to {:?}", path);
    Ok(())
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to create config directory {0}: {1}")]
    CreateDir(PathBuf, std::io::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(toml::ser::Error),

    #[error("Failed to write config to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

// ============================================================================
// Tests
// ============================================================================
