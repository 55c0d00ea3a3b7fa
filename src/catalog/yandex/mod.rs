//! Yandex Music integration (playlist source)

mod adapter;
mod client;
pub mod dto;

pub use adapter::to_track_queries;
pub use client::{DEFAULT_BASE_URL, YandexMusicClient, YandexMusicConfig};
