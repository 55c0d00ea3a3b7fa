//! Streaming service catalogs - where playlists come from and where tracks go.
//!
//! # Architecture
//!
//! Same layering for every service:
//! - **Domain models** (`domain.rs`) - our types, shared with the sync driver
//! - **API DTOs** (`yandex/dto.rs`, `apple/dto.rs`) - exact API response shapes
//! - **Adapters** - convert DTOs to domain models
//! - **Clients** - HTTP clients for the external APIs
//! - **Traits** (`traits.rs`) - the seams the sync driver depends on
//!
//! The driver never sees a DTO or a URL, so either side can be swapped for
//! another service (or a mock) without touching the sync logic.

pub mod apple;
pub mod domain;
pub mod http;
pub mod matching;
pub mod traits;
pub mod yandex;

pub use apple::{AppleMusicClient, AppleMusicConfig};
pub use domain::{CatalogError, MatchResult, TrackMetadata, TrackQuery};
pub use traits::{DestinationCatalog, SourceCatalog};
pub use yandex::{YandexMusicClient, YandexMusicConfig};
