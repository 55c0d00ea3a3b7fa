//! Apple Music integration (destination library)

mod adapter;
mod client;
pub mod dto;

pub use adapter::{to_match_result, to_metadata};
pub use client::{
    AppleMusicClient, AppleMusicConfig, DEFAULT_BASE_URL, DEFAULT_ORIGIN, DEFAULT_STOREFRONT,
};
