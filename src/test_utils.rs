//! Test utilities and fixtures for music-export tests.
//!
//! The main piece is [`FakeDestination`], an instrumented destination catalog
//! that records every call and tracks how many are in flight at once.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{FakeDestination, numbered_queries};
//!
//! let queries = numbered_queries(5);
//! let fake = Arc::new(FakeDestination::for_queries(&queries).failing_add(2));
//! // ... run the reconciler, then inspect fake.add_calls() / fake.peak_in_flight()
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::catalog::{CatalogError, DestinationCatalog, MatchResult, TrackMetadata, TrackQuery};

/// `n` distinct queries: "Artist i" / "Song i"
pub fn numbered_queries(n: usize) -> Vec<TrackQuery> {
    (0..n)
        .map(|i| TrackQuery::new(format!("Artist {}", i), format!("Song {}", i)))
        .collect()
}

/// Destination catalog fake with call recording and concurrency tracking.
///
/// Track `i` of the queries it was built from resolves to ID `id-i`.
pub struct FakeDestination {
    catalog: HashMap<String, usize>,
    no_match: HashSet<usize>,
    failing_search: HashSet<usize>,
    failing_add: HashSet<usize>,
    delay: Duration,
    cancel_after_adds: Option<(usize, CancellationToken)>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    completed_adds: AtomicUsize,
    search_calls: Mutex<Vec<String>>,
    add_calls: Mutex<Vec<String>>,
}

impl FakeDestination {
    pub fn for_queries(queries: &[TrackQuery]) -> Self {
        Self {
            catalog: queries
                .iter()
                .enumerate()
                .map(|(i, q)| (q.search_text(), i))
                .collect(),
            no_match: HashSet::new(),
            failing_search: HashSet::new(),
            failing_add: HashSet::new(),
            delay: Duration::ZERO,
            cancel_after_adds: None,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            completed_adds: AtomicUsize::new(0),
            search_calls: Mutex::new(Vec::new()),
            add_calls: Mutex::new(Vec::new()),
        }
    }

    /// Searches for track `index` find nothing
    pub fn without_match(mut self, index: usize) -> Self {
        self.no_match.insert(index);
        self
    }

    /// Searches for track `index` fail
    pub fn failing_search(mut self, index: usize) -> Self {
        self.failing_search.insert(index);
        self
    }

    /// Adding track `index` fails
    pub fn failing_add(mut self, index: usize) -> Self {
        self.failing_add.insert(index);
        self
    }

    /// Every call takes this long
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Cancel `token` right as the `n`th add completes
    pub fn cancel_after_adds(mut self, n: usize, token: CancellationToken) -> Self {
        self.cancel_after_adds = Some((n, token));
        self
    }

    pub fn track_id(index: usize) -> String {
        format!("id-{}", index)
    }

    pub fn index_of(track_id: &str) -> Option<usize> {
        track_id.strip_prefix("id-")?.parse().ok()
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn add_calls(&self) -> Vec<String> {
        self.add_calls.lock().unwrap().clone()
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    /// Count this call as in flight until the guard drops (also on abort)
    fn enter(&self) -> InFlightGuard<'_> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        InFlightGuard(&self.in_flight)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

struct InFlightGuard<'a>(&'a AtomicUsize);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl DestinationCatalog for FakeDestination {
    async fn search_one(&self, query_text: &str) -> Result<MatchResult, CatalogError> {
        let _guard = self.enter();
        self.search_calls.lock().unwrap().push(query_text.to_string());
        self.pause().await;

        let Some(&index) = self.catalog.get(query_text) else {
            return Ok(MatchResult::not_found());
        };
        if self.failing_search.contains(&index) {
            return Err(CatalogError::Network("connection reset".to_string()));
        }
        if self.no_match.contains(&index) {
            return Ok(MatchResult::not_found());
        }
        Ok(MatchResult::found(Self::track_id(index)))
    }

    async fn add_to_library(&self, track_id: &str) -> Result<(), CatalogError> {
        let _guard = self.enter();
        self.add_calls.lock().unwrap().push(track_id.to_string());
        self.pause().await;

        if let Some(index) = Self::index_of(track_id)
            && self.failing_add.contains(&index)
        {
            return Err(CatalogError::Http {
                status: 500,
                body: "internal error".to_string(),
            });
        }

        let done = self.completed_adds.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((n, token)) = &self.cancel_after_adds
            && done == *n
        {
            token.cancel();
        }
        Ok(())
    }

    async fn get_metadata(&self, track_id: &str) -> Result<TrackMetadata, CatalogError> {
        let index = Self::index_of(track_id).ok_or(CatalogError::NoMatches)?;
        Ok(TrackMetadata {
            artist_name: format!("Artist {}", index),
            title: format!("Song {}", index),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_queries() {
        let queries = numbered_queries(3);
        assert_eq!(queries.len(), 3);
        assert_eq!(queries[2], TrackQuery::new("Artist 2", "Song 2"));
    }

    #[test]
    fn test_track_id_roundtrip() {
        assert_eq!(FakeDestination::index_of(&FakeDestination::track_id(17)), Some(17));
        assert_eq!(FakeDestination::index_of("other"), None);
    }

    #[tokio::test]
    async fn test_fake_resolves_and_records() {
        let queries = numbered_queries(2);
        let fake = FakeDestination::for_queries(&queries).without_match(1);

        let first = fake.search_one(&queries[0].search_text()).await.unwrap();
        let second = fake.search_one(&queries[1].search_text()).await.unwrap();

        assert_eq!(first.track_id.as_deref(), Some("id-0"));
        assert!(!second.is_found());
        assert_eq!(fake.search_calls().len(), 2);
        assert_eq!(fake.in_flight(), 0);
        assert_eq!(fake.peak_in_flight(), 1);
    }
}
