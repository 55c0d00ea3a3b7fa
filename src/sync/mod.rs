//! Playlist sync - the reconciliation driver and its results.
//!
//! ```ignore
//! let reconciler = Reconciler::new(Arc::new(apple), NonZeroUsize::new(8).unwrap());
//! let report = sync_playlist(&yandex, &reconciler, &CancellationToken::new()).await?;
//! print!("{}", report::render_text(&report));
//! ```

mod driver;
mod outcome;
pub mod report;

pub use driver::Reconciler;
pub use outcome::{CancelReason, OutcomeRecord, OutcomeStatus, SyncReport, SyncSummary};

use chrono::Utc;
use tokio_util::sync::CancellationToken;

use crate::catalog::SourceCatalog;
use crate::error::{Error, Result};

/// Fetch the source playlist and reconcile every track into the destination.
///
/// A failed fetch is fatal and nothing gets scheduled. An empty playlist
/// yields an empty report. Cancelling during the fetch yields an empty report
/// marked as interrupted.
pub async fn sync_playlist(
    source: &dyn SourceCatalog,
    reconciler: &Reconciler,
    cancel: &CancellationToken,
) -> Result<SyncReport> {
    let started_at = Utc::now();
    let queries = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::warn!("Cancelled while fetching the source playlist");
            return Ok(SyncReport {
                cancelled: Some(CancelReason::Interrupted),
                ..SyncReport::empty(started_at)
            });
        }
        fetched = source.list_playlist_tracks() => fetched.map_err(Error::Fetch)?,
    };
    Ok(reconciler.reconcile(queries, cancel).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, TrackQuery};
    use crate::catalog::traits::mocks::MockSource;
    use crate::test_utils::{FakeDestination, numbered_queries};
    use std::num::NonZeroUsize;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fetch_failure_is_fatal_and_schedules_nothing() {
        let fake = Arc::new(FakeDestination::for_queries(&[]));
        let reconciler = Reconciler::new(fake.clone(), NonZeroUsize::new(2).unwrap());
        let source = MockSource::with_error(CatalogError::Unauthorized(403));

        let result = sync_playlist(&source, &reconciler, &CancellationToken::new()).await;

        assert!(matches!(result, Err(Error::Fetch(CatalogError::Unauthorized(403)))));
        assert!(fake.search_calls().is_empty());
    }

    #[tokio::test]
    async fn test_sync_runs_every_track() {
        let queries = numbered_queries(7);
        let fake = Arc::new(FakeDestination::for_queries(&queries).without_match(3));
        let reconciler = Reconciler::new(fake.clone(), NonZeroUsize::new(3).unwrap());
        let source = MockSource::with_tracks(queries);

        let report = sync_playlist(&source, &reconciler, &CancellationToken::new())
            .await
            .unwrap();

        let summary = report.summary();
        assert_eq!(summary.added, 6);
        assert_eq!(summary.not_found, 1);
        assert_eq!(fake.search_calls().len(), 7);
    }

    /// Source whose fetch never completes
    struct StalledSource;

    #[async_trait::async_trait]
    impl SourceCatalog for StalledSource {
        async fn list_playlist_tracks(&self) -> std::result::Result<Vec<TrackQuery>, CatalogError> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_cancel_during_fetch_stops_the_fetch() {
        let fake = Arc::new(FakeDestination::for_queries(&[]));
        let reconciler = Reconciler::new(fake.clone(), NonZeroUsize::new(2).unwrap());
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            trigger.cancel();
        });

        let report = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            sync_playlist(&StalledSource, &reconciler, &cancel),
        )
        .await
        .expect("fetch was not cancelled")
        .unwrap();

        assert!(report.is_empty());
        assert_eq!(report.cancelled, Some(CancelReason::Interrupted));
        assert!(fake.search_calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_playlist() {
        let fake = Arc::new(FakeDestination::for_queries(&[]));
        let reconciler = Reconciler::new(fake, NonZeroUsize::new(2).unwrap());
        let source = MockSource::with_tracks(vec![]);

        let report = sync_playlist(&source, &reconciler, &CancellationToken::new())
            .await
            .unwrap();

        assert!(report.is_empty());
    }
}
