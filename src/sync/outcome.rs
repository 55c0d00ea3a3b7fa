//! Per-track outcomes and the batch report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogError, TrackQuery};

/// Terminal state of one per-track workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Found and added to the library
    Added,
    /// Search succeeded but nothing matched
    NotFound,
    /// The search call itself failed
    SearchFailed,
    /// A match was found but adding it failed
    AddFailed,
}

impl OutcomeStatus {
    pub const ALL: [OutcomeStatus; 4] = [
        OutcomeStatus::Added,
        OutcomeStatus::NotFound,
        OutcomeStatus::SearchFailed,
        OutcomeStatus::AddFailed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::NotFound => "not found",
            Self::SearchFailed => "search failed",
            Self::AddFailed => "add failed",
        }
    }
}

/// What happened to one source track.
///
/// `index` is the track's position in the submitted list, so callers can
/// restore playlist order after the unordered collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub index: usize,
    pub query: TrackQuery,
    pub status: OutcomeStatus,
    /// Matched track ID for `Added`, error message for failures
    pub detail: Option<String>,
}

impl OutcomeRecord {
    pub fn added(index: usize, query: TrackQuery, track_id: impl Into<String>) -> Self {
        Self {
            index,
            query,
            status: OutcomeStatus::Added,
            detail: Some(track_id.into()),
        }
    }

    pub fn not_found(index: usize, query: TrackQuery) -> Self {
        Self {
            index,
            query,
            status: OutcomeStatus::NotFound,
            detail: None,
        }
    }

    pub fn search_failed(index: usize, query: TrackQuery, error: &CatalogError) -> Self {
        Self::failed(index, query, OutcomeStatus::SearchFailed, error.to_string())
    }

    pub fn add_failed(index: usize, query: TrackQuery, error: &CatalogError) -> Self {
        Self::failed(index, query, OutcomeStatus::AddFailed, error.to_string())
    }

    pub(crate) fn failed(
        index: usize,
        query: TrackQuery,
        status: OutcomeStatus,
        reason: String,
    ) -> Self {
        Self {
            index,
            query,
            status,
            detail: Some(reason),
        }
    }
}

/// Why a batch stopped before every track finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    /// The caller's cancellation token fired (e.g. Ctrl-C)
    Interrupted,
    /// The overall deadline elapsed
    DeadlineElapsed,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interrupted => write!(f, "interrupted"),
            Self::DeadlineElapsed => write!(f, "deadline elapsed"),
        }
    }
}

/// Result of one reconciliation batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Number of tracks submitted
    pub total: usize,
    /// One record per finished workflow, in completion order
    pub records: Vec<OutcomeRecord>,
    /// Set when the batch was cancelled before every workflow finished
    pub cancelled: Option<CancelReason>,
}

/// Counts per status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub added: usize,
    pub not_found: usize,
    pub search_failed: usize,
    pub add_failed: usize,
    /// Tracks that never finished because the batch was cancelled
    pub skipped: usize,
}

impl SyncSummary {
    pub fn count(&self, status: OutcomeStatus) -> usize {
        match status {
            OutcomeStatus::Added => self.added,
            OutcomeStatus::NotFound => self.not_found,
            OutcomeStatus::SearchFailed => self.search_failed,
            OutcomeStatus::AddFailed => self.add_failed,
        }
    }
}

impl SyncReport {
    /// Report for an empty input: nothing was scheduled.
    pub fn empty(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: Utc::now(),
            total: 0,
            records: Vec::new(),
            cancelled: None,
        }
    }

    /// True when there was nothing to reconcile (distinct from "nothing found")
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.is_some()
    }

    /// Records sorted back into input order
    pub fn sorted(mut self) -> Self {
        self.records.sort_by_key(|r| r.index);
        self
    }

    pub fn summary(&self) -> SyncSummary {
        let mut summary = SyncSummary {
            skipped: self.total.saturating_sub(self.records.len()),
            ..Default::default()
        };
        for record in &self.records {
            match record.status {
                OutcomeStatus::Added => summary.added += 1,
                OutcomeStatus::NotFound => summary.not_found += 1,
                OutcomeStatus::SearchFailed => summary.search_failed += 1,
                OutcomeStatus::AddFailed => summary.add_failed += 1,
            }
        }
        summary
    }

    /// Every record that didn't end in `Added`
    pub fn failures(&self) -> impl Iterator<Item = &OutcomeRecord> {
        self.records
            .iter()
            .filter(|r| r.status != OutcomeStatus::Added)
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_with(records: Vec<OutcomeRecord>, total: usize) -> SyncReport {
        let now = Utc::now();
        SyncReport {
            started_at: now,
            finished_at: now,
            total,
            records,
            cancelled: None,
        }
    }

    #[test]
    fn test_record_constructors() {
        let q = TrackQuery::new("Queen", "Innuendo");

        let added = OutcomeRecord::added(0, q.clone(), "123");
        assert_eq!(added.status, OutcomeStatus::Added);
        assert_eq!(added.detail.as_deref(), Some("123"));

        let missing = OutcomeRecord::not_found(1, q.clone());
        assert!(missing.detail.is_none());

        let failed = OutcomeRecord::add_failed(2, q, &CatalogError::RateLimited);
        assert_eq!(failed.status, OutcomeStatus::AddFailed);
        assert!(failed.detail.unwrap().contains("Rate limited"));
    }

    #[test]
    fn test_summary_counts() {
        let q = TrackQuery::new("A", "B");
        let report = report_with(
            vec![
                OutcomeRecord::added(0, q.clone(), "1"),
                OutcomeRecord::added(1, q.clone(), "2"),
                OutcomeRecord::not_found(2, q.clone()),
                OutcomeRecord::search_failed(3, q, &CatalogError::Network("reset".into())),
            ],
            6,
        );

        let summary = report.summary();

        assert_eq!(summary.added, 2);
        assert_eq!(summary.not_found, 1);
        assert_eq!(summary.search_failed, 1);
        assert_eq!(summary.add_failed, 0);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.count(OutcomeStatus::Added), 2);
        assert_eq!(report.failures().count(), 2);
    }

    #[test]
    fn test_sorted_restores_input_order() {
        let q = TrackQuery::new("A", "B");
        let report = report_with(
            vec![
                OutcomeRecord::not_found(2, q.clone()),
                OutcomeRecord::not_found(0, q.clone()),
                OutcomeRecord::not_found(1, q),
            ],
            3,
        )
        .sorted();

        let order: Vec<usize> = report.records.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_report() {
        let report = SyncReport::empty(Utc::now());
        assert!(report.is_empty());
        assert!(!report.is_cancelled());
        assert_eq!(report.summary(), SyncSummary::default());
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(OutcomeStatus::NotFound.label(), "not found");
        assert_eq!(OutcomeStatus::AddFailed.label(), "add failed");
    }
}
