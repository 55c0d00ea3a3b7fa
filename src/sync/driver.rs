//! Reconciliation driver - bounded fan-out of per-track workflows.
//!
//! Every track gets its own task running search -> add against the
//! destination catalog. A semaphore caps how many run at once; the join loop
//! below is the single collector of outcomes.
//!
//! Failures never escape a workflow: they become `SearchFailed`/`AddFailed`
//! records and the batch carries on. Nothing is retried.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::outcome::{CancelReason, OutcomeRecord, OutcomeStatus, SyncReport};
use crate::catalog::{DestinationCatalog, TrackQuery};

/// Log progress every this many finished tracks
const PROGRESS_EVERY: usize = 10;

/// Runs batches of per-track workflows against one destination catalog
pub struct Reconciler {
    destination: Arc<dyn DestinationCatalog>,
    max_concurrency: NonZeroUsize,
    deadline: Option<Duration>,
}

impl Reconciler {
    pub fn new(destination: Arc<dyn DestinationCatalog>, max_concurrency: NonZeroUsize) -> Self {
        Self {
            destination,
            max_concurrency,
            deadline: None,
        }
    }

    /// Cancel the batch if it's still running after `deadline`
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn max_concurrency(&self) -> NonZeroUsize {
        self.max_concurrency
    }

    /// Run one workflow per query and collect their outcomes.
    ///
    /// Returns once every workflow has finished, or as soon as `cancel` fires
    /// (or the deadline passes). On cancellation in-flight workflows are
    /// dropped, queued ones never start, and the report keeps whatever had
    /// already finished.
    pub async fn reconcile(
        &self,
        queries: Vec<TrackQuery>,
        cancel: &CancellationToken,
    ) -> SyncReport {
        let started_at = Utc::now();
        let total = queries.len();
        if total == 0 {
            info!("No tracks to reconcile");
            return SyncReport::empty(started_at);
        }

        info!(
            tracks = total,
            max_concurrency = self.max_concurrency.get(),
            "Starting reconciliation"
        );

        // Child token: the deadline cancels this batch, never the caller's token
        let batch = cancel.child_token();
        let timer = self.deadline.map(|deadline| spawn_deadline(deadline, batch.clone()));

        let gate = Arc::new(Semaphore::new(self.max_concurrency.get()));
        let mut tasks = JoinSet::new();
        for (index, query) in queries.iter().cloned().enumerate() {
            let destination = Arc::clone(&self.destination);
            let gate = Arc::clone(&gate);
            let batch = batch.clone();

            tasks.spawn(async move {
                let permit = tokio::select! {
                    biased;
                    _ = batch.cancelled() => None,
                    permit = gate.acquire_owned() => permit.ok(),
                };
                let Some(_permit) = permit else {
                    return None;
                };
                if batch.is_cancelled() {
                    return None;
                }

                tokio::select! {
                    biased;
                    _ = batch.cancelled() => {
                        debug!(index, "Workflow aborted by cancellation");
                        None
                    }
                    record = run_workflow(destination.as_ref(), index, query) => Some(record),
                }
            });
        }

        let mut finished = vec![false; total];
        let mut records = Vec::with_capacity(total);
        let mut task_errors = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(record)) => {
                    finished[record.index] = true;
                    records.push(record);
                    if records.len() % PROGRESS_EVERY == 0 {
                        info!("Reconciled {}/{} tracks", records.len(), total);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Workflow task failed: {}", e);
                    task_errors.push(e.to_string());
                }
            }
        }

        if let Some(timer) = timer {
            timer.abort();
        }

        let cancelled = if records.len() < total && batch.is_cancelled() {
            Some(if cancel.is_cancelled() {
                CancelReason::Interrupted
            } else {
                CancelReason::DeadlineElapsed
            })
        } else {
            None
        };

        // A panicking workflow still owes its track an outcome
        if cancelled.is_none() && !task_errors.is_empty() {
            let reason = format!("workflow aborted: {}", task_errors.join("; "));
            for (index, query) in queries.into_iter().enumerate() {
                if !finished[index] {
                    records.push(OutcomeRecord::failed(
                        index,
                        query,
                        OutcomeStatus::SearchFailed,
                        reason.clone(),
                    ));
                }
            }
        }

        let report = SyncReport {
            started_at,
            finished_at: Utc::now(),
            total,
            records,
            cancelled,
        };

        let summary = report.summary();
        match report.cancelled {
            Some(reason) => warn!(
                %reason,
                finished = report.records.len(),
                total,
                "Reconciliation cancelled"
            ),
            None => info!(
                added = summary.added,
                not_found = summary.not_found,
                search_failed = summary.search_failed,
                add_failed = summary.add_failed,
                "Reconciliation finished"
            ),
        }

        report
    }
}

/// Cancel `batch` once `deadline` has passed, unless it finishes first
fn spawn_deadline(deadline: Duration, batch: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = tokio::time::sleep(deadline) => {
                warn!(?deadline, "Deadline elapsed, cancelling remaining tracks");
                batch.cancel();
            }
            _ = batch.cancelled() => {}
        }
    })
}

/// Search, then add if something matched. Always yields exactly one record.
async fn run_workflow(
    destination: &dyn DestinationCatalog,
    index: usize,
    query: TrackQuery,
) -> OutcomeRecord {
    let text = query.search_text();

    let matched = match destination.search_one(&text).await {
        Ok(matched) => matched,
        Err(e) => {
            warn!(index, track = %query, transient = e.is_transient(), "Search failed: {}", e);
            return OutcomeRecord::search_failed(index, query, &e);
        }
    };

    let Some(track_id) = matched.track_id else {
        debug!(index, track = %query, "Not found in catalog");
        return OutcomeRecord::not_found(index, query);
    };

    match destination.add_to_library(&track_id).await {
        Ok(()) => {
            debug!(index, track = %query, %track_id, "Added");
            OutcomeRecord::added(index, query, track_id)
        }
        Err(e) => {
            warn!(index, track = %query, %track_id, transient = e.is_transient(), "Add failed: {}", e);
            OutcomeRecord::add_failed(index, query, &e)
        }
    }
}
