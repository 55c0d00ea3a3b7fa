//! Playlist sync command.

use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::catalog::{AppleMusicClient, YandexMusicClient, http};
use crate::config::Config;
use crate::sync::{self, Reconciler, SyncReport, report};

/// Copy every track of the configured playlist into the library
pub fn cmd_sync(rt: &Runtime, config: &Config, report_path: Option<&Path>) -> anyhow::Result<()> {
    let yandex_config = config.yandex_music()?;
    let apple_config = config.apple_music(true)?;
    let max_concurrency = config.max_concurrency()?;

    // One connection pool for both services
    let http_client = http::build_http_client(config.request_timeout())?;
    let source = YandexMusicClient::new(yandex_config, http_client.clone());
    let destination = Arc::new(AppleMusicClient::new(apple_config, http_client));

    let mut reconciler = Reconciler::new(destination, max_concurrency);
    if let Some(deadline) = config.deadline() {
        reconciler = reconciler.with_deadline(deadline);
    }

    tracing::debug!(
        max_concurrency = reconciler.max_concurrency().get(),
        deadline = ?config.deadline(),
        "Sync settings"
    );

    let report = rt.block_on(async {
        let cancel = CancellationToken::new();
        let watcher = tokio::spawn(cancel_on_ctrl_c(cancel.clone()));

        let result = sync::sync_playlist(&source, &reconciler, &cancel).await;
        watcher.abort();
        result
    })?;

    finish(&report, report_path)
}

async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            eprintln!("\nInterrupted - waiting for running tracks to stop...");
            cancel.cancel();
        }
        Err(e) => tracing::warn!("Could not listen for Ctrl-C: {}", e),
    }
}

/// Print the summary, save the report, and turn an unfinished run into an error.
fn finish(report: &SyncReport, report_path: Option<&Path>) -> anyhow::Result<()> {
    if report.is_empty() {
        if report.is_cancelled() {
            anyhow::bail!("sync interrupted before the playlist was fetched");
        }
        anyhow::bail!("the source playlist has no tracks");
    }

    print!("{}", report::render_text(report));

    if let Some(path) = report_path {
        report::write_json(report, path)?;
        println!("\nReport saved to {}", path.display());
    }

    if let Some(reason) = report.cancelled {
        anyhow::bail!(
            "sync stopped early ({}): {} of {} track(s) processed",
            reason,
            report.records.len(),
            report.total
        );
    }

    Ok(())
}
