//! Rendering and saving sync reports.

use std::fmt;
use std::path::Path;

use super::outcome::{OutcomeStatus, SyncReport};
use crate::error::{Error, Result, ResultExt};

/// Human-readable summary: counts per status, then every track that wasn't added.
pub fn render_text(report: &SyncReport) -> String {
    TextReport(report).to_string()
}

struct TextReport<'a>(&'a SyncReport);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        let summary = report.summary();

        writeln!(
            f,
            "Processed {} of {} track(s) in {:.1}s",
            report.records.len(),
            report.total,
            report.duration().num_milliseconds() as f64 / 1000.0
        )?;
        for status in OutcomeStatus::ALL {
            writeln!(f, "  {:<14} {}", status.label(), summary.count(status))?;
        }
        if summary.skipped > 0 {
            writeln!(f, "  {:<14} {}", "skipped", summary.skipped)?;
        }
        if let Some(reason) = report.cancelled {
            writeln!(f, "Cancelled: {}", reason)?;
        }

        let mut failures: Vec<_> = report.failures().collect();
        if failures.is_empty() {
            return Ok(());
        }
        failures.sort_by_key(|r| r.index);
        writeln!(f)?;
        writeln!(f, "Not added:")?;
        for record in failures {
            write!(
                f,
                "  [{}] {} ({})",
                record.index + 1,
                record.query,
                record.status.label()
            )?;
            match record.detail {
                Some(ref reason) => writeln!(f, ": {}", reason)?,
                None => writeln!(f)?,
            }
        }
        Ok(())
    }
}

/// Write the report as pretty JSON, records in input order
pub fn write_json(report: &SyncReport, path: &Path) -> Result<()> {
    let sorted = report.clone().sorted();

    let json = serde_json::to_string_pretty(&sorted)?;
    std::fs::write(path, json).with_context(format!("writing report to {}", path.display()))?;

    tracing::info!("Wrote sync report to {:?}", path);
    Ok(())
}

/// Read a report written by [`write_json`]
pub fn read_json(path: &Path) -> Result<SyncReport> {
    let json = std::fs::read_to_string(path)
        .with_context(format!("reading report {}", path.display()))?;
    serde_json::from_str(&json).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, TrackQuery};
    use crate::sync::outcome::{CancelReason, OutcomeRecord};
    use chrono::Utc;

    fn sample_report() -> SyncReport {
        let now = Utc::now();
        SyncReport {
            started_at: now,
            finished_at: now,
            total: 4,
            records: vec![
                OutcomeRecord::add_failed(
                    2,
                    TrackQuery::new("Queen", "Innuendo"),
                    &CatalogError::RateLimited,
                ),
                OutcomeRecord::added(0, TrackQuery::new("Кино", "Кукушка"), "42"),
                OutcomeRecord::not_found(1, TrackQuery::new("Nobody", "Nothing")),
            ],
            cancelled: Some(CancelReason::Interrupted),
        }
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&sample_report());

        assert!(text.contains("Processed 3 of 4 track(s)"));
        assert!(text.contains("added          1"));
        assert!(text.contains("skipped        1"));
        assert!(text.contains("Cancelled: interrupted"));
        assert!(text.contains("[2] Nobody - Nothing (not found)"));
        assert!(text.contains("[3] Queen - Innuendo (add failed): Rate limited"));
        // Failures listed in playlist order
        assert!(text.find("[2]").unwrap() < text.find("[3]").unwrap());
    }

    #[test]
    fn test_render_text_all_added() {
        let now = Utc::now();
        let report = SyncReport {
            started_at: now,
            finished_at: now,
            total: 1,
            records: vec![OutcomeRecord::added(0, TrackQuery::new("Кино", "Кукушка"), "42")],
            cancelled: None,
        };

        let text = render_text(&report);

        assert!(text.starts_with("Processed 1 of 1 track(s)"));
        assert!(text.contains("add failed     0\n"));
        assert!(!text.contains("Not added"));
        assert!(!text.contains("skipped"));
    }

    #[test]
    fn test_json_roundtrip_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        write_json(&sample_report(), &path).unwrap();
        let loaded = read_json(&path).unwrap();

        let order: Vec<usize> = loaded.records.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
        assert_eq!(loaded.cancelled, Some(CancelReason::Interrupted));
        assert_eq!(loaded.records[0].status, OutcomeStatus::Added);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"status\": \"add_failed\""));
    }

    #[test]
    fn test_write_json_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.json");
        let err = write_json(&sample_report(), &path).unwrap_err();
        assert!(err.to_string().contains("writing report"));
    }
}
