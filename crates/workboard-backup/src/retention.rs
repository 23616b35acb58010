//! Retention cleanup for `backup_<timestamp>.json` snapshots.

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};
use workboard_core::error::Result;
use workboard_store::snapshot;

/// Outcome of one cleanup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    /// Files matching `backup_*.json` whose date could not be read.
    pub skipped: Vec<PathBuf>,
    pub kept: usize,
}

impl CleanupReport {
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }
}

/// Delete snapshots in `dir` dated before `now - retention_days`.
///
/// The file date is taken at midnight, so with a 30-day window a snapshot
/// from 31 days ago is removed and one from 29 days ago is kept. A missing
/// directory is not an error; neither are malformed names or files that
/// fail to delete (both are logged and left alone).
pub fn cleanup_old_backups(
    dir: &Path,
    retention_days: u32,
    now: NaiveDateTime,
) -> Result<CleanupReport> {
    let mut report = CleanupReport::default();
    // A window reaching past the calendar's start keeps everything.
    let cutoff = Duration::try_days(i64::from(retention_days))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(NaiveDateTime::MIN);

    for path in snapshot::list_backup_files(dir)? {
        let date = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(snapshot::parse_backup_date);
        let Some(file_date) = date else {
            tracing::debug!("Skipping unrecognized backup name: {}", path.display());
            report.skipped.push(path);
            continue;
        };

        if file_date.and_time(chrono::NaiveTime::MIN) < cutoff {
            match std::fs::remove_file(&path) {
                Ok(()) => report.removed.push(path),
                Err(e) => {
                    tracing::warn!("⚠️ Failed to delete {}: {e}", path.display());
                    report.skipped.push(path);
                }
            }
        } else {
            report.kept += 1;
        }
    }

    if !report.removed.is_empty() {
        tracing::info!(
            "🧹 Removed {} backup file(s) older than {} days",
            report.removed.len(),
            retention_days
        );
    }
    Ok(report)
}
