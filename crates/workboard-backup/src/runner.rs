//! The backup job: ties the HTTP client and retention cleanup together.

use std::path::{Path, PathBuf};

use chrono::Local;
use workboard_core::config::WorkboardConfig;
use workboard_store::{StatsReport, snapshot};

use crate::client::BackupClient;
use crate::jobs::JobAction;
use crate::retention::{self, CleanupReport};

pub struct BackupJob {
    client: BackupClient,
    backup_dir: PathBuf,
}

impl BackupJob {
    pub fn new(config: &WorkboardConfig) -> Self {
        Self {
            client: BackupClient::new(&config.backup),
            backup_dir: config.storage.backup_dir(),
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Trigger one snapshot on the server. `true` on success.
    pub async fn backup(&self) -> bool {
        self.client.create_backup().await.is_success()
    }

    /// Prune local snapshots older than `retention_days`. Errors are logged.
    pub fn cleanup(&self, retention_days: u32) -> CleanupReport {
        match retention::cleanup_old_backups(
            &self.backup_dir,
            retention_days,
            Local::now().naive_local(),
        ) {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(
                    "❌ Cleanup of {} failed: {e}",
                    self.backup_dir.display()
                );
                CleanupReport::default()
            }
        }
    }

    /// Backup followed by cleanup when the backup succeeded.
    pub async fn scheduled_backup(&self, cleanup_after_days: Option<u32>) -> bool {
        tracing::info!("🕐 Starting scheduled backup...");
        if self.backup().await {
            if let Some(days) = cleanup_after_days {
                self.cleanup(days);
            }
            tracing::info!("✅ Scheduled backup finished");
            true
        } else {
            tracing::error!("❌ Scheduled backup failed");
            false
        }
    }

    /// Execute a scheduler action.
    pub async fn run(&self, action: JobAction) {
        match action {
            JobAction::Backup { cleanup_after_days } => {
                self.scheduled_backup(cleanup_after_days).await;
            }
            JobAction::Cleanup { retention_days } => {
                self.cleanup(retention_days);
            }
        }
    }

    /// Server counters plus the number of local snapshots.
    pub async fn stats(&self) -> Option<(StatsReport, usize)> {
        let stats = self.client.fetch_stats().await?;
        let backups = snapshot::list_backup_files(&self.backup_dir)
            .map(|files| files.len())
            .unwrap_or(0);
        Some((stats, backups))
    }
}
