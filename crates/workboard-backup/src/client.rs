//! HTTP client for the running workboard server.
//! Every call fails soft: errors are logged and reported, never propagated.

use std::time::Duration;

use serde_json::Value;
use workboard_core::config::BackupConfig;
use workboard_store::StatsReport;

/// Result of asking the server for a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupOutcome {
    Created { filename: String },
    HttpStatus(u16),
    Unreachable,
    Failed(String),
}

impl BackupOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BackupOutcome::Created { .. })
    }
}

pub struct BackupClient {
    http: reqwest::Client,
    server_url: String,
}

impl BackupClient {
    pub fn new(config: &BackupConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("⚠️ Failed to build HTTP client ({e}), using defaults");
                reqwest::Client::new()
            });
        Self {
            http,
            server_url: config.server_url.trim_end_matches('/').to_string(),
        }
    }

    /// `POST {server}/backup`.
    pub async fn create_backup(&self) -> BackupOutcome {
        let url = format!("{}/backup", self.server_url);
        let outcome = match self.http.post(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                let filename = resp
                    .json::<Value>()
                    .await
                    .ok()
                    .and_then(|v| v["filename"].as_str().map(String::from))
                    .unwrap_or_else(|| "unknown".into());
                BackupOutcome::Created { filename }
            }
            Ok(resp) => BackupOutcome::HttpStatus(resp.status().as_u16()),
            Err(e) if e.is_connect() => BackupOutcome::Unreachable,
            Err(e) => BackupOutcome::Failed(e.to_string()),
        };

        match &outcome {
            BackupOutcome::Created { filename } => tracing::info!("✅ Backup created: {filename}"),
            BackupOutcome::HttpStatus(code) => tracing::error!("❌ Backup failed: HTTP {code}"),
            BackupOutcome::Unreachable => tracing::error!(
                "❌ Cannot reach the server at {}; make sure it is running",
                self.server_url
            ),
            BackupOutcome::Failed(e) => tracing::error!("❌ Backup error: {e}"),
        }
        outcome
    }

    /// `GET {server}/api/stats`, `None` on any failure.
    pub async fn fetch_stats(&self) -> Option<StatsReport> {
        let url = format!("{}/api/stats", self.server_url);
        let resp = match self.http.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => resp,
            Ok(resp) => {
                tracing::debug!("Stats request returned HTTP {}", resp.status());
                return None;
            }
            Err(e) => {
                tracing::debug!("Stats request failed: {e}");
                return None;
            }
        };
        resp.json::<StatsReport>().await.ok()
    }
}
