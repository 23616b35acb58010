//! Aggregate counters over the stored collections.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::is_truthy;

/// Counters reported by `/api/stats` and the service index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    pub total_tasks: usize,
    /// Stored task records with a truthy `done`. Normalization never
    /// persists `done`, so this only counts files written by other tools.
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub total_discoveries: usize,
    /// Time the report was computed, not the time of the last write.
    pub last_updated: String,
}

impl StatsReport {
    pub fn compute(tasks: &[Value], discoveries: &[Value], now: NaiveDateTime) -> Self {
        let completed_tasks = tasks
            .iter()
            .filter(|t| t.get("done").is_some_and(is_truthy))
            .count();
        Self {
            total_tasks: tasks.len(),
            completed_tasks,
            pending_tasks: tasks.len() - completed_tasks,
            total_discoveries: discoveries.len(),
            last_updated: now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        }
    }
}
