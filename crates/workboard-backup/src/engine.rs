//! Scheduler engine: the loop that checks and triggers backup jobs.
//! Uses tokio::interval for ticking (sleeps between checks) and stops on an
//! explicit `Notify` signal.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use tokio::sync::Notify;
use workboard_core::config::BackupConfig;

use crate::jobs::{Job, JobAction};

/// Holds the jobs and decides which are due.
#[derive(Debug, Default)]
pub struct BackupScheduler {
    jobs: Vec<Job>,
}

impl BackupScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard job set: an interval backup (followed by retention cleanup)
    /// and a cron-driven daily cleanup.
    pub fn from_config(config: &BackupConfig, now: NaiveDateTime) -> Self {
        let mut scheduler = Self::new();
        let backup = Job::interval(
            "backup",
            config.backup_interval_secs,
            JobAction::Backup {
                cleanup_after_days: Some(config.retention_days),
            },
            now,
        );
        if !backup.enabled {
            tracing::warn!(
                "⚠️ Backup interval {}s is not schedulable; periodic backup disabled",
                config.backup_interval_secs
            );
        }
        scheduler.add_job(backup);

        let cleanup = Job::cron(
            "cleanup",
            &config.cleanup_cron,
            JobAction::Cleanup {
                retention_days: config.retention_days,
            },
            now,
        );
        if !cleanup.enabled {
            tracing::warn!(
                "⚠️ Cleanup cron '{}' is not schedulable; daily cleanup disabled",
                config.cleanup_cron
            );
        }
        scheduler.add_job(cleanup);
        scheduler
    }

    pub fn add_job(&mut self, job: Job) {
        tracing::debug!("📅 Job added: '{}' ({})", job.name, job.describe_schedule());
        self.jobs.push(job);
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Collect the actions of every due job and advance their schedules.
    pub fn tick(&mut self, now: NaiveDateTime) -> Vec<JobAction> {
        let mut due = Vec::new();
        for job in self.jobs.iter_mut() {
            if !job.is_due(now) {
                continue;
            }
            tracing::debug!("🔔 Job triggered: '{}'", job.name);
            due.push(job.action.clone());
            job.mark_run(now);
        }
        due
    }
}

/// Run the scheduler until `stop` is notified, polling every `poll_interval`.
/// Due actions are handed to `runner` one at a time, in job order.
pub async fn run_scheduler<F, Fut>(
    mut scheduler: BackupScheduler,
    runner: F,
    poll_interval: Duration,
    stop: Arc<Notify>,
) -> BackupScheduler
where
    F: Fn(JobAction) -> Fut,
    Fut: Future<Output = ()>,
{
    tracing::info!(
        "⏰ Backup scheduler started ({} job(s), check every {}s)",
        scheduler.job_count(),
        poll_interval.as_secs()
    );
    for job in scheduler.jobs().iter().filter(|j| j.enabled) {
        tracing::info!("   - {} {}", job.name, job.describe_schedule());
    }

    let mut interval = tokio::time::interval(poll_interval);
    loop {
        tokio::select! {
            _ = stop.notified() => break,
            _ = interval.tick() => {
                for action in scheduler.tick(Local::now().naive_local()) {
                    runner(action).await;
                }
            }
        }
    }

    tracing::info!("📴 Backup scheduler stopped");
    scheduler
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_from_config_defaults() {
        let scheduler = BackupScheduler::from_config(&BackupConfig::default(), at(0, 30));
        assert_eq!(scheduler.job_count(), 2);
        assert_eq!(scheduler.jobs()[0].next_run, Some(at(1, 30)));
        assert_eq!(scheduler.jobs()[1].next_run, Some(at(2, 0)));
    }

    #[test]
    fn test_from_config_with_overflowing_interval() {
        let config = BackupConfig {
            backup_interval_secs: u64::MAX,
            ..BackupConfig::default()
        };
        let mut scheduler = BackupScheduler::from_config(&config, at(0, 30));
        assert!(!scheduler.jobs()[0].enabled);
        assert!(scheduler.jobs()[1].enabled);
        assert_eq!(
            scheduler.tick(at(2, 0)),
            vec![JobAction::Cleanup { retention_days: 30 }]
        );
    }

    #[test]
    fn test_tick_fires_due_jobs_once() {
        let mut scheduler = BackupScheduler::from_config(&BackupConfig::default(), at(0, 30));
        assert!(scheduler.tick(at(1, 0)).is_empty());

        let due = scheduler.tick(at(1, 30));
        assert_eq!(
            due,
            vec![JobAction::Backup { cleanup_after_days: Some(30) }]
        );
        assert!(scheduler.tick(at(1, 31)).is_empty());

        let due = scheduler.tick(at(2, 0));
        assert_eq!(due, vec![JobAction::Cleanup { retention_days: 30 }]);
    }

    #[test]
    fn test_tick_after_long_sleep_fires_each_job_once() {
        let mut scheduler = BackupScheduler::from_config(&BackupConfig::default(), at(0, 30));
        let due = scheduler.tick(at(5, 0));
        assert_eq!(due.len(), 2);
        assert_eq!(scheduler.jobs()[0].next_run, Some(at(6, 0)));
    }

    #[tokio::test]
    async fn test_run_scheduler_stops_on_signal() {
        let mut scheduler = BackupScheduler::new();
        let mut job = Job::interval(
            "now",
            3600,
            JobAction::Cleanup { retention_days: 1 },
            Local::now().naive_local(),
        );
        job.next_run = Some(Local::now().naive_local() - chrono::Duration::seconds(1));
        scheduler.add_job(job);

        let runs = Arc::new(AtomicUsize::new(0));
        let stop = Arc::new(Notify::new());
        let runner = {
            let runs = runs.clone();
            let stop = stop.clone();
            move |_action: JobAction| {
                let runs = runs.clone();
                let stop = stop.clone();
                async move {
                    runs.fetch_add(1, Ordering::SeqCst);
                    stop.notify_one();
                }
            }
        };

        let scheduler = tokio::time::timeout(
            Duration::from_secs(5),
            run_scheduler(scheduler, runner, Duration::from_millis(10), stop),
        )
        .await
        .expect("scheduler should stop");

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.jobs()[0].run_count, 1);
    }
}
