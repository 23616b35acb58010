//! Job definitions for the backup scheduler.

use chrono::{Duration, NaiveDateTime};

use crate::cron;

/// What a job does when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobAction {
    /// Ask the server for a snapshot; on success prune snapshots older than
    /// `cleanup_after_days`, if set.
    Backup { cleanup_after_days: Option<u32> },
    /// Prune snapshots older than `retention_days`.
    Cleanup { retention_days: u32 },
}

/// How/when the job triggers. Times are local wall-clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSchedule {
    Interval { every_secs: u64 },
    Cron { expression: String },
}

#[derive(Debug, Clone)]
pub struct Job {
    pub name: String,
    pub action: JobAction,
    pub schedule: JobSchedule,
    pub last_run: Option<NaiveDateTime>,
    pub next_run: Option<NaiveDateTime>,
    pub run_count: u32,
    pub enabled: bool,
}

fn after_interval(now: NaiveDateTime, every_secs: u64) -> Option<NaiveDateTime> {
    let secs = i64::try_from(every_secs).ok()?;
    now.checked_add_signed(Duration::try_seconds(secs)?)
}

impl Job {
    /// Recurring job; the first run is one interval after `now`. An interval
    /// that overflows the calendar leaves the job disabled.
    pub fn interval(name: &str, every_secs: u64, action: JobAction, now: NaiveDateTime) -> Self {
        let next_run = after_interval(now, every_secs);
        Self {
            name: name.to_string(),
            action,
            schedule: JobSchedule::Interval { every_secs },
            last_run: None,
            next_run,
            run_count: 0,
            enabled: next_run.is_some(),
        }
    }

    /// Cron-scheduled job. An unparsable expression leaves the job disabled.
    pub fn cron(name: &str, expression: &str, action: JobAction, now: NaiveDateTime) -> Self {
        let next_run = cron::next_run_from_cron(expression, now);
        Self {
            name: name.to_string(),
            action,
            schedule: JobSchedule::Cron {
                expression: expression.to_string(),
            },
            last_run: None,
            next_run,
            run_count: 0,
            enabled: next_run.is_some(),
        }
    }

    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        self.enabled && self.next_run.is_some_and(|next| now >= next)
    }

    /// Record a run at `now` and compute the next one.
    pub(crate) fn mark_run(&mut self, now: NaiveDateTime) {
        self.last_run = Some(now);
        self.run_count += 1;
        self.next_run = match &self.schedule {
            JobSchedule::Interval { every_secs } => after_interval(now, *every_secs),
            JobSchedule::Cron { expression } => cron::next_run_from_cron(expression, now),
        };
        if self.next_run.is_none() {
            self.enabled = false;
        }
    }

    /// Human-readable schedule, e.g. "every 3600s" or "cron '0 2 * * *'".
    pub fn describe_schedule(&self) -> String {
        match &self.schedule {
            JobSchedule::Interval { every_secs } => format!("every {every_secs}s"),
            JobSchedule::Cron { expression } => format!("cron '{expression}'"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_interval_job_first_run_after_one_period() {
        let job = Job::interval(
            "backup",
            3600,
            JobAction::Backup { cleanup_after_days: Some(30) },
            at(10, 0),
        );
        assert!(!job.is_due(at(10, 59)));
        assert!(job.is_due(at(11, 0)));
    }

    #[test]
    fn test_mark_run_advances() {
        let mut job = Job::cron(
            "cleanup",
            "0 2 * * *",
            JobAction::Cleanup { retention_days: 30 },
            at(1, 0),
        );
        assert_eq!(job.next_run, Some(at(2, 0)));
        job.mark_run(at(2, 0));
        assert_eq!(job.run_count, 1);
        assert_eq!(job.last_run, Some(at(2, 0)));
        assert_eq!(
            job.next_run.unwrap().date(),
            NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
        );
    }

    #[test]
    fn test_overflowing_interval_disables_job() {
        for every_secs in [u64::MAX, i64::MAX as u64] {
            let job = Job::interval(
                "backup",
                every_secs,
                JobAction::Backup { cleanup_after_days: None },
                at(0, 0),
            );
            assert!(!job.enabled);
            assert!(job.next_run.is_none());
        }

        let mut job = Job::interval(
            "backup",
            3600,
            JobAction::Backup { cleanup_after_days: None },
            NaiveDateTime::MAX - Duration::hours(2),
        );
        assert!(job.enabled);
        job.mark_run(NaiveDateTime::MAX - Duration::minutes(30));
        assert!(!job.enabled);
        assert!(job.next_run.is_none());
    }

    #[test]
    fn test_invalid_cron_disables_job() {
        let job = Job::cron(
            "broken",
            "whenever",
            JobAction::Cleanup { retention_days: 1 },
            at(0, 0),
        );
        assert!(!job.enabled);
        assert!(!job.is_due(at(23, 59)));
    }
}
