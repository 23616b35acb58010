//! # Workboard Backup
//!
//! Companion process for the workboard server: asks it for snapshots on a
//! schedule and prunes old ones from the backup directory. It shares no
//! memory with the server, only the files and the HTTP interface.
//!
//! ```text
//! BackupScheduler (tokio interval, 60s)
//!   ├── backup   every hour  → POST /backup → cleanup(retention)
//!   └── cleanup  "0 2 * * *" → delete backup_*.json older than retention
//! ```

pub mod client;
pub mod cron;
pub mod engine;
pub mod jobs;
pub mod retention;
pub mod runner;

pub use client::{BackupClient, BackupOutcome};
pub use engine::{BackupScheduler, run_scheduler};
pub use jobs::{Job, JobAction, JobSchedule};
pub use retention::{CleanupReport, cleanup_old_backups};
pub use runner::BackupJob;
