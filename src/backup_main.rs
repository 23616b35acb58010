//! # Workboard Backup — scheduled snapshots & retention
//!
//! Usage:
//!   workboard-backup --schedule      # Hourly backups, daily cleanup at 02:00
//!   workboard-backup --backup        # Back up now
//!   workboard-backup --stats         # Show server statistics
//!   workboard-backup --cleanup 7     # Delete backups older than 7 days

use anyhow::Result;
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};
use workboard_backup::{BackupJob, BackupScheduler, run_scheduler};
use workboard_core::WorkboardConfig;

const LOG_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MAX_POLL_SECS: u64 = 24 * 60 * 60;

#[derive(Parser)]
#[command(
    name = "workboard-backup",
    version,
    about = "🗄️ Workboard automatic backup tool"
)]
struct Cli {
    /// Run the backup scheduler until Ctrl+C
    #[arg(long)]
    schedule: bool,

    /// Create one backup now
    #[arg(long)]
    backup: bool,

    /// Show server statistics
    #[arg(long)]
    stats: bool,

    /// Delete backups older than DAYS days
    #[arg(long, value_name = "DAYS")]
    cleanup: Option<u32>,

    /// Config file (defaults to $WORKBOARD_CONFIG or ~/.workboard/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Server base URL (overrides config)
    #[arg(long)]
    server_url: Option<String>,

    /// Data directory holding backups/ and backup.log (overrides config)
    #[arg(long)]
    data_dir: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).to_string())
}

/// Console output plus an ANSI-free copy appended to `log_file`.
fn init_logging(verbose: bool, log_file: &Path) {
    let filter = if verbose {
        "workboard=debug"
    } else {
        "workboard=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let console = fmt::layer()
        .with_target(false)
        .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()));
    let registry = tracing_subscriber::registry().with(filter).with(console);

    let opened = log_file
        .parent()
        .map(std::fs::create_dir_all)
        .transpose()
        .and_then(|_| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)
        });
    match opened {
        Ok(file) => {
            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_timer(ChronoLocal::new(LOG_TIME_FORMAT.to_string()))
                .with_writer(Mutex::new(file));
            registry.with(file_layer).init();
        }
        Err(e) => {
            registry.init();
            tracing::warn!("⚠️ Cannot open log file {}: {e}", log_file.display());
        }
    }
}

async fn show_stats(job: &BackupJob) {
    match job.stats().await {
        Some((stats, backups)) => {
            println!("\n📊 Statistics:");
            println!("   Total tasks:       {}", stats.total_tasks);
            println!("   Completed tasks:   {}", stats.completed_tasks);
            println!("   Pending tasks:     {}", stats.pending_tasks);
            println!("   Total discoveries: {}", stats.total_discoveries);
            println!("   Last updated:      {}", stats.last_updated);
            println!("   Backup files:      {backups}");
        }
        None => println!("❌ Could not fetch statistics; check that the server is running"),
    }
}

async fn run_schedule(job: BackupJob, config: &WorkboardConfig) {
    let scheduler = BackupScheduler::from_config(&config.backup, chrono::Local::now().naive_local());
    let stop = Arc::new(tokio::sync::Notify::new());

    let stop_on_ctrl_c = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stop_on_ctrl_c.notify_one();
        }
    });

    tracing::info!("🚀 Automatic backup service starting, press Ctrl+C to stop");
    let job = Arc::new(job);
    run_scheduler(
        scheduler,
        |action| {
            let job = job.clone();
            async move { job.run(action).await }
        },
        Duration::from_secs(config.backup.poll_interval_secs.clamp(1, MAX_POLL_SECS)),
        stop,
    )
    .await;
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.as_deref().map(expand_path);
    let mut config = WorkboardConfig::discover(config_path.as_deref())?;
    if let Some(url) = cli.server_url.clone() {
        config.backup.server_url = url;
    }
    config.storage.data_dir = match cli.data_dir.as_deref() {
        Some(dir) => expand_path(dir),
        None => expand_path(&config.storage.data_dir.to_string_lossy()),
    };

    init_logging(cli.verbose, &config.storage.log_file());
    let job = BackupJob::new(&config);

    if cli.schedule {
        run_schedule(job, &config).await;
    } else if cli.backup {
        println!("🔄 Creating backup...");
        if job.backup().await {
            println!("✅ Backup complete");
        } else {
            println!("❌ Backup failed");
            std::process::exit(1);
        }
    } else if cli.stats {
        show_stats(&job).await;
    } else if let Some(days) = cli.cleanup {
        println!("🧹 Removing backups older than {days} days...");
        let report = job.cleanup(days);
        println!(
            "✅ Cleanup complete ({} removed, {} kept)",
            report.removed_count(),
            report.kept
        );
    } else {
        Cli::command().print_help()?;
        println!("\n💡 Examples:");
        println!("   workboard-backup --backup     # back up now");
        println!("   workboard-backup --schedule   # start scheduled backups");
        println!("   workboard-backup --stats      # show statistics");
    }

    Ok(())
}
