//! # Workboard — tasks & discoveries sync server
//!
//! Persists the frontend's two collections as JSON files and serves the
//! sync API.
//!
//! Usage:
//!   workboard                          # Listen on 127.0.0.1:5000
//!   workboard --port 8080              # Custom port
//!   workboard --data-dir ~/board-data  # Custom data directory

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use workboard_core::WorkboardConfig;

#[derive(Parser)]
#[command(
    name = "workboard",
    version,
    about = "📋 Workboard — tasks & discoveries data server"
)]
struct Cli {
    /// Config file (defaults to $WORKBOARD_CONFIG or ~/.workboard/config.toml)
    #[arg(short, long)]
    config: Option<String>,

    /// Listen host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Listen port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Data directory holding tasks.json and discoveries.json
    #[arg(long)]
    data_dir: Option<String>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn expand_path(p: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(p).to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "workboard=debug,tower_http=debug"
    } else {
        "workboard=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    let config_path = cli.config.as_deref().map(expand_path);
    let mut config = WorkboardConfig::discover(config_path.as_deref())?;
    if let Some(host) = cli.host {
        config.gateway.host = host;
    }
    if let Some(port) = cli.port {
        config.gateway.port = port;
    }
    if let Some(dir) = cli.data_dir.as_deref() {
        config.storage.data_dir = expand_path(dir);
    } else {
        config.storage.data_dir = expand_path(&config.storage.data_dir.to_string_lossy());
    }

    tracing::info!("🚀 Workboard v{} starting", env!("CARGO_PKG_VERSION"));
    workboard_gateway::start(&config).await
}
