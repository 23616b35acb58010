//! Workboard configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, WorkboardError};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkboardConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub backup: BackupConfig,
}

impl WorkboardConfig {
    /// Load config from the default path (~/.workboard/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| WorkboardError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| WorkboardError::Config(format!("Failed to parse config: {e}")))?;
        Ok(config)
    }

    /// Resolve the config the binaries run with: an explicit path first,
    /// then `$WORKBOARD_CONFIG`, then the default path (or defaults when
    /// that file does not exist). An explicitly named file must exist.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let named = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("WORKBOARD_CONFIG").map(PathBuf::from));
        match named {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => Err(WorkboardError::Config(format!(
                "Config file not found: {}",
                path.display()
            ))),
            None => Self::load(),
        }
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| WorkboardError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the Workboard home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".workboard")
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 { 5000 }
fn default_host() -> String { "127.0.0.1".into() }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl GatewayConfig {
    /// `host:port` string suitable for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where the collections, snapshots and job log live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    WorkboardConfig::home_dir().join("data")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.join("tasks.json")
    }

    pub fn discoveries_file(&self) -> PathBuf {
        self.data_dir.join("discoveries.json")
    }

    /// Directory holding `backup_<timestamp>.json` snapshots.
    pub fn backup_dir(&self) -> PathBuf {
        self.data_dir.join("backups")
    }

    /// Append-only log written by the backup job.
    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("backup.log")
    }
}

/// Backup job configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupConfig {
    /// Base URL of the running workboard server.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
    #[serde(default = "default_backup_interval_secs")]
    pub backup_interval_secs: u64,
    /// 5-field cron expression (local time) for the daily cleanup.
    #[serde(default = "default_cleanup_cron")]
    pub cleanup_cron: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_server_url() -> String { "http://localhost:5000".into() }
fn default_retention_days() -> u32 { 30 }
fn default_backup_interval_secs() -> u64 { 3600 }
fn default_cleanup_cron() -> String { "0 2 * * *".into() }
fn default_poll_interval_secs() -> u64 { 60 }
fn default_request_timeout_secs() -> u64 { 10 }

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            retention_days: default_retention_days(),
            backup_interval_secs: default_backup_interval_secs(),
            cleanup_cron: default_cleanup_cron(),
            poll_interval_secs: default_poll_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WorkboardConfig::default();
        assert_eq!(config.gateway.port, 5000);
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert_eq!(config.backup.retention_days, 30);
        assert_eq!(config.backup.backup_interval_secs, 3600);
        assert_eq!(config.backup.cleanup_cron, "0 2 * * *");
    }

    #[test]
    fn test_config_from_toml() {
        let toml_str = r#"
            [gateway]
            port = 8080

            [storage]
            data_dir = "/srv/workboard"

            [backup]
            server_url = "http://10.0.0.2:8080"
            retention_days = 7
        "#;

        let config: WorkboardConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gateway.port, 8080);
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert_eq!(config.storage.data_dir, PathBuf::from("/srv/workboard"));
        assert_eq!(config.backup.server_url, "http://10.0.0.2:8080");
        assert_eq!(config.backup.retention_days, 7);
        assert_eq!(config.backup.poll_interval_secs, 60);
    }

    #[test]
    fn test_config_missing_fields_use_defaults() {
        let config: WorkboardConfig = toml::from_str("").unwrap();
        assert_eq!(config.gateway.port, 5000);
        assert!(config.storage.data_dir.ends_with("data"));
    }

    #[test]
    fn test_storage_paths() {
        let storage = StorageConfig::new("/tmp/wb");
        assert_eq!(storage.tasks_file(), PathBuf::from("/tmp/wb/tasks.json"));
        assert_eq!(
            storage.discoveries_file(),
            PathBuf::from("/tmp/wb/discoveries.json")
        );
        assert_eq!(storage.backup_dir(), PathBuf::from("/tmp/wb/backups"));
        assert_eq!(storage.log_file(), PathBuf::from("/tmp/wb/backup.log"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = WorkboardConfig::default();
        config.gateway.port = 6123;
        config.save_to(&path).unwrap();

        let loaded = WorkboardConfig::load_from(&path).unwrap();
        assert_eq!(loaded.gateway.port, 6123);
    }

    #[test]
    fn test_load_from_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gateway\nport = ").unwrap();
        let err = WorkboardConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_discover_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gateway]\nport = 7001\n").unwrap();
        let config = WorkboardConfig::discover(Some(&path)).unwrap();
        assert_eq!(config.gateway.port, 7001);

        let missing = dir.path().join("missing.toml");
        assert!(WorkboardConfig::discover(Some(&missing)).is_err());
    }

    #[test]
    fn test_home_dir() {
        let home = WorkboardConfig::home_dir();
        assert!(home.to_string_lossy().contains("workboard"));
    }
}
