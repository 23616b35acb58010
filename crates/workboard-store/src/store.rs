//! File-based collection store.
//! Each collection is one pretty-printed JSON array on disk, replaced
//! wholesale on every write. No locking: the last writer wins.

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde_json::Value;
use workboard_core::config::StorageConfig;
use workboard_core::error::Result;

use crate::record::{self, Collection, Record};
use crate::snapshot::{self, BackupSnapshot};

const MAX_SNAPSHOTS_PER_SECOND: u32 = 1000;

/// Create a snapshot file that does not exist yet. Snapshots taken within the
/// same second get numbered names instead of overwriting each other.
fn write_new_snapshot(dir: &Path, now: NaiveDateTime, content: &[u8]) -> Result<(String, PathBuf)> {
    let mut attempt = 0;
    loop {
        let filename = snapshot::numbered_backup_file_name(now, attempt);
        let path = dir.join(&filename);
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(mut file) => {
                file.write_all(content)?;
                return Ok((filename, path));
            }
            Err(e)
                if e.kind() == std::io::ErrorKind::AlreadyExists
                    && attempt < MAX_SNAPSHOTS_PER_SECOND =>
            {
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Reads and writes the task and discovery collections.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    config: StorageConfig,
}

impl CollectionStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Backing file of a collection.
    pub fn path_for(&self, collection: Collection) -> PathBuf {
        match collection {
            Collection::Tasks => self.config.tasks_file(),
            Collection::Discoveries => self.config.discoveries_file(),
        }
    }

    /// Create the data directory and an empty array file for every
    /// collection that does not exist yet.
    pub fn init(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config.data_dir)?;
        for collection in Collection::ALL {
            let file = self.path_for(collection);
            if !file.exists() {
                write_json_array(&file, &Vec::<Record>::new())?;
                tracing::info!("📄 Created empty {} at {}", collection, file.display());
            }
        }
        Ok(())
    }

    /// Load a collection exactly as stored. Missing, unreadable or
    /// malformed files read as an empty collection.
    pub fn read(&self, collection: Collection) -> Vec<Value> {
        let file = self.path_for(collection);
        if !file.exists() {
            return Vec::new();
        }
        match std::fs::read_to_string(&file) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("⚠️ Failed to parse {}: {e}", file.display());
                Vec::new()
            }),
            Err(e) => {
                tracing::warn!("⚠️ Failed to read {}: {e}", file.display());
                Vec::new()
            }
        }
    }

    /// Normalize `values` and overwrite the collection with the result.
    pub fn write(&self, collection: Collection, values: &[Value]) -> Result<Vec<Record>> {
        self.write_as_of(collection, values, &record::today())
    }

    /// Same as [`write`](Self::write) with an explicit default date.
    pub fn write_as_of(
        &self,
        collection: Collection,
        values: &[Value],
        today: &str,
    ) -> Result<Vec<Record>> {
        let records = record::normalize_records(values, today);
        let file = self.path_for(collection);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent)?;
        }
        write_json_array(&file, &records)?;
        tracing::debug!(
            "💾 Saved {} {} ({} submitted) to {}",
            records.len(),
            collection,
            values.len(),
            file.display()
        );
        Ok(records)
    }

    /// Write a `backup_<timestamp>.json` snapshot of both collections.
    pub fn create_backup(&self, now: NaiveDateTime) -> Result<BackupSnapshot> {
        let dir = self.config.backup_dir();
        std::fs::create_dir_all(&dir)?;

        let tasks = self.read(Collection::Tasks);
        let discoveries = self.read(Collection::Discoveries);
        let body = serde_json::json!({
            "created_at": now.format("%Y-%m-%dT%H:%M:%S").to_string(),
            "tasks": tasks,
            "discoveries": discoveries,
        });
        let content = serde_json::to_string_pretty(&body)?;
        let (filename, path) = write_new_snapshot(&dir, now, content.as_bytes())?;
        tracing::info!(
            "🗄️ Backup written: {} ({} tasks, {} discoveries)",
            filename,
            tasks.len(),
            discoveries.len()
        );

        Ok(BackupSnapshot {
            filename,
            path,
            tasks: tasks.len(),
            discoveries: discoveries.len(),
        })
    }
}

fn write_json_array<T: serde::Serialize>(file: &Path, items: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(items)?;
    std::fs::write(file, json)?;
    Ok(())
}
