//! Backup snapshot naming: `backup_<YYYYMMDD>_<HHMMSS>.json`.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const BACKUP_PREFIX: &str = "backup_";
pub const BACKUP_SUFFIX: &str = ".json";

/// A snapshot written by [`crate::CollectionStore::create_backup`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupSnapshot {
    pub filename: String,
    pub path: PathBuf,
    pub tasks: usize,
    pub discoveries: usize,
}

/// File name for a snapshot taken at `now`.
pub fn backup_file_name(now: NaiveDateTime) -> String {
    format!(
        "{BACKUP_PREFIX}{}{BACKUP_SUFFIX}",
        now.format("%Y%m%d_%H%M%S")
    )
}

/// File name for the `attempt`-th snapshot taken within the same second:
/// `0` is the plain name, later attempts get a `_<n>` suffix.
pub fn numbered_backup_file_name(now: NaiveDateTime, attempt: u32) -> String {
    if attempt == 0 {
        return backup_file_name(now);
    }
    format!(
        "{BACKUP_PREFIX}{}_{attempt}{BACKUP_SUFFIX}",
        now.format("%Y%m%d_%H%M%S")
    )
}

/// Whether a file name follows the `backup_*.json` convention.
pub fn is_backup_file_name(name: &str) -> bool {
    name.starts_with(BACKUP_PREFIX) && name.ends_with(BACKUP_SUFFIX)
}

/// Date embedded in a snapshot file name. Only the first `_`-separated
/// segment after the prefix is read, so `backup_20260101.json` and
/// `backup_20260101_020000.json` both parse.
pub fn parse_backup_date(name: &str) -> Option<NaiveDate> {
    let stem = name.strip_prefix(BACKUP_PREFIX)?.strip_suffix(BACKUP_SUFFIX)?;
    let digits = stem.split('_').next()?;
    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = digits[0..4].parse().ok()?;
    let month: u32 = digits[4..6].parse().ok()?;
    let day: u32 = digits[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// All `backup_*.json` files in `dir`, sorted by name. A missing directory
/// yields an empty list.
pub fn list_backup_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(is_backup_file_name);
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_format() {
        let now = NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(2, 5, 9)
            .unwrap();
        assert_eq!(backup_file_name(now), "backup_20261016_020509.json");
        assert_eq!(numbered_backup_file_name(now, 0), "backup_20261016_020509.json");
        assert_eq!(numbered_backup_file_name(now, 2), "backup_20261016_020509_2.json");
        assert_eq!(
            parse_backup_date(&numbered_backup_file_name(now, 2)),
            NaiveDate::from_ymd_opt(2026, 10, 16)
        );
    }

    #[test]
    fn test_parse_backup_date() {
        let expected = NaiveDate::from_ymd_opt(2026, 10, 16);
        assert_eq!(parse_backup_date("backup_20261016_020509.json"), expected);
        assert_eq!(parse_backup_date("backup_20261016.json"), expected);
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        assert!(parse_backup_date("backup_latest.json").is_none());
        assert!(parse_backup_date("backup_20261340_000000.json").is_none());
        assert!(parse_backup_date("snapshot_20261016.json").is_none());
        assert!(parse_backup_date("backup_20261016.txt").is_none());
        assert!(parse_backup_date("backup_.json").is_none());
    }

    #[test]
    fn test_list_backup_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("backup_20260102_000000.json"), "{}").unwrap();
        std::fs::write(dir.path().join("backup_20260101_000000.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.json"), "{}").unwrap();

        let files = list_backup_files(dir.path()).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("backup_20260101_000000.json"));

        let missing = dir.path().join("nope");
        assert!(list_backup_files(&missing).unwrap().is_empty());
    }
}
