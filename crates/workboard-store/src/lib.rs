//! # Workboard Store
//!
//! Flat-file persistence for the two collections (tasks, discoveries).
//!
//! ```text
//! data/
//!   ├── tasks.json          [{"text": "...", "date": "YYYY-MM-DD"}, ...]
//!   ├── discoveries.json    same shape
//!   └── backups/
//!         └── backup_YYYYMMDD_HHMMSS.json
//! ```
//!
//! Writes normalize every record down to `text` + `date` and replace the
//! whole file. Reads never fail: a missing or corrupt file reads as `[]`.

pub mod record;
pub mod snapshot;
pub mod stats;
pub mod store;

pub use record::{Collection, Record, normalize_record, normalize_records};
pub use snapshot::BackupSnapshot;
pub use stats::StatsReport;
pub use store::CollectionStore;
