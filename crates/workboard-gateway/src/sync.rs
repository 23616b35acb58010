//! Decoding of the frontend's bulk sync payload.
//!
//! The frontend sends each collection either as the raw localStorage string
//! (JSON-encoded array) or as an already-parsed array. A collection that is
//! absent or empty (`null`, `""`, `[]`, `"[]"`, `"null"`) is left untouched:
//! the frontend sends `[]` whenever its localStorage slot is empty.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use workboard_core::error::{Result, WorkboardError};
use workboard_store::{Collection, CollectionStore};

/// One collection as submitted by the frontend.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CollectionPayload {
    /// localStorage-style JSON string, e.g. `"[{\"text\":\"a\"}]"`.
    Encoded(String),
    Records(Vec<Value>),
}

impl CollectionPayload {
    /// `Ok(None)` means "no change requested".
    pub fn decode(self, collection: Collection) -> Result<Option<Vec<Value>>> {
        match self {
            CollectionPayload::Records(records) if records.is_empty() => Ok(None),
            CollectionPayload::Records(records) => Ok(Some(records)),
            CollectionPayload::Encoded(raw) if raw.trim().is_empty() => Ok(None),
            CollectionPayload::Encoded(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Null) => Ok(None),
                Ok(Value::Array(records)) if records.is_empty() => Ok(None),
                Ok(Value::Array(records)) => Ok(Some(records)),
                Ok(_) => Err(WorkboardError::InvalidPayload(format!(
                    "'{collection}' must encode a JSON array"
                ))),
                Err(e) => Err(WorkboardError::InvalidPayload(format!(
                    "'{collection}' is not valid JSON: {e}"
                ))),
            },
        }
    }
}

/// Body of `POST /api/sync`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncPayload {
    #[serde(default)]
    pub tasks: Option<CollectionPayload>,
    #[serde(default)]
    pub discoveries: Option<CollectionPayload>,
}

impl SyncPayload {
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).map_err(|e| {
            WorkboardError::InvalidPayload(format!("request body is not a sync object: {e}"))
        })
    }

    /// Decode both collections up front so a bad field never causes a
    /// half-applied sync.
    pub fn decode(self) -> Result<SyncPlan> {
        let tasks = match self.tasks {
            Some(p) => p.decode(Collection::Tasks)?,
            None => None,
        };
        let discoveries = match self.discoveries {
            Some(p) => p.decode(Collection::Discoveries)?,
            None => None,
        };
        Ok(SyncPlan { tasks, discoveries })
    }
}

/// Fully decoded sync request. `None` entries are skipped.
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    pub tasks: Option<Vec<Value>>,
    pub discoveries: Option<Vec<Value>>,
}

/// Submitted lengths per collection; 0 for collections left untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncCounts {
    pub tasks: usize,
    pub discoveries: usize,
}

impl SyncPlan {
    pub fn apply(&self, store: &CollectionStore) -> Result<SyncCounts> {
        let mut counts = SyncCounts::default();
        if let Some(tasks) = &self.tasks {
            store.write(Collection::Tasks, tasks)?;
            counts.tasks = tasks.len();
        }
        if let Some(discoveries) = &self.discoveries {
            store.write(Collection::Discoveries, discoveries)?;
            counts.discoveries = discoveries.len();
        }
        Ok(counts)
    }
}
