//! # Workboard Core
//!
//! Configuration and error types shared by the store, the HTTP gateway and
//! the backup job.

pub mod config;
pub mod error;

pub use config::{BackupConfig, GatewayConfig, StorageConfig, WorkboardConfig};
pub use error::{Result, WorkboardError};
