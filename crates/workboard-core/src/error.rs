//! Error types shared across the workspace.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkboardError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Request body was not in the expected shape.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("HTTP error: {0}")]
    Http(String),
}

pub type Result<T> = std::result::Result<T, WorkboardError>;
