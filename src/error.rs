//! Error types for icn-navigator.
//!
//! Uses thiserror for ergonomic error handling with proper
//! error chain propagation. Only whole-dataset problems are errors;
//! dirty rows inside a dataset are skipped and counted instead.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level directory error.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Invalid dataset format: {0}")]
    InvalidFormat(String),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tool error: {0}")]
    Tool(String),
}

/// Dataset location and validation errors.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Dataset not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Dataset path is not a file: {}", path.display())]
    NotAFile { path: PathBuf },

    #[error("Dataset must be a .json file: {}", path.display())]
    NotJson { path: PathBuf },

    #[error("Access denied: {} is a sensitive file ({reason})", path.display())]
    Sensitive { path: PathBuf, reason: &'static str },

    #[error("Dataset {} is {size} bytes, limit is {limit}", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}

/// Result type alias for directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;

/// Result type alias for dataset operations.
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;

// Error code implementations for machine-readable error responses
impl DirectoryError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat(_) => "INVALID_FORMAT",
            Self::Dataset(e) => e.code(),
            Self::Io(_) => "IO_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Tool(_) => "TOOL_ERROR",
        }
    }
}

impl DatasetError {
    /// Returns a machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "DATASET_NOT_FOUND",
            Self::NotAFile { .. } => "DATASET_NOT_A_FILE",
            Self::NotJson { .. } => "DATASET_NOT_JSON",
            Self::Sensitive { .. } => "SENSITIVE_FILE",
            Self::TooLarge { .. } => "DATASET_TOO_LARGE",
        }
    }
}

// Conversion to rmcp tool errors
impl From<DirectoryError> for rmcp::Error {
    fn from(err: DirectoryError) -> Self {
        rmcp::Error::internal_error(err.to_string(), None)
    }
}
