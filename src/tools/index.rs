//! Dataset lifecycle tools: load and clear.
//!
//! Paths given to `load_dataset` go through
//! [`crate::dataset::validate_dataset_path`] before they are read.

use crate::error::Result;
use crate::services::{DirectoryIndex, LoadReport};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Input for the load tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LoadInput {
    /// Path to a JSON export of ICN items
    pub path: String,
}

/// Output for the load tool.
#[derive(Debug, Serialize, JsonSchema)]
pub struct LoadOutput {
    /// Companies in the collection
    pub companies: usize,
    /// True when a dataset was already loaded and the call was a no-op
    pub already_loaded: bool,
    /// RFC 3339 timestamp of the load that produced the collection
    pub loaded_at: Option<String>,
    pub report: Option<LoadReport>,
    /// Status message
    pub message: String,
}

/// Executes the load tool.
///
/// # Errors
///
/// Returns the dataset, IO or format error of the load.
pub fn execute_load(index: &mut DirectoryIndex, input: LoadInput) -> Result<LoadOutput> {
    let already_loaded = index.is_loaded();
    let companies = index.load_from_path(Path::new(&input.path))?.len();

    let message = if already_loaded {
        format!(
            "Dataset already loaded ({companies} companies). Call 'clear' before loading another."
        )
    } else {
        format!("Loaded {companies} companies from {}", input.path)
    };

    Ok(LoadOutput {
        companies,
        already_loaded,
        loaded_at: index.loaded_at().map(|t| t.to_rfc3339()),
        report: index.last_report().cloned(),
        message,
    })
}

/// Output for the clear tool.
#[derive(Debug, Serialize, JsonSchema)]
pub struct ClearOutput {
    /// Companies dropped by the clear
    pub removed: usize,
    pub message: String,
}

/// Executes the clear tool. Never fails.
pub fn execute_clear(index: &mut DirectoryIndex) -> ClearOutput {
    let removed = index.len();
    index.clear();
    ClearOutput {
        removed,
        message: format!("Cleared {removed} companies"),
    }
}
