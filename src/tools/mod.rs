//! MCP tool implementations.
//!
//! Each tool is an `Input` struct, an `Output` struct and an `execute_*`
//! function over a [`DirectoryIndex`](crate::services::DirectoryIndex).
//! The CLI and the MCP server both go through these functions.

mod analysis;
mod index;
mod search;

use crate::error::DirectoryError;
use crate::services::DirectoryIndex;

// analysis
pub use analysis::{
    execute_facets, execute_stats, DatasetInfo, FacetsInput, FacetsOutput, StatsInput,
    StatsOutput,
};

// index
pub use index::{execute_clear, execute_load, ClearOutput, LoadInput, LoadOutput};

// search
pub use search::{
    execute_company, execute_filter, execute_search, CompanyInput, CompanyOutput,
    CompanySummary, FilterInput, FilterOutput, SearchInput, SearchOutput,
};

/// Error message returned when no dataset is loaded.
pub const NOT_LOADED_MSG: &str =
    "No dataset loaded. Call 'load_dataset' with the path of an ICN export first.";

/// Fails with a tool error unless the index holds a dataset.
pub(crate) fn ensure_loaded(index: &DirectoryIndex) -> crate::error::Result<()> {
    if index.is_loaded() {
        Ok(())
    } else {
        Err(DirectoryError::Tool(NOT_LOADED_MSG.to_string()))
    }
}
