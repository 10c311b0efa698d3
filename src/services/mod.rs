//! Core services: ingestion, queries, facets and statistics.

pub mod directory;
mod query;
pub mod stats;
mod trigram;

pub use directory::{DirectoryConfig, DirectoryIndex, LoadReport};
pub use stats::{CityCount, FilterOptions, Statistics};
pub use trigram::{search_text, TrigramIndex};
