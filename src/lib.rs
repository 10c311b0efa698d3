//! icn-navigator: Company directory index over ICN capability exports.
//!
//! The raw export is item-centric: each record is one product or service
//! classification listing the organizations that supply it. This crate
//! turns that into a deduplicated, company-centric collection with
//! normalized states, capability types and verification data, then
//! serves search, filters, facets and statistics over it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────┐   ┌──────────────────────┐
//! │   CLI (clap, fmt)    │   │  MCP Server (rmcp)   │
//! │                      │   │ JSON-RPC over stdio  │
//! └──────────┬───────────┘   └──────────┬───────────┘
//!            │                          │ Arc<RwLock<_>>
//! ┌──────────▼──────────────────────────▼───────────┐
//! │                     Tools                       │
//! │  load, search, filter, company, facets, stats   │
//! └────────────────────────┬────────────────────────┘
//!                          │
//! ┌────────────────────────▼────────────────────────┐
//! │                 DirectoryIndex                  │
//! │   ingest → dedupe → normalize → Vec<Company>    │
//! └───────┬─────────────────┬─────────────────┬─────┘
//!         │                 │                 │
//!    ┌────▼────┐      ┌─────▼─────┐     ┌─────▼─────┐
//!    │  Query  │      │  Trigram  │     │   Stats   │
//!    │ filters │      │ prefilter │     │  facets   │
//!    └─────────┘      └───────────┘     └───────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use icn_navigator::DirectoryIndex;
//! use serde_json::json;
//!
//! let mut index = DirectoryIndex::new();
//! index.load(json!([{
//!     "Item ID": "item-1",
//!     "Sector Name": "Defence",
//!     "Item Name": "Armour plate",
//!     "Organizations": [{
//!         "Organisation: Organisation ID": "org-1",
//!         "Organisation: Organisation Name": "Test Company",
//!         "Organisation: Billing State/Province": "Victoria",
//!         "Capability Type": "Manufacturer"
//!     }]
//! }]))?;
//!
//! let hits = index.search_companies("test company");
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].billing_address.state.as_str(), "VIC");
//! # Ok::<(), icn_navigator::DirectoryError>(())
//! ```

#[doc(hidden)]
pub mod bench_utils;
pub mod dataset;
pub mod error;
pub mod fmt;
pub mod model;
pub mod normalize;
pub mod server;
pub mod services;
pub mod tools;
pub mod types;

pub use error::{DatasetError, DirectoryError, Result};
pub use model::{BillingAddress, Company, IcnCapability};
pub use services::{DirectoryConfig, DirectoryIndex, FilterOptions, LoadReport, Statistics};
pub use types::{CapabilityType, CompanyId, CompanyType, StateCode, VerificationStatus};

use std::path::PathBuf;

/// Computes the default dataset path.
///
/// The path is `<data_dir>/icn-navigator/icn-data.json`, where `<data_dir>`
/// is the platform data directory (`~/.local/share` on Linux). Falls back
/// to the current directory when no data directory is known.
#[must_use]
pub fn default_dataset_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("icn-navigator")
        .join("icn-data.json")
}
