//! Company directory index: ingestion and lifecycle.
//!
//! [`DirectoryIndex`] turns the denormalized ICN export into a deduplicated,
//! ordered collection of [`Company`] values. Loading is idempotent: once
//! loaded, further loads are no-ops until [`DirectoryIndex::clear`].
//!
//! Ingestion is best effort. Records without organizations or with a
//! sentinel item id, records lacking both sector and item name, and
//! organizations lacking an id are skipped and counted in the
//! [`LoadReport`]; only a non-array top-level input is an error.

use crate::dataset;
use crate::error::{DirectoryError, Result};
use crate::model::{Company, CompanyBuilder, ItemContext, RawRecord};
use crate::normalize::{clean_opt, is_invalid_value, DEFAULT_FALLBACK_STATE};
use crate::services::TrigramIndex;
use crate::types::{CompanyId, StateCode};
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// Configuration for the directory index.
#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    /// Region assigned to unrecognized state/territory text
    pub fallback_state: StateCode,
    /// Number of cities reported in statistics
    pub top_cities: usize,
    /// Maximum dataset file size accepted by `load_from_path` (bytes)
    pub max_dataset_bytes: u64,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            fallback_state: DEFAULT_FALLBACK_STATE,
            top_cities: 10,
            max_dataset_bytes: 256 * 1024 * 1024, // 256MB
        }
    }
}

/// Counters collected while ingesting one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct LoadReport {
    /// Elements in the top-level array
    pub raw_records: usize,
    /// Records dropped for missing organizations or a sentinel item id
    pub invalid_records: usize,
    /// Records dropped for lacking both sector and item name
    pub skipped_records: usize,
    /// Organization rows dropped for lacking an id
    pub skipped_organizations: usize,
    /// Distinct companies produced
    pub companies: usize,
    /// Organization x item rows absorbed into companies
    pub capability_rows: usize,
    /// xxh3 fingerprint of the dataset text, when loaded from text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

/// In-memory company directory.
#[derive(Debug, Default)]
pub struct DirectoryIndex {
    config: DirectoryConfig,
    companies: Vec<Company>,
    by_id: AHashMap<CompanyId, usize>,
    trigram: TrigramIndex,
    loaded: bool,
    loaded_at: Option<DateTime<Utc>>,
    report: Option<LoadReport>,
}

impl DirectoryIndex {
    /// Creates an empty, unloaded index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an index with custom configuration.
    #[must_use]
    pub fn with_config(config: DirectoryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    /// Loads a parsed export.
    ///
    /// Returns the existing collection unchanged when already loaded.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::InvalidFormat` if `data` is not a JSON array.
    /// The index stays unloaded in that case.
    pub fn load(&mut self, data: Value) -> Result<&[Company]> {
        self.load_with_fingerprint(data, None)
    }

    /// Parses and loads an export from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Json` for malformed JSON and
    /// `DirectoryError::InvalidFormat` for a non-array document.
    pub fn load_from_str(&mut self, json: &str) -> Result<&[Company]> {
        if self.loaded {
            tracing::debug!("Directory already loaded, skipping parse");
            return Ok(self.companies.as_slice());
        }
        let data: Value = serde_json::from_str(json)?;
        let fingerprint = dataset::fingerprint(json.as_bytes());
        self.load_with_fingerprint(data, Some(fingerprint))
    }

    /// Reads, validates and loads an export file.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryError::Dataset` if the path fails validation,
    /// `DirectoryError::Io` if it cannot be read, and the errors of
    /// [`DirectoryIndex::load_from_str`] otherwise.
    pub fn load_from_path(&mut self, path: &Path) -> Result<&[Company]> {
        if self.loaded {
            tracing::debug!("Directory already loaded, skipping {}", path.display());
            return Ok(self.companies.as_slice());
        }
        let json = dataset::read_dataset(path, self.config.max_dataset_bytes)?;
        tracing::info!("Loading directory from {} ({} bytes)", path.display(), json.len());
        self.load_from_str(&json)
    }

    fn load_with_fingerprint(
        &mut self,
        data: Value,
        fingerprint: Option<String>,
    ) -> Result<&[Company]> {
        if self.loaded {
            tracing::debug!(
                companies = self.companies.len(),
                "Directory already loaded, load is a no-op"
            );
            return Ok(self.companies.as_slice());
        }

        let kind = json_kind(&data);
        let Value::Array(records) = data else {
            return Err(DirectoryError::InvalidFormat(format!(
                "expected a JSON array of records, got {kind}"
            )));
        };

        let (companies, mut report) = ingest(records, self.config.fallback_state);
        report.fingerprint = fingerprint;

        self.by_id = companies
            .iter()
            .enumerate()
            .map(|(pos, c)| (c.id.clone(), pos))
            .collect();
        self.trigram = TrigramIndex::build(&companies);
        self.companies = companies;
        self.loaded = true;
        self.loaded_at = Some(Utc::now());
        self.report = Some(report);

        self.log_summary();
        Ok(self.companies.as_slice())
    }

    /// Drops all loaded data. Safe to call at any time.
    pub fn clear(&mut self) {
        self.companies.clear();
        self.by_id.clear();
        self.trigram.clear();
        self.loaded = false;
        self.loaded_at = None;
        self.report = None;
        tracing::debug!("Directory cleared");
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// UTC time of the last effective load.
    #[must_use]
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// All companies in first-sighting order.
    #[must_use]
    pub fn companies(&self) -> &[Company] {
        &self.companies
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.companies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    /// Counters from the last effective load.
    #[must_use]
    pub fn last_report(&self) -> Option<&LoadReport> {
        self.report.as_ref()
    }

    pub(crate) fn position_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub(crate) fn trigram(&self) -> &TrigramIndex {
        &self.trigram
    }

    fn log_summary(&self) {
        let stats = self.statistics();
        if let Some(report) = &self.report {
            tracing::info!(
                raw_records = report.raw_records,
                invalid_records = report.invalid_records,
                skipped_records = report.skipped_records,
                skipped_organizations = report.skipped_organizations,
                capability_rows = report.capability_rows,
                "Directory loaded: {} companies",
                report.companies
            );
        }
        tracing::info!(
            verified = stats.verified,
            unverified = stats.unverified,
            "Verification breakdown"
        );
        tracing::info!("Companies by type: {:?}", stats.by_company_type);
        tracing::info!("Companies by state: {:?}", stats.by_state);
        tracing::info!(
            "Top cities: {:?}",
            stats
                .top_cities
                .iter()
                .map(|c| (c.city.as_str(), c.count))
                .collect::<Vec<_>>()
        );
        tracing::debug!("Companies by sector: {:?}", stats.by_sector);
        tracing::debug!("Companies by capability type: {:?}", stats.by_capability_type);
    }
}

/// Single pass over the export: filter, dedupe by id, merge.
fn ingest(records: Vec<Value>, fallback: StateCode) -> (Vec<Company>, LoadReport) {
    let mut report = LoadReport {
        raw_records: records.len(),
        ..LoadReport::default()
    };
    let mut builders: Vec<CompanyBuilder> = Vec::new();
    let mut positions: AHashMap<CompanyId, usize> = AHashMap::new();

    for value in records {
        let Some(record) = RawRecord::from_value(value) else {
            report.invalid_records += 1;
            continue;
        };
        let item_id = match clean_opt(record.item_id.as_deref()) {
            Some(id) if !record.organizations.is_empty() => id,
            _ => {
                report.invalid_records += 1;
                continue;
            }
        };
        let Some(item) = ItemContext::from_record(&item_id, &record) else {
            tracing::debug!(item_id = %item_id, "Skipping item without sector or item name");
            report.skipped_records += 1;
            continue;
        };

        for org in &record.organizations {
            if is_invalid_value(org.id.as_deref()) {
                report.skipped_organizations += 1;
                continue;
            }
            let id = CompanyId::new(org.id.as_deref().unwrap_or_default().trim());
            report.capability_rows += 1;

            match positions.get(&id) {
                Some(&pos) => builders[pos].merge(org, &item),
                None => {
                    positions.insert(id.clone(), builders.len());
                    builders.push(CompanyBuilder::new(id, org, &item, fallback));
                }
            }
        }
    }

    let companies: Vec<Company> = builders.into_iter().map(CompanyBuilder::finish).collect();
    report.companies = companies.len();
    (companies, report)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
