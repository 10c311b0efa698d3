//! Facet and statistics tools.

use super::ensure_loaded;
use crate::error::Result;
use crate::services::{DirectoryIndex, FilterOptions, LoadReport, Statistics};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input for the facets tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct FacetsInput {}

/// Output for the facets tool.
#[derive(Debug, Serialize, JsonSchema)]
pub struct FacetsOutput {
    /// Distinct filter values, each sorted ascending
    #[serde(flatten)]
    pub options: FilterOptions,
}

/// Executes the facets tool.
///
/// # Errors
///
/// Returns `DirectoryError::Tool` if no dataset is loaded.
pub fn execute_facets(index: &DirectoryIndex, _input: FacetsInput) -> Result<FacetsOutput> {
    ensure_loaded(index)?;
    Ok(FacetsOutput {
        options: index.filter_options(),
    })
}

/// Input for the stats tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct StatsInput {
    /// Include the load report and trigram counts
    #[serde(default)]
    pub detailed: bool,
}

/// Load-time facts about the current dataset.
#[derive(Debug, Serialize, JsonSchema)]
pub struct DatasetInfo {
    /// RFC 3339 load timestamp
    pub loaded_at: Option<String>,
    pub report: Option<LoadReport>,
    /// Distinct trigrams in the search prefilter
    pub trigram_count: usize,
}

/// Output for the stats tool.
#[derive(Debug, Serialize, JsonSchema)]
pub struct StatsOutput {
    #[serde(flatten)]
    pub statistics: Statistics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<DatasetInfo>,
}

/// Executes the stats tool.
///
/// # Errors
///
/// Returns `DirectoryError::Tool` if no dataset is loaded.
pub fn execute_stats(index: &DirectoryIndex, input: StatsInput) -> Result<StatsOutput> {
    ensure_loaded(index)?;

    let dataset = input.detailed.then(|| DatasetInfo {
        loaded_at: index.loaded_at().map(|t| t.to_rfc3339()),
        report: index.last_report().cloned(),
        trigram_count: index.trigram().trigram_count(),
    });

    Ok(StatsOutput {
        statistics: index.statistics(),
        dataset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loaded() -> DirectoryIndex {
        let mut index = DirectoryIndex::new();
        index
            .load_from_str(
                &json!([{
                    "Item ID": "i1",
                    "Sector Name": "Rail",
                    "Item Name": "Bogies",
                    "Organizations": [{
                        "Organisation: Organisation ID": "a",
                        "Organisation: Billing City": "Ballarat",
                        "Capability Type": "Manufacturer",
                        "Validation Date": "02/03/2024"
                    }]
                }])
                .to_string(),
            )
            .unwrap();
        index
    }

    #[test]
    fn test_facets_output_is_flat() {
        let index = loaded();
        let out = execute_facets(&index, FacetsInput::default()).unwrap();
        let value = serde_json::to_value(&out).unwrap();
        assert_eq!(value["sectors"], json!(["Rail"]));
        assert_eq!(value["cities"], json!(["Ballarat"]));
        assert_eq!(value["capabilityTypes"], json!(["Manufacturer"]));
    }

    #[test]
    fn test_stats_detailed() {
        let index = loaded();

        let brief = execute_stats(&index, StatsInput::default()).unwrap();
        assert!(brief.dataset.is_none());
        assert_eq!(brief.statistics.total_companies, 1);
        assert_eq!(brief.statistics.verified, 1);

        let detailed = execute_stats(&index, StatsInput { detailed: true }).unwrap();
        let info = detailed.dataset.unwrap();
        assert!(info.loaded_at.is_some());
        assert!(info.trigram_count > 0);
        let report = info.report.unwrap();
        assert_eq!(report.raw_records, 1);
        assert_eq!(report.fingerprint.map(|f| f.len()), Some(16));
    }

    #[test]
    fn test_stats_requires_loaded_dataset() {
        let index = DirectoryIndex::new();
        assert!(execute_stats(&index, StatsInput::default()).is_err());
        assert!(execute_facets(&index, FacetsInput::default()).is_err());
    }
}
