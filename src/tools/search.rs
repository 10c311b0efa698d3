//! Query tools: text search, combined filters and company lookup.

use super::ensure_loaded;
use crate::error::{DirectoryError, Result};
use crate::model::Company;
use crate::services::DirectoryIndex;
use crate::types::{CapabilityType, CompanyId, CompanyType, StateCode, VerificationStatus};
use ahash::AHashSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Compact view of a company used in result lists.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompanySummary {
    pub id: CompanyId,
    pub name: String,
    pub company_type: CompanyType,
    pub state: StateCode,
    pub city: String,
    pub verification_status: VerificationStatus,
    /// Capability-type tags, in first-seen order
    pub capability_types: Vec<CapabilityType>,
    /// Key sectors, in first-seen order
    pub key_sectors: Vec<String>,
}

impl From<&Company> for CompanySummary {
    fn from(c: &Company) -> Self {
        Self {
            id: c.id.clone(),
            name: c.name.clone(),
            company_type: c.company_type,
            state: c.billing_address.state,
            city: c.billing_address.city.clone(),
            verification_status: c.verification_status,
            capability_types: c.capability_types.clone(),
            key_sectors: c.key_sectors.clone(),
        }
    }
}

fn default_limit() -> usize {
    20
}

/// Input for the search tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchInput {
    /// Free-text query; blank returns every company
    pub query: String,
    /// Maximum results to return (default: 20)
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Output for the search tool.
#[derive(Debug, Serialize, JsonSchema)]
pub struct SearchOutput {
    /// Matching companies in collection order
    pub results: Vec<CompanySummary>,
    /// Number of matches before the limit was applied
    pub total_matches: usize,
    /// Number of results returned
    pub total_returned: usize,
    /// Whether more results exist beyond the limit
    pub has_more: bool,
    /// Query that was executed
    pub query: String,
}

/// Executes the search tool.
///
/// # Errors
///
/// Returns `DirectoryError::Tool` if no dataset is loaded.
pub fn execute_search(index: &DirectoryIndex, input: SearchInput) -> Result<SearchOutput> {
    ensure_loaded(index)?;

    let matches = index.search_companies(&input.query);
    let total_matches = matches.len();
    let results: Vec<CompanySummary> = matches
        .into_iter()
        .take(input.limit)
        .map(CompanySummary::from)
        .collect();

    Ok(SearchOutput {
        total_returned: results.len(),
        has_more: total_matches > results.len(),
        total_matches,
        results,
        query: input.query,
    })
}

/// Input for the filter tool. Every given filter must hold.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct FilterInput {
    /// Canonical state code, e.g. "VIC"
    #[serde(default)]
    pub state: Option<String>,
    /// Company type: both, supplier or manufacturer
    #[serde(default)]
    pub company_type: Option<String>,
    /// Exact sector name
    #[serde(default)]
    pub sector: Option<String>,
    /// Maximum results to return (default: 20)
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for FilterInput {
    fn default() -> Self {
        Self {
            state: None,
            company_type: None,
            sector: None,
            limit: default_limit(),
        }
    }
}

/// Output for the filter tool.
#[derive(Debug, Serialize, JsonSchema)]
pub struct FilterOutput {
    pub results: Vec<CompanySummary>,
    pub total_matches: usize,
    pub total_returned: usize,
    pub has_more: bool,
}

/// Executes the filter tool.
///
/// Each filter is applied through its own query and the results are
/// intersected, keeping collection order.
///
/// # Errors
///
/// Returns `DirectoryError::Tool` if no dataset is loaded or no filter
/// was given.
pub fn execute_filter(index: &DirectoryIndex, input: FilterInput) -> Result<FilterOutput> {
    ensure_loaded(index)?;

    let mut selections: Vec<Vec<&Company>> = Vec::with_capacity(3);
    if let Some(state) = &input.state {
        selections.push(index.filter_by_state(state.trim()));
    }
    if let Some(company_type) = &input.company_type {
        selections.push(index.filter_by_company_type(company_type.trim()));
    }
    if let Some(sector) = &input.sector {
        selections.push(index.filter_by_sector(sector));
    }

    let Some((first, rest)) = selections.split_first() else {
        return Err(DirectoryError::Tool(
            "Provide at least one of: state, company_type, sector".to_string(),
        ));
    };

    let others: Vec<AHashSet<&str>> = rest
        .iter()
        .map(|sel| sel.iter().map(|c| c.id.as_str()).collect())
        .collect();
    let matches: Vec<&Company> = first
        .iter()
        .copied()
        .filter(|c| others.iter().all(|set| set.contains(c.id.as_str())))
        .collect();

    let total_matches = matches.len();
    let results: Vec<CompanySummary> = matches
        .into_iter()
        .take(input.limit)
        .map(CompanySummary::from)
        .collect();

    Ok(FilterOutput {
        total_returned: results.len(),
        has_more: total_matches > results.len(),
        total_matches,
        results,
    })
}

/// Input for the company tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CompanyInput {
    /// External company id
    pub id: String,
}

/// Output for the company tool: the full company record.
#[derive(Debug, Serialize, JsonSchema)]
pub struct CompanyOutput {
    pub company: Company,
}

/// Executes the company tool.
///
/// # Errors
///
/// Returns `DirectoryError::Tool` if no dataset is loaded or the id is
/// unknown.
pub fn execute_company(index: &DirectoryIndex, input: CompanyInput) -> Result<CompanyOutput> {
    ensure_loaded(index)?;

    let id = input.id.trim();
    index
        .get_company_by_id(id)
        .map(|company| CompanyOutput {
            company: company.clone(),
        })
        .ok_or_else(|| DirectoryError::Tool(format!("Company not found: {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn loaded() -> DirectoryIndex {
        let org = |id: &str, name: &str, state: &str, cap: &str| {
            json!({
                "Organisation: Organisation ID": id,
                "Organisation: Organisation Name": name,
                "Organisation: Billing State/Province": state,
                "Capability Type": cap
            })
        };
        let mut index = DirectoryIndex::new();
        index
            .load(json!([
                {"Item ID": "i1", "Sector Name": "Defence", "Item Name": "Armour", "Organizations": [
                    org("a", "Acme", "VIC", "Supplier"),
                    org("b", "Bolt Works", "VIC", "Manufacturer"),
                    org("c", "Coast Metal", "QLD", "Supplier")
                ]}
            ]))
            .unwrap();
        index
    }

    #[test]
    fn test_search_limit_and_has_more() {
        let index = loaded();
        let out = execute_search(
            &index,
            SearchInput {
                query: String::new(),
                limit: 2,
            },
        )
        .unwrap();
        assert_eq!(out.total_matches, 3);
        assert_eq!(out.total_returned, 2);
        assert!(out.has_more);
        assert_eq!(out.results[0].id.as_str(), "a");
    }

    #[test]
    fn test_filter_intersection() {
        let index = loaded();
        let out = execute_filter(
            &index,
            FilterInput {
                state: Some("VIC".into()),
                company_type: Some("supplier".into()),
                limit: 20,
                ..FilterInput::default()
            },
        )
        .unwrap();
        let ids: Vec<_> = out.results.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
        assert!(!out.has_more);
    }

    #[test]
    fn test_filter_requires_a_filter() {
        let index = loaded();
        let err = execute_filter(&index, FilterInput::default()).unwrap_err();
        assert_eq!(err.code(), "TOOL_ERROR");
    }

    #[test]
    fn test_company_lookup() {
        let index = loaded();
        let out = execute_company(&index, CompanyInput { id: " b ".into() }).unwrap();
        assert_eq!(out.company.name, "Bolt Works");

        let err = execute_company(&index, CompanyInput { id: "zz".into() }).unwrap_err();
        assert!(err.to_string().contains("Company not found: zz"));
    }

    #[test]
    fn test_tools_require_loaded_dataset() {
        let index = DirectoryIndex::new();
        let err = execute_search(
            &index,
            SearchInput {
                query: "acme".into(),
                limit: 20,
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("load_dataset"));
    }
}
