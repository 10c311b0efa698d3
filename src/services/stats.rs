//! Facets and aggregate statistics over the loaded directory.

use crate::model::{Company, CITY_NOT_AVAILABLE, GENERAL_SECTOR, SERVICE_CAPABILITY};
use crate::normalize::is_invalid_value;
use crate::services::DirectoryIndex;
use crate::types::{CapabilityType, CompanyType, StateCode};
use ahash::AHashMap;
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Distinct filter values present in the collection, each sorted ascending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    /// Sectors, without the `General` filler
    pub sectors: Vec<String>,
    /// Canonical state codes actually present
    pub states: Vec<StateCode>,
    /// Cities, without the placeholder
    pub cities: Vec<String>,
    /// Capabilities, without the `Service` filler
    pub capabilities: Vec<String>,
    /// Capability-type tags present
    pub capability_types: Vec<CapabilityType>,
}

/// Company count for one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct CityCount {
    pub city: String,
    pub count: usize,
}

/// Aggregate statistics over the collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_companies: usize,
    /// Raw records in the loaded export
    pub total_items: usize,
    pub verified: usize,
    pub unverified: usize,
    pub by_company_type: BTreeMap<CompanyType, usize>,
    pub by_state: BTreeMap<StateCode, usize>,
    /// Companies per sector, without the `General` filler
    pub by_sector: BTreeMap<String, usize>,
    /// Companies per capability-type tag
    pub by_capability_type: BTreeMap<CapabilityType, usize>,
    /// Busiest cities, descending; ties keep first-seen order
    pub top_cities: Vec<CityCount>,
}

impl DirectoryIndex {
    /// Distinct, sorted filter values for the loaded collection.
    #[must_use]
    pub fn filter_options(&self) -> FilterOptions {
        let mut sectors = BTreeSet::new();
        let mut states: Vec<StateCode> = Vec::new();
        let mut cities = BTreeSet::new();
        let mut capabilities = BTreeSet::new();
        let mut capability_types: Vec<CapabilityType> = Vec::new();

        for company in self.companies() {
            sectors.extend(
                company
                    .key_sectors
                    .iter()
                    .filter(|s| s.as_str() != GENERAL_SECTOR)
                    .map(String::as_str),
            );
            if !states.contains(&company.billing_address.state) {
                states.push(company.billing_address.state);
            }
            if is_listable_city(&company.billing_address.city) {
                cities.insert(company.billing_address.city.as_str());
            }
            capabilities.extend(
                company
                    .capabilities
                    .iter()
                    .filter(|c| {
                        c.as_str() != SERVICE_CAPABILITY && !is_invalid_value(Some(c.as_str()))
                    })
                    .map(String::as_str),
            );
            for tag in &company.capability_types {
                if !capability_types.contains(tag) {
                    capability_types.push(*tag);
                }
            }
        }
        states.sort_by_key(|s| s.as_str());
        capability_types.sort_by_key(|t| t.label());

        FilterOptions {
            sectors: sectors.into_iter().map(str::to_string).collect(),
            states,
            cities: cities.into_iter().map(str::to_string).collect(),
            capabilities: capabilities.into_iter().map(str::to_string).collect(),
            capability_types,
        }
    }

    /// Single-pass statistics; zeroed before a load.
    #[must_use]
    pub fn statistics(&self) -> Statistics {
        let mut stats = Statistics {
            total_items: self.last_report().map_or(0, |r| r.raw_records),
            by_company_type: CompanyType::ALL.into_iter().map(|t| (t, 0)).collect(),
            ..Statistics::default()
        };
        let mut city_counts = CityTally::default();

        for company in self.companies() {
            stats.total_companies += 1;
            if company.is_verified() {
                stats.verified += 1;
            } else {
                stats.unverified += 1;
            }
            *stats.by_company_type.entry(company.company_type).or_insert(0) += 1;
            *stats
                .by_state
                .entry(company.billing_address.state)
                .or_insert(0) += 1;
            for sector in company
                .key_sectors
                .iter()
                .filter(|s| s.as_str() != GENERAL_SECTOR)
            {
                *stats.by_sector.entry(sector.clone()).or_insert(0) += 1;
            }
            for tag in &company.capability_types {
                *stats.by_capability_type.entry(*tag).or_insert(0) += 1;
            }
            city_counts.record(company);
        }

        stats.top_cities = city_counts.top(self.config().top_cities);
        stats
    }
}

/// City counts in first-seen order.
#[derive(Default)]
struct CityTally<'a> {
    positions: AHashMap<&'a str, usize>,
    counts: Vec<CityCount>,
}

impl<'a> CityTally<'a> {
    fn record(&mut self, company: &'a Company) {
        let city = company.billing_address.city.as_str();
        if !is_listable_city(city) {
            return;
        }
        match self.positions.get(city) {
            Some(&pos) => self.counts[pos].count += 1,
            None => {
                self.positions.insert(city, self.counts.len());
                self.counts.push(CityCount {
                    city: city.to_string(),
                    count: 1,
                });
            }
        }
    }

    fn top(mut self, limit: usize) -> Vec<CityCount> {
        // Stable sort keeps encounter order among equal counts
        self.counts.sort_by(|a, b| b.count.cmp(&a.count));
        self.counts.truncate(limit);
        self.counts
    }
}

fn is_listable_city(city: &str) -> bool {
    city != CITY_NOT_AVAILABLE && !is_invalid_value(Some(city))
}
