//! Behavioral properties of the directory index.
//!
//! Each test pins one observable rule of loading, normalization or
//! querying against realistic exports.

mod common;

use common::{loaded, sample_dataset, single_company_dataset};
use icn_navigator::normalize::{
    convert_icn_date_to_iso, is_invalid_value, normalize_state_territory,
};
use icn_navigator::{CompanyType, DirectoryIndex, StateCode, VerificationStatus};

// ============================================================================
// End-to-end
// ============================================================================

#[test]
fn test_single_company_scenario() {
    let index = loaded(single_company_dataset());

    assert_eq!(index.companies().len(), 1);
    let company = &index.companies()[0];
    assert_eq!(company.name, "Test Company");
    assert_eq!(company.billing_address.state, StateCode::Vic);
    assert_eq!(company.verification_status, VerificationStatus::Verified);
    assert_eq!(company.verification_date.as_deref(), Some("2024-01-01"));
    assert_eq!(company.company_type, CompanyType::Supplier);

    let json = serde_json::to_value(company).unwrap();
    assert_eq!(json["billingAddress"]["state"], "VIC");
    assert_eq!(json["verificationStatus"], "verified");
    assert_eq!(json["verificationDate"], "2024-01-01");
    assert_eq!(json["companyType"], "supplier");
}

#[test]
fn test_sample_dataset_dedupes_and_counts() {
    let index = loaded(sample_dataset());

    let ids: Vec<&str> = index.companies().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["acme", "harbour", "coast", "kiwi", "sparkle", "shop"]);

    let report = index.last_report().unwrap();
    assert_eq!(report.raw_records, 8);
    assert_eq!(report.invalid_records, 2);
    assert_eq!(report.skipped_records, 1);
    assert_eq!(report.skipped_organizations, 1);
    assert_eq!(report.capability_rows, 8);
    assert_eq!(report.companies, 6);
}

#[test]
fn test_merge_accumulates_without_duplicates() {
    let index = loaded(sample_dataset());
    let acme = index.get_company_by_id("acme").unwrap();

    assert_eq!(acme.key_sectors, vec!["Defence", "Rail"]);
    assert_eq!(acme.capabilities, vec!["Armour plate", "Bogies"]);
    assert_eq!(acme.icn_capabilities.len(), 2);
    assert_eq!(acme.company_type, CompanyType::Both);
    // First sighting wins for the verification date
    assert_eq!(acme.verification_date.as_deref(), Some("2023-05-12"));
    assert_eq!(acme.address, "1 Test Street, Geelong, VIC 3000");
}

#[test]
fn test_dirty_fields_normalized() {
    let index = loaded(sample_dataset());

    let sparkle = index.get_company_by_id("sparkle").unwrap();
    assert_eq!(sparkle.billing_address.city, "Not Available");
    assert_eq!(sparkle.billing_address.state, StateCode::Vic);
    assert_eq!(sparkle.key_sectors, vec!["General"]);
    assert_eq!(sparkle.company_type, CompanyType::Service);
    assert_eq!(sparkle.verification_status, VerificationStatus::Unverified);

    let shop = index.get_company_by_id("shop").unwrap();
    assert_eq!(shop.billing_address.state, StateCode::Wa);
    assert_eq!(shop.company_type, CompanyType::Consultant);
    assert!(shop.verification_date.is_none());

    let kiwi = index.get_company_by_id("kiwi").unwrap();
    assert_eq!(kiwi.billing_address.state, StateCode::Ni);
    assert_eq!(kiwi.verification_date.as_deref(), Some("2022-04-03"));
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_load_twice_is_identical() {
    let mut index = DirectoryIndex::new();
    let first = index.load(sample_dataset()).unwrap().to_vec();
    let loaded_at = index.loaded_at();

    let second = index.load(single_company_dataset()).unwrap().to_vec();
    assert_eq!(first, second);
    assert_eq!(index.loaded_at(), loaded_at);
}

#[test]
fn test_clear_empties_everything() {
    let mut index = loaded(sample_dataset());
    index.clear();

    assert!(!index.is_loaded());
    assert!(index.companies().is_empty());
    assert!(index.search_companies("").is_empty());
    assert!(index.filter_by_state("VIC").is_empty());
    assert!(index.get_company_by_id("acme").is_none());
    assert_eq!(index.statistics().total_companies, 0);
    assert!(index.last_report().is_none());

    // A different dataset can be loaded after a clear
    index.load(single_company_dataset()).unwrap();
    assert_eq!(index.len(), 1);
}

// ============================================================================
// Queries and statistics
// ============================================================================

#[test]
fn test_search_properties() {
    let index = loaded(sample_dataset());

    assert_eq!(index.search_companies("").len(), index.len());
    assert_eq!(
        index.search_companies("HARBOUR STEEL"),
        index.search_companies("harbour steel")
    );
    let hits: Vec<&str> = index
        .search_companies("wind")
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(hits, vec!["harbour", "kiwi"]);
}

#[test]
fn test_filter_properties() {
    let index = loaded(sample_dataset());

    let vic = index.filter_by_state("VIC");
    assert_eq!(vic.len(), 2);
    assert!(vic.iter().all(|c| c.billing_address.state == StateCode::Vic));
    assert!(index.filter_by_state("ZZZ").is_empty());

    let both: Vec<&str> = index
        .filter_by_company_type("both")
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(both, vec!["acme", "harbour"]);
    assert_eq!(index.filter_by_company_type("supplier").len(), 3);
    assert_eq!(index.filter_by_company_type("manufacturer").len(), 2);
    assert!(index.filter_by_company_type("service").is_empty());
}

#[test]
fn test_statistics_properties() {
    let index = loaded(sample_dataset());
    let stats = index.statistics();

    assert_eq!(stats.total_companies, 6);
    assert_eq!(stats.total_items, 8);
    assert_eq!(stats.verified + stats.unverified, stats.total_companies);
    assert_eq!(stats.verified, 2);
    assert_eq!(stats.by_company_type.len(), 5);
    assert_eq!(stats.by_company_type.values().sum::<usize>(), 6);
    assert_eq!(stats.by_state[&StateCode::Vic], 2);
    assert_eq!(stats.by_sector["Renewable Energy"], 2);
    assert!(!stats.by_sector.contains_key("General"));

    let cities: Vec<&str> = stats.top_cities.iter().map(|c| c.city.as_str()).collect();
    assert_eq!(cities, vec!["Geelong", "Newcastle", "Brisbane", "Auckland", "Perth"]);
}

#[test]
fn test_facets_sorted_and_clean() {
    let index = loaded(sample_dataset());
    let options = index.filter_options();

    assert_eq!(
        options.sectors,
        vec!["Defence", "Rail", "Renewable Energy", "Water"]
    );
    assert!(!options.cities.iter().any(|c| c == "Not Available"));
    assert!(options.capabilities.windows(2).all(|w| w[0] <= w[1]));
}

// ============================================================================
// Normalization examples
// ============================================================================

#[test]
fn test_normalization_examples() {
    assert_eq!(normalize_state_territory("victoria"), StateCode::Vic);
    assert_eq!(normalize_state_territory("new south wales"), StateCode::Nsw);
    assert_eq!(normalize_state_territory("VIC"), StateCode::Vic);
    assert_eq!(normalize_state_territory("melbourne"), StateCode::Vic);
    assert_eq!(normalize_state_territory("somewhere else"), StateCode::Vic);

    assert_eq!(
        convert_icn_date_to_iso(Some("01/12/2024")).as_deref(),
        Some("2024-12-01")
    );
    assert_eq!(
        convert_icn_date_to_iso(Some("5/3/2024")).as_deref(),
        Some("2024-03-05")
    );
    assert_eq!(convert_icn_date_to_iso(Some("invalid")), None);
    assert_eq!(convert_icn_date_to_iso(Some("#N/A")), None);

    for sentinel in ["", "#N/A", "N/A", "0"] {
        assert!(is_invalid_value(Some(sentinel)), "{sentinel:?}");
    }
    assert!(is_invalid_value(None));
    assert!(!is_invalid_value(Some("valid")));
}
