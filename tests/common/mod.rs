//! Common test utilities for icn-navigator integration tests.
//!
//! Provides `TestEnv` for setting up isolated dataset files, plus small
//! builders for raw export records.

#![allow(dead_code)] // Test utilities may not all be used in every test file

use icn_navigator::DirectoryIndex;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A temp directory holding dataset files.
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    /// Creates a new empty test environment.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Writes a file to the test directory and returns its path.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Writes a JSON dataset and returns its path.
    pub fn write_dataset(&self, name: &str, data: &Value) -> PathBuf {
        self.write_file(name, &data.to_string())
    }

    /// Gets the full path to a file in the test directory.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// One organization row with the commonly used fields.
pub fn org(id: &str, name: &str, city: &str, state: &str, cap: &str, date: &str) -> Value {
    json!({
        "Organisation: Organisation ID": id,
        "Organisation: Organisation Name": name,
        "Organisation: Billing Street": "1 Test Street",
        "Organisation: Billing City": city,
        "Organisation: Billing State/Province": state,
        "Organisation: Billing Zip/Postal Code": "3000",
        "Capability Type": cap,
        "Validation Date": date
    })
}

/// One item record.
pub fn record(item_id: &str, sector: &str, item: &str, orgs: Vec<Value>) -> Value {
    json!({
        "Item ID": item_id,
        "Sector Name": sector,
        "Item Name": item,
        "Organizations": orgs
    })
}

/// The single-organization export used by the end-to-end scenario.
pub fn single_company_dataset() -> Value {
    json!([record(
        "item-1",
        "Defence",
        "Armour plate",
        vec![org(
            "org-1",
            "Test Company",
            "Melbourne",
            "VIC",
            "Supplier",
            "01/01/2024"
        )]
    )])
}

/// A small export with repeated companies, dirty values and several states.
pub fn sample_dataset() -> Value {
    json!([
        record("i1", "Defence", "Armour plate", vec![
            org("acme", "Acme Engineering", "Geelong", "Victoria", "Supplier", "12/05/2023"),
            org("harbour", "Harbour Steel", "Newcastle", "NSW", "Manufacturer", "#N/A"),
        ]),
        record("i2", "Rail", "Bogies", vec![
            org("acme", "Acme Engineering", "Geelong", "Victoria", "Assembler", "01/01/2020"),
            org("coast", "Coast Fabrication", "Brisbane", "qld", "Parts Supplier", ""),
        ]),
        record("i3", "Renewable Energy", "Wind tower sections", vec![
            org("kiwi", "Kiwi Wind", "Auckland", "North Island", "Designer", "3/4/2022"),
            org("harbour", "Harbour Steel", "Newcastle", "NSW", "Item Supplier", ""),
        ]),
        record("i4", "#N/A", "Cleaning", vec![
            org("sparkle", "Sparkle Services", "N/A", "Atlantis", "Service Provider", "0"),
        ]),
        record("i5", "Water", "Pumps", vec![
            org("", "No Id Pty Ltd", "Perth", "WA", "Supplier", ""),
            org("shop", "Valve Shop", "Perth", "Perth", "Retailer", "31/02/2024"),
        ]),
        record("#N/A", "Health", "Masks", vec![
            org("ghost", "Ghost Medical", "Hobart", "TAS", "Supplier", "01/01/2024"),
        ]),
        {"Item ID": "i6", "Sector Name": "Defence", "Item Name": "Drones"},
        {"Item ID": "i7", "Organizations": [
            org("orphan", "Orphan Co", "Darwin", "NT", "Supplier", "")
        ]}
    ])
}

/// Loads a JSON value into a fresh index.
pub fn loaded(data: Value) -> DirectoryIndex {
    let mut index = DirectoryIndex::new();
    index.load(data).expect("Failed to load dataset");
    index
}
