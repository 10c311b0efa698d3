//! Synthetic datasets and response-size metrics for benchmarks and tests.
//!
//! The generated exports mimic the dirt of real ICN data: state names
//! written out, city names in the state column, `#N/A` placeholders and
//! the same organization repeated across many items.

use serde::Serialize;
use serde_json::{json, Value};

const SECTORS: &[&str] = &[
    "Defence",
    "Rail",
    "Renewable Energy",
    "Water",
    "Health",
    "Construction",
    "#N/A",
];

const ITEMS: &[&str] = &[
    "Armour plate",
    "Bogies",
    "Wind tower sections",
    "Pipe fittings",
    "Ventilators",
    "Structural steel",
    "Cable assemblies",
];

const STATES: &[&str] = &[
    "VIC",
    "Victoria",
    "nsw",
    "Queensland",
    "Perth",
    "SA",
    "Tas.",
    "N/A",
    "Auckland",
    "Atlantis",
];

const CITIES: &[&str] = &[
    "Melbourne",
    "Geelong",
    "Sydney",
    "Brisbane",
    "Perth",
    "Adelaide",
    "Hobart",
    "",
];

const CAPABILITY_TYPES: &[&str] = &[
    "Supplier",
    "Item Supplier",
    "Manufacturer",
    "Manufacturer (Parts)",
    "Assembler",
    "Service Provider",
    "Designer",
    "Retailer",
    "#N/A",
];

/// Generates a deterministic export of `items` records, each listing
/// `orgs_per_item` organizations drawn from a pool of `companies` ids.
#[must_use]
pub fn synthetic_dataset(items: usize, orgs_per_item: usize, companies: usize) -> Value {
    let companies = companies.max(1);
    let records: Vec<Value> = (0..items)
        .map(|i| {
            let orgs: Vec<Value> = (0..orgs_per_item)
                .map(|j| synthetic_org((i * 7 + j * 13) % companies, i + j))
                .collect();
            json!({
                "Item ID": format!("item-{i}"),
                "Sector Name": SECTORS[i % SECTORS.len()],
                "Item Name": ITEMS[i % ITEMS.len()],
                "Detailed Item Name": format!("{} grade {}", ITEMS[i % ITEMS.len()], i % 5),
                "Sector Mapping ID": format!("map-{}", i % 11),
                "Organizations": orgs
            })
        })
        .collect();
    Value::Array(records)
}

fn synthetic_org(company: usize, salt: usize) -> Value {
    let day = company % 28 + 1;
    let month = company % 12 + 1;
    let date = if company % 3 == 0 {
        "#N/A".to_string()
    } else {
        format!("{day}/{month}/20{:02}", 18 + company % 7)
    };
    json!({
        "Organisation: Organisation ID": format!("org-{company}"),
        "Organisation: Organisation Name": format!("Company {company} Engineering"),
        "Organisation: Billing Street": format!("{} Industrial Road", company % 200 + 1),
        "Organisation: Billing City": CITIES[company % CITIES.len()],
        "Organisation: Billing State/Province": STATES[company % STATES.len()],
        "Organisation: Billing Zip/Postal Code": format!("{}", 3000 + company % 900),
        "Capability Type": CAPABILITY_TYPES[salt % CAPABILITY_TYPES.len()],
        "Validation Date": date
    })
}

/// Response-size metrics for a tool output.
#[derive(Debug, Clone, Default)]
pub struct TokenMetrics {
    /// Serialized JSON size in bytes
    pub output_bytes: usize,
    /// Estimated token count (bytes / 4)
    pub estimated_tokens: usize,
    /// Number of result items returned
    pub result_count: usize,
}

impl TokenMetrics {
    /// Creates metrics from a serializable output.
    pub fn from_output<T: Serialize>(output: &T, result_count: usize) -> Self {
        let output_bytes = serde_json::to_string(output).map_or(0, |json| json.len());
        Self {
            output_bytes,
            estimated_tokens: output_bytes / 4,
            result_count,
        }
    }

    /// Estimated tokens per result item.
    pub fn tokens_per_result(&self) -> f64 {
        if self.result_count == 0 {
            return 0.0;
        }
        self.estimated_tokens as f64 / self.result_count as f64
    }
}
