//! Raw export schema and the derived company model.
//!
//! The raw side mirrors the ICN JSON export field for field. Its scalar
//! fields are decoded leniently: strings, numbers and booleans are read as
//! text, anything else (null, objects, missing keys) as `None`. Sentinel
//! handling is left to [`crate::normalize`].
//!
//! The derived side is built through [`CompanyBuilder`], which absorbs every
//! organization row carrying the same id and is finalized into an immutable
//! [`Company`] once the whole export has been read.

use crate::normalize::{
    clean, clean_opt, convert_icn_date_to_iso, derive_company_type, normalize_capability_type,
    normalize_state_territory_or, state_centroid,
};
use crate::types::{CapabilityType, CompanyId, CompanyType, StateCode, VerificationStatus};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Filler sector for items without a usable sector name.
pub const GENERAL_SECTOR: &str = "General";

/// Filler capability for items without a usable item name.
pub const SERVICE_CAPABILITY: &str = "Service";

/// Placeholder city for organizations without a usable billing city.
pub const CITY_NOT_AVAILABLE: &str = "Not Available";

/// One item of the export together with the organizations offering it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Item ID", default, deserialize_with = "loose_string")]
    pub item_id: Option<String>,

    #[serde(rename = "Sector Name", default, deserialize_with = "loose_string")]
    pub sector_name: Option<String>,

    #[serde(rename = "Item Name", default, deserialize_with = "loose_string")]
    pub item_name: Option<String>,

    #[serde(rename = "Detailed Item Name", default, deserialize_with = "loose_string")]
    pub detailed_item_name: Option<String>,

    #[serde(rename = "Sector Mapping ID", default, deserialize_with = "loose_string")]
    pub sector_mapping_id: Option<String>,

    #[serde(rename = "Organizations", default, deserialize_with = "loose_organizations")]
    pub organizations: Vec<RawOrganization>,
}

impl RawRecord {
    /// Decodes one element of the export array.
    ///
    /// Returns `None` when the element is not a JSON object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value).ok()
    }
}

/// One organization's contribution to a record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawOrganization {
    #[serde(rename = "Organisation: Organisation ID", default, deserialize_with = "loose_string")]
    pub id: Option<String>,

    #[serde(rename = "Organisation: Organisation Name", default, deserialize_with = "loose_string")]
    pub name: Option<String>,

    #[serde(rename = "Organisation: Billing Street", default, deserialize_with = "loose_string")]
    pub billing_street: Option<String>,

    #[serde(rename = "Organisation: Billing City", default, deserialize_with = "loose_string")]
    pub billing_city: Option<String>,

    #[serde(
        rename = "Organisation: Billing State/Province",
        default,
        deserialize_with = "loose_string"
    )]
    pub billing_state: Option<String>,

    #[serde(
        rename = "Organisation: Billing Zip/Postal Code",
        default,
        deserialize_with = "loose_string"
    )]
    pub billing_postcode: Option<String>,

    #[serde(rename = "Capability Type", default, deserialize_with = "loose_string")]
    pub capability_type: Option<String>,

    #[serde(rename = "Validation Date", default, deserialize_with = "loose_string")]
    pub validation_date: Option<String>,

    #[serde(rename = "Organisation Capability", default, deserialize_with = "loose_string")]
    pub capability_id: Option<String>,
}

fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

fn loose_organizations<'de, D>(deserializer: D) -> Result<Vec<RawOrganization>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(Vec::new());
    };
    // Non-object entries are treated like organizations without an id
    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::Object(_) => serde_json::from_value(item).unwrap_or_default(),
            _ => RawOrganization::default(),
        })
        .collect())
}

/// Item-level fields of a record, cleaned once and shared by its organizations.
#[derive(Debug, Clone)]
pub struct ItemContext {
    pub item_id: String,
    pub item_name: String,
    pub detailed_item_name: String,
    pub sector_name: String,
    pub sector_mapping_id: Option<String>,
}

impl ItemContext {
    /// Cleans item fields. Returns `None` when the record carries neither a
    /// usable sector name nor a usable item name.
    #[must_use]
    pub fn from_record(item_id: &str, record: &RawRecord) -> Option<Self> {
        let sector = clean_opt(record.sector_name.as_deref());
        let item = clean_opt(record.item_name.as_deref());
        if sector.is_none() && item.is_none() {
            return None;
        }

        let detailed = clean_opt(record.detailed_item_name.as_deref())
            .or_else(|| item.clone())
            .unwrap_or_else(|| SERVICE_CAPABILITY.to_string());

        Some(Self {
            item_id: item_id.to_string(),
            item_name: item.unwrap_or_else(|| SERVICE_CAPABILITY.to_string()),
            detailed_item_name: detailed,
            sector_name: sector.unwrap_or_else(|| GENERAL_SECTOR.to_string()),
            sector_mapping_id: clean_opt(record.sector_mapping_id.as_deref()),
        })
    }
}

/// Structured billing address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BillingAddress {
    pub street: String,
    pub city: String,
    pub state: StateCode,
    pub postcode: String,
}

impl BillingAddress {
    /// Joins the usable parts as `street, city, STATE postcode`.
    #[must_use]
    pub fn compose(&self) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(3);
        if !self.street.is_empty() {
            parts.push(self.street.clone());
        }
        if self.city != CITY_NOT_AVAILABLE {
            parts.push(self.city.clone());
        }
        if self.postcode.is_empty() {
            parts.push(self.state.to_string());
        } else {
            parts.push(format!("{} {}", self.state, self.postcode));
        }
        parts.join(", ")
    }
}

/// One organization x item pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IcnCapability {
    pub capability_id: String,
    pub item_id: String,
    pub item_name: String,
    pub detailed_item_name: String,
    pub capability_type: CapabilityType,
    pub sector_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sector_mapping_id: Option<String>,
}

/// A deduplicated company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub address: String,
    pub billing_address: BillingAddress,
    pub latitude: f64,
    pub longitude: f64,
    pub verification_status: VerificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_date: Option<String>,
    pub key_sectors: Vec<String>,
    pub capabilities: Vec<String>,
    pub capability_types: Vec<CapabilityType>,
    pub company_type: CompanyType,
    pub icn_capabilities: Vec<IcnCapability>,
}

impl Company {
    #[must_use]
    pub fn is_verified(&self) -> bool {
        self.verification_status == VerificationStatus::Verified
    }

    #[must_use]
    pub fn has_supplier_capability(&self) -> bool {
        self.capability_types.iter().any(|t| t.is_supplier_like())
    }

    #[must_use]
    pub fn has_manufacturer_capability(&self) -> bool {
        self.capability_types.iter().any(|t| t.is_manufacturer_like())
    }
}

/// Mutable accumulator for one company id.
///
/// The first row fixes the base fields; later rows only append.
#[derive(Debug, Clone)]
pub struct CompanyBuilder {
    company: Company,
}

impl CompanyBuilder {
    /// Starts a company from its first-sighted organization row.
    #[must_use]
    pub fn new(id: CompanyId, org: &RawOrganization, item: &ItemContext, fallback: StateCode) -> Self {
        let state = normalize_state_territory_or(org.billing_state.as_deref(), fallback);
        let billing_address = BillingAddress {
            street: clean(org.billing_street.as_deref(), ""),
            city: clean(org.billing_city.as_deref(), CITY_NOT_AVAILABLE),
            state,
            postcode: clean(org.billing_postcode.as_deref(), ""),
        };
        let (latitude, longitude) = state_centroid(state);
        let verification_date = convert_icn_date_to_iso(org.validation_date.as_deref());
        let verification_status = if verification_date.is_some() {
            VerificationStatus::Verified
        } else {
            VerificationStatus::Unverified
        };
        let name = clean(org.name.as_deref(), id.as_str());

        let mut builder = Self {
            company: Company {
                address: billing_address.compose(),
                id,
                name,
                billing_address,
                latitude,
                longitude,
                verification_status,
                verification_date,
                key_sectors: Vec::new(),
                capabilities: Vec::new(),
                capability_types: Vec::new(),
                company_type: CompanyType::default(),
                icn_capabilities: Vec::new(),
            },
        };
        builder.merge(org, item);
        builder
    }

    /// Folds a repeat sighting (or the first one) into the company.
    pub fn merge(&mut self, org: &RawOrganization, item: &ItemContext) {
        let company = &mut self.company;
        push_unique(&mut company.key_sectors, &item.sector_name);
        push_unique(&mut company.capabilities, &item.detailed_item_name);

        let capability_type = normalize_capability_type(org.capability_type.as_deref());
        if !company.capability_types.contains(&capability_type) {
            company.capability_types.push(capability_type);
        }

        let capability_id = clean_opt(org.capability_id.as_deref())
            .unwrap_or_else(|| format!("{}-{}", company.id, item.item_id));
        company.icn_capabilities.push(IcnCapability {
            capability_id,
            item_id: item.item_id.clone(),
            item_name: item.item_name.clone(),
            detailed_item_name: item.detailed_item_name.clone(),
            capability_type,
            sector_name: item.sector_name.clone(),
            sector_mapping_id: item.sector_mapping_id.clone(),
        });

        company.company_type = derive_company_type(company.capability_types.iter().copied());
    }

    #[must_use]
    pub fn id(&self) -> &CompanyId {
        &self.company.id
    }

    #[must_use]
    pub fn finish(self) -> Company {
        self.company
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
