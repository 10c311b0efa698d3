//! Type-safe newtypes and closed enumerations for icn-navigator.
//!
//! These types provide compile-time safety and semantic clarity
//! for core domain concepts. Free-text input is mapped onto them by
//! [`crate::normalize`]; nothing downstream handles raw labels.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// External organization identifier.
///
/// Taken verbatim (trimmed) from the dataset and never regenerated, so it
/// stays stable across reloads of the same export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct CompanyId(String);

impl CompanyId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CompanyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for CompanyId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CompanyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Position of a company inside the loaded collection.
///
/// Using u32 keeps trigram posting lists in compact roaring bitmaps.
/// The newtype prevents accidental mixing with other integer values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompanySlot(pub u32);

impl CompanySlot {
    #[must_use]
    pub const fn new(slot: u32) -> Self {
        Self(slot)
    }

    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn as_index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for CompanySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.0;
        write!(f, "slot:{slot}")
    }
}

/// Canonical state / territory / region code.
///
/// Eight Australian states and territories plus the two New Zealand islands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum StateCode {
    #[serde(rename = "VIC")]
    Vic,
    #[serde(rename = "NSW")]
    Nsw,
    #[serde(rename = "QLD")]
    Qld,
    #[serde(rename = "SA")]
    Sa,
    #[serde(rename = "WA")]
    Wa,
    #[serde(rename = "TAS")]
    Tas,
    #[serde(rename = "NT")]
    Nt,
    #[serde(rename = "ACT")]
    Act,
    #[serde(rename = "NI")]
    Ni,
    #[serde(rename = "SI")]
    Si,
}

impl StateCode {
    /// All canonical codes in declaration order.
    pub const ALL: [StateCode; 10] = [
        Self::Vic,
        Self::Nsw,
        Self::Qld,
        Self::Sa,
        Self::Wa,
        Self::Tas,
        Self::Nt,
        Self::Act,
        Self::Ni,
        Self::Si,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vic => "VIC",
            Self::Nsw => "NSW",
            Self::Qld => "QLD",
            Self::Sa => "SA",
            Self::Wa => "WA",
            Self::Tas => "TAS",
            Self::Nt => "NT",
            Self::Act => "ACT",
            Self::Ni => "NI",
            Self::Si => "SI",
        }
    }
}

impl Default for StateCode {
    fn default() -> Self {
        Self::Vic
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateCode {
    type Err = String;

    /// Parses an already-canonical code, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == upper)
            .ok_or_else(|| {
                format!(
                    "Invalid state code: '{}'. Valid codes: VIC, NSW, QLD, SA, WA, TAS, NT, ACT, NI, SI",
                    s
                )
            })
    }
}

/// Normalized capability-type tag describing an organization's role for an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum CapabilityType {
    #[serde(rename = "Supplier")]
    Supplier,
    #[serde(rename = "Item Supplier")]
    ItemSupplier,
    #[serde(rename = "Parts Supplier")]
    PartsSupplier,
    #[serde(rename = "Manufacturer")]
    Manufacturer,
    #[serde(rename = "Manufacturer (Parts)")]
    PartsManufacturer,
    #[serde(rename = "Assembler")]
    Assembler,
    #[serde(rename = "Service Provider")]
    ServiceProvider,
    #[serde(rename = "Project Management")]
    ProjectManagement,
    #[serde(rename = "Designer")]
    Designer,
    #[serde(rename = "Retailer")]
    Retailer,
    #[serde(rename = "Wholesaler")]
    Wholesaler,
}

impl CapabilityType {
    pub const ALL: [CapabilityType; 11] = [
        Self::Supplier,
        Self::ItemSupplier,
        Self::PartsSupplier,
        Self::Manufacturer,
        Self::PartsManufacturer,
        Self::Assembler,
        Self::ServiceProvider,
        Self::ProjectManagement,
        Self::Designer,
        Self::Retailer,
        Self::Wholesaler,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Supplier => "Supplier",
            Self::ItemSupplier => "Item Supplier",
            Self::PartsSupplier => "Parts Supplier",
            Self::Manufacturer => "Manufacturer",
            Self::PartsManufacturer => "Manufacturer (Parts)",
            Self::Assembler => "Assembler",
            Self::ServiceProvider => "Service Provider",
            Self::ProjectManagement => "Project Management",
            Self::Designer => "Designer",
            Self::Retailer => "Retailer",
            Self::Wholesaler => "Wholesaler",
        }
    }

    #[must_use]
    pub const fn is_supplier_like(self) -> bool {
        matches!(self, Self::Supplier | Self::ItemSupplier | Self::PartsSupplier)
    }

    #[must_use]
    pub const fn is_manufacturer_like(self) -> bool {
        matches!(
            self,
            Self::Manufacturer | Self::PartsManufacturer | Self::Assembler
        )
    }

    #[must_use]
    pub const fn is_service_like(self) -> bool {
        matches!(
            self,
            Self::ServiceProvider | Self::ProjectManagement | Self::Designer
        )
    }

    #[must_use]
    pub const fn is_retail_like(self) -> bool {
        matches!(self, Self::Retailer | Self::Wholesaler)
    }
}

impl Default for CapabilityType {
    fn default() -> Self {
        Self::ServiceProvider
    }
}

impl fmt::Display for CapabilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Coarse company classification derived from accumulated capability types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CompanyType {
    Supplier,
    Manufacturer,
    Both,
    Service,
    Consultant,
}

impl CompanyType {
    pub const ALL: [CompanyType; 5] = [
        Self::Supplier,
        Self::Manufacturer,
        Self::Both,
        Self::Service,
        Self::Consultant,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Supplier => "supplier",
            Self::Manufacturer => "manufacturer",
            Self::Both => "both",
            Self::Service => "service",
            Self::Consultant => "consultant",
        }
    }
}

impl Default for CompanyType {
    fn default() -> Self {
        Self::Supplier
    }
}

impl fmt::Display for CompanyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompanyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "supplier" => Ok(Self::Supplier),
            "manufacturer" => Ok(Self::Manufacturer),
            "both" => Ok(Self::Both),
            "service" => Ok(Self::Service),
            "consultant" => Ok(Self::Consultant),
            other => Err(format!(
                "Invalid company type: '{}'. Valid types: supplier, manufacturer, both, service, consultant",
                other
            )),
        }
    }
}

/// Whether a company carried a parsable validation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    Unverified,
}

impl VerificationStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Unverified => "unverified",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Three-byte trigram for substring indexing.
///
/// Trigrams enable fast substring search by decomposing strings
/// into overlapping 3-byte sequences. For example:
/// "melb" → ["mel", "elb"]
///
/// Finding companies containing "melb" means finding companies whose
/// search text contains ALL of its trigrams.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Trigram(pub [u8; 3]);

impl Trigram {
    #[must_use]
    pub const fn new(bytes: [u8; 3]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 3] {
        &self.0
    }

    /// Extracts all trigrams from a string.
    ///
    /// Short strings (< 3 bytes) yield no trigrams.
    pub fn extract(s: &str) -> impl Iterator<Item = Trigram> + '_ {
        s.as_bytes()
            .windows(3)
            .map(|w| Trigram([w[0], w[1], w[2]]))
    }
}

impl fmt::Debug for Trigram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Ok(s) = std::str::from_utf8(&self.0) {
            write!(f, "Trigram({s:?})")
        } else {
            let [a, b, c] = self.0;
            write!(f, "Trigram({a:02x}{b:02x}{c:02x})")
        }
    }
}

// Compile-time assertions for thread safety.
#[cfg(test)]
const _: () = {
    const fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<CompanyId>();
    assert_send_sync::<CompanySlot>();
    assert_send_sync::<StateCode>();
    assert_send_sync::<CapabilityType>();
    assert_send_sync::<CompanyType>();
    assert_send_sync::<Trigram>();
};
