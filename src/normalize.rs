//! Field normalization rules for the raw ICN export.
//!
//! Every function here is pure. The export is free text, riddled with
//! spreadsheet sentinels (`#N/A`, `0`, `NULL`...) and inconsistent
//! spellings of states and capability labels; these rules map it onto the
//! closed types in [`crate::types`].
//!
//! # Fallback region
//!
//! [`normalize_state_territory`] never returns "unknown": anything it cannot
//! place is assigned [`DEFAULT_FALLBACK_STATE`] (`VIC`). That choice moves
//! ambiguous addresses into a specific region, which shows up in default
//! coordinates, state filters and per-state statistics. Use
//! [`normalize_state_territory_or`] to pick a different fallback.

use crate::types::{CapabilityType, CompanyType, StateCode};
use chrono::NaiveDate;

/// Region assigned to unrecognized state/territory text.
pub const DEFAULT_FALLBACK_STATE: StateCode = StateCode::Vic;

/// Sentinels meaning "no data", compared after trimming and upper-casing.
const INVALID_SENTINELS: [&str; 6] = ["", "N/A", "#N/A", "0", "NULL", "UNDEFINED"];

/// Returns true when a raw field is absent or a sentinel.
///
/// `None` stands in for JSON `null` and missing keys.
#[must_use]
pub fn is_invalid_value(value: Option<&str>) -> bool {
    match value {
        None => true,
        Some(v) => {
            let upper = v.trim().to_uppercase();
            INVALID_SENTINELS.contains(&upper.as_str())
        }
    }
}

/// Returns the trimmed value, or `placeholder` when the value is invalid.
#[must_use]
pub fn clean(value: Option<&str>, placeholder: &str) -> String {
    match value {
        Some(v) if !is_invalid_value(Some(v)) => v.trim().to_string(),
        _ => placeholder.to_string(),
    }
}

/// Returns the trimmed value when it is usable.
#[must_use]
pub fn clean_opt(value: Option<&str>) -> Option<String> {
    match value {
        Some(v) if !is_invalid_value(Some(v)) => Some(v.trim().to_string()),
        _ => None,
    }
}

/// Normalizes free-text state/territory input to a canonical code.
///
/// Unrecognized input falls back to [`DEFAULT_FALLBACK_STATE`].
///
/// ```
/// use icn_navigator::normalize::normalize_state_territory;
/// use icn_navigator::types::StateCode;
///
/// assert_eq!(normalize_state_territory("victoria"), StateCode::Vic);
/// assert_eq!(normalize_state_territory("new south wales"), StateCode::Nsw);
/// assert_eq!(normalize_state_territory("melbourne"), StateCode::Vic);
/// assert_eq!(normalize_state_territory("VIC"), StateCode::Vic);
/// ```
#[must_use]
pub fn normalize_state_territory(value: &str) -> StateCode {
    normalize_state_territory_or(Some(value), DEFAULT_FALLBACK_STATE)
}

/// Normalizes state/territory input with an explicit fallback.
#[must_use]
pub fn normalize_state_territory_or(value: Option<&str>, fallback: StateCode) -> StateCode {
    let Some(raw) = clean_opt(value) else {
        return fallback;
    };
    let key = raw.to_lowercase();

    if let Some(code) = state_alias(&key) {
        return code;
    }

    // Already-canonical codes pass through regardless of case
    key.parse::<StateCode>().unwrap_or(fallback)
}

/// Alias table: full names, dotted abbreviations, major cities, NZ islands.
fn state_alias(key: &str) -> Option<StateCode> {
    let code = match key {
        "victoria" | "vic." | "melbourne" | "geelong" | "ballarat" | "bendigo" => StateCode::Vic,
        "new south wales" | "nsw." | "n.s.w." | "n.s.w" | "sydney" | "newcastle"
        | "wollongong" => StateCode::Nsw,
        "queensland" | "qld." | "brisbane" | "gold coast" | "townsville" | "cairns" => {
            StateCode::Qld
        }
        "south australia" | "sa." | "s.a." | "s.a" | "adelaide" => StateCode::Sa,
        "western australia" | "wa." | "w.a." | "w.a" | "perth" | "fremantle" => StateCode::Wa,
        "tasmania" | "tas." | "hobart" | "launceston" => StateCode::Tas,
        "northern territory" | "nt." | "n.t." | "n.t" | "darwin" | "alice springs" => {
            StateCode::Nt
        }
        "australian capital territory" | "act." | "a.c.t." | "a.c.t" | "canberra" => {
            StateCode::Act
        }
        "north island" | "nz north island" | "new zealand north island" | "ni." | "auckland"
        | "wellington" | "hamilton" => StateCode::Ni,
        "south island" | "nz south island" | "new zealand south island" | "si."
        | "christchurch" | "dunedin" | "queenstown" => StateCode::Si,
        _ => return None,
    };
    Some(code)
}

/// Default coordinates (latitude, longitude) for a region.
///
/// These are capital-city centroids, not geocoded addresses.
#[must_use]
pub const fn state_centroid(state: StateCode) -> (f64, f64) {
    match state {
        StateCode::Vic => (-37.8136, 144.9631),
        StateCode::Nsw => (-33.8688, 151.2093),
        StateCode::Qld => (-27.4698, 153.0251),
        StateCode::Sa => (-34.9285, 138.6007),
        StateCode::Wa => (-31.9505, 115.8605),
        StateCode::Tas => (-42.8821, 147.3272),
        StateCode::Nt => (-12.4634, 130.8456),
        StateCode::Act => (-35.2809, 149.1300),
        StateCode::Ni => (-36.8485, 174.7633),
        StateCode::Si => (-43.5321, 172.6362),
    }
}

/// Maps a free-text capability label onto the closed capability-type set.
///
/// Labels are compared on their letters only, lower-cased, so
/// `"Manufacturer (Parts)"`, `"manufacturer-parts"` and `"MANUFACTURER_PARTS"`
/// agree. Unrecognized and invalid labels become
/// [`CapabilityType::ServiceProvider`].
#[must_use]
pub fn normalize_capability_type(value: Option<&str>) -> CapabilityType {
    let Some(raw) = clean_opt(value) else {
        return CapabilityType::default();
    };
    let key: String = raw
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    match key.as_str() {
        "supplier" | "suppliers" | "generalsupplier" => CapabilityType::Supplier,
        "itemsupplier" | "itemsuppliers" => CapabilityType::ItemSupplier,
        "partssupplier" | "partsupplier" | "componentsupplier" => CapabilityType::PartsSupplier,
        "manufacturer" | "manufacturers" | "manufacturing" | "manufacture" => {
            CapabilityType::Manufacturer
        }
        "manufacturerparts" | "partsmanufacturer" | "partmanufacturer"
        | "componentmanufacturer" => CapabilityType::PartsManufacturer,
        "assembler" | "assembly" | "assemblers" => CapabilityType::Assembler,
        "serviceprovider" | "serviceproviders" | "service" | "services" => {
            CapabilityType::ServiceProvider
        }
        "projectmanagement" | "projectmanager" | "projectmanagers" => {
            CapabilityType::ProjectManagement
        }
        "designer" | "designers" | "design" => CapabilityType::Designer,
        "retailer" | "retailers" | "retail" => CapabilityType::Retailer,
        "wholesaler" | "wholesalers" | "wholesale" => CapabilityType::Wholesaler,
        _ => CapabilityType::default(),
    }
}

/// Classifies a company from the capability-type tags seen for it.
///
/// Check order matters: supplier+manufacturer wins over either alone.
#[must_use]
pub fn derive_company_type<I>(tags: I) -> CompanyType
where
    I: IntoIterator<Item = CapabilityType>,
{
    let (mut supplier, mut manufacturer, mut service, mut retail) = (false, false, false, false);
    for tag in tags {
        supplier |= tag.is_supplier_like();
        manufacturer |= tag.is_manufacturer_like();
        service |= tag.is_service_like();
        retail |= tag.is_retail_like();
    }

    if supplier && manufacturer {
        CompanyType::Both
    } else if manufacturer {
        CompanyType::Manufacturer
    } else if supplier {
        CompanyType::Supplier
    } else if service {
        CompanyType::Service
    } else if retail {
        CompanyType::Consultant
    } else {
        CompanyType::Supplier
    }
}

/// Converts an ICN `DD/MM/YYYY` date to ISO `YYYY-MM-DD`.
///
/// Day and month need no padding on input; output is zero-padded.
/// Malformed, sentinel or impossible dates yield `None`.
#[must_use]
pub fn convert_icn_date_to_iso(value: Option<&str>) -> Option<String> {
    let raw = clean_opt(value)?;
    let mut parts = raw.split('/').map(str::trim);
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !(all_digits(day) && all_digits(month) && all_digits(year)) || year.len() != 4 {
        return None;
    }

    let date = NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)?;
    Some(date.format("%Y-%m-%d").to_string())
}
