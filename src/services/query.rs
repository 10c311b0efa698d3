//! Read-only queries over a loaded directory.
//!
//! All queries borrow the collection and keep its first-sighting order.
//! Before a load (or after a clear) every query returns an empty result.

use crate::model::Company;
use crate::services::DirectoryIndex;
use crate::types::CompanyType;

impl DirectoryIndex {
    /// Case-insensitive substring search.
    ///
    /// Matches against name, full address, key sectors, capabilities, city
    /// and state (lower-cased), and postcode (as written). A blank query
    /// returns the whole collection.
    #[must_use]
    pub fn search_companies(&self, query: &str) -> Vec<&Company> {
        let raw = query.trim();
        if raw.is_empty() {
            return self.companies().iter().collect();
        }
        let needle = raw.to_lowercase();

        // Trigram prefilter is exact for ASCII; other queries scan
        if raw.is_ascii() {
            if let Some(candidates) = self.trigram().search(&needle) {
                let companies = self.companies();
                return candidates
                    .iter()
                    .filter_map(|slot| companies.get(slot as usize))
                    .filter(|c| matches_text(c, &needle, raw))
                    .collect();
            }
        }

        self.companies()
            .iter()
            .filter(|c| matches_text(c, &needle, raw))
            .collect()
    }

    /// Companies whose normalized state code equals `state`.
    #[must_use]
    pub fn filter_by_state(&self, state: &str) -> Vec<&Company> {
        self.companies()
            .iter()
            .filter(|c| c.billing_address.state.as_str() == state)
            .collect()
    }

    /// Companies carrying the capability mix of `company_type`.
    ///
    /// Only `both`, `supplier` and `manufacturer` are supported; any other
    /// value, including the valid types `service` and `consultant`, yields
    /// an empty result.
    #[must_use]
    pub fn filter_by_company_type(&self, company_type: &str) -> Vec<&Company> {
        let predicate: fn(&Company) -> bool = match company_type.parse::<CompanyType>() {
            Ok(CompanyType::Both) => {
                |c| c.has_supplier_capability() && c.has_manufacturer_capability()
            }
            Ok(CompanyType::Supplier) => Company::has_supplier_capability,
            Ok(CompanyType::Manufacturer) => Company::has_manufacturer_capability,
            _ => return Vec::new(),
        };
        self.companies().iter().filter(|c| predicate(c)).collect()
    }

    /// Companies listing `sector` among their key sectors.
    #[must_use]
    pub fn filter_by_sector(&self, sector: &str) -> Vec<&Company> {
        self.companies()
            .iter()
            .filter(|c| c.key_sectors.iter().any(|s| s == sector))
            .collect()
    }

    /// Looks up a company by its external id.
    #[must_use]
    pub fn get_company_by_id(&self, id: &str) -> Option<&Company> {
        self.position_of(id)
            .and_then(|pos| self.companies().get(pos))
    }
}

fn matches_text(company: &Company, needle: &str, raw: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);
    let addr = &company.billing_address;

    contains(&company.name)
        || contains(&company.address)
        || company.key_sectors.iter().any(|s| contains(s.as_str()))
        || company.capabilities.iter().any(|c| contains(c.as_str()))
        || contains(&addr.city)
        || contains(addr.state.as_str())
        || addr.postcode.contains(raw)
}
