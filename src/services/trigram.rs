//! Trigram prefilter for company text search.
//!
//! Each company's searchable text (name, address, sectors, capabilities,
//! city, state, postcode) is lower-cased and decomposed into trigrams.
//! A query narrows the collection to companies holding every trigram of the
//! query; the exact per-field check then runs only on those candidates.

use crate::model::Company;
use crate::types::{CompanySlot, Trigram};
use ahash::AHashMap;
use roaring::RoaringBitmap;

/// In-memory trigram index using RoaringBitmaps.
///
/// Each trigram maps to a bitmap of company slots containing it.
/// Substring search ANDs all trigram bitmaps together.
#[derive(Default)]
pub struct TrigramIndex {
    /// Trigram -> slots whose search text contains it
    index: AHashMap<Trigram, RoaringBitmap>,
}

impl TrigramIndex {
    /// Creates an empty trigram index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index over a whole collection, slot = position.
    #[must_use]
    pub fn build(companies: &[Company]) -> Self {
        let mut index = Self::new();
        for (pos, company) in companies.iter().enumerate() {
            index.add_company(CompanySlot::new(pos as u32), company);
        }
        index
    }

    /// Adds one company's search text to the index.
    pub fn add_company(&mut self, slot: CompanySlot, company: &Company) {
        self.add_text(slot, &search_text(company));
    }

    /// Adds raw text under a slot. Text is expected to be lower-cased already.
    pub fn add_text(&mut self, slot: CompanySlot, text: &str) {
        for trigram in Trigram::extract(text) {
            self.index
                .entry(trigram)
                .or_default()
                .insert(slot.as_u32());
        }
    }

    /// Returns slots whose text contains ALL trigrams of `query`.
    ///
    /// For queries shorter than 3 bytes, returns None (no filtering).
    pub fn search(&self, query: &str) -> Option<RoaringBitmap> {
        let trigrams: Vec<_> = Trigram::extract(query).collect();

        if trigrams.is_empty() {
            return None;
        }

        let Some(first) = self.index.get(&trigrams[0]) else {
            return Some(RoaringBitmap::new());
        };
        let mut result = first.clone();

        for trigram in &trigrams[1..] {
            match self.index.get(trigram) {
                Some(bitmap) => result &= bitmap,
                None => return Some(RoaringBitmap::new()),
            }
            if result.is_empty() {
                break;
            }
        }

        Some(result)
    }

    /// Returns the number of unique trigrams indexed.
    #[must_use]
    pub fn trigram_count(&self) -> usize {
        self.index.len()
    }

    /// Returns total slot references across all trigrams.
    #[must_use]
    pub fn total_refs(&self) -> u64 {
        self.index.values().map(|b| b.len()).sum()
    }

    /// Clears the index.
    pub fn clear(&mut self) {
        self.index.clear();
    }
}

impl std::fmt::Debug for TrigramIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrigramIndex")
            .field("trigram_count", &self.trigram_count())
            .field("total_refs", &self.total_refs())
            .finish()
    }
}

/// Lower-cased searchable text of a company, one field per line.
///
/// The newline separator keeps trigrams from spanning two fields for any
/// query that does not itself contain a newline.
#[must_use]
pub fn search_text(company: &Company) -> String {
    let addr = &company.billing_address;
    let mut text = String::with_capacity(256);
    for field in [
        company.name.as_str(),
        company.address.as_str(),
        addr.city.as_str(),
        addr.state.as_str(),
        addr.postcode.as_str(),
    ]
    .into_iter()
    .chain(company.key_sectors.iter().map(String::as_str))
    .chain(company.capabilities.iter().map(String::as_str))
    {
        text.push_str(&field.to_lowercase());
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_search() {
        let mut index = TrigramIndex::new();
        index.add_text(CompanySlot::new(0), "acme engineering\nmelbourne\n");
        index.add_text(CompanySlot::new(1), "melbourne fabrication\n");
        index.add_text(CompanySlot::new(2), "harbour city steel\nsydney\n");

        let results = index.search("melb").unwrap();
        assert!(results.contains(0));
        assert!(results.contains(1));
        assert!(!results.contains(2));

        let results = index.search("fabric").unwrap();
        assert_eq!(results.len(), 1);
        assert!(results.contains(1));
    }

    #[test]
    fn test_short_query() {
        let mut index = TrigramIndex::new();
        index.add_text(CompanySlot::new(0), "acme");

        assert!(index.search("ac").is_none());
        assert!(index.search("a").is_none());
    }

    #[test]
    fn test_no_match() {
        let mut index = TrigramIndex::new();
        index.add_text(CompanySlot::new(0), "hello world");

        let results = index.search("xyz").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut index = TrigramIndex::new();
        index.add_text(CompanySlot::new(3), "rolling stock");
        assert!(index.trigram_count() > 0);
        assert!(index.total_refs() > 0);

        index.clear();
        assert_eq!(index.trigram_count(), 0);
        assert!(index.search("stock").unwrap().is_empty());
    }
}
