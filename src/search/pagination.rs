//! Multi-page aggregation and deduplication
//!
//! Page numbers are recomputed from the accumulated record count, which
//! assumes every prior page was full; a partial page followed by a full one
//! can therefore re-request data already seen. The dedup-by-identity step is
//! the safeguard that absorbs that drift — it must never be skipped in
//! favour of trusting the page arithmetic.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;

use crate::analysis::models::DetectedItem;
use crate::search::models::SearchRecord;
use crate::search::query;

/// Page size for the embedded multi-item search.
pub const MULTI_ITEM_PAGE_SIZE: usize = 3;
/// Page size for single-item and follow-up searches.
pub const SINGLE_ITEM_PAGE_SIZE: usize = 6;
/// Page size for explicit "load more" pages.
pub const LOAD_MORE_PAGE_SIZE: usize = 9;

/// Next page number for a "load more" fetch, first page being page 1.
pub fn next_page_number(record_count: usize, page_size: usize) -> u32 {
    (record_count / page_size) as u32 + 1
}

/// Drop records whose identity is already known, preserving returned order.
pub fn dedup_new_records(
    existing_ids: &[String],
    raw: Vec<SearchRecord>,
) -> Vec<SearchRecord> {
    let seen: HashSet<&str> = existing_ids.iter().map(String::as_str).collect();
    raw.into_iter()
        .filter(|record| !seen.contains(record.object_id.as_str()))
        .collect()
}

/// Whether another page is worth requesting after this fetch.
///
/// True only when the raw (pre-dedup) fetch filled the page AND at least one
/// record survived dedup; a short or fully-duplicate page means the item is
/// exhausted.
pub fn page_has_more(raw_len: usize, unique_len: usize, page_size: usize) -> bool {
    raw_len == page_size && unique_len > 0
}

/// Stable identity for a detected item, derived from its search request.
///
/// Two items that would issue the same query, facet filters, and price
/// filter are the same item for in-flight guarding purposes.
pub fn item_key(item: &DetectedItem) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query::build_search_query(item).as_bytes());
    for group in query::build_attribute_filters(item) {
        for filter in group {
            hasher.update(b"|");
            hasher.update(filter.as_bytes());
        }
    }
    if let Some(price_filter) = query::build_price_filter(item) {
        hasher.update(b"|");
        hasher.update(price_filter.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

/// Accumulated search results for one detected item.
///
/// Created with the first page; the only entity that mutates afterwards.
/// `products` keeps insertion order (retrieval order across pages) with
/// duplicates removed by object identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSearchResult {
    pub detected_item: DetectedItem,
    pub search_query: String,
    pub products: Vec<SearchRecord>,
    pub has_more: bool,
}

impl ItemSearchResult {
    /// Bind an item to its first retrieved page.
    ///
    /// A full first page signals that more records may exist.
    pub fn new(
        detected_item: DetectedItem,
        search_query: String,
        first_page: Vec<SearchRecord>,
        page_size: usize,
    ) -> Self {
        let has_more = first_page.len() == page_size;
        Self {
            detected_item,
            search_query,
            products: first_page,
            has_more,
        }
    }

    /// Page number the next "load more" fetch should request.
    pub fn next_page(&self) -> u32 {
        next_page_number(self.products.len(), LOAD_MORE_PAGE_SIZE)
    }

    /// Fold a freshly fetched page into the accumulated list.
    ///
    /// Survivors are appended in returned order; `has_more` is recomputed
    /// from the raw page length and survivor count. Returns the number of
    /// records appended.
    pub fn absorb_page(&mut self, raw: Vec<SearchRecord>, page_size: usize) -> usize {
        let mut seen: HashSet<String> = self
            .products
            .iter()
            .map(|record| record.object_id.clone())
            .collect();

        let raw_len = raw.len();
        let mut appended = 0;
        for record in raw {
            if seen.insert(record.object_id.clone()) {
                self.products.push(record);
                appended += 1;
            }
        }

        self.has_more = page_has_more(raw_len, appended, page_size);
        appended
    }
}

/// Busy flags for in-flight "load more" requests, keyed by item identity.
///
/// A second trigger for the same item while one is in flight is rejected so
/// duplicate-page races cannot occur. The returned token releases the flag
/// on drop, including on error paths.
#[derive(Debug, Default)]
pub struct InFlightLoads {
    active: DashMap<String, ()>,
}

impl InFlightLoads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the flag for an item; `None` when a load is already in flight.
    pub fn try_begin(&self, key: &str) -> Option<LoadToken<'_>> {
        match self.active.entry(key.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => None,
            dashmap::mapref::entry::Entry::Vacant(vacant) => {
                vacant.insert(());
                Some(LoadToken {
                    loads: self,
                    key: key.to_string(),
                })
            }
        }
    }
}

/// RAII claim on an item's in-flight flag.
pub struct LoadToken<'a> {
    loads: &'a InFlightLoads,
    key: String,
}

impl Drop for LoadToken<'_> {
    fn drop(&mut self) {
        self.loads.active.remove(&self.key);
    }
}
