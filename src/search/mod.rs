//! Catalog search
//!
//! Query derivation, the client for the hosted index, and the multi-page
//! aggregation rules.

pub mod client;
pub mod models;
pub mod pagination;
pub mod query;

pub use client::{SearchClient, SearchError};
pub use models::SearchRecord;
pub use pagination::{InFlightLoads, ItemSearchResult};
pub use query::{build_attribute_filters, build_price_filter, build_search_query};
