//! Client for the hosted catalog search index
//!
//! Speaks the index's REST query protocol: one POST per search with the
//! query string, facet filters, optional numeric filter expression, and
//! pagination parameters. Zero matches come back as an empty hit list, which
//! is a success — only transport and service failures are errors, and a
//! missing credential is its own error class so operators can tell "search
//! unavailable" from "no matches".

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;
use tracing::debug;

use crate::config::SearchConfig;
use crate::metrics::METRICS;
use crate::search::models::SearchRecord;

/// Attribute set retrieved for every hit.
pub const RETRIEVED_ATTRIBUTES: [&str; 17] = [
    "objectID",
    "name",
    "brand",
    "colourName",
    "colourCode",
    "alternativeImages",
    "prices",
    "ticketPrice",
    "cleansize",
    "productLink",
    "category",
    "activitygroup",
    "sleevelength",
    "garmentcare",
    "hasInventory",
    "isHidden",
    "sellingPriceGroupValue",
];

/// Search index error types
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search credentials are not configured: {0}")]
    Configuration(String),

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("upstream error: status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Client for the hosted search index
pub struct SearchClient {
    http: Client,
    app_id: String,
    api_key: Secret<String>,
    base_url: String,
    index: String,
}

impl SearchClient {
    /// Create a new search client.
    ///
    /// Fails with [`SearchError::Configuration`] when the application id or
    /// API key is absent — callers decide whether to degrade gracefully.
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let app_id = config.app_id.clone().ok_or_else(|| {
            SearchError::Configuration("ALGOLIA_APP_ID is not set".to_string())
        })?;
        let api_key = config.api_key.clone().ok_or_else(|| {
            SearchError::Configuration("ALGOLIA_API_KEY is not set".to_string())
        })?;

        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| format!("https://{}-dsn.algolia.net", app_id.to_lowercase()));

        Ok(Self {
            http,
            app_id,
            api_key,
            base_url,
            index: config.index_name(),
        })
    }

    /// Execute one search request and return the raw page of hits.
    ///
    /// `page` follows the pagination convention of the callers (first page
    /// is page 1 in their arithmetic); it is passed through to the index as
    /// given. An empty hit list is `Ok`, not an error.
    pub async fn search(
        &self,
        query: &str,
        facet_filters: &[Vec<String>],
        price_filter: Option<&str>,
        hits_per_page: usize,
        page: u32,
    ) -> Result<Vec<SearchRecord>, SearchError> {
        let start = Instant::now();

        let url = format!("{}/1/indexes/{}/query", self.base_url, self.index);

        let mut request_body = json!({
            "query": query,
            "hitsPerPage": hits_per_page,
            "page": page,
            "attributesToRetrieve": RETRIEVED_ATTRIBUTES,
        });
        if !facet_filters.is_empty() {
            request_body["facetFilters"] = json!(facet_filters);
        }
        if let Some(filters) = price_filter {
            request_body["filters"] = json!(filters);
        }

        debug!(
            "Searching index {}: query={:?}, page={}, hitsPerPage={}",
            self.index, query, page, hits_per_page
        );

        let result = self.call_query_api(&url, &request_body).await;

        METRICS.record_search(result.is_ok());
        METRICS
            .search_duration
            .observe(start.elapsed().as_secs_f64());

        result
    }

    async fn call_query_api(
        &self,
        url: &str,
        request_body: &serde_json::Value,
    ) -> Result<Vec<SearchRecord>, SearchError> {
        let response = self
            .http
            .post(url)
            .header("X-Algolia-Application-Id", &self.app_id)
            .header("X-Algolia-API-Key", self.api_key.expose_secret())
            .json(request_body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout(e.to_string())
                } else {
                    SearchError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SearchError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let query_response: QueryResponse = response
            .json()
            .await
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        Ok(query_response.hits)
    }
}

// Response type for the index query API
#[derive(Debug, Deserialize)]
struct QueryResponse {
    hits: Vec<SearchRecord>,
}
