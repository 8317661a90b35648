//! Request/response envelopes for the HTTP API

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::models::{DetectedItem, ProductAnalysis};
use crate::search::models::SearchRecord;
use crate::search::pagination::ItemSearchResult;

/// Analyze request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub image: String,
    /// Raw conversation history; malformed entries are dropped, not fatal.
    #[serde(default)]
    pub messages: Vec<Value>,
    /// The newest free-text refinement, if any.
    #[serde(default)]
    pub user_context: Option<String>,
}

/// Analyze response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub analysis: ProductAnalysis,
    pub results: Vec<ItemSearchResult>,
    pub correlation_id: String,
}

/// Load-more request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadMoreRequest {
    pub detected_item: DetectedItem,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default)]
    pub existing_product_ids: Vec<String>,
}

fn default_page() -> u32 {
    1
}

/// Load-more response body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadMoreResponse {
    /// Already deduplicated against `existing_product_ids`.
    pub products: Vec<SearchRecord>,
    pub search_query: String,
    pub has_more: bool,
    pub correlation_id: String,
}

/// Error envelope returned on every failure path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
    pub correlation_id: String,
    /// Underlying failure detail; only populated in development.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(
        error: impl Into<String>,
        code: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            correlation_id: correlation_id.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Stable error codes carried in error envelopes
pub mod error_codes {
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const AI_ANALYSIS_ERROR: &str = "AI_ANALYSIS_ERROR";
    pub const SEARCH_ERROR: &str = "SEARCH_ERROR";
    pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
    pub const LOAD_IN_PROGRESS: &str = "LOAD_IN_PROGRESS";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

const CORRELATION_SUFFIX_LEN: usize = 7;
const CORRELATION_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Generate a per-request correlation token for cross-referencing logs.
pub fn new_correlation_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..CORRELATION_SUFFIX_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CORRELATION_ALPHABET.len());
            CORRELATION_ALPHABET[idx] as char
        })
        .collect();
    format!("req_{}_{}", Utc::now().timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_correlation_id_format() {
        let id = new_correlation_id();
        let parts: Vec<&str> = id.splitn(3, '_').collect();
        assert_eq!(parts[0], "req");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), CORRELATION_SUFFIX_LEN);
    }

    #[test]
    fn test_correlation_ids_are_unique() {
        assert_ne!(new_correlation_id(), new_correlation_id());
    }

    #[test]
    fn test_load_more_request_defaults() {
        let request: LoadMoreRequest = serde_json::from_value(json!({
            "detectedItem": {
                "productType": "jacket",
                "category": "Clothing",
                "color": "Red"
            }
        }))
        .unwrap();
        assert_eq!(request.page, 1);
        assert!(request.existing_product_ids.is_empty());
    }

    #[test]
    fn test_error_body_hides_details_by_default() {
        let body = ErrorBody::new("boom", "INTERNAL_ERROR", "req_1_abc");
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("details").is_none());

        let body = body.with_details("caused by: upstream");
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["details"], "caused by: upstream");
    }
}
