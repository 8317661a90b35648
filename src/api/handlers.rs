//! HTTP handlers for the analyze and load-more endpoints

use axum::{extract::State, http::StatusCode, Json};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::analysis::client::{validate_image_input, AnalysisClient};
use crate::analysis::models::{ConversationMessage, DetectedItem};
use crate::api::models::{
    new_correlation_id, AnalyzeRequest, AnalyzeResponse, ErrorBody, LoadMoreRequest,
    LoadMoreResponse,
};
use crate::error::AppError;
use crate::metrics::METRICS;
use crate::search::client::SearchClient;
use crate::search::pagination::{
    self, InFlightLoads, ItemSearchResult, LOAD_MORE_PAGE_SIZE, MULTI_ITEM_PAGE_SIZE,
    SINGLE_ITEM_PAGE_SIZE,
};
use crate::search::query;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub analysis: Arc<AnalysisClient>,
    /// `None` when search credentials are not configured: analyze degrades
    /// to empty product lists, load-more fails with a configuration error.
    pub search: Option<Arc<SearchClient>>,
    pub in_flight: Arc<InFlightLoads>,
    /// Pass underlying failure detail through error envelopes (development).
    pub expose_details: bool,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorBody>)>;

fn error_response(
    err: &AppError,
    correlation_id: &str,
    expose_details: bool,
) -> (StatusCode, Json<ErrorBody>) {
    let mut body = ErrorBody::new(err.to_string(), err.code(), correlation_id);
    if expose_details {
        if let Some(source) = std::error::Error::source(err) {
            body = body.with_details(source.to_string());
        }
    }
    (err.status(), Json(body))
}

/// Analyze a product image and run the initial search per detected item
///
/// POST /api/v1/analyze-product
pub async fn analyze_product(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> ApiResult<AnalyzeResponse> {
    let correlation_id = new_correlation_id();

    info!(
        correlation_id = %correlation_id,
        "Analyze request: image length {}, {} raw messages",
        request.image.len(),
        request.messages.len()
    );

    if let Err(msg) = validate_image_input(&request.image) {
        METRICS.record_analyze(false);
        return Err(error_response(
            &AppError::Validation(msg),
            &correlation_id,
            state.expose_details,
        ));
    }

    let messages = ConversationMessage::sanitize(&request.messages);
    let refinement = request
        .user_context
        .as_deref()
        .filter(|text| !text.trim().is_empty());

    let analysis = match state
        .analysis
        .analyze(&request.image, &messages, refinement)
        .await
    {
        Ok(analysis) => analysis,
        Err(e) => {
            METRICS.record_analyze(false);
            error!(correlation_id = %correlation_id, "Analysis failed: {e}");
            return Err(error_response(
                &AppError::Analysis(e),
                &correlation_id,
                state.expose_details,
            ));
        }
    };

    info!(
        correlation_id = %correlation_id,
        "Analysis detected {} items",
        analysis.items.len()
    );

    // Initial searches are independent of each other; fan out and settle
    // them all before responding. One item failing must not fail the rest.
    let hits_per_page = if analysis.items.len() > 1 {
        MULTI_ITEM_PAGE_SIZE
    } else {
        SINGLE_ITEM_PAGE_SIZE
    };

    let search = state.search.as_deref();
    let results = join_all(
        analysis
            .items
            .iter()
            .map(|item| initial_search(search, item, hits_per_page, &correlation_id)),
    )
    .await;

    METRICS.record_analyze(true);

    Ok(Json(AnalyzeResponse {
        analysis,
        results,
        correlation_id,
    }))
}

/// First-page search for one detected item, degrading to an empty list.
async fn initial_search(
    search: Option<&SearchClient>,
    item: &DetectedItem,
    hits_per_page: usize,
    correlation_id: &str,
) -> ItemSearchResult {
    let search_query = query::build_search_query(item);
    let facet_filters = query::build_attribute_filters(item);
    let price_filter = query::build_price_filter(item);

    let records = match search {
        None => {
            warn!(
                correlation_id = %correlation_id,
                "Search credentials not configured; returning no products for {:?}",
                item.product_type
            );
            Vec::new()
        }
        Some(client) => {
            match client
                .search(
                    &search_query,
                    &facet_filters,
                    price_filter.as_deref(),
                    hits_per_page,
                    0,
                )
                .await
            {
                Ok(records) => records,
                Err(e) => {
                    warn!(
                        correlation_id = %correlation_id,
                        "Initial search failed for {:?}, degrading to empty list: {e}",
                        item.product_type
                    );
                    Vec::new()
                }
            }
        }
    };

    ItemSearchResult::new(item.clone(), search_query, records, hits_per_page)
}

/// Fetch one more page of products for a single detected item
///
/// POST /api/v1/load-more-products
pub async fn load_more_products(
    State(state): State<AppState>,
    Json(request): Json<LoadMoreRequest>,
) -> ApiResult<LoadMoreResponse> {
    let correlation_id = new_correlation_id();
    let item = &request.detected_item;

    let search_query = query::build_search_query(item);
    let facet_filters = query::build_attribute_filters(item);
    let price_filter = query::build_price_filter(item);

    if let Some(filter) = &price_filter {
        info!(correlation_id = %correlation_id, "Applying price filter: {filter}");
    }

    let Some(client) = state.search.as_deref() else {
        METRICS.record_load_more(false);
        return Err(error_response(
            &AppError::Configuration("search credentials are not configured".to_string()),
            &correlation_id,
            state.expose_details,
        ));
    };

    // Busy flag keyed by item identity: a duplicate trigger while a load is
    // in flight would race the same page.
    let key = pagination::item_key(item);
    let Some(_token) = state.in_flight.try_begin(&key) else {
        METRICS.record_load_more(false);
        warn!(correlation_id = %correlation_id, "Rejecting concurrent load for item key {key}");
        return Err(error_response(
            &AppError::LoadInProgress,
            &correlation_id,
            state.expose_details,
        ));
    };

    let raw = match client
        .search(
            &search_query,
            &facet_filters,
            price_filter.as_deref(),
            LOAD_MORE_PAGE_SIZE,
            request.page,
        )
        .await
    {
        Ok(raw) => raw,
        Err(e) => {
            METRICS.record_load_more(false);
            error!(correlation_id = %correlation_id, "Load-more search failed: {e}");
            return Err(error_response(
                &AppError::from(e),
                &correlation_id,
                state.expose_details,
            ));
        }
    };

    let raw_len = raw.len();
    let products = pagination::dedup_new_records(&request.existing_product_ids, raw);
    let has_more = pagination::page_has_more(raw_len, products.len(), LOAD_MORE_PAGE_SIZE);

    info!(
        correlation_id = %correlation_id,
        "Loaded {} products, {} unique",
        raw_len,
        products.len()
    );
    METRICS.record_load_more(true);

    Ok(Json(LoadMoreResponse {
        products,
        search_query,
        has_more,
        correlation_id,
    }))
}

/// Liveness probe
///
/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Prometheus text exposition
///
/// GET /metrics
pub async fn metrics_text() -> Result<String, (StatusCode, String)> {
    let encoder = prometheus::TextEncoder::new();
    encoder
        .encode_to_string(&METRICS.registry().gather())
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
}
