//! Router assembly

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{self, AppState};

/// Build the service router.
///
/// `max_body_bytes` bounds request bodies; image payloads arrive inline as
/// data URLs, so the limit is well above typical JSON sizes.
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/api/v1/analyze-product", post(handlers::analyze_product))
        .route(
            "/api/v1/load-more-products",
            post(handlers::load_more_products),
        )
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics_text))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}
