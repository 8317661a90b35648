//! Metrics collection for observability

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_with_registry, CounterVec, Histogram,
    Opts, Registry,
};
use std::sync::Arc;

/// Global metrics registry
pub static METRICS: Lazy<Arc<Metrics>> =
    Lazy::new(|| Arc::new(Metrics::new().expect("Failed to initialize metrics")));

/// Metrics collector
pub struct Metrics {
    registry: Registry,

    // API metrics
    pub analyze_requests: CounterVec,
    pub load_more_requests: CounterVec,

    // Upstream capability metrics
    pub analysis_requests: CounterVec,
    pub analysis_duration: Histogram,
    pub search_requests: CounterVec,
    pub search_duration: Histogram,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        let analyze_requests = register_counter_vec_with_registry!(
            Opts::new("analyze_requests_total", "Total analyze requests"),
            &["status"],
            registry
        )?;

        let load_more_requests = register_counter_vec_with_registry!(
            Opts::new("load_more_requests_total", "Total load-more requests"),
            &["status"],
            registry
        )?;

        let analysis_requests = register_counter_vec_with_registry!(
            Opts::new(
                "analysis_requests_total",
                "Total calls to the analysis capability"
            ),
            &["status"],
            registry
        )?;

        let analysis_duration = register_histogram_with_registry!(
            "analysis_request_duration_seconds",
            "Analysis capability request duration in seconds",
            registry
        )?;

        let search_requests = register_counter_vec_with_registry!(
            Opts::new("search_requests_total", "Total calls to the search index"),
            &["status"],
            registry
        )?;

        let search_duration = register_histogram_with_registry!(
            "search_request_duration_seconds",
            "Search index request duration in seconds",
            registry
        )?;

        Ok(Self {
            registry,
            analyze_requests,
            load_more_requests,
            analysis_requests,
            analysis_duration,
            search_requests,
            search_duration,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record_analyze(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        self.analyze_requests.with_label_values(&[status]).inc();
    }

    pub fn record_load_more(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        self.load_more_requests.with_label_values(&[status]).inc();
    }

    pub fn record_analysis(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        self.analysis_requests.with_label_values(&[status]).inc();
    }

    pub fn record_search(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        self.search_requests.with_label_values(&[status]).inc();
    }
}
