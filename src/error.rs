//! Service-wide error taxonomy

use axum::http::StatusCode;

use crate::analysis::client::AnalysisError;
use crate::search::client::SearchError;

pub type Result<T> = std::result::Result<T, AppError>;

/// Top-level error type for the service.
///
/// Client-specific failures (`AnalysisError`, `SearchError`) convert into
/// this enum at the API boundary; each variant maps to a stable error code
/// and HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("product analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("catalog search failed: {0}")]
    Search(#[source] SearchError),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("a load for this item is already in flight")]
    LoadInProgress,

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::LoadInProgress => StatusCode::CONFLICT,
            Self::Analysis(_) | Self::Search(_) | Self::Configuration(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => crate::api::models::error_codes::VALIDATION_ERROR,
            Self::Analysis(_) => crate::api::models::error_codes::AI_ANALYSIS_ERROR,
            Self::Search(_) => crate::api::models::error_codes::SEARCH_ERROR,
            Self::Configuration(_) => crate::api::models::error_codes::CONFIGURATION_ERROR,
            Self::LoadInProgress => crate::api::models::error_codes::LOAD_IN_PROGRESS,
            Self::Internal(_) => crate::api::models::error_codes::INTERNAL_ERROR,
        }
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        // Missing credentials are an operator problem, not a search outcome.
        match err {
            SearchError::Configuration(msg) => Self::Configuration(msg),
            other => Self::Search(other),
        }
    }
}
