//! Conversational visual product search service.
//!
//! A client submits a product photo plus optional free-text refinements; a
//! vision-capable language model extracts structured attributes for each
//! visible item, and those attributes are translated into queries against a
//! hosted catalog index. Results are returned per detected item with
//! incremental "load more" pagination.

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod search;

pub use config::Config;
pub use error::{AppError, Result};
