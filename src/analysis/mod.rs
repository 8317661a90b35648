//! Product image analysis
//!
//! Attribute schema, instruction rendering, and the client for the external
//! vision/language capability.

pub mod client;
pub mod models;
pub mod prompt;
pub mod vocab;

pub use client::{validate_image_input, AnalysisClient, AnalysisError};
pub use models::{
    ConversationMessage, DetectedItem, Fit, Gender, ProductAnalysis, Prominence, Role,
    SleeveLength,
};
pub use prompt::render_refinement_history;
pub use vocab::Vocabularies;
