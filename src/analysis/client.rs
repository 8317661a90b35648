//! Client for the vision/language analysis capability
//!
//! Speaks an OpenAI-compatible chat-completions wire format: the full
//! instruction text goes in a system message, the image as an image content
//! part, and the capability must answer with a single JSON object conforming
//! to [`ProductAnalysis`]. Non-conforming output is a hard failure, never
//! coerced.

use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use std::time::Instant;
use tracing::{debug, error};

use crate::analysis::models::{ConversationMessage, ProductAnalysis};
use crate::analysis::prompt;
use crate::analysis::vocab::Vocabularies;
use crate::config::AnalysisConfig;
use crate::metrics::METRICS;

/// Analysis capability error types
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("upstream error: status {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("analysis returned no detected items")]
    EmptyAnalysis,
}

/// Check that an image reference is usable before any external call.
///
/// Accepts a data URL with an image MIME prefix or an http(s) URL.
pub fn validate_image_input(image: &str) -> Result<(), String> {
    if image.trim().is_empty() {
        return Err("No image provided".to_string());
    }

    let is_data_url = image.starts_with("data:image/");
    let is_url = image.starts_with("http://") || image.starts_with("https://");

    if !is_data_url && !is_url {
        return Err("Image must be a valid data URL (base64) or HTTP(S) URL".to_string());
    }

    Ok(())
}

/// Client for the analysis capability
pub struct AnalysisClient {
    http: Client,
    config: AnalysisConfig,
    vocab: Vocabularies,
}

impl AnalysisClient {
    /// Create a new analysis client
    pub fn new(config: AnalysisConfig, vocab: Vocabularies) -> Result<Self, AnalysisError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AnalysisError::RequestFailed(e.to_string()))?;

        Ok(Self {
            http,
            config,
            vocab,
        })
    }

    /// Analyze a product image.
    ///
    /// `prior` is the sanitized conversation so far; `new_refinement` is the
    /// latest user text, appended to the rendered refinement history. The
    /// capability is stateless, so the whole history travels on every call.
    pub async fn analyze(
        &self,
        image: &str,
        prior: &[ConversationMessage],
        new_refinement: Option<&str>,
    ) -> Result<ProductAnalysis, AnalysisError> {
        let start = Instant::now();

        let instructions = prompt::build_instructions(&self.vocab, prior, new_refinement);
        debug!(
            "Requesting analysis: model={}, {} prior messages",
            self.config.model,
            prior.len()
        );

        let result = self.call_analysis_api(image, &instructions).await;

        METRICS.record_analysis(result.is_ok());
        METRICS
            .analysis_duration
            .observe(start.elapsed().as_secs_f64());

        let analysis = result?;
        if analysis.items.is_empty() {
            error!("Analysis capability returned zero items");
            return Err(AnalysisError::EmptyAnalysis);
        }

        Ok(analysis)
    }

    async fn call_analysis_api(
        &self,
        image: &str,
        instructions: &str,
    ) -> Result<ProductAnalysis, AnalysisError> {
        let url = format!("{}/v1/chat/completions", self.config.service_url);

        let request_body = json!({
            "model": self.config.model,
            "response_format": {"type": "json_object"},
            "messages": [
                {"role": "system", "content": instructions},
                {"role": "user", "content": [
                    {"type": "text", "text": "Analyze the product image."},
                    {"type": "image_url", "image_url": {"url": image}}
                ]}
            ]
        });

        let mut req = self.http.post(&url).json(&request_body);

        if let Some(api_key) = &self.config.api_key {
            req = req.bearer_auth(api_key.expose_secret());
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                AnalysisError::Timeout(e.to_string())
            } else {
                AnalysisError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AnalysisError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::InvalidResponse(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AnalysisError::InvalidResponse("no choices in response".to_string()))?;

        serde_json::from_str(&content).map_err(|e| {
            AnalysisError::InvalidResponse(format!("analysis does not conform to schema: {e}"))
        })
    }
}

// Response types for the chat-completions wire format
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}
