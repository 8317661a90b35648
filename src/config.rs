//! Service configuration
//!
//! Configuration is deserialized from an optional `product-scout.toml` file
//! plus `APP__`-prefixed environment variables, then the well-known plain
//! environment variables (`ALGOLIA_APP_ID`, `ANALYSIS_SERVICE_URL`, ...) are
//! applied on top so deployments can keep their existing variable names.

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use crate::analysis::vocab::Vocabularies;

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub analysis: AnalysisConfig,
    pub search: SearchConfig,
    /// Controlled vocabularies rendered into the analysis instructions.
    pub vocab: Vocabularies,
}

impl Config {
    /// Load configuration from file, prefixed env vars, and plain env vars.
    pub fn load() -> Result<Self, config::ConfigError> {
        let mut cfg: Self = config::Config::builder()
            .add_source(config::File::with_name("product-scout").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        cfg.server = cfg.server.from_env();
        cfg.analysis = cfg.analysis.from_env();
        cfg.search = cfg.search.from_env();
        Ok(cfg)
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Request body limit; image payloads arrive as data URLs.
    pub max_body_bytes: usize,
    /// `development` enables error detail passthrough in envelopes.
    pub environment: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}
fn default_environment() -> String {
    "development".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            environment: default_environment(),
        }
    }
}

impl ServerConfig {
    /// Apply plain environment variable overrides.
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("HOST") {
            self.host = val;
        }
        if let Ok(val) = std::env::var("PORT") {
            if let Ok(port) = val.parse() {
                self.port = port;
            }
        }
        if let Ok(val) = std::env::var("APP_ENV") {
            self.environment = val;
        }
        self
    }

    /// Whether error envelopes may carry underlying failure detail.
    pub fn expose_details(&self) -> bool {
        self.environment == "development"
    }
}

/// Vision/language analysis capability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Base URL of the OpenAI-compatible chat-completions endpoint.
    pub service_url: String,

    /// Bearer token (read from env ANALYSIS_API_KEY if not set).
    pub api_key: Option<Secret<String>>,

    /// Model identifier passed through to the capability.
    pub model: String,

    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

fn default_analysis_url() -> String {
    "http://localhost:8081".to_string()
}
fn default_model() -> String {
    "anthropic/claude-sonnet-4.5".to_string()
}
fn default_analysis_timeout_ms() -> u64 {
    60_000
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            service_url: default_analysis_url(),
            api_key: None,
            model: default_model(),
            timeout_ms: default_analysis_timeout_ms(),
        }
    }
}

impl AnalysisConfig {
    /// Apply plain environment variable overrides.
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("ANALYSIS_SERVICE_URL") {
            self.service_url = val;
        }
        if let Ok(val) = std::env::var("ANALYSIS_API_KEY") {
            self.api_key = Some(Secret::new(val));
        }
        if let Ok(val) = std::env::var("ANALYSIS_MODEL") {
            self.model = val;
        }
        if let Ok(val) = std::env::var("ANALYSIS_TIMEOUT_MS") {
            if let Ok(timeout) = val.parse() {
                self.timeout_ms = timeout;
            }
        }
        self
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Hosted catalog index configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Application identifier; required to construct a client.
    pub app_id: Option<String>,

    /// API key (read from env ALGOLIA_API_KEY if not set).
    pub api_key: Option<Secret<String>>,

    /// Index environment; selects the index name.
    pub environment: String,

    /// Host override; defaults to the standard `<app-id>-dsn` host.
    pub base_url: Option<String>,

    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

fn default_search_environment() -> String {
    "production".to_string()
}
fn default_search_timeout_ms() -> u64 {
    10_000
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            api_key: None,
            environment: default_search_environment(),
            base_url: None,
            timeout_ms: default_search_timeout_ms(),
        }
    }
}

impl SearchConfig {
    /// Apply plain environment variable overrides.
    pub fn from_env(mut self) -> Self {
        if let Ok(val) = std::env::var("ALGOLIA_APP_ID") {
            self.app_id = Some(val);
        }
        if let Ok(val) = std::env::var("ALGOLIA_API_KEY") {
            self.api_key = Some(Secret::new(val));
        }
        if let Ok(val) = std::env::var("ALGOLIA_ENVIRONMENT") {
            self.environment = val;
        }
        if let Ok(val) = std::env::var("ALGOLIA_BASE_URL") {
            self.base_url = Some(val);
        }
        self
    }

    /// Index name for the configured environment.
    pub fn index_name(&self) -> String {
        format!("hof_{}_search", self.environment)
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_body_bytes, 10 * 1024 * 1024);
        assert!(config.expose_details());
    }

    #[test]
    fn test_production_hides_details() {
        let config = ServerConfig {
            environment: "production".to_string(),
            ..Default::default()
        };
        assert!(!config.expose_details());
    }

    #[test]
    fn test_index_name_follows_environment() {
        let config = SearchConfig::default();
        assert_eq!(config.index_name(), "hof_production_search");

        let config = SearchConfig {
            environment: "staging".to_string(),
            ..Default::default()
        };
        assert_eq!(config.index_name(), "hof_staging_search");
    }

    #[test]
    fn test_duration_conversions() {
        let config = AnalysisConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(60_000));

        let config = SearchConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(10_000));
    }
}
