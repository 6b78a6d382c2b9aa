//! Configuration management for the insurance agent.
//!
//! Configuration can be set via environment variables:
//! - `OPENROUTER_API_KEY` - Required. API key for the model service.
//! - `DEFAULT_MODEL` - Optional. The default LLM model to use. Defaults to
//!   `anthropic/claude-sonnet-4.5`.
//! - `POLICY_DATASET_PATH` - Optional. Path to the policy dataset JSON file.
//!   Defaults to `data/policies.json`.
//! - `SERPAPI_API_KEY` - Optional. Key for the online policy search tool;
//!   without it the search tool reports a configuration error when invoked.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `MAX_ITERATIONS` - Optional. Agent loop safety ceiling. Defaults to `5`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the model service
    pub api_key: String,

    /// Default LLM model identifier (OpenRouter format)
    pub model: String,

    /// Path to the policy dataset JSON file
    pub dataset_path: PathBuf,

    /// SerpApi key for the online search tool
    pub serpapi_api_key: Option<String>,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `OPENROUTER_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| ConfigError::MissingEnvVar("OPENROUTER_API_KEY".to_string()))?;

        let model = std::env::var("DEFAULT_MODEL")
            .unwrap_or_else(|_| "anthropic/claude-sonnet-4.5".to_string());

        let dataset_path = std::env::var("POLICY_DATASET_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data/policies.json"));

        let serpapi_api_key = std::env::var("SERPAPI_API_KEY").ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let max_iterations = std::env::var("MAX_ITERATIONS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("MAX_ITERATIONS".to_string(), format!("{}", e)))?;

        Ok(Self {
            api_key,
            model,
            dataset_path,
            serpapi_api_key,
            host,
            port,
            max_iterations,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, model: String, dataset_path: PathBuf) -> Self {
        Self {
            api_key,
            model,
            dataset_path,
            serpapi_api_key: None,
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_iterations: 5,
        }
    }
}
