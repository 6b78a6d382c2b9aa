//! Model-service client.
//!
//! The agent treats the model as a pure function with latency: a
//! fully-rendered prompt string goes in, a text completion comes back. No
//! streaming contract is required, so `complete` is the loop's single
//! suspension point per model call.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

/// Abstraction over the text-completion service.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete a fully-rendered prompt, returning the raw model text.
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

/// OpenRouter-backed client (OpenAI-compatible chat completions endpoint).
///
/// The rendered prompt is wrapped in a single user message; the first
/// choice's content is returned verbatim.
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
        }
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .client
            .post("https://openrouter.ai/api/v1/chat/completions")
            .bearer_auth(&self.api_key)
            .timeout(Duration::from_secs(120))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Model service error: {} {}", status, detail));
        }

        let payload: Value = response.json().await?;
        let content = payload["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("Model service returned no completion content"))?;

        tracing::debug!(model = %self.model, chars = content.len(), "completion received");
        Ok(content.to_string())
    }
}
