//! Insurance Agent - HTTP server entry point.
//!
//! Starts the HTTP server that exposes the conversation API.

use std::sync::Arc;

use insurance_agent::api::{self, AppState, SessionStore};
use insurance_agent::config::Config;
use insurance_agent::dataset::PolicyStore;
use insurance_agent::llm::{LlmClient, OpenRouterClient};
use insurance_agent::tools::ToolRegistry;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "insurance_agent=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration: model={}", config.model);

    // Load the static policy dataset
    let dataset = Arc::new(PolicyStore::load(&config.dataset_path)?);
    info!(
        "Loaded {} policies from {}",
        dataset.len(),
        config.dataset_path.display()
    );

    // Wire the model client and the tool registry
    let llm: Arc<dyn LlmClient> = Arc::new(OpenRouterClient::new(
        config.api_key.clone(),
        config.model.clone(),
    ));
    let tools = Arc::new(ToolRegistry::with_default_tools(
        dataset,
        llm.clone(),
        config.serpapi_api_key.clone(),
    ));

    // Start the HTTP server
    let host = config.host.clone();
    let port = config.port;
    let state = AppState {
        config: Arc::new(config),
        llm,
        tools,
        sessions: SessionStore::new(),
    };
    api::serve(state, &host, port).await
}
