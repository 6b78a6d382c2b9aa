//! HTTP API surface: session lifecycle and per-turn messaging.

mod routes;
mod sessions;
mod types;

pub use routes::{router, AppState};
pub use sessions::{Session, SessionStore};
pub use types::{
    ChatRequest, ChatResponse, CreateSessionResponse, HealthResponse, SessionView,
    TurnErrorResponse,
};

/// Bind and serve the HTTP API until shutdown.
pub async fn serve(state: AppState, host: &str, port: u16) -> anyhow::Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
