//! HTTP routes for the conversation API.
//!
//! The surface is deliberately narrow: session lifecycle plus one
//! message-per-turn endpoint returning exactly `{final_answer, summary}` or
//! a structured error payload. Nothing about the scratchpad or prompt
//! construction leaks out.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::agent::{AgentExecutor, TurnError};
use crate::config::Config;
use crate::llm::LlmClient;
use crate::tools::ToolRegistry;

use super::sessions::SessionStore;
use super::types::{
    ChatRequest, ChatResponse, CreateSessionResponse, HealthResponse, SessionView,
    TurnErrorResponse,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: Arc<dyn LlmClient>,
    pub tools: Arc<ToolRegistry>,
    pub sessions: SessionStore,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sessions", post(create_session).get(list_sessions))
        .route("/sessions/:id", get(get_session).delete(delete_session))
        .route("/sessions/:id/messages", post(send_message))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn create_session(State(state): State<AppState>) -> Json<CreateSessionResponse> {
    let executor = AgentExecutor::new(
        state.llm.clone(),
        state.tools.clone(),
        state.config.max_iterations,
    );
    let session = state.sessions.create(executor).await;
    tracing::info!(session_id = %session.id, "session created");
    Json(CreateSessionResponse { id: session.id })
}

async fn list_sessions(State(state): State<AppState>) -> Json<Vec<SessionView>> {
    let mut views = Vec::new();
    for session in state.sessions.list().await {
        let executor = session.executor.lock().await;
        views.push(view_of(&session, &executor));
    }
    Json(views)
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, StatusCode> {
    let session = state.sessions.get(id).await.ok_or(StatusCode::NOT_FOUND)?;
    let executor = session.executor.lock().await;
    Ok(Json(view_of(&session, &executor)))
}

async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    if state.sessions.remove(id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<TurnErrorResponse>)> {
    let session = state.sessions.get(id).await.ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(TurnErrorResponse {
                message: format!("Session {} not found", id),
                missing_fields: None,
            }),
        )
    })?;

    // The per-session lock serializes turns: one task owns a session's
    // state at a time.
    let mut executor = session.executor.lock().await;
    match executor.invoke(&request.message).await {
        Ok(reply) => Ok(Json(ChatResponse {
            final_answer: reply.final_answer,
            summary: reply.summary,
        })),
        Err(error) => {
            tracing::warn!(session_id = %id, error = %error, "turn ended with an error");
            let missing_fields = match &error {
                TurnError::MissingArguments(fields) => Some(fields.clone()),
                _ => None,
            };
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(TurnErrorResponse {
                    message: error.to_string(),
                    missing_fields,
                }),
            ))
        }
    }
}

fn view_of(session: &super::sessions::Session, executor: &AgentExecutor) -> SessionView {
    SessionView {
        id: session.id,
        created_at: session.created_at.clone(),
        history: executor.state().history().to_vec(),
        summary: executor.state().summary().to_vec(),
    }
}
