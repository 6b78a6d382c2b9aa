//! API request and response types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::ChatTurn;

/// Response after creating a conversation session.
#[derive(Debug, Clone, Serialize)]
pub struct CreateSessionResponse {
    /// Unique session identifier
    pub id: Uuid,
}

/// Request to send one user message to a session.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    /// The user's free-text query for this turn
    pub message: String,
}

/// Per-turn reply payload.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResponse {
    /// The user-visible answer for this turn
    pub final_answer: String,

    /// The running conversation summary (practically a singleton)
    pub summary: Vec<String>,
}

/// Structured payload for a failed turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnErrorResponse {
    /// User-facing description of why the turn ended early
    pub message: String,

    /// Names of the required fields the invocation lacked, when that is why
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
}

/// Session display state for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    /// Unique session identifier
    pub id: Uuid,

    /// Creation timestamp (RFC 3339)
    pub created_at: String,

    /// Accumulated display transcript
    pub history: Vec<ChatTurn>,

    /// The running conversation summary
    pub summary: Vec<String>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}
