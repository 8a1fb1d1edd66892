use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use toolchat_core::{HttpError, Message};

use crate::error::AgentError;
use crate::orchestrator::Orchestrator;

/// Build the agent router
pub fn agent_router(orchestrator: Arc<Orchestrator>) -> Router {
    Router::new()
        .route("/agent/chat", post(chat))
        .route("/agent/ask", post(ask))
        .with_state(orchestrator)
}

/// Full conversation supplied by the caller
#[derive(Debug, Deserialize)]
struct ChatRequest {
    messages: Vec<Message>,
}

/// Single user message
#[derive(Debug, Deserialize)]
struct AskRequest {
    message: String,
}

#[derive(Debug, Serialize)]
struct ChatResponse {
    response: Message,
}

async fn chat(
    State(orchestrator): State<Arc<Orchestrator>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AgentErrorResponse> {
    if req.messages.is_empty() {
        return Err(AgentError::InvalidRequest("messages must not be empty".to_owned()).into());
    }

    let response = orchestrator.chat(req.messages).await;
    Ok(Json(ChatResponse { response }))
}

async fn ask(
    State(orchestrator): State<Arc<Orchestrator>>,
    Json(req): Json<AskRequest>,
) -> Result<Json<ChatResponse>, AgentErrorResponse> {
    if req.message.trim().is_empty() {
        return Err(AgentError::InvalidRequest("message must not be empty".to_owned()).into());
    }

    let response = orchestrator.chat(vec![Message::user(req.message)]).await;
    Ok(Json(ChatResponse { response }))
}

/// Error response wrapper that implements `IntoResponse`
struct AgentErrorResponse(AgentError);

impl From<AgentError> for AgentErrorResponse {
    fn from(e: AgentError) -> Self {
        Self(e)
    }
}

impl IntoResponse for AgentErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.0.status_code(), Json(self.0.to_json())).into_response()
    }
}
