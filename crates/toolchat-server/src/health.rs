use axum::Json;
use serde_json::{Value, json};

/// Health check handler
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}
