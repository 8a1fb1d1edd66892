use axum::Json;
use serde_json::{Value, json};

/// Service banner at `/`
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Agent AI with Tool-calling API" }))
}
