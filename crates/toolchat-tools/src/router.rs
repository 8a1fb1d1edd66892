use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::registry::{ToolInfo, ToolRegistry};

/// Build the tool listing router
pub fn tools_router(registry: Arc<ToolRegistry>) -> Router {
    Router::new().route("/tools", get(list_tools)).with_state(registry)
}

#[derive(Debug, Serialize)]
struct ListToolsResponse {
    tools: Vec<ToolInfo>,
}

async fn list_tools(State(registry): State<Arc<ToolRegistry>>) -> Json<ListToolsResponse> {
    Json(ListToolsResponse { tools: registry.list() })
}

