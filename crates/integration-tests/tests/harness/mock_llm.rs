//! Mock completion service for integration tests
//!
//! Serves `POST /v1/chat/completions`, answering with scripted assistant
//! messages in order and recording every request body it receives.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Scripted reply for a single completion request
pub enum Reply {
    /// Plain assistant text
    Text(String),
    /// Assistant message requesting the given `(id, name, arguments)` calls
    ToolCalls(Vec<(String, String, String)>),
    /// Upstream failure with status 500
    Fail,
}

impl Reply {
    pub fn text(content: &str) -> Self {
        Self::Text(content.to_owned())
    }

    pub fn tool_call(id: &str, name: &str, arguments: &str) -> Self {
        Self::ToolCalls(vec![(id.to_owned(), name.to_owned(), arguments.to_owned())])
    }
}

/// Mock backend that replays a script of replies
pub struct MockLlm {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockLlmState>,
}

struct MockLlmState {
    script: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<Value>>,
}

impl MockLlm {
    /// Start a mock that answers every request with the default text
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_with_script(Vec::new()).await
    }

    /// Start a mock that answers requests with `script` in order
    ///
    /// Once the script is exhausted it falls back to a default text reply.
    pub async fn start_with_script(script: Vec<Reply>) -> anyhow::Result<Self> {
        let state = Arc::new(MockLlmState {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/chat/completions", routing::post(handle_chat_completions))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the completion service
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Request bodies received so far
    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for MockLlm {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn handle_chat_completions(State(state): State<Arc<MockLlmState>>, Json(req): Json<Value>) -> impl IntoResponse {
    let model = req["model"].clone();
    state.requests.lock().unwrap().push(req);

    let reply = state
        .script
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Reply::text("Hello from mock LLM"));

    let (message, finish_reason) = match reply {
        Reply::Text(content) => (json!({"role": "assistant", "content": content}), "stop"),
        Reply::ToolCalls(calls) => {
            let tool_calls: Vec<Value> = calls
                .into_iter()
                .map(|(id, name, arguments)| {
                    json!({
                        "id": id,
                        "type": "function",
                        "function": {"name": name, "arguments": arguments}
                    })
                })
                .collect();
            (
                json!({"role": "assistant", "content": null, "tool_calls": tool_calls}),
                "tool_calls",
            )
        }
        Reply::Fail => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": {
                        "message": "mock server intentional failure",
                        "type": "server_error"
                    }
                })),
            )
                .into_response();
        }
    };

    Json(json!({
        "id": "chatcmpl-test-123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": model,
        "choices": [{"index": 0, "message": message, "finish_reason": finish_reason}],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    }))
    .into_response()
}
