//! OpenAI-compatible completion client

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use toolchat_config::LlmConfig;
use toolchat_core::{Message, ToolSchema};
use toolchat_telemetry::metrics::{self, ATTR_OUTCOME, CHAT_COMPLETION_COUNT, CHAT_COMPLETION_DURATION};
use toolchat_telemetry::{Counter, Histogram, KeyValue};
use url::Url;

use crate::CompletionService;
use crate::error::LlmError;
use crate::protocol::{OpenAiRequest, OpenAiResponse};

/// Client for any server exposing `POST {base_url}/chat/completions`
pub struct OpenAiCompletionClient {
    client: Client,
    base_url: Url,
    model: String,
    api_key: Option<SecretString>,
    temperature: Option<f64>,
    max_tokens: Option<u32>,
    request_count: Counter<u64>,
    request_duration: Histogram<f64>,
}

impl OpenAiCompletionClient {
    /// Create from the `[llm]` configuration section
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_duration()? {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {e}"))?;

        let meter = metrics::meter();

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            api_key: config.effective_api_key().cloned(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            request_count: meter.u64_counter(CHAT_COMPLETION_COUNT).build(),
            request_duration: meter.f64_histogram(CHAT_COMPLETION_DURATION).with_unit("s").build(),
        })
    }

    /// Model identifier sent with every request
    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    fn build_request(&self, messages: &[Message], tools: Option<&[ToolSchema]>) -> OpenAiRequest {
        // An empty tools array is rejected by several servers
        let tools = tools.filter(|tools| !tools.is_empty());

        OpenAiRequest {
            model: self.model.clone(),
            messages: messages.iter().map(Into::into).collect(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            tools: tools.map(|tools| tools.iter().map(Into::into).collect()),
            tool_choice: tools.map(|_| serde_json::Value::from("auto")),
            stream: false,
        }
    }

    async fn send(&self, request: &OpenAiRequest) -> Result<Message, LlmError> {
        let mut builder = self.client.post(self.completions_url()).json(request);

        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(model = %self.model, error = %e, "completion request failed");
            LlmError::Upstream(e.to_string())
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(model = %self.model, status = %status, "completion service returned error");
            return Err(LlmError::Upstream(format!("completion service returned {status}: {body}")));
        }

        let wire_response: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to parse response: {e}")))?;

        let choice = wire_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response contained no choices".to_owned()))?;

        Ok(choice.message.into())
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletionClient {
    async fn complete(&self, messages: &[Message], tools: Option<&[ToolSchema]>) -> Result<Message, LlmError> {
        let request = self.build_request(messages, tools);

        tracing::debug!(
            model = %self.model,
            messages = request.messages.len(),
            tools = request.tools.as_ref().map_or(0, Vec::len),
            "sending completion request"
        );

        let start = Instant::now();
        let result = self.send(&request).await;

        let outcome = if result.is_ok() { "success" } else { "error" };
        let attributes = [KeyValue::new(ATTR_OUTCOME, outcome)];
        self.request_count.add(1, &attributes);
        metrics::record_duration(&self.request_duration, start, &attributes);

        result
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use toolchat_core::Role;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn test_client(base_url: &str, api_key: Option<&str>) -> OpenAiCompletionClient {
        let config = LlmConfig {
            base_url: Url::parse(base_url).unwrap(),
            model: "test-model".to_owned(),
            api_key: api_key.map(|key| SecretString::from(key.to_owned())),
            timeout: Some("5s".to_owned()),
            ..LlmConfig::default()
        };

        OpenAiCompletionClient::new(&config).unwrap()
    }

    fn text_reply(text: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 1,
            "model": "test-model",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }]
        })
    }

    fn calculate_schema() -> ToolSchema {
        ToolSchema::function(
            "calculate",
            "Evaluate an arithmetic expression",
            json!({"type": "object", "properties": {"expression": {"type": "string"}}, "required": ["expression"]}),
        )
    }

    #[tokio::test]
    async fn returns_plain_reply() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(json!({"model": "test-model", "stream": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_reply("Hello!")))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&format!("{}/v1", server.uri()), None);
        let reply = client.complete(&[Message::user("hi")], None).await.unwrap();

        assert_eq!(reply, Message::assistant("Hello!"));
    }

    #[tokio::test]
    async fn sends_tools_with_auto_choice() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "tool_choice": "auto",
                "tools": [{"type": "function", "function": {"name": "calculate"}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-2",
                "model": "test-model",
                "choices": [{
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_1",
                            "type": "function",
                            "function": {"name": "calculate", "arguments": "{\"expression\":\"2+2\"}"}
                        }]
                    },
                    "finish_reason": "tool_calls"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), None);
        let tools = [calculate_schema()];
        let reply = client.complete(&[Message::user("2+2?")], Some(&tools[..])).await.unwrap();

        assert_eq!(reply.role, Role::Assistant);
        assert!(reply.content.is_none());
        let calls = reply.requested_tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "call_1");
        assert_eq!(calls[0].function.name, "calculate");
        assert_eq!(calls[0].function.arguments, r#"{"expression":"2+2"}"#);
    }

    #[tokio::test]
    async fn omits_tool_fields_without_schemas() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_reply("Summary")))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), None);
        client.complete(&[Message::user("hi")], Some(&[][..])).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
    }

    #[tokio::test]
    async fn sends_bearer_token() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(text_reply("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), Some("sk-test"));
        client.complete(&[Message::user("hi")], None).await.unwrap();
    }

    #[tokio::test]
    async fn error_status_is_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), None);
        let err = client.complete(&[Message::user("hi")], None).await.unwrap_err();

        assert!(matches!(err, LlmError::Upstream(ref msg) if msg.contains("model not loaded")));
    }

    #[tokio::test]
    async fn empty_choices_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "x", "model": "m", "choices": []})))
            .mount(&server)
            .await;

        let client = test_client(&server.uri(), None);
        let err = client.complete(&[Message::user("hi")], None).await.unwrap_err();

        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_server_is_upstream_error() {
        let client = test_client("http://127.0.0.1:1", None);
        let err = client.complete(&[Message::user("hi")], None).await.unwrap_err();

        assert!(matches!(err, LlmError::Upstream(_)));
    }

    #[test]
    fn rejects_bad_timeout() {
        let config = LlmConfig {
            timeout: Some("whenever".to_owned()),
            ..LlmConfig::default()
        };

        assert!(matches!(OpenAiCompletionClient::new(&config), Err(LlmError::Internal(_))));
    }
}
