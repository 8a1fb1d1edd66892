use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};
use toolchat_telemetry::metrics::{self, ATTR_OUTCOME, ATTR_TOOL, TOOL_CALL_COUNT, TOOL_CALL_DURATION};
use toolchat_telemetry::{Counter, Histogram, KeyValue};

use crate::error::ToolError;
use crate::registry::ToolRegistry;

/// Looks up tools by name and runs them
///
/// Every failure is reported as a [`ToolError`]; the underlying error type
/// of a tool never reaches the caller.
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    call_count: Counter<u64>,
    call_duration: Histogram<f64>,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        let meter = metrics::meter();

        Self {
            registry,
            call_count: meter.u64_counter(TOOL_CALL_COUNT).build(),
            call_duration: meter.f64_histogram(TOOL_CALL_DURATION).with_unit("s").build(),
        }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    /// Run the named tool with an already-decoded arguments object
    pub async fn execute(&self, name: &str, arguments: Map<String, Value>) -> Result<Value, ToolError> {
        let start = Instant::now();
        let result = self.run(name, arguments).await;
        self.record(name, start, &result);
        result
    }

    /// Decode model-produced argument text, then run the named tool
    ///
    /// Blank text counts as an empty object. Anything that does not decode
    /// to a JSON object is [`ToolError::InvalidArguments`].
    pub async fn execute_raw(&self, name: &str, raw_arguments: &str) -> Result<Value, ToolError> {
        let start = Instant::now();

        let result = match decode_arguments(name, raw_arguments) {
            Ok(arguments) => self.run(name, arguments).await,
            Err(e) => Err(e),
        };

        self.record(name, start, &result);
        result
    }

    async fn run(&self, name: &str, arguments: Map<String, Value>) -> Result<Value, ToolError> {
        let tool = self
            .registry
            .get(name)
            .ok_or_else(|| ToolError::NotFound { tool: name.to_owned() })?;

        tracing::debug!(tool = %name, "executing tool");

        tool.execute(arguments).await.map_err(|e| ToolError::Execution {
            tool: name.to_owned(),
            cause: format!("{e:#}"),
        })
    }

    fn record(&self, name: &str, start: Instant, result: &Result<Value, ToolError>) {
        let outcome = match result {
            Ok(_) => "success",
            Err(e) => {
                tracing::warn!(tool = %name, error = %e, "tool call failed");
                e.outcome()
            }
        };

        let attributes = [KeyValue::new(ATTR_TOOL, name.to_owned()), KeyValue::new(ATTR_OUTCOME, outcome)];
        self.call_count.add(1, &attributes);
        metrics::record_duration(&self.call_duration, start, &attributes);
    }
}

fn decode_arguments(name: &str, raw: &str) -> Result<Map<String, Value>, ToolError> {
    if raw.trim().is_empty() {
        return Ok(Map::new());
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(arguments)) => Ok(arguments),
        Ok(other) => Err(ToolError::InvalidArguments {
            tool: name.to_owned(),
            cause: format!("expected a JSON object, got {}", json_kind(&other)),
        }),
        Err(e) => Err(ToolError::InvalidArguments {
            tool: name.to_owned(),
            cause: e.to_string(),
        }),
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
