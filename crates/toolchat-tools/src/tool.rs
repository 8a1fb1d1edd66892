use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A named capability the model can invoke
///
/// Tools are trusted in-process code. Failures are reported through the
/// returned error and never panic across the executor.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the model uses to call the tool
    fn name(&self) -> &str;

    /// Description shown to the model
    fn description(&self) -> &str;

    /// JSON Schema describing the arguments object
    fn input_schema(&self) -> Value;

    /// Run the tool with the arguments exactly as the model supplied them
    async fn execute(&self, arguments: Map<String, Value>) -> anyhow::Result<Value>;
}

/// Deserialize a tool's arguments object into a typed struct
pub fn parse_arguments<T: DeserializeOwned>(arguments: Map<String, Value>) -> anyhow::Result<T> {
    serde_json::from_value(Value::Object(arguments)).map_err(|e| anyhow::anyhow!("invalid arguments: {e}"))
}
