use serde::{Deserialize, Serialize};

/// Tool description in the shape completion services expect
///
/// `{"type": "function", "function": {"name", "description", "parameters"}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Always `"function"`
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function specification
    pub function: FunctionSchema,
}

impl ToolSchema {
    /// Describe a function tool
    pub fn function(name: impl Into<String>, description: impl Into<String>, parameters: serde_json::Value) -> Self {
        Self {
            tool_type: "function".to_owned(),
            function: FunctionSchema {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// Callable function specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSchema {
    /// Function name
    pub name: String,
    /// Human-readable description shown to the model
    pub description: String,
    /// JSON Schema for the arguments object
    pub parameters: serde_json::Value,
}
