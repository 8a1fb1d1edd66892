use thiserror::Error;

/// Tool lookup and execution errors
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool is registered under the requested name
    #[error("tool not found: {tool}")]
    NotFound { tool: String },

    /// Arguments were not a JSON object
    #[error("invalid arguments for tool {tool}: {cause}")]
    InvalidArguments { tool: String, cause: String },

    /// The tool ran and failed
    #[error("error executing tool {tool}: {cause}")]
    Execution { tool: String, cause: String },
}

impl ToolError {
    /// Short label used as the `outcome` metric attribute
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::InvalidArguments { .. } => "invalid_arguments",
            Self::Execution { .. } => "error",
        }
    }

    /// Payload folded into the conversation in place of a result
    pub fn to_payload(&self) -> serde_json::Value {
        serde_json::json!({ "error": self.to_string() })
    }
}
