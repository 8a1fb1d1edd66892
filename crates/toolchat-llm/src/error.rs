use thiserror::Error;

/// Errors that can occur while calling the completion service
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport failure or non-success status from the upstream server
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Upstream answered, but not with a usable completion
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Unexpected internal error
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
