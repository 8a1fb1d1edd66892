use http::StatusCode;
use thiserror::Error;
use toolchat_core::HttpError;

/// Errors returned by the agent endpoints
///
/// Orchestration itself never fails; these cover requests that cannot be
/// orchestrated at all.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Request body was well-formed JSON but not a usable conversation
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl HttpError for AgentError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidRequest(_) => "invalid_request_error",
        }
    }

    fn client_message(&self) -> String {
        self.to_string()
    }
}
