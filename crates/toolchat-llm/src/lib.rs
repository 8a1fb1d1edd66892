//! Completion service client for toolchat
//!
//! [`CompletionService`] is the seam the orchestrator talks to;
//! [`OpenAiCompletionClient`] implements it against any server speaking the
//! `OpenAI` chat completions protocol.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod client;
mod convert;
pub mod error;
pub mod protocol;

use async_trait::async_trait;
use toolchat_core::{Message, ToolSchema};

pub use client::OpenAiCompletionClient;
pub use error::LlmError;

/// A language-model backend that produces the next assistant message
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Complete the conversation
    ///
    /// When `tools` is given the model may answer with tool calls instead of
    /// text; without it the model can only reply in text.
    async fn complete(&self, messages: &[Message], tools: Option<&[ToolSchema]>) -> Result<Message, LlmError>;
}
