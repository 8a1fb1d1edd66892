//! Tool-calling conversation orchestration
//!
//! The [`Orchestrator`] asks the completion service for a reply, runs at
//! most one round of requested tool calls through the
//! [`ToolExecutor`](toolchat_tools::ToolExecutor), folds the results back
//! into the conversation and asks for a final answer.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod error;
pub mod orchestrator;
pub mod router;

pub use error::AgentError;
pub use orchestrator::{DEFAULT_SUMMARY_INSTRUCTION, Orchestrator, Phase, ToolCallResult};
pub use router::agent_router;
