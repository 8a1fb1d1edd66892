//! Shared types for toolchat
//!
//! Holds the conversation message model exchanged between the HTTP layer,
//! the orchestrator and the completion client. [`ToolSchema`] describes a
//! tool to the model; [`HttpError`] is implemented by error enums that route
//! handlers render as responses.

#![allow(clippy::must_use_candidate)]

mod error;
mod message;
mod schema;

pub use error::HttpError;
pub use message::{FunctionCall, Message, Role, ToolCall};
pub use schema::{FunctionSchema, ToolSchema};
