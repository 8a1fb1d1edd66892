#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod builtin;
pub mod error;
pub mod executor;
pub mod registry;
pub mod router;
pub mod tool;

pub use error::ToolError;
pub use executor::ToolExecutor;
pub use registry::{ToolInfo, ToolRegistry};
pub use router::tools_router;
pub use tool::Tool;
