use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use toolchat_core::ToolSchema;

use crate::tool::Tool;

/// Tool summary returned to API clients
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub input_schema: serde_json::Value,
}

/// Name-keyed set of callable tools
///
/// Built once at startup, then shared read-only behind an `Arc`.
/// Enumeration follows registration order until a tool is unregistered;
/// after that the order of the remaining tools may change.
#[derive(Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any tool with the same name
    ///
    /// Returns the replaced tool, if there was one.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Option<Arc<dyn Tool>> {
        let name = tool.name().to_owned();
        let previous = self.tools.insert(name.clone(), tool);

        if previous.is_some() {
            tracing::info!(tool = %name, "replaced registered tool");
        } else {
            tracing::info!(tool = %name, "registered tool");
        }

        previous
    }

    /// Remove a tool, reporting whether it was present
    pub fn unregister(&mut self, name: &str) -> bool {
        let removed = self.tools.swap_remove(name).is_some();
        if removed {
            tracing::info!(tool = %name, "unregistered tool");
        }
        removed
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Registered tool names in enumeration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    /// Snapshot of every registered tool
    pub fn list(&self) -> Vec<ToolInfo> {
        self.tools
            .iter()
            .map(|(name, tool)| ToolInfo {
                name: name.clone(),
                description: tool.description().to_owned(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }

    /// Tool schemas in the function-calling format sent to the model
    pub fn export_for_model(&self) -> Vec<ToolSchema> {
        self.tools
            .iter()
            .map(|(name, tool)| ToolSchema::function(name.clone(), tool.description(), tool.input_schema()))
            .collect()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}
