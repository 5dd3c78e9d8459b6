//! Tool registry adapter.
//!
//! The scheduler depends only on the minimal lookup surface defined
//! here; richer discovery behavior (MCP, dynamic registration) lives in
//! the host and is out of scope.

use std::collections::HashMap;
use std::sync::Arc;

use crate::tool::DeclarativeTool;

/// The narrow registry interface the scheduler consumes.
pub trait ToolRegistry: Send + Sync {
    /// Resolve a tool by its registry name.
    fn get_tool(&self, name: &str) -> Option<Arc<dyn DeclarativeTool>>;

    /// All known tool names, used for suggestions.
    fn tool_names(&self) -> Vec<String>;
}

/// A fixed, map-backed registry.
///
/// Suitable for embedders with a static tool set and for tests. Names
/// are listed in registration order.
#[derive(Default)]
pub struct StaticToolRegistry {
    tools: HashMap<String, Arc<dyn DeclarativeTool>>,
    order: Vec<String>,
}

impl StaticToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool under its own name, replacing any previous
    /// registration.
    pub fn register(&mut self, tool: Arc<dyn DeclarativeTool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check whether no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl ToolRegistry for StaticToolRegistry {
    fn get_tool(&self, name: &str) -> Option<Arc<dyn DeclarativeTool>> {
        self.tools.get(name).cloned()
    }

    fn tool_names(&self) -> Vec<String> {
        self.order.clone()
    }
}

#[cfg(test)]
#[path = "registry.test.rs"]
mod tests;
