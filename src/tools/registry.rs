//! Tool registry for managing available tools
//!
//! The registry holds every tool exposed over MCP, keyed by name.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::tool::{RelayTool, ToolDescriptor, ToolOutput};
use super::{
    ClassifyIdeaTool, CompleteSessionTool, ContinueConversationTool, MaskSensitiveTool,
    SessionStatusTool, WriteDraftTool,
};
use crate::context::RelayContext;
use crate::core::{RelayError, RelayResult};

/// Registry that holds all available tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn RelayTool>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every relay tool bound to `context`
    pub fn standard(context: Arc<RelayContext>) -> Self {
        let mut registry = Self::new();
        registry.register(MaskSensitiveTool::new(context.clone()));
        registry.register(WriteDraftTool::new(context.clone()));
        registry.register(ClassifyIdeaTool::new(context.clone()));
        registry.register(ContinueConversationTool::new(context.clone()));
        registry.register(CompleteSessionTool::new(context.clone()));
        registry.register(SessionStatusTool::new(context));
        registry
    }

    /// Register a tool, replacing any tool of the same name
    pub fn register<T: RelayTool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        tracing::info!("[ToolRegistry] Registering tool: {}", name);
        self.tools.insert(name, Arc::new(tool));
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn RelayTool>> {
        self.tools.get(name).cloned()
    }

    /// Descriptors of every tool, sorted by name
    pub fn definitions(&self) -> Vec<ToolDescriptor> {
        let mut definitions: Vec<_> = self.tools.values().map(|t| t.descriptor()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Execute a tool by name
    pub async fn execute(&self, name: &str, input: &Value) -> RelayResult<ToolOutput> {
        let tool = self
            .get(name)
            .ok_or_else(|| RelayError::UnknownTool(name.to_string()))?;

        tracing::info!("[ToolRegistry] Executing tool: {}", name);
        tracing::debug!("[ToolRegistry] Input: {}", input);

        let output = tool.execute(input).await?;

        tracing::debug!(
            "[ToolRegistry] Tool {} completed. Is error: {}",
            name,
            output.is_error
        );

        Ok(output)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.tools.keys().collect();
        names.sort();
        f.debug_struct("ToolRegistry").field("tools", &names).finish()
    }
}
