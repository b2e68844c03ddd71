//! Tool route table
//!
//! Maps a tool name to the webhook path segment it posts to, and to the
//! phase tag sent as `status` on conversational turns.

use std::collections::HashMap;

/// Conversational idea classification
pub const CLASSIFY_IDEA: &str = "classifyIdea";

/// One-shot sensitive information masking
pub const MASK_SENSITIVE: &str = "maskSensitive";

/// One-shot blog draft writing
pub const WRITE_DRAFT: &str = "writeDraft";

/// A single tool's webhook route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolRoute {
    /// Tool name as callers know it (e.g. `classifyIdea`)
    pub tool_name: String,

    /// Path segment appended to the base URL (e.g. `classify-idea`)
    pub path: String,

    /// Value of `status` on conversational turns
    pub phase: String,
}

impl ToolRoute {
    /// Create a route whose phase tag is the tool name itself
    pub fn new(tool_name: impl Into<String>, path: impl Into<String>) -> Self {
        let tool_name = tool_name.into();
        Self {
            phase: tool_name.clone(),
            tool_name,
            path: path.into(),
        }
    }

    /// Override the phase tag
    pub fn with_phase(mut self, phase: impl Into<String>) -> Self {
        self.phase = phase.into();
        self
    }
}

/// Table of known tool routes
#[derive(Debug, Clone, Default)]
pub struct ToolRoutes {
    routes: HashMap<String, ToolRoute>,
}

impl ToolRoutes {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The routes served by the n8n workflows this relay fronts
    pub fn standard() -> Self {
        let mut routes = Self::new();
        routes.insert(ToolRoute::new(CLASSIFY_IDEA, "classify-idea").with_phase("classify-idea"));
        routes.insert(ToolRoute::new(MASK_SENSITIVE, "mask-sensitive"));
        routes.insert(ToolRoute::new(WRITE_DRAFT, "write-draft"));
        routes
    }

    /// Add or replace a route
    pub fn insert(&mut self, route: ToolRoute) {
        tracing::debug!(
            "[ToolRoutes] Registering route '{}' -> /{}",
            route.tool_name,
            route.path
        );
        self.routes.insert(route.tool_name.clone(), route);
    }

    /// Get a route by tool name
    pub fn get(&self, tool_name: &str) -> Option<&ToolRoute> {
        self.routes.get(tool_name)
    }

    /// Check if a tool has a route
    pub fn contains(&self, tool_name: &str) -> bool {
        self.routes.contains_key(tool_name)
    }

    /// Tool names, sorted
    pub fn tool_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.routes.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
