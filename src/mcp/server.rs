//! MCP server handler
//!
//! Exposes the tool registry over rmcp: `tools/list` returns every
//! registered tool, `tools/call` dispatches to the registry.

use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ErrorCode, ErrorData, Implementation,
    JsonObject, ListToolsResult, PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use serde_json::Value;

use crate::core::RelayError;
use crate::tools::{ToolDescriptor, ToolOutput, ToolRegistry};

const INSTRUCTIONS: &str = "Relays blog tooling requests to n8n workflows. One-shot tools: \
maskSensitive, writeDraft. Conversational tools keep a session: start with classifyIdea, \
answer with continueConversation, finish with completeSession.";

/// rmcp handler backed by a `ToolRegistry`
#[derive(Clone)]
pub struct RelayServer {
    registry: Arc<ToolRegistry>,
}

impl RelayServer {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    /// MCP tool definitions, sorted by name
    pub fn tools(&self) -> Vec<Tool> {
        self.registry.definitions().iter().map(tool_definition).collect()
    }

    /// Run one `tools/call`
    pub async fn call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        let input = Value::Object(arguments.unwrap_or_default());

        match self.registry.execute(name, &input).await {
            Ok(output) => Ok(call_result(output)),
            Err(e) => {
                tracing::error!("[MCPServer] Tool '{}' failed: {}", name, e);
                Err(error_data(e))
            }
        }
    }
}

impl std::fmt::Debug for RelayServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayServer")
            .field("registry", &self.registry)
            .finish()
    }
}

impl ServerHandler for RelayServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(INSTRUCTIONS.to_string()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, ErrorData> {
        self.call(&request.name, request.arguments).await
    }
}

/// Convert a registry descriptor to an MCP tool definition
pub fn tool_definition(descriptor: &ToolDescriptor) -> Tool {
    let input_schema = match &descriptor.input_schema {
        Value::Object(schema) => schema.clone(),
        _ => JsonObject::new(),
    };

    Tool {
        name: descriptor.name.clone().into(),
        title: None,
        description: Some(descriptor.description.clone().into()),
        input_schema: Arc::new(input_schema),
        output_schema: None,
        annotations: None,
        icons: None,
        meta: None,
    }
}

fn call_result(output: ToolOutput) -> CallToolResult {
    let content = vec![Content::text(output.text)];
    if output.is_error {
        CallToolResult::error(content)
    } else {
        CallToolResult::success(content)
    }
}

/// Map a relay error onto an MCP protocol error
pub fn error_data(error: RelayError) -> ErrorData {
    match error {
        RelayError::UnknownTool(name) => {
            ErrorData::new(ErrorCode::METHOD_NOT_FOUND, format!("Unknown tool: {}", name), None)
        }
        RelayError::InvalidArguments(msg) => {
            ErrorData::invalid_params(format!("Invalid arguments: {}", msg), None)
        }
        err @ RelayError::SessionAlreadyComplete(_) => ErrorData::invalid_params(err.to_string(), None),
        other => ErrorData::internal_error(format!("Tool execution failed: {}", other), None),
    }
}
