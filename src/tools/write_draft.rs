//! writeDraft tool

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::render::webhook_output;
use super::tool::{parse_input, RelayTool, ToolOutput};
use crate::context::RelayContext;
use crate::core::RelayResult;
use crate::webhook::WRITE_DRAFT;

/// Arguments are forwarded to the workflow unchanged
#[derive(Debug, Serialize, Deserialize)]
struct WriteDraftInput {
    title: String,
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tags: Option<Vec<String>>,
}

pub struct WriteDraftTool {
    context: Arc<RelayContext>,
}

impl WriteDraftTool {
    pub fn new(context: Arc<RelayContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl RelayTool for WriteDraftTool {
    fn name(&self) -> &str {
        WRITE_DRAFT
    }

    fn description(&self) -> &str {
        "Generates a complete blog post draft from a title and source content, with a \
         structured introduction, body and conclusion."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "title": {"type": "string", "description": "Title of the draft"},
                "content": {"type": "string", "description": "Material the draft is written from"},
                "keywords": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Target keywords (optional)"
                },
                "category": {"type": "string", "description": "Category (optional)"},
                "tags": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Tags (optional)"
                }
            },
            "required": ["title", "content"]
        })
    }

    async fn execute(&self, input: &Value) -> RelayResult<ToolOutput> {
        let input: WriteDraftInput = parse_input(self.name(), input)?;
        let payload = serde_json::to_value(&input)?;

        let result = self.context.transport.invoke(WRITE_DRAFT, &payload).await;

        Ok(webhook_output("Draft written", "Draft writing failed", &result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RelayError, WebhookError};
    use crate::tools::test_support::scripted_context;
    use crate::webhook::WebhookResult;

    #[tokio::test]
    async fn test_forwards_arguments() {
        let (context, transport) =
            scripted_context(vec![WebhookResult::Success(json!({"draft": "# Vision AI"}))]);
        let tool = WriteDraftTool::new(context);

        let output = tool
            .execute(&json!({
                "title": "Vision AI",
                "content": "store analytics",
                "keywords": ["cctv"],
            }))
            .await
            .unwrap();

        assert!(!output.is_error);
        assert!(output.text.starts_with("Draft written:\n"));

        let calls = transport.calls();
        assert_eq!(calls[0].0, "writeDraft");
        assert_eq!(
            calls[0].1,
            json!({"title": "Vision AI", "content": "store analytics", "keywords": ["cctv"]})
        );
    }

    #[tokio::test]
    async fn test_network_failure() {
        let (context, _) = scripted_context(vec![WebhookResult::Failure(WebhookError::Network(
            "connection refused".into(),
        ))]);
        let tool = WriteDraftTool::new(context);

        let output = tool
            .execute(&json!({"title": "t", "content": "c"}))
            .await
            .unwrap();

        assert_eq!(
            output,
            ToolOutput::error("Draft writing failed: Network error: connection refused")
        );
    }

    #[tokio::test]
    async fn test_requires_title() {
        let (context, _) = scripted_context(vec![]);
        let tool = WriteDraftTool::new(context);

        assert!(matches!(
            tool.execute(&json!({"content": "c"})).await,
            Err(RelayError::InvalidArguments(_))
        ));
    }
}
