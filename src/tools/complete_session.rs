//! completeSession tool
//!
//! Renders a finished session's result and sends the completion call.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::render::pretty;
use super::tool::{parse_input, RelayTool, ToolOutput};
use crate::context::RelayContext;
use crate::conversation::PENDING_MESSAGE;
use crate::core::{RelayError, RelayResult};
use crate::webhook::WebhookResult;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompleteSessionInput {
    session_id: String,
}

pub struct CompleteSessionTool {
    context: Arc<RelayContext>,
}

impl CompleteSessionTool {
    pub fn new(context: Arc<RelayContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl RelayTool for CompleteSessionTool {
    fn name(&self) -> &str {
        "completeSession"
    }

    fn description(&self) -> &str {
        "Finishes a completed conversation session: returns its final result and sends the \
         completion summary to the workflow."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "sessionId": {"type": "string", "description": "Session to complete"}
            },
            "required": ["sessionId"]
        })
    }

    async fn execute(&self, input: &Value) -> RelayResult<ToolOutput> {
        let input: CompleteSessionInput = parse_input(self.name(), input)?;

        let completed = match self.context.finalizer.complete(&input.session_id).await {
            Ok(completed) => completed,
            Err(RelayError::SessionNotComplete(id)) => {
                return Ok(ToolOutput::error(format!("{} (session {})", PENDING_MESSAGE, id)));
            }
            Err(e) => return Err(e),
        };

        let output = match &completed.webhook_result {
            WebhookResult::Success(data) => ToolOutput::success(format!(
                "Conversation result:\n{}\n\nCompletion sent:\n{}",
                completed.formatted,
                pretty(data)
            )),
            WebhookResult::Failure(e) => ToolOutput::error(format!(
                "Conversation result:\n{}\n\nCompletion call failed: {}",
                completed.formatted, e
            )),
        };

        Ok(output)
    }
}
