//! continueConversation tool

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::render::turn_output;
use super::tool::{parse_input, RelayTool, ToolOutput};
use crate::context::RelayContext;
use crate::core::RelayResult;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContinueConversationInput {
    session_id: String,
    user_input: String,
}

/// Sends the caller's answer into an existing session, whatever its tool
pub struct ContinueConversationTool {
    context: Arc<RelayContext>,
}

impl ContinueConversationTool {
    pub fn new(context: Arc<RelayContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl RelayTool for ContinueConversationTool {
    fn name(&self) -> &str {
        "continueConversation"
    }

    fn description(&self) -> &str {
        "Continues an existing conversation session with the caller's answer."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "sessionId": {"type": "string", "description": "Session id returned by an earlier turn"},
                "userInput": {"type": "string", "description": "Answer to the last question"}
            },
            "required": ["sessionId", "userInput"]
        })
    }

    async fn execute(&self, input: &Value) -> RelayResult<ToolOutput> {
        let input: ContinueConversationInput = parse_input(self.name(), input)?;

        let result = self
            .context
            .orchestrator
            .continue_session(&input.session_id, &input.user_input)
            .await;

        turn_output(result)
    }
}
