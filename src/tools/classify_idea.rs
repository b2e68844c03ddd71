//! classifyIdea tool
//!
//! Starts a conversational exchange with the classification workflow, or
//! advances it when a `sessionId` is given.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::render::turn_output;
use super::tool::{parse_input, RelayTool, ToolOutput};
use crate::context::RelayContext;
use crate::core::RelayResult;
use crate::webhook::CLASSIFY_IDEA;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyIdeaInput {
    text: String,
    #[serde(default)]
    session_id: Option<String>,
}

pub struct ClassifyIdeaTool {
    context: Arc<RelayContext>,
}

impl ClassifyIdeaTool {
    pub fn new(context: Arc<RelayContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl RelayTool for ClassifyIdeaTool {
    fn name(&self) -> &str {
        CLASSIFY_IDEA
    }

    fn description(&self) -> &str {
        "Classifies a blog post idea through a multi-turn conversation. Returns the \
         workflow's reply, the fields it still needs and a session id. Answer follow-up \
         questions with continueConversation until the status is complete."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {"type": "string", "description": "The idea, or an answer to the last question"},
                "sessionId": {
                    "type": "string",
                    "description": "Session to continue (optional; a new one is started when omitted)"
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, input: &Value) -> RelayResult<ToolOutput> {
        let input: ClassifyIdeaInput = parse_input(self.name(), input)?;

        let result = self
            .context
            .orchestrator
            .start_or_advance(CLASSIFY_IDEA, &input.text, input.session_id.as_deref())
            .await;

        turn_output(result)
    }
}
