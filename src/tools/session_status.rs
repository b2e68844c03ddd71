//! sessionStatus tool
//!
//! Read-only inspection. Uses `peek`, so looking at a session does not
//! keep it alive.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::render::{session_details, session_line};
use super::tool::{parse_input, RelayTool, ToolOutput};
use crate::context::RelayContext;
use crate::core::{RelayError, RelayResult};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionStatusInput {
    #[serde(default)]
    session_id: Option<String>,
}

pub struct SessionStatusTool {
    context: Arc<RelayContext>,
}

impl SessionStatusTool {
    pub fn new(context: Arc<RelayContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl RelayTool for SessionStatusTool {
    fn name(&self) -> &str {
        "sessionStatus"
    }

    fn description(&self) -> &str {
        "Shows one conversation session, or lists all active sessions when no id is given."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "sessionId": {"type": "string", "description": "Session to inspect (optional)"}
            }
        })
    }

    async fn execute(&self, input: &Value) -> RelayResult<ToolOutput> {
        let input: SessionStatusInput = if input.is_null() {
            SessionStatusInput::default()
        } else {
            parse_input(self.name(), input)?
        };

        if let Some(id) = input.session_id.filter(|id| !id.is_empty()) {
            let session = self
                .context
                .store
                .peek(&id)
                .ok_or(RelayError::SessionNotFound(id))?;
            let result = self.context.formatter.format_or_pending(&session.id)?;
            return Ok(ToolOutput::success(format!(
                "{}\nResult:\n{}",
                session_details(&session),
                result
            )));
        }

        let mut sessions = self.context.store.list_active();
        if sessions.is_empty() {
            return Ok(ToolOutput::success("No active sessions."));
        }

        sessions.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        let mut lines = vec![format!("{} active session(s):", sessions.len())];
        lines.extend(sessions.iter().map(session_line));

        Ok(ToolOutput::success(lines.join("\n")))
    }
}
