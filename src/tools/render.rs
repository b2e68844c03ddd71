//! Text rendering shared by the tools

use serde_json::Value;

use super::tool::ToolOutput;
use crate::conversation::{render_state, TurnOutcome};
use crate::core::{RelayError, RelayResult};
use crate::session::{Session, SessionStatus};
use crate::webhook::WebhookResult;

/// Pretty-printed JSON
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Render a one-shot webhook result under a success or failure heading
pub fn webhook_output(success_heading: &str, failure_heading: &str, result: &WebhookResult) -> ToolOutput {
    match result {
        WebhookResult::Success(data) => {
            ToolOutput::success(format!("{}:\n{}", success_heading, pretty(data)))
        }
        WebhookResult::Failure(err) => ToolOutput::error(format!("{}: {}", failure_heading, err)),
    }
}

/// Render a conversational turn for the caller
pub fn turn_text(outcome: &TurnOutcome) -> String {
    let response = &outcome.current_response;
    let mut lines = Vec::new();

    if !response.reply.is_empty() {
        lines.push(response.reply.clone());
        lines.push(String::new());
    }

    lines.push(format!("Session ID: {}", outcome.session_id));
    lines.push(format!(
        "Status: {}",
        if response.done { "complete" } else { "in progress" }
    ));

    if !response.missing.is_empty() {
        lines.push(format!("Missing: {}", response.missing.join(", ")));
    }

    if let Some(result) = &outcome.final_result {
        lines.push("Final result:".to_string());
        lines.push(render_state(result));
    }

    lines.join("\n")
}

/// Render a turn result; a failed webhook call becomes an error output
pub fn turn_output(result: RelayResult<TurnOutcome>) -> RelayResult<ToolOutput> {
    match result {
        Ok(outcome) => Ok(ToolOutput::success(turn_text(&outcome))),
        Err(RelayError::Webhook(e)) => Ok(ToolOutput::error(format!("Conversation turn failed: {}", e))),
        Err(RelayError::SessionAlreadyComplete(id)) => Ok(ToolOutput::error(format!(
            "Session {} is already complete. Use completeSession to finish it.",
            id
        ))),
        Err(e) => Err(e),
    }
}

/// One-line summary of a session for listings
pub fn session_line(session: &Session) -> String {
    format!(
        "- {} ({}, {}, {} turns, last active {})",
        session.id,
        session.tool_name,
        session.status(),
        session.history.len(),
        session.last_activity.to_rfc3339()
    )
}

/// Detailed view of one session
pub fn session_details(session: &Session) -> String {
    let mut lines = vec![
        format!("Session ID: {}", session.id),
        format!("Tool: {}", session.tool_name),
        format!("Status: {}", session.status()),
        format!("Turns: {}", session.history.len()),
        format!("Started: {}", session.start_time.to_rfc3339()),
        format!("Last activity: {}", session.last_activity.to_rfc3339()),
    ];

    if let Some(latest) = session.latest() {
        if session.status() == SessionStatus::InProgress && !latest.missing.is_empty() {
            lines.push(format!("Missing: {}", latest.missing.join(", ")));
        }
    }

    lines.push("State:".to_string());
    lines.push(pretty(&Value::Object(session.current_state.clone())));
    lines.join("\n")
}
