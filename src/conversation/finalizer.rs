//! Completion of finished sessions
//!
//! Once the remote reports `done`, the finalizer sends one more call to the
//! same webhook summarising the whole exchange.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::formatter::PromptFormatter;
use crate::core::{RelayError, RelayResult};
use crate::session::{Session, SessionStore, StateMap, TurnResponse};
use crate::webhook::{WebhookResult, WebhookTransport};

/// Formatted result plus the outcome of the completion call
#[derive(Debug, Clone)]
pub struct CompletedSession {
    pub formatted: String,
    pub webhook_result: WebhookResult,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionRequest<'a> {
    status: String,
    session_id: &'a str,
    tool_name: &'a str,
    completed_state: &'a StateMap,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    conversation_history: Vec<TurnSummary<'a>>,
}

/// History entry trimmed to what the completion webhook needs
#[derive(Serialize)]
struct TurnSummary<'a> {
    reply: &'a str,
    missing: &'a [String],
    done: bool,
}

impl<'a> From<&'a TurnResponse> for TurnSummary<'a> {
    fn from(turn: &'a TurnResponse) -> Self {
        Self {
            reply: &turn.reply,
            missing: &turn.missing,
            done: turn.done,
        }
    }
}

/// Build the completion body for a session whose latest turn is `final_turn`
pub fn completion_payload(
    session: &Session,
    final_turn: &TurnResponse,
    end_time: DateTime<Utc>,
) -> RelayResult<Value> {
    let request = CompletionRequest {
        status: format!("{}-completed", session.tool_name),
        session_id: &session.id,
        tool_name: &session.tool_name,
        completed_state: &final_turn.state,
        start_time: session.start_time,
        end_time,
        conversation_history: session.history.iter().map(TurnSummary::from).collect(),
    };
    Ok(serde_json::to_value(&request)?)
}

/// Sends the completion call for finished sessions
#[derive(Clone)]
pub struct SessionFinalizer {
    store: SessionStore,
    transport: Arc<dyn WebhookTransport>,
    formatter: PromptFormatter,
}

impl SessionFinalizer {
    pub fn new(store: SessionStore, transport: Arc<dyn WebhookTransport>) -> Self {
        Self {
            formatter: PromptFormatter::new(store.clone()),
            store,
            transport,
        }
    }

    /// Send the completion call for a finished session.
    ///
    /// The webhook's result is returned as-is; a failed completion call is
    /// not an error at this level.
    pub async fn finalize(&self, session_id: &str) -> RelayResult<WebhookResult> {
        let session = self
            .store
            .get(session_id)
            .ok_or_else(|| RelayError::SessionNotFound(session_id.to_string()))?;

        let final_turn = session
            .completed_turn()
            .ok_or_else(|| RelayError::SessionNotComplete(session_id.to_string()))?;

        let payload = completion_payload(&session, final_turn, Utc::now())?;

        tracing::info!(
            "[Finalizer] Sending completion for session {} ({} turns) to '{}'",
            session_id,
            session.history.len(),
            session.tool_name
        );

        let result = self.transport.invoke(&session.tool_name, &payload).await;

        match &result {
            WebhookResult::Success(_) => {
                tracing::info!("[Finalizer] Session {} completed", session_id);
            }
            WebhookResult::Failure(e) => {
                tracing::error!(
                    "[Finalizer] Completion call for session {} failed: {}",
                    session_id,
                    e
                );
            }
        }

        Ok(result)
    }

    /// Format the final state, then send the completion call
    pub async fn complete(&self, session_id: &str) -> RelayResult<CompletedSession> {
        let formatted = self.formatter.format(session_id)?;
        let webhook_result = self.finalize(session_id).await?;

        Ok(CompletedSession {
            formatted,
            webhook_result,
        })
    }
}
