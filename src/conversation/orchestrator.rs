//! Conversational turn orchestration
//!
//! A turn sends the caller's input together with the session's accumulated
//! state and every prior response, then folds the remote's answer back into
//! the session. A failed turn leaves the session untouched, so retrying is
//! safe.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::core::{RelayError, RelayResult};
use crate::session::{Session, SessionStore, StateMap, TurnResponse};
use crate::webhook::WebhookTransport;

/// Result of one successful turn
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    /// Session the turn belongs to (minted if the caller gave none)
    pub session_id: String,

    /// The remote's response to this turn
    pub current_response: TurnResponse,

    /// Final state, present only once the remote reports `done`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_result: Option<StateMap>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TurnRequest<'a> {
    status: &'a str,
    text: &'a str,
    state: &'a StateMap,
    previous_responses: &'a [TurnResponse],
    conversation_context: ConversationContext<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConversationContext<'a> {
    total_responses: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_response: Option<&'a TurnResponse>,
}

/// Build the request body for one turn of `session`
pub fn turn_payload(session: &Session, phase: &str, text: &str) -> RelayResult<Value> {
    let request = TurnRequest {
        status: phase,
        text,
        state: &session.current_state,
        previous_responses: &session.history,
        conversation_context: ConversationContext {
            total_responses: session.history.len(),
            last_response: session.latest(),
        },
    };
    Ok(serde_json::to_value(&request)?)
}

/// Drives multi-turn exchanges against the webhook transport
#[derive(Clone)]
pub struct ConversationOrchestrator {
    store: SessionStore,
    transport: Arc<dyn WebhookTransport>,
}

impl ConversationOrchestrator {
    pub fn new(store: SessionStore, transport: Arc<dyn WebhookTransport>) -> Self {
        Self { store, transport }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Start a new exchange, or advance the one named by `session_id`.
    ///
    /// An unknown `session_id` starts a fresh session under that id.
    pub async fn start_or_advance(
        &self,
        tool_name: &str,
        input_text: &str,
        session_id: Option<&str>,
    ) -> RelayResult<TurnOutcome> {
        if !self.transport.routes().contains(tool_name) {
            return Err(RelayError::UnknownTool(tool_name.to_string()));
        }

        let session = self.store.get_or_create(session_id, tool_name);
        if session.tool_name != tool_name {
            return Err(RelayError::invalid_arguments(format!(
                "session {} belongs to tool '{}', not '{}'",
                session.id, session.tool_name, tool_name
            )));
        }

        tracing::info!(
            "[Orchestrator] Turn for '{}' in session {} ({} previous responses)",
            tool_name,
            session.id,
            session.history.len()
        );

        self.run_turn(session, input_text).await
    }

    /// Continue an existing exchange. Never creates a session.
    pub async fn continue_session(
        &self,
        session_id: &str,
        user_input: &str,
    ) -> RelayResult<TurnOutcome> {
        let session = self
            .store
            .get(session_id)
            .ok_or_else(|| RelayError::SessionNotFound(session_id.to_string()))?;

        tracing::info!(
            "[Orchestrator] Continuing session {} ({} previous responses)",
            session_id,
            session.history.len()
        );

        self.run_turn(session, user_input).await
    }

    async fn run_turn(&self, session: Session, text: &str) -> RelayResult<TurnOutcome> {
        // A completed session only leaves COMPLETE by eviction.
        if session.is_complete() {
            tracing::warn!(
                "[Orchestrator] Session {} is already complete; turn rejected",
                session.id
            );
            return Err(RelayError::SessionAlreadyComplete(session.id));
        }

        let phase = self
            .transport
            .routes()
            .get(&session.tool_name)
            .map(|route| route.phase.clone())
            .ok_or_else(|| RelayError::UnknownTool(session.tool_name.clone()))?;

        let payload = turn_payload(&session, &phase, text)?;

        let data = self
            .transport
            .invoke(&session.tool_name, &payload)
            .await
            .into_result()
            .map_err(|e| {
                tracing::error!("[Orchestrator] Turn failed for session {}: {}", session.id, e);
                RelayError::from(e)
            })?;

        let response = TurnResponse::from_value(data).map_err(|e| {
            tracing::error!("[Orchestrator] Session {}: {}", session.id, e);
            e
        })?;

        match self
            .store
            .update(&session.id, |s| s.record_turn(response.clone()))
        {
            Ok(updated) => {
                tracing::info!(
                    "[Orchestrator] Session {}: done={}, missing={}, responses stored={}",
                    updated.id,
                    response.done,
                    response.missing.len(),
                    updated.history.len()
                );
            }
            Err(_) => {
                tracing::warn!(
                    "[Orchestrator] Session {} was evicted during the turn; response not stored",
                    session.id
                );
            }
        }

        Ok(TurnOutcome {
            session_id: session.id,
            final_result: response.done.then(|| response.state.clone()),
            current_response: response,
        })
    }
}
