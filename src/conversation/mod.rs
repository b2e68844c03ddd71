//! Conversational orchestration
//!
//! - `ConversationOrchestrator`: start/continue turns against a webhook
//! - `SessionFinalizer`: completion call once the remote reports done
//! - `PromptFormatter`: human-readable rendering of the final state

pub mod finalizer;
pub mod formatter;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod testing;

pub use finalizer::{completion_payload, CompletedSession, SessionFinalizer};
pub use formatter::{render_state, PromptFormatter, PENDING_MESSAGE};
pub use orchestrator::{turn_payload, ConversationOrchestrator, TurnOutcome};
