//! Rendering of a completed session's final state

use serde_json::Value;

use crate::core::{RelayError, RelayResult};
use crate::session::{SessionStore, StateMap};

/// Shown instead of a result while the exchange is still open
pub const PENDING_MESSAGE: &str = "The conversation is not complete yet.";

/// Renders final session state as `key: value` lines
#[derive(Debug, Clone)]
pub struct PromptFormatter {
    store: SessionStore,
}

impl PromptFormatter {
    pub fn new(store: SessionStore) -> Self {
        Self { store }
    }

    /// Render the final state of a completed session.
    ///
    /// Fails with `SessionNotFound` for unknown ids and `SessionNotComplete`
    /// until the latest turn is done. Reading does not count as activity.
    pub fn format(&self, session_id: &str) -> RelayResult<String> {
        let session = self
            .store
            .peek(session_id)
            .ok_or_else(|| RelayError::SessionNotFound(session_id.to_string()))?;

        let turn = session
            .completed_turn()
            .ok_or_else(|| RelayError::SessionNotComplete(session_id.to_string()))?;

        Ok(render_state(&turn.state))
    }

    /// Like `format`, but an unfinished session yields `PENDING_MESSAGE`
    pub fn format_or_pending(&self, session_id: &str) -> RelayResult<String> {
        match self.format(session_id) {
            Err(RelayError::SessionNotComplete(_)) => Ok(PENDING_MESSAGE.to_string()),
            other => other,
        }
    }
}

/// One `key: value` line per non-blank entry, in the map's own order
pub fn render_state(state: &StateMap) -> String {
    state
        .iter()
        .filter(|(_, value)| !is_blank(value))
        .map(|(key, value)| format!("{}: {}", key, render_value(value)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .map(render_scalar)
            .collect::<Vec<_>>()
            .join(", "),
        other => render_scalar(other),
    }
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::TurnResponse;
    use serde_json::json;

    fn store_with(id: &str, done: bool, state: Value) -> SessionStore {
        let store = SessionStore::new();
        store.get_or_create(Some(id), "classifyIdea");
        let turn = TurnResponse::from_value(json!({
            "reply": "ok",
            "done": done,
            "missing": [],
            "state": state,
        }))
        .unwrap();
        store.update(id, |s| s.record_turn(turn.clone())).unwrap();
        store
    }

    #[test]
    fn test_format_completed_session() {
        let store = store_with("s1", true, json!({"topic": "X", "keywords": ["ai", "vision"]}));
        let formatter = PromptFormatter::new(store);

        assert_eq!(formatter.format("s1").unwrap(), "topic: X\nkeywords: ai, vision");
    }

    #[test]
    fn test_format_skips_blank_values() {
        let store = store_with(
            "s1",
            true,
            json!({
                "topic": "X",
                "empty": "",
                "none": null,
                "tags": [],
                "extra": {},
                "draft": false,
                "count": 0,
                "score": 7,
                "nested": {"a": 1}
            }),
        );
        let formatter = PromptFormatter::new(store);

        assert_eq!(
            formatter.format("s1").unwrap(),
            "topic: X\nscore: 7\nnested: {\"a\":1}"
        );
    }

    #[test]
    fn test_format_preserves_state_order() {
        let state: Value =
            serde_json::from_str(r#"{"zeta": "last-alpha", "alpha": "first", "mid": ["m"]}"#).unwrap();
        let formatter = PromptFormatter::new(store_with("s1", true, state));

        assert_eq!(
            formatter.format("s1").unwrap(),
            "zeta: last-alpha\nalpha: first\nmid: m"
        );
    }

    #[test]
    fn test_format_incomplete_session() {
        let formatter = PromptFormatter::new(store_with("s1", false, json!({"topic": "X"})));

        assert!(matches!(
            formatter.format("s1"),
            Err(RelayError::SessionNotComplete(_))
        ));
        assert_eq!(formatter.format_or_pending("s1").unwrap(), PENDING_MESSAGE);
    }

    #[test]
    fn test_format_session_without_turns() {
        let store = SessionStore::new();
        store.get_or_create(Some("fresh"), "classifyIdea");
        let formatter = PromptFormatter::new(store);

        assert!(matches!(
            formatter.format("fresh"),
            Err(RelayError::SessionNotComplete(_))
        ));
    }

    #[test]
    fn test_format_does_not_touch_session() {
        let store = store_with("s1", true, json!({"topic": "X"}));
        let before = store.peek("s1").unwrap().last_activity;
        let formatter = PromptFormatter::new(store.clone());

        formatter.format("s1").unwrap();

        assert_eq!(store.peek("s1").unwrap().last_activity, before);
    }

    #[test]
    fn test_format_unknown_session() {
        let formatter = PromptFormatter::new(SessionStore::new());

        assert!(matches!(
            formatter.format("ghost"),
            Err(RelayError::SessionNotFound(_))
        ));
        assert!(matches!(
            formatter.format_or_pending("ghost"),
            Err(RelayError::SessionNotFound(_))
        ));
    }
}
