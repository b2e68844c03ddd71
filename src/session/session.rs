//! Conversation session and the remote turn contract

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::{RelayError, RelayResult};

/// Open key-value state, in the order the remote produced it
pub type StateMap = Map<String, Value>;

/// One turn's answer from the remote workflow
///
/// All four fields are required; anything else is a protocol violation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResponse {
    /// Text shown to the user
    pub reply: String,

    /// Whether the exchange's goal is satisfied
    pub done: bool,

    /// Fields the remote still wants (advisory)
    pub missing: Vec<String>,

    /// Accumulated state after this turn
    pub state: StateMap,
}

impl TurnResponse {
    /// Decode a webhook response body
    pub fn from_value(value: Value) -> RelayResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| RelayError::protocol(format!("unexpected webhook response shape: {}", e)))
    }
}

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// No turn has completed yet
    Created,
    /// At least one turn, latest not done
    InProgress,
    /// Latest turn is done
    Complete,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Created => write!(f, "created"),
            SessionStatus::InProgress => write!(f, "in progress"),
            SessionStatus::Complete => write!(f, "complete"),
        }
    }
}

/// A multi-turn exchange with one webhook workflow
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session ID
    pub id: String,

    /// Tool whose webhook owns this session
    pub tool_name: String,

    /// State returned by the latest turn (`{}` before the first)
    pub current_state: StateMap,

    /// Every turn response, oldest first
    pub history: Vec<TurnResponse>,

    /// When the session was created
    pub start_time: DateTime<Utc>,

    /// When the session was last read or written
    pub last_activity: DateTime<Utc>,
}

impl Session {
    /// Create an empty session
    pub fn new(id: impl Into<String>, tool_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            tool_name: tool_name.into(),
            current_state: StateMap::new(),
            history: Vec::new(),
            start_time: now,
            last_activity: now,
        }
    }

    /// Most recent turn response
    pub fn latest(&self) -> Option<&TurnResponse> {
        self.history.last()
    }

    /// Latest turn response, only if it marks the session done
    pub fn completed_turn(&self) -> Option<&TurnResponse> {
        self.latest().filter(|turn| turn.done)
    }

    pub fn is_complete(&self) -> bool {
        self.completed_turn().is_some()
    }

    pub fn status(&self) -> SessionStatus {
        match self.latest() {
            None => SessionStatus::Created,
            Some(turn) if turn.done => SessionStatus::Complete,
            Some(_) => SessionStatus::InProgress,
        }
    }

    /// Refresh the activity timestamp
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Apply a successful turn: state replaced, response appended
    pub fn record_turn(&mut self, response: TurnResponse) {
        self.current_state = response.state.clone();
        self.history.push(response);
        self.touch();
    }

    /// Whether the session has been idle longer than `idle_timeout` at `now`
    pub fn is_idle(&self, now: DateTime<Utc>, idle_timeout: Duration) -> bool {
        now.signed_duration_since(self.last_activity) > idle_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn turn(done: bool, state: Value) -> TurnResponse {
        TurnResponse::from_value(json!({
            "reply": "ok",
            "done": done,
            "missing": [],
            "state": state,
        }))
        .unwrap()
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new("s1", "classifyIdea");
        assert_eq!(session.id, "s1");
        assert!(session.current_state.is_empty());
        assert!(session.history.is_empty());
        assert_eq!(session.status(), SessionStatus::Created);
        assert_eq!(session.start_time, session.last_activity);
    }

    #[test]
    fn test_record_turn_replaces_state() {
        let mut session = Session::new("s1", "classifyIdea");
        session.record_turn(turn(false, json!({"topic": "X", "tone": "casual"})));
        session.record_turn(turn(true, json!({"topic": "Y"})));

        assert_eq!(session.history.len(), 2);
        assert_eq!(session.current_state, session.latest().unwrap().state);
        assert!(!session.current_state.contains_key("tone"));
        assert_eq!(session.status(), SessionStatus::Complete);
    }

    #[test]
    fn test_state_preserves_key_order() {
        let response = TurnResponse::from_value(
            serde_json::from_str(
                r#"{"reply":"","done":true,"missing":[],"state":{"zeta":1,"alpha":2,"mid":3}}"#,
            )
            .unwrap(),
        )
        .unwrap();

        let keys: Vec<&str> = response.state.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_malformed_response_is_protocol_error() {
        let missing_done = json!({"reply": "hi", "missing": [], "state": {}});
        assert!(matches!(
            TurnResponse::from_value(missing_done),
            Err(RelayError::Protocol(_))
        ));

        let state_not_object = json!({"reply": "hi", "done": false, "missing": [], "state": []});
        assert!(TurnResponse::from_value(state_not_object).is_err());

        assert!(TurnResponse::from_value(json!("Workflow was started")).is_err());
    }

    #[test]
    fn test_is_idle() {
        let mut session = Session::new("s1", "classifyIdea");
        let now = Utc::now();
        session.last_activity = now - Duration::minutes(31);

        assert!(session.is_idle(now, Duration::minutes(30)));
        assert!(!session.is_idle(now, Duration::minutes(45)));
    }
}
