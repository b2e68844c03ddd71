//! Relay error types

use thiserror::Error;

/// Classified failure of a single outbound webhook call
///
/// The webhook client never raises; it reports one of these inside
/// a `WebhookResult::Failure`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// Remote responded with a non-2xx status
    ///
    /// `status_text` is the canonical reason for the code, not the phrase
    /// the server sent.
    #[error("HTTP {status}: {status_text}")]
    HttpStatus { status: u16, status_text: String },

    /// Request was sent but no response arrived (refused, DNS, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Request could not be constructed or sent
    #[error("Request configuration error: {0}")]
    RequestConfig(String),

    /// Any other transport failure
    #[error("Unknown transport error: {0}")]
    Unknown(String),
}

impl WebhookError {
    /// HTTP status code, if the remote answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            WebhookError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors raised by the session and orchestration layer
#[derive(Error, Debug)]
pub enum RelayError {
    /// Referenced session id is absent from the store
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// Finalization or formatting requested before the session is done
    #[error("Session is not completed yet: {0}")]
    SessionNotComplete(String),

    /// Turn requested on a session whose latest turn is already done
    #[error("Session is already completed: {0}")]
    SessionAlreadyComplete(String),

    /// Webhook call failed
    #[error("Webhook call failed: {0}")]
    Webhook(#[from] WebhookError),

    /// Remote response violated the turn contract
    #[error("Protocol violation: {0}")]
    Protocol(String),

    /// No tool or route registered under this name
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Tool arguments did not match the tool's schema
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RelayError {
    /// Create a protocol violation error
    pub fn protocol(msg: impl Into<String>) -> Self {
        RelayError::Protocol(msg.into())
    }

    /// Create an invalid arguments error
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        RelayError::InvalidArguments(msg.into())
    }
}

/// Result type alias for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RelayError::SessionNotFound("abc123".into());
        assert_eq!(err.to_string(), "Session not found: abc123");

        let err = WebhookError::HttpStatus {
            status: 500,
            status_text: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_already_complete_display() {
        let err = RelayError::SessionAlreadyComplete("s1".into());
        assert_eq!(err.to_string(), "Session is already completed: s1");
    }

    #[test]
    fn test_webhook_error_wraps_into_relay_error() {
        let err: RelayError = WebhookError::Network("connection refused".into()).into();
        assert!(matches!(err, RelayError::Webhook(WebhookError::Network(_))));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let relay_err: RelayError = json_err.into();
        assert!(matches!(relay_err, RelayError::Serialization(_)));
    }
}
