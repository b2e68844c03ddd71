//! Webhook result type and transport trait

use async_trait::async_trait;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::routes::ToolRoutes;
use crate::core::WebhookError;

/// Outcome of one webhook call
///
/// There is no partial state: either the remote answered with 2xx and its
/// body is in `Success`, or the failure is classified in `Failure`.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookResult {
    Success(Value),
    Failure(WebhookError),
}

impl WebhookResult {
    pub fn is_success(&self) -> bool {
        matches!(self, WebhookResult::Success(_))
    }

    /// Response body, if the call succeeded
    pub fn data(&self) -> Option<&Value> {
        match self {
            WebhookResult::Success(data) => Some(data),
            WebhookResult::Failure(_) => None,
        }
    }

    /// Classified error, if the call failed
    pub fn error(&self) -> Option<&WebhookError> {
        match self {
            WebhookResult::Success(_) => None,
            WebhookResult::Failure(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<Value, WebhookError> {
        match self {
            WebhookResult::Success(data) => Ok(data),
            WebhookResult::Failure(err) => Err(err),
        }
    }
}

/// Serializes as `{"success": true, "data": ...}` or `{"success": false, "error": "..."}`
impl Serialize for WebhookResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("WebhookResult", 2)?;
        match self {
            WebhookResult::Success(data) => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            WebhookResult::Failure(err) => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", &err.to_string())?;
            }
        }
        state.end()
    }
}

/// Something that can deliver a payload to a tool's webhook
///
/// `WebhookClient` is the HTTP implementation. Orchestration only depends on
/// this trait so it can run against a scripted transport.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// Post the payload to the tool's webhook. Never fails; failures are
    /// reported inside the result.
    async fn invoke(&self, tool_name: &str, payload: &Value) -> WebhookResult;

    /// Routes this transport knows about
    fn routes(&self) -> &ToolRoutes;
}
