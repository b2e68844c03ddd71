//! Scripted transport for tests

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::WebhookError;
use crate::webhook::{ToolRoutes, WebhookResult, WebhookTransport};

/// Replays canned results in order and records every call
pub struct ScriptedTransport {
    routes: ToolRoutes,
    responses: Mutex<VecDeque<WebhookResult>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<WebhookResult>) -> Self {
        Self {
            routes: ToolRoutes::standard(),
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every `(tool_name, payload)` seen so far
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookTransport for ScriptedTransport {
    async fn invoke(&self, tool_name: &str, payload: &Value) -> WebhookResult {
        self.calls
            .lock()
            .unwrap()
            .push((tool_name.to_string(), payload.clone()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| WebhookResult::Failure(WebhookError::Unknown("no scripted response".into())))
    }

    fn routes(&self) -> &ToolRoutes {
        &self.routes
    }
}
