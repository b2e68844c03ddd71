//! HTTP webhook client
//!
//! Issues one POST per logical tool call and folds every failure into a
//! classified `WebhookError`.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde_json::Value;

use super::routes::ToolRoutes;
use super::types::{WebhookResult, WebhookTransport};
use crate::config::RelayConfig;
use crate::core::{RelayError, RelayResult, WebhookError};

/// HTTP implementation of `WebhookTransport`
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: Client,
    base_url: String,
    routes: ToolRoutes,
}

impl WebhookClient {
    /// Create a client serving the standard routes
    pub fn new(config: &RelayConfig) -> RelayResult<Self> {
        Self::with_routes(config, ToolRoutes::standard())
    }

    /// Create a client with a custom route table
    pub fn with_routes(config: &RelayConfig, routes: ToolRoutes) -> RelayResult<Self> {
        if config.accept_invalid_certs {
            tracing::warn!(
                "[WebhookClient] TLS certificate verification is disabled for {}",
                config.base_url
            );
        }

        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| RelayError::InvalidConfig(format!("Failed to build HTTP client: {}", e)))?;

        tracing::info!(
            "[WebhookClient] Using base URL {} with {} routes",
            config.base_url,
            routes.len()
        );

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            routes,
        })
    }

    /// Get the base URL (without trailing slash)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full webhook URL for a tool, if it has a route
    pub fn url_for(&self, tool_name: &str) -> Option<String> {
        self.routes
            .get(tool_name)
            .map(|route| format!("{}/{}", self.base_url, route.path.trim_start_matches('/')))
    }
}

#[async_trait]
impl WebhookTransport for WebhookClient {
    async fn invoke(&self, tool_name: &str, payload: &Value) -> WebhookResult {
        let Some(url) = self.url_for(tool_name) else {
            tracing::error!("[WebhookClient] No webhook path registered for tool '{}'", tool_name);
            return WebhookResult::Failure(WebhookError::RequestConfig(format!(
                "no webhook path registered for tool '{}'",
                tool_name
            )));
        };

        tracing::info!("[WebhookClient] Calling webhook '{}' at {}", tool_name, url);
        tracing::debug!(
            "[WebhookClient] Payload size: {} bytes",
            payload.to_string().len()
        );

        let response = match self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let err = classify_transport_error(&e);
                tracing::error!(
                    "[WebhookClient] Webhook '{}' at {} failed: {}",
                    tool_name,
                    url,
                    err
                );
                return WebhookResult::Failure(err);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body_len = response.text().await.map(|b| b.len()).unwrap_or(0);
            tracing::error!(
                "[WebhookClient] Webhook '{}' at {} returned {} ({} bytes of body)",
                tool_name,
                url,
                status,
                body_len
            );
            return WebhookResult::Failure(WebhookError::HttpStatus {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
            });
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                let err = classify_transport_error(&e);
                tracing::error!(
                    "[WebhookClient] Failed to read response body from '{}': {}",
                    tool_name,
                    err
                );
                return WebhookResult::Failure(err);
            }
        };

        tracing::info!("[WebhookClient] Webhook '{}' answered {}", tool_name, status);
        tracing::debug!("[WebhookClient] Response size: {} bytes", body.len());

        WebhookResult::Success(parse_body(body))
    }

    fn routes(&self) -> &ToolRoutes {
        &self.routes
    }
}

/// Map a reqwest failure onto the relay's error taxonomy
pub fn classify_transport_error(err: &reqwest::Error) -> WebhookError {
    if err.is_builder() {
        WebhookError::RequestConfig(err.to_string())
    } else if err.is_timeout() {
        WebhookError::Network(format!("request timed out: {}", err))
    } else if err.is_connect() || err.is_request() {
        WebhookError::Network(err.to_string())
    } else {
        WebhookError::Unknown(err.to_string())
    }
}

/// JSON bodies are decoded; anything else is kept as a string
fn parse_body(body: String) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(&body).unwrap_or(Value::String(body))
}
