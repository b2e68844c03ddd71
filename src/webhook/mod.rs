//! Outbound webhook calls
//!
//! - `ToolRoutes`: tool name -> webhook path and phase tag
//! - `WebhookTransport`: the seam orchestration calls through
//! - `WebhookClient`: reqwest-backed transport with a 30s timeout
//! - `WebhookResult`: success/failure of one call, never an exception

mod client;
mod routes;
mod types;

pub use client::{classify_transport_error, WebhookClient};
pub use routes::{ToolRoute, ToolRoutes, CLASSIFY_IDEA, MASK_SENSITIVE, WRITE_DRAFT};
pub use types::{WebhookResult, WebhookTransport};
