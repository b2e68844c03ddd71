//! Core types shared by every layer of the relay
//!
//! - `RelayError` / `RelayResult` - errors raised by orchestration
//! - `WebhookError` - classified failure of one outbound call

pub mod error;

pub use error::{RelayError, RelayResult, WebhookError};
