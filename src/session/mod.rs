//! Conversation sessions
//!
//! This module provides the in-process session table used to thread
//! multi-turn exchanges with a webhook workflow.
//!
//! Sessions live only as long as the process. Idle sessions are evicted by
//! the `SessionReaper`.

pub mod reaper;
pub mod session;
pub mod store;

pub use reaper::SessionReaper;
pub use session::{Session, SessionStatus, StateMap, TurnResponse};
pub use store::{MemorySessionBackend, SessionBackend, SessionStore};
