pub mod config;
pub mod context;
pub mod core;
pub mod session;
pub mod tools;
pub mod webhook;

// Multi-turn orchestration on top of sessions and webhooks
pub mod conversation;

pub mod logging;

// MCP (Model Context Protocol) server surface
pub mod mcp;
