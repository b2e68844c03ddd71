//! MCP (Model Context Protocol) Support
//!
//! The relay runs as an MCP server over stdio. `RelayServer` implements
//! rmcp's `ServerHandler` on top of the `ToolRegistry`.
//!
//! # Usage
//!
//! ```ignore
//! use rmcp::ServiceExt;
//!
//! let server = RelayServer::new(Arc::new(registry));
//! let service = server.serve(rmcp::transport::stdio()).await?;
//! service.waiting().await?;
//! ```

mod server;

pub use server::{error_data, tool_definition, RelayServer};
