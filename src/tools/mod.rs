//! Tools exposed to the MCP client
//!
//! This module provides:
//! - `RelayTool` trait - Interface every tool implements
//! - `ToolOutput` - Text result of a tool call
//! - `ToolRegistry` - Registry of the available tools
//! - One-shot tools (`maskSensitive`, `writeDraft`) and conversational tools
//!   (`classifyIdea`, `continueConversation`, `completeSession`, `sessionStatus`)

mod classify_idea;
mod complete_session;
mod continue_conversation;
mod mask_sensitive;
mod registry;
mod render;
mod session_status;
mod tool;
mod write_draft;

pub use classify_idea::ClassifyIdeaTool;
pub use complete_session::CompleteSessionTool;
pub use continue_conversation::ContinueConversationTool;
pub use mask_sensitive::MaskSensitiveTool;
pub use registry::ToolRegistry;
pub use session_status::SessionStatusTool;
pub use tool::{parse_input, RelayTool, ToolDescriptor, ToolOutput};
pub use write_draft::WriteDraftTool;
