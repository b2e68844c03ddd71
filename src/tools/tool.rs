//! Tool trait definition
//!
//! All relay tools implement this trait so the MCP layer can list and call
//! them uniformly.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{RelayError, RelayResult};

/// Result of executing a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Text shown to the caller
    pub text: String,
    /// Whether the remote call behind the tool failed
    pub is_error: bool,
}

impl ToolOutput {
    /// Create a successful tool output
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    /// Create an error tool output
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Name, description and input schema of a tool
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Trait for tools exposed to the invoking protocol
#[async_trait]
pub trait RelayTool: Send + Sync {
    /// Get the name of this tool
    fn name(&self) -> &str;

    /// Get a description of this tool
    fn description(&self) -> &str;

    /// JSON schema of the tool's arguments object
    fn input_schema(&self) -> Value;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }

    /// Execute the tool with the given arguments object.
    ///
    /// A failed webhook call is reported as an error `ToolOutput`. `Err` is
    /// reserved for bad arguments, unknown or unfinished sessions and
    /// responses that break the turn contract.
    async fn execute(&self, input: &Value) -> RelayResult<ToolOutput>;
}

/// Decode a tool's arguments object
pub fn parse_input<T: DeserializeOwned>(tool_name: &str, input: &Value) -> RelayResult<T> {
    serde_json::from_value(input.clone())
        .map_err(|e| RelayError::invalid_arguments(format!("{}: {}", tool_name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Args {
        content: String,
    }

    #[test]
    fn test_tool_output_success() {
        let output = ToolOutput::success("output");
        assert_eq!(output.text, "output");
        assert!(!output.is_error);
    }

    #[test]
    fn test_tool_output_error() {
        let output = ToolOutput::error("error message");
        assert_eq!(output.text, "error message");
        assert!(output.is_error);
    }

    #[test]
    fn test_parse_input() {
        let args: Args = parse_input("maskSensitive", &json!({"content": "hi"})).unwrap();
        assert_eq!(args.content, "hi");

        let err = parse_input::<Args>("maskSensitive", &json!({"text": "hi"})).unwrap_err();
        assert!(matches!(err, RelayError::InvalidArguments(ref msg) if msg.starts_with("maskSensitive")));
    }
}
