//! maskSensitive tool
//!
//! One-shot call to the masking workflow. The configured `MaskingProfile`
//! supplies the business context sent with every request.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::render::webhook_output;
use super::tool::{parse_input, RelayTool, ToolOutput};
use crate::config::MaskingProfile;
use crate::context::RelayContext;
use crate::core::RelayResult;
use crate::webhook::MASK_SENSITIVE;

#[derive(Debug, Deserialize)]
struct MaskSensitiveInput {
    content: String,
}

#[derive(Debug, Serialize)]
struct CompanyInfo<'a> {
    company_name: &'a str,
    industry: &'a str,
    additional_context: &'a str,
}

#[derive(Debug, Serialize)]
struct MaskRequest<'a> {
    content: &'a str,
    company_info: CompanyInfo<'a>,
    masking_level: &'a str,
    preserve_formatting: bool,
}

fn mask_request<'a>(content: &'a str, profile: &'a MaskingProfile) -> MaskRequest<'a> {
    MaskRequest {
        content,
        company_info: CompanyInfo {
            company_name: &profile.company_name,
            industry: &profile.industry,
            additional_context: &profile.additional_context,
        },
        masking_level: &profile.masking_level,
        preserve_formatting: profile.preserve_formatting,
    }
}

pub struct MaskSensitiveTool {
    context: Arc<RelayContext>,
}

impl MaskSensitiveTool {
    pub fn new(context: Arc<RelayContext>) -> Self {
        Self { context }
    }
}

#[async_trait]
impl RelayTool for MaskSensitiveTool {
    fn name(&self) -> &str {
        MASK_SENSITIVE
    }

    fn description(&self) -> &str {
        "Detects and masks personal data (names, emails, phone numbers, addresses), \
         confidential company data (API keys, tokens, internal figures) and other sensitive \
         business details in a blog draft before it is published. Masking is tuned to the \
         configured company context."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "content": {
                    "type": "string",
                    "description": "Content to mask (a blog draft, for example)"
                }
            },
            "required": ["content"]
        })
    }

    async fn execute(&self, input: &Value) -> RelayResult<ToolOutput> {
        let input: MaskSensitiveInput = parse_input(self.name(), input)?;
        let payload = serde_json::to_value(mask_request(&input.content, &self.context.config.masking))?;

        let result = self.context.transport.invoke(MASK_SENSITIVE, &payload).await;

        Ok(webhook_output(
            "Sensitive data masked",
            "Sensitive data masking failed",
            &result,
        ))
    }
}
