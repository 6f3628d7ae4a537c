//! Serde types for the Bedrock `InvokeModel` bodies of each model family.
//!
//! Internal to the adapter: nothing outside this crate sees these shapes.

use serde::{Deserialize, Serialize};

/// Protocol version tag required by Claude on Bedrock.
pub(crate) const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";
/// Output token budget used by families that accept one.
pub(crate) const MAX_OUTPUT_TOKENS: u32 = 4000;
/// Sampling temperature sent to Titan.
pub(crate) const TITAN_TEMPERATURE: f64 = 0.7;

const USER_ROLE: &str = "user";

// ---------------------------------------------------------------------------
// Claude
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct ClaudeRequest<'a> {
    pub anthropic_version: &'static str,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<&'a str>,
    pub messages: [ClaudeMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
pub(crate) struct ClaudeMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ClaudeMessage<'a> {
    pub fn user(content: &'a str) -> Self {
        Self {
            role: USER_ROLE,
            content,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ClaudeResponse {
    pub content: Vec<ContentBlock>,
}

// ---------------------------------------------------------------------------
// Titan
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TitanRequest<'a> {
    pub input_text: &'a str,
    pub text_generation_config: TitanGenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TitanGenerationConfig {
    pub max_token_count: u32,
    pub temperature: f64,
}

/// Titan replies either with the Bedrock `results` list or a flat `outputText`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TitanResponse {
    Results { results: Vec<TitanResult> },
    Flat(TitanResult),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TitanResult {
    pub output_text: String,
}

// ---------------------------------------------------------------------------
// Nova
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct NovaRequest<'a> {
    pub messages: [NovaMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<[TextBlock<'a>; 1]>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NovaMessage<'a> {
    pub role: &'static str,
    pub content: [TextBlock<'a>; 1],
}

impl<'a> NovaMessage<'a> {
    pub fn user(text: &'a str) -> Self {
        Self {
            role: USER_ROLE,
            content: [TextBlock { text }],
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct TextBlock<'a> {
    pub text: &'a str,
}

/// Nova replies with blocks under `output.message.content` on Bedrock, or a
/// top-level `content` list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum NovaResponse {
    Converse { output: NovaOutput },
    Flat { content: Vec<ContentBlock> },
}

#[derive(Debug, Deserialize)]
pub(crate) struct NovaOutput {
    pub message: NovaReplyMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NovaReplyMessage {
    pub content: Vec<ContentBlock>,
}

// ---------------------------------------------------------------------------
// Shared
// ---------------------------------------------------------------------------

/// A reply content block. Non-text blocks carry no `text`.
#[derive(Debug, Deserialize)]
pub(crate) struct ContentBlock {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}
