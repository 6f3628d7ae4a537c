//! Translation between [`PromptRequest`]/[`ModelReply`] and each family's
//! wire schema.
//!
//! This module is the only place that knows what a Claude, Titan, or Nova body
//! looks like. Adding a provider means adding a [`ModelFamily`] variant and one
//! arm to [`ModelAdapter::encode`] and [`ModelAdapter::decode`].
//!
//! | Family | System instruction | Token budget | Reply text |
//! |--------|-------------------|--------------|------------|
//! | Claude | top-level `system` string | `max_tokens` | `content[0].text` |
//! | Titan  | not supported (ignored) | `maxTokenCount` | `results[0].outputText` |
//! | Nova   | `system` block list | none | `output.message.content[0].text` |

use pipeline::{InferenceError, ModelId, ModelReply, PromptRequest};
use serde::de::DeserializeOwned;

use crate::family::ModelFamily;
use crate::wire::{
    ClaudeMessage, ClaudeRequest, ClaudeResponse, ContentBlock, NovaMessage, NovaRequest,
    NovaResponse, TextBlock, TitanGenerationConfig, TitanRequest, TitanResponse,
    ANTHROPIC_VERSION, MAX_OUTPUT_TOKENS, TITAN_TEMPERATURE,
};

/// MIME type of every request and reply body.
pub const CONTENT_TYPE: &str = "application/json";

/// Encoder/decoder for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAdapter {
    model_id: ModelId,
    family: ModelFamily,
}

impl ModelAdapter {
    /// Resolves the family of `model_id` and builds its adapter.
    ///
    /// # Errors
    ///
    /// A configuration error ([`InferenceError::UnsupportedModel`] or
    /// [`InferenceError::AmbiguousModel`]) if the family cannot be resolved.
    pub fn for_model(model_id: ModelId) -> Result<Self, InferenceError> {
        let family = ModelFamily::detect(&model_id)?;
        Ok(Self { model_id, family })
    }

    /// Model this adapter encodes for.
    pub fn model_id(&self) -> &ModelId {
        &self.model_id
    }

    /// Resolved family.
    pub fn family(&self) -> ModelFamily {
        self.family
    }

    /// Builds the request body for `request`.
    ///
    /// Titan has no system channel: a configured instruction is silently
    /// unused and the body is identical to one built without it.
    pub fn encode(&self, request: &PromptRequest) -> Result<Vec<u8>, InferenceError> {
        let user_text = request.user_text();
        let system = request.system_instruction();

        let body = match self.family {
            ModelFamily::Claude => serde_json::to_vec(&ClaudeRequest {
                anthropic_version: ANTHROPIC_VERSION,
                max_tokens: MAX_OUTPUT_TOKENS,
                system,
                messages: [ClaudeMessage::user(user_text)],
            }),
            ModelFamily::Titan => serde_json::to_vec(&TitanRequest {
                input_text: user_text,
                text_generation_config: TitanGenerationConfig {
                    max_token_count: MAX_OUTPUT_TOKENS,
                    temperature: TITAN_TEMPERATURE,
                },
            }),
            ModelFamily::Nova => serde_json::to_vec(&NovaRequest {
                messages: [NovaMessage::user(user_text)],
                system: system.map(|text| [TextBlock { text }]),
            }),
        };

        body.map_err(|e| InferenceError::Encode {
            model_id: self.model_id.clone(),
            message: e.to_string(),
        })
    }

    /// Extracts the reply text from a response body.
    ///
    /// # Errors
    ///
    /// [`InferenceError::Decode`] if `bytes` does not match the family's
    /// response schema; [`InferenceError::EmptyReply`] if it does but holds no
    /// text (no content blocks, no results, or an empty string).
    pub fn decode(&self, bytes: &[u8]) -> Result<ModelReply, InferenceError> {
        let text = match self.family {
            ModelFamily::Claude => {
                let response: ClaudeResponse = self.parse(bytes)?;
                self.first_block_text(response.content)?
            }
            ModelFamily::Titan => match self.parse::<TitanResponse>(bytes)? {
                TitanResponse::Results { results } => {
                    results.into_iter().next().map(|r| r.output_text)
                }
                TitanResponse::Flat(result) => Some(result.output_text),
            },
            ModelFamily::Nova => {
                let blocks = match self.parse::<NovaResponse>(bytes)? {
                    NovaResponse::Converse { output } => output.message.content,
                    NovaResponse::Flat { content } => content,
                };
                self.first_block_text(blocks)?
            }
        };

        match text {
            Some(text) if !text.is_empty() => Ok(ModelReply { text }),
            _ => Err(InferenceError::EmptyReply {
                model_id: self.model_id.clone(),
            }),
        }
    }

    fn parse<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, InferenceError> {
        serde_json::from_slice(bytes).map_err(|e| self.decode_error(e.to_string()))
    }

    /// `Ok(None)` when there are no blocks; a decode error when the first
    /// block is not a text block.
    fn first_block_text(
        &self,
        blocks: Vec<ContentBlock>,
    ) -> Result<Option<String>, InferenceError> {
        let Some(first) = blocks.into_iter().next() else {
            return Ok(None);
        };
        match first.text {
            Some(text) => Ok(Some(text)),
            None => Err(self.decode_error(format!(
                "first content block has no text (type: {})",
                first.kind.as_deref().unwrap_or("unknown")
            ))),
        }
    }

    fn decode_error(&self, message: String) -> InferenceError {
        InferenceError::Decode {
            model_id: self.model_id.clone(),
            family: self.family.to_string(),
            message,
        }
    }
}
