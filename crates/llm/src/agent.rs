//! [`InferenceAgent`]: one model + one system instruction bound to a transport.

use std::sync::Arc;

use async_trait::async_trait;
use pipeline::{Agent, InferenceError, ModelId, PromptRequest};
use tracing::Instrument;

use crate::adapter::{ModelAdapter, CONTENT_TYPE};
use crate::transport::Transport;

/// Runs prompts against a single Bedrock model.
///
/// The model family is resolved when the agent is built, so an unsupported
/// identifier is rejected before any request exists. Every [`Agent::run`]
/// call makes exactly one transport call.
#[derive(Clone)]
pub struct InferenceAgent {
    adapter: ModelAdapter,
    system_instruction: Option<String>,
    transport: Arc<dyn Transport>,
}

impl InferenceAgent {
    /// Binds `model_id` and `system_instruction` to `transport`.
    ///
    /// # Errors
    ///
    /// A configuration error if `model_id` belongs to no known family.
    pub fn new(
        model_id: ModelId,
        system_instruction: Option<String>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, InferenceError> {
        let adapter = ModelAdapter::for_model(model_id)?;
        if system_instruction.is_some() && !adapter.family().supports_system_instruction() {
            tracing::debug!(
                model_id = %adapter.model_id(),
                family = %adapter.family(),
                "model family has no system channel; system instruction will be unused"
            );
        }
        Ok(Self {
            adapter,
            system_instruction,
            transport,
        })
    }
}

impl std::fmt::Debug for InferenceAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceAgent")
            .field("model_id", self.adapter.model_id())
            .field("family", &self.adapter.family())
            .field("system_instruction", &self.system_instruction)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Agent for InferenceAgent {
    fn model_id(&self) -> &ModelId {
        self.adapter.model_id()
    }

    async fn run(&self, user_text: &str) -> Result<String, InferenceError> {
        let model_id = self.adapter.model_id();
        let span = tracing::info_span!(
            "inference",
            model_id = %model_id,
            family = %self.adapter.family(),
        );

        async move {
            let request = PromptRequest::new(
                model_id.clone(),
                self.system_instruction.clone(),
                user_text,
            );
            let body = self.adapter.encode(&request)?;
            tracing::debug!(request_bytes = body.len(), "invoking model");

            let reply = self
                .transport
                .invoke(model_id, CONTENT_TYPE, body)
                .await
                .map_err(|e| InferenceError::Transport {
                    model_id: model_id.clone(),
                    message: e.to_string(),
                })?;
            tracing::debug!(response_bytes = reply.len(), "model replied");

            let text = self.adapter.decode(&reply)?.text;
            Ok(text)
        }
        .instrument(span)
        .await
    }
}
