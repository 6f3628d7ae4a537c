//! Port traits implemented by infrastructure crates.
//!
//! The pipeline only ever sees text in and text out. How a prompt becomes a
//! wire payload, which provider answers it, and how the bytes travel are the
//! business of the implementing crate (see the `llm` crate).

use async_trait::async_trait;

use crate::{InferenceError, ModelId};

/// A configured model that turns a prompt into text.
///
/// Each call is exactly one round-trip to the model: implementations must not
/// retry or cache.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Model this agent sends prompts to.
    fn model_id(&self) -> &ModelId;

    /// Sends `user_text` to the model and returns the reply text.
    async fn run(&self, user_text: &str) -> Result<String, InferenceError>;
}
