//! The network seam between the agent and Bedrock.
//!
//! A [`Transport`] sends an already-encoded body to one model and hands back
//! the raw reply bytes. It knows nothing about model families. Two
//! implementations ship:
//!
//! - [`crate::BedrockSdkTransport`]: the AWS SDK, SigV4-signed with the default
//!   credential chain.
//! - [`crate::BedrockHttpTransport`]: plain HTTPS with a Bedrock API key
//!   (bearer token).
//!
//! Neither retries. The SDK transport keeps the SDK's own defaults.

use async_trait::async_trait;
use pipeline::ModelId;
use thiserror::Error;

/// Errors from the transport layer.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The AWS SDK call failed (credentials, throttling, validation, model access).
    #[error("Bedrock SDK error: {0}")]
    Sdk(String),

    /// The HTTP request could not be sent or its body not read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Bedrock answered with a non-success status.
    #[error("API error (status {status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },
}

/// Sends one encoded request to one model.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Invokes `model_id` with `body` and returns the raw reply bytes.
    async fn invoke(
        &self,
        model_id: &ModelId,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError>;
}
