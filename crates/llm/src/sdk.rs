//! [`Transport`] over the AWS SDK for Bedrock Runtime.

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use aws_sdk_bedrockruntime::Client;
use pipeline::ModelId;

use crate::transport::{Transport, TransportError};

/// Calls `InvokeModel` through the AWS SDK.
///
/// Credentials come from the SDK's default provider chain (environment,
/// profile, instance role).
#[derive(Debug, Clone)]
pub struct BedrockSdkTransport {
    client: Client,
}

impl BedrockSdkTransport {
    /// Wraps an existing SDK client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Loads the shared AWS configuration for `region` and builds a client.
    pub async fn from_region(region: impl Into<String>) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.into()))
            .load()
            .await;
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl Transport for BedrockSdkTransport {
    async fn invoke(
        &self,
        model_id: &ModelId,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        let output = self
            .client
            .invoke_model()
            .model_id(model_id.as_str())
            .content_type(content_type)
            .accept(content_type)
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| TransportError::Sdk(DisplayErrorContext(&e).to_string()))?;

        Ok(output.body().as_ref().to_vec())
    }
}
