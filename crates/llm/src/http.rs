//! [`Transport`] over plain HTTPS with a Bedrock API key.
//!
//! No request signing: `POST /model/{id}/invoke` with a bearer token.

use std::time::Duration;

use async_trait::async_trait;
use pipeline::ModelId;
use reqwest::Client;

use crate::transport::{Transport, TransportError};

/// Default per-request timeout. Long generations routinely take minutes.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Calls `InvokeModel` over HTTPS with `Authorization: Bearer <api key>`.
#[derive(Debug, Clone)]
pub struct BedrockHttpTransport {
    http: Client,
    endpoint: String,
    api_key: String,
}

impl BedrockHttpTransport {
    /// Creates a transport for the regional Bedrock Runtime endpoint.
    pub fn new(
        region: &str,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        Self::with_endpoint(
            format!("https://bedrock-runtime.{region}.amazonaws.com"),
            api_key,
            timeout,
        )
    }

    /// Creates a transport for a custom endpoint (gateway, proxy, or test server).
    pub fn with_endpoint(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Base URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn invoke_url(&self, model_id: &ModelId) -> String {
        format!(
            "{}/model/{}/invoke",
            self.endpoint,
            urlencoding::encode(model_id.as_str())
        )
    }
}

#[async_trait]
impl Transport for BedrockHttpTransport {
    async fn invoke(
        &self,
        model_id: &ModelId,
        content_type: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>, TransportError> {
        let response = self
            .http
            .post(self.invoke_url(model_id))
            .bearer_auth(&self.api_key)
            .header("content-type", content_type)
            .header("accept", content_type)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "(no body)".into());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}
