//! Foundation-model discovery through the Bedrock control plane.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_bedrock::error::DisplayErrorContext;
use aws_sdk_bedrock::Client;
use pipeline::ModelId;

use crate::family::ModelFamily;
use crate::transport::TransportError;

/// One foundation model offered in a region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSummary {
    /// Identifier to pass to `InvokeModel`.
    pub model_id: String,
    /// Marketing name, when Bedrock reports one.
    pub name: Option<String>,
    /// Provider name, when Bedrock reports one.
    pub provider: Option<String>,
    /// Wire family, or `None` if the adapter cannot drive this model.
    pub family: Option<ModelFamily>,
}

impl ModelSummary {
    /// Builds a summary and classifies `model_id` against the known families.
    pub fn new(model_id: impl Into<String>, name: Option<String>, provider: Option<String>) -> Self {
        let model_id = model_id.into();
        let family = ModelId::new(model_id.as_str()).and_then(|id| ModelFamily::detect(&id).ok());
        Self {
            model_id,
            name,
            provider,
            family,
        }
    }
}

/// Lists the foundation models available in `region`, sorted by identifier.
///
/// # Errors
///
/// [`TransportError::Sdk`] if the control-plane call fails (credentials,
/// permissions, unknown region).
pub async fn list_foundation_models(
    region: impl Into<String>,
) -> Result<Vec<ModelSummary>, TransportError> {
    let config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.into()))
        .load()
        .await;
    let output = Client::new(&config)
        .list_foundation_models()
        .send()
        .await
        .map_err(|e| TransportError::Sdk(DisplayErrorContext(&e).to_string()))?;

    let mut models: Vec<ModelSummary> = output
        .model_summaries()
        .iter()
        .map(|m| {
            ModelSummary::new(
                m.model_id(),
                m.model_name().map(str::to_string),
                m.provider_name().map(str::to_string),
            )
        })
        .collect();
    models.sort_by(|a, b| a.model_id.cmp(&b.model_id));
    Ok(models)
}
