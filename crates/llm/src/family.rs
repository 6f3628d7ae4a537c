//! Model families and identifier matching.
//!
//! A family is a group of Bedrock model identifiers that share one
//! request/response wire schema. The family is resolved once from an
//! identifier; every later encode/decode is a closed `match` on the result.

use pipeline::{InferenceError, ModelId};

/// Wire schema family of a Bedrock model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFamily {
    /// Anthropic Claude: messages API with a top-level `system` string.
    Claude,
    /// Amazon Titan Text: single-shot completion, no system channel.
    Titan,
    /// Amazon Nova: messages of text blocks with an optional `system` block list.
    Nova,
}

impl ModelFamily {
    /// Every supported family.
    pub const ALL: [ModelFamily; 3] = [Self::Claude, Self::Titan, Self::Nova];

    /// Identifier prefixes belonging to this family.
    pub fn prefixes(self) -> &'static [&'static str] {
        match self {
            Self::Claude => &["anthropic.claude"],
            Self::Titan => &["amazon.titan-text", "amazon.titan-tg1"],
            Self::Nova => &["amazon.nova"],
        }
    }

    /// Returns `true` if the family's request schema carries a system instruction.
    pub fn supports_system_instruction(self) -> bool {
        !matches!(self, Self::Titan)
    }

    /// Short lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Titan => "titan",
            Self::Nova => "nova",
        }
    }

    /// Resolves the family of `model_id`.
    ///
    /// # Errors
    ///
    /// [`InferenceError::UnsupportedModel`] if no family matches,
    /// [`InferenceError::AmbiguousModel`] if more than one does.
    pub fn detect(model_id: &ModelId) -> Result<Self, InferenceError> {
        let base = model_id.base_id();
        let matches: Vec<ModelFamily> = Self::ALL
            .into_iter()
            .filter(|family| family.prefixes().iter().any(|p| base.starts_with(p)))
            .collect();

        match matches.as_slice() {
            [family] => Ok(*family),
            [] => Err(InferenceError::UnsupportedModel {
                model_id: model_id.clone(),
            }),
            many => Err(InferenceError::AmbiguousModel {
                model_id: model_id.clone(),
                families: many
                    .iter()
                    .map(|f| f.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

impl std::fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
