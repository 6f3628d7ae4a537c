//! Error types for the staged inference pipeline domain.
//!
//! [`InferenceError`] is what an [`crate::Agent`] returns when a single model
//! call fails; its [`InferencePhase`] tells an operator whether the request
//! never left the process, the network failed, or the network worked but the
//! reply violated the expected contract.
//!
//! [`PlanError`] covers stage plans that must never execute. Plans are checked
//! when they are constructed, so a plan that exists is runnable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ModelId, StageName};

// ---------------------------------------------------------------------------
// Inference errors
// ---------------------------------------------------------------------------

/// The phase of a model call in which an [`InferenceError`] arose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InferencePhase {
    /// The request could not be built. Nothing was sent.
    #[serde(rename = "encode-error")]
    Encode,
    /// The outbound call itself failed (network, auth, throttling, model unavailable).
    #[serde(rename = "transport-error")]
    Transport,
    /// The reply bytes did not match the model family's response schema.
    #[serde(rename = "decode-error")]
    Decode,
    /// The reply parsed but contained no text.
    #[serde(rename = "empty-reply")]
    EmptyReply,
}

impl InferencePhase {
    /// Returns the stable tag for this phase (e.g. `"transport-error"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Encode => "encode-error",
            Self::Transport => "transport-error",
            Self::Decode => "decode-error",
            Self::EmptyReply => "empty-reply",
        }
    }
}

impl std::fmt::Display for InferencePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed model call.
///
/// Never retried or downgraded: the stage that produced it fails and the
/// pipeline halts.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InferenceError {
    /// The model identifier matches no known model family.
    ///
    /// A configuration error: detected before any network call.
    #[error("unsupported model identifier '{model_id}'")]
    UnsupportedModel {
        /// The rejected identifier.
        model_id: ModelId,
    },

    /// The model identifier matches more than one model family.
    #[error("model identifier '{model_id}' matches more than one model family ({families})")]
    AmbiguousModel {
        /// The rejected identifier.
        model_id: ModelId,
        /// Comma-separated names of every matching family.
        families: String,
    },

    /// The request payload could not be serialised.
    #[error("failed to encode request for '{model_id}': {message}")]
    Encode {
        /// Model the request was intended for.
        model_id: ModelId,
        /// Serialiser error detail.
        message: String,
    },

    /// The transport failed to deliver the request or obtain a reply.
    #[error("transport call to '{model_id}' failed: {message}")]
    Transport {
        /// Model the request was sent to.
        model_id: ModelId,
        /// Transport error detail, verbatim.
        message: String,
    },

    /// The reply did not match the family's response schema.
    #[error("response from '{model_id}' does not match the {family} response schema: {message}")]
    Decode {
        /// Model that produced the reply.
        model_id: ModelId,
        /// Name of the model family whose schema was expected.
        family: String,
        /// Parser error detail.
        message: String,
    },

    /// The reply was well-formed but carried no text content.
    #[error("no content in response from '{model_id}'")]
    EmptyReply {
        /// Model that produced the reply.
        model_id: ModelId,
    },
}

impl InferenceError {
    /// Returns the phase in which this error arose.
    ///
    /// Configuration errors report [`InferencePhase::Encode`]: they are
    /// detected while building the request.
    pub fn phase(&self) -> InferencePhase {
        match self {
            Self::UnsupportedModel { .. } | Self::AmbiguousModel { .. } | Self::Encode { .. } => {
                InferencePhase::Encode
            }
            Self::Transport { .. } => InferencePhase::Transport,
            Self::Decode { .. } => InferencePhase::Decode,
            Self::EmptyReply { .. } => InferencePhase::EmptyReply,
        }
    }

    /// Returns `true` for errors caused by configuration rather than by a call.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedModel { .. } | Self::AmbiguousModel { .. }
        )
    }
}

// ---------------------------------------------------------------------------
// Prompt template errors
// ---------------------------------------------------------------------------

/// A prompt template could not be parsed or rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemplateError {
    /// An `{output:` placeholder has no closing brace.
    #[error("unterminated placeholder starting at byte {offset}")]
    Unterminated {
        /// Byte offset of the opening brace.
        offset: usize,
    },

    /// An `{output:}` placeholder names no stage.
    #[error("placeholder at byte {offset} names no stage")]
    EmptyReference {
        /// Byte offset of the opening brace.
        offset: usize,
    },

    /// Rendering needed an output that has not been produced.
    #[error("output of stage '{stage}' is not available")]
    MissingOutput {
        /// Stage whose output was required.
        stage: StageName,
    },
}

// ---------------------------------------------------------------------------
// Plan errors
// ---------------------------------------------------------------------------

/// A stage plan is invalid and must not execute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    /// A stage was configured with an empty or blank name.
    #[error("stage name must not be empty")]
    EmptyStageName,

    /// A stage name cannot be used as a file name or placeholder key.
    #[error(
        "stage name '{name}' is not allowed: names must not start with '.' or contain \
         path separators, ':', braces, or control characters"
    )]
    InvalidStageName {
        /// The rejected name.
        name: String,
    },

    /// A stage was configured with an empty or blank model identifier.
    #[error("stage '{stage}' has no model identifier")]
    EmptyModelId {
        /// Stage missing its model.
        stage: StageName,
    },

    /// Two stages share a name.
    #[error("duplicate stage name '{stage}'")]
    DuplicateStage {
        /// The repeated name.
        stage: StageName,
    },

    /// A prompt references a stage that does not run strictly earlier.
    #[error("stage '{stage}' uses the output of '{dependency}', which is not an earlier stage")]
    UnresolvedDependency {
        /// Stage whose prompt holds the reference.
        stage: StageName,
        /// The referenced stage name.
        dependency: StageName,
    },

    /// A prompt template is malformed.
    #[error("prompt template of stage '{stage}' is malformed: {source}")]
    Template {
        /// Stage whose template failed to parse.
        stage: StageName,
        /// Parser error.
        #[source]
        source: TemplateError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> ModelId {
        ModelId::new("amazon.titan-text-express-v1").unwrap()
    }

    #[test]
    fn phases_tag_each_failure_kind() {
        let cases = [
            (
                InferenceError::UnsupportedModel { model_id: model() },
                InferencePhase::Encode,
            ),
            (
                InferenceError::Transport {
                    model_id: model(),
                    message: "timeout".into(),
                },
                InferencePhase::Transport,
            ),
            (
                InferenceError::Decode {
                    model_id: model(),
                    family: "titan".into(),
                    message: "eof".into(),
                },
                InferencePhase::Decode,
            ),
            (
                InferenceError::EmptyReply { model_id: model() },
                InferencePhase::EmptyReply,
            ),
        ];
        for (err, phase) in cases {
            assert_eq!(err.phase(), phase, "{err}");
        }
    }

    #[test]
    fn only_model_resolution_errors_are_configuration_errors() {
        assert!(InferenceError::UnsupportedModel { model_id: model() }.is_configuration());
        assert!(!InferenceError::EmptyReply { model_id: model() }.is_configuration());
    }

    #[test]
    fn empty_reply_message_mentions_missing_content() {
        let err = InferenceError::EmptyReply { model_id: model() };
        assert!(err.to_string().contains("no content in response"));
        assert_eq!(err.phase().to_string(), "empty-reply");
    }

    #[test]
    fn phase_serialises_as_its_display_tag() {
        for phase in [
            InferencePhase::Encode,
            InferencePhase::Transport,
            InferencePhase::Decode,
            InferencePhase::EmptyReply,
        ] {
            let json = serde_json::to_value(phase).unwrap();
            assert_eq!(json, phase.as_str());
            assert_eq!(serde_json::from_value::<InferencePhase>(json).unwrap(), phase);
        }
    }

    #[test]
    fn inference_errors_serialise_with_a_kind_tag() {
        let err = InferenceError::Transport {
            model_id: model(),
            message: "throttled".into(),
        };
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "transport");
        assert_eq!(json["message"], "throttled");
    }
}
