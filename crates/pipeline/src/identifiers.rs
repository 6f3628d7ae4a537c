//! Typed identifiers for models, stages, and runs.
//!
//! Each is its own newtype over a primitive. This prevents accidentally interchanging a [`StageName`]
//! with a [`ModelId`] even though both are strings under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// string_id!: non-blank String newtype with new(), as_str() and Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty
            /// or only whitespace.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let value = value.into();
                (!value.trim().is_empty()).then_some(Self(value))
            }

            /// The identifier text.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers: string-backed
// ---------------------------------------------------------------------------

string_id! {
    /// A Bedrock model identifier (e.g. `"anthropic.claude-3-haiku-20240307-v1:0"`).
    ///
    /// May carry a cross-region inference-profile prefix such as `"us."`.
    ModelId
}

string_id! {
    /// Identifies a stage by its configured name within a stage plan.
    ///
    /// Stage names are unique per plan and are the keys under which stage
    /// outputs are stored and referenced by later prompt templates.
    StageName
}

/// Cross-region inference-profile prefixes (e.g. the `us.` in
/// `us.anthropic.claude-3-haiku-20240307-v1:0`).
pub const INFERENCE_PROFILE_PREFIXES: &[&str] = &["us-gov.", "us.", "eu.", "apac.", "global."];

/// `id` without its inference-profile prefix, if it has one.
pub fn strip_inference_profile(id: &str) -> &str {
    INFERENCE_PROFILE_PREFIXES
        .iter()
        .find_map(|prefix| id.strip_prefix(prefix))
        .unwrap_or(id)
}

impl ModelId {
    /// The foundation-model identifier with any inference-profile prefix removed.
    pub fn base_id(&self) -> &str {
        strip_inference_profile(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers: UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single pipeline execution.
///
/// Generated fresh for every run; recorded on the `pipeline_run` span and in
/// the final report so all activity from a single run can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipelineRunId(Uuid);

impl PipelineRunId {
    /// A fresh v4 identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for PipelineRunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
