//! Shared value types for the staged inference pipeline.
//!
//! Values that move between the executor and the model adapter. Several hold
//! invariants (system instructions are never blank,
//! stage outputs are append-only) and flow between the pipeline and the
//! model adapter.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ModelId, StageName};

// ---------------------------------------------------------------------------
// Model call values
// ---------------------------------------------------------------------------

/// One prompt bound for one model.
///
/// Immutable once constructed; one per agent call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRequest {
    model_id: ModelId,
    system_instruction: Option<String>,
    user_text: String,
}

impl PromptRequest {
    /// Creates a request. A blank system instruction is treated as absent.
    pub fn new(
        model_id: ModelId,
        system_instruction: Option<String>,
        user_text: impl Into<String>,
    ) -> Self {
        Self {
            model_id,
            system_instruction: system_instruction.filter(|s| !s.trim().is_empty()),
            user_text: user_text.into(),
        }
    }

    /// Model this request is addressed to.
    pub fn model_id(&self) -> &ModelId {
        &self.model_id
    }

    /// System instruction, if one is configured.
    pub fn system_instruction(&self) -> Option<&str> {
        self.system_instruction.as_deref()
    }

    /// The user turn.
    pub fn user_text(&self) -> &str {
        &self.user_text
    }
}

/// Text extracted from a model reply.
///
/// All family-specific envelope fields are discarded during decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelReply {
    /// The first text block of the reply.
    pub text: String,
}

// ---------------------------------------------------------------------------
// Stage bookkeeping
// ---------------------------------------------------------------------------

/// Timing and outcome of one attempted stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageRecord {
    /// Stage name.
    pub name: StageName,
    /// Label shown in reports (the display name, or the stage name).
    pub label: String,
    /// Wall-clock time spent in the stage.
    #[serde(with = "duration_secs")]
    pub duration: Duration,
    /// Whether the stage produced output.
    pub succeeded: bool,
}

/// Append-only, ordered mapping from stage name to stage output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StageOutputs {
    entries: Vec<(StageName, String)>,
}

impl StageOutputs {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the output of `stage`.
    ///
    /// Returns `false`, leaving the mapping unchanged, if `stage` already has
    /// an output.
    pub fn push(&mut self, stage: StageName, text: String) -> bool {
        if self.contains(&stage) {
            return false;
        }
        self.entries.push((stage, text));
        true
    }

    /// Returns the output of `stage`, if produced.
    pub fn get(&self, stage: &StageName) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == stage)
            .map(|(_, text)| text.as_str())
    }

    /// Returns `true` if `stage` has produced output.
    pub fn contains(&self, stage: &StageName) -> bool {
        self.entries.iter().any(|(name, _)| name == stage)
    }

    /// Iterates outputs in the order they were produced.
    pub fn iter(&self) -> impl Iterator<Item = (&StageName, &str)> {
        self.entries.iter().map(|(name, text)| (name, text.as_str()))
    }

    /// Number of stored outputs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no stage has produced output.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// UTC wall-clock time, displayed as RFC 3339.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current time.
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// Serialises a [`Duration`] as fractional seconds.
pub(crate) mod duration_secs {
    use std::time::Duration;

    use serde::Serializer;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }
}
