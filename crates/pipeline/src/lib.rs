//! Core domain for the staged inference pipeline.
//!
//! This crate contains every domain concept, newtype identifier, shared value
//! type, and error type used throughout the workspace. Infrastructure crates
//! implement the traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Domain layer.** No I/O crates. The [`Agent`] port is declared here and
//! implemented by the `llm` crate; the executor in `nodes` only sees the port.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`ModelId`, `StageName`, `PipelineRunId`) |
//! | [`types`] | Shared value types (`PromptRequest`, `StageRecord`, `StageOutputs`, etc.) |
//! | [`errors`] | Inference, template, and plan errors |
//! | [`ports`] | The [`Agent`] port |
//! | [`prompt`] | Prompt templates over earlier stage outputs |
//! | [`plan`] | Stage specifications and validated stage plans |
//! | [`report`] | Run reports and the timing summary |

pub mod errors;
pub mod identifiers;
pub mod plan;
pub mod ports;
pub mod prompt;
pub mod report;
pub mod types;

// Flat re-exports for downstream crates.
pub use errors::{InferenceError, InferencePhase, PlanError, TemplateError};
pub use identifiers::{
    strip_inference_profile, ModelId, PipelineRunId, StageName, INFERENCE_PROFILE_PREFIXES,
};
pub use plan::{Stage, StagePlan, StageSpec};
pub use ports::Agent;
pub use prompt::PromptTemplate;
pub use report::{PipelineReport, StageError, StageFailure};
pub use types::{ModelReply, PromptRequest, StageOutputs, StageRecord, Timestamp};
