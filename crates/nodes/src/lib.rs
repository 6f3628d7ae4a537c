//! Stage execution and the built-in stage chain.
//!
//! This crate provides the [`PipelineExecutor`] that drives a validated
//! [`pipeline::StagePlan`] stage by stage, and the default four-stage
//! software-delivery chain in [`chain`].
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The executor sequences calls to
//! [`pipeline::Agent`] implementations and records what happened. It contains
//! no provider details and no domain rules of its own; plan validation lives
//! in the [`pipeline`] crate.

pub mod chain;
pub mod executor;

pub use chain::{default_chain, model_label, ChainModels, DEFAULT_PROJECT_REQUEST};
pub use executor::PipelineExecutor;
