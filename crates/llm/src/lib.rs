//! Bedrock model adapter infrastructure.
//!
//! Implements the [`pipeline::Agent`] trait for models served by AWS Bedrock
//! Runtime. Three model families with irreconcilable wire schemas (Claude,
//! Titan, Nova) sit behind one "prompt in, text out" contract. Additional
//! families are added in [`family`] and [`adapter`] without any changes to the
//! `pipeline` or `nodes` crates.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Family detection, request formatting, response parsing,
//! and HTTP/SDK transport live here. The [`pipeline`] crate sees only
//! [`pipeline::Agent`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`family`] | [`ModelFamily`] and identifier matching |
//! | [`adapter`] | [`ModelAdapter`]: encode requests, decode replies |
//! | [`agent`] | [`InferenceAgent`]: the [`pipeline::Agent`] implementation |
//! | [`transport`] | [`Transport`] trait and [`TransportError`] |
//! | [`sdk`] | [`BedrockSdkTransport`] (AWS SDK, SigV4) |
//! | [`http`] | [`BedrockHttpTransport`] (HTTPS, API key) |
//! | [`catalog`] | Foundation-model listing for a region |

pub mod adapter;
pub mod agent;
pub mod catalog;
pub mod family;
pub mod http;
pub mod sdk;
pub mod transport;
mod wire;

pub use adapter::{ModelAdapter, CONTENT_TYPE};
pub use agent::InferenceAgent;
pub use catalog::{list_foundation_models, ModelSummary};
pub use family::ModelFamily;
pub use http::BedrockHttpTransport;
pub use sdk::BedrockSdkTransport;
pub use transport::{Transport, TransportError};
