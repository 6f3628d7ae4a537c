//! Command-line and environment configuration.
//!
//! Every option can come from a flag or an environment variable; `.env` is
//! loaded before parsing so its values act as environment defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use nodes::chain::{
    DEFAULT_ARCHITECTURE_MODEL, DEFAULT_DEVELOPMENT_MODEL, DEFAULT_DOCUMENTATION_MODEL,
    DEFAULT_TESTING_MODEL,
};
use nodes::{default_chain, ChainModels, DEFAULT_PROJECT_REQUEST};
use pipeline::StageSpec;

/// How requests reach Bedrock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransportKind {
    /// HTTP when an API key is configured, the AWS SDK otherwise.
    Auto,
    /// AWS SDK with the default credential chain (SigV4).
    Sdk,
    /// HTTPS with a Bedrock API key.
    Http,
}

/// Log output format on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Runs a chain of dependent Bedrock model calls and reports per-stage timing.
#[derive(Debug, Clone, Parser)]
#[command(name = "bedrock-chain", version, about)]
pub struct Cli {
    /// Project request fed to the first stage.
    #[arg(long, env = "PROJECT_REQUEST", default_value = DEFAULT_PROJECT_REQUEST)]
    pub request: String,

    /// AWS region of the Bedrock Runtime endpoint.
    #[arg(long, env = "AWS_DEFAULT_REGION", default_value = "us-east-1")]
    pub region: String,

    /// Transport used to reach Bedrock.
    #[arg(long, value_enum, env = "BEDROCK_TRANSPORT", default_value_t = TransportKind::Auto)]
    pub transport: TransportKind,

    /// Bedrock API key (bearer token) for the HTTP transport.
    #[arg(long, env = "AWS_BEARER_TOKEN_BEDROCK", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override the Bedrock Runtime base URL (HTTP transport only).
    #[arg(long, env = "BEDROCK_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds (HTTP transport only).
    #[arg(long, env = "BEDROCK_TIMEOUT_SECS", default_value_t = 300)]
    pub timeout_secs: u64,

    /// Model for the architecture stage.
    #[arg(long, env = "ARCHITECTURE_MODEL", default_value = DEFAULT_ARCHITECTURE_MODEL)]
    pub architecture_model: String,

    /// Model for the development stage.
    #[arg(long, env = "DEVELOPMENT_MODEL", default_value = DEFAULT_DEVELOPMENT_MODEL)]
    pub development_model: String,

    /// Model for the testing stage.
    #[arg(long, env = "TESTING_MODEL", default_value = DEFAULT_TESTING_MODEL)]
    pub testing_model: String,

    /// Model for the documentation stage.
    #[arg(long, env = "DOCUMENTATION_MODEL", default_value = DEFAULT_DOCUMENTATION_MODEL)]
    pub documentation_model: String,

    /// JSON file with a custom stage list; replaces the built-in chain.
    #[arg(long, env = "STAGE_PLAN")]
    pub plan: Option<PathBuf>,

    /// Directory to write each stage output and `report.json` into.
    #[arg(long, env = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// List the foundation models available in the region and exit.
    #[arg(long)]
    pub list_models: bool,

    /// Omit stage output sections; the banner, outcome and timing summary still print.
    #[arg(long)]
    pub quiet: bool,

    /// Log format.
    #[arg(long, value_enum, env = "LOG_FORMAT", default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// OTLP gRPC endpoint for trace export (e.g. `http://localhost:4317`).
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,
}

impl Cli {
    /// Model assignment for the built-in chain.
    pub fn chain_models(&self) -> ChainModels {
        ChainModels {
            architecture: self.architecture_model.clone(),
            development: self.development_model.clone(),
            testing: self.testing_model.clone(),
            documentation: self.documentation_model.clone(),
        }
    }

    /// The stage list to run: the plan file if given, the built-in chain otherwise.
    pub fn stage_specs(&self) -> anyhow::Result<Vec<StageSpec>> {
        match &self.plan {
            Some(path) => load_plan(path),
            None => Ok(default_chain(&self.chain_models())),
        }
    }

    /// The transport to build, with `Auto` resolved.
    pub fn resolved_transport(&self) -> TransportKind {
        match self.transport {
            TransportKind::Auto if self.api_key.is_some() => TransportKind::Http,
            TransportKind::Auto => TransportKind::Sdk,
            other => other,
        }
    }

    /// HTTP transport timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Reads a JSON array of [`StageSpec`]s.
pub fn load_plan(path: &Path) -> anyhow::Result<Vec<StageSpec>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read stage plan {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse stage plan {}", path.display()))
}
