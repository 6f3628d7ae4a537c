//! bedrock-chain CLI entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Load configuration**: read `.env`, then parse flags with environment
//!    fallbacks (see [`config::Cli`]).
//! 2. **Wire observability**: install a `tracing-subscriber` stack on stderr,
//!    plus an OpenTelemetry OTLP exporter when an endpoint is configured.
//! 3. **Construct infrastructure**: pick a Bedrock transport (AWS SDK or
//!    API-key HTTP), bind one [`llm::InferenceAgent`] per stage, and validate
//!    the resulting [`pipeline::StagePlan`].
//! 4. **Run and report**: drive the plan with [`nodes::PipelineExecutor`],
//!    print stage outputs and the timing summary, and optionally persist them.
//!
//! Exit status is `0` when every stage succeeded and `1` otherwise, including
//! configuration errors and Ctrl-C.

mod config;
mod observability;
mod output;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use llm::{BedrockHttpTransport, BedrockSdkTransport, InferenceAgent, Transport};
use nodes::PipelineExecutor;
use pipeline::{Stage, StagePlan, StageSpec};
use tracing::{error, info, warn};

use crate::config::{Cli, TransportKind};

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    let telemetry = match observability::init(cli.log_format, cli.otlp_endpoint.as_deref()) {
        Ok(telemetry) => telemetry,
        Err(err) => {
            eprintln!("error: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded environment file"),
        Err(err) if err.not_found() => warn!("no .env file found; using process environment"),
        Err(err) => warn!(error = %err, "failed to load .env file"),
    }

    let code = match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!(error = ?err, "pipeline could not start");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    };

    telemetry.shutdown();
    code
}

/// Returns `Ok(true)` when every stage succeeded.
async fn run(cli: Cli) -> anyhow::Result<bool> {
    if cli.list_models {
        let models = llm::list_foundation_models(cli.region.clone())
            .await
            .context("failed to list foundation models")?;
        print!("{}", output::render_model_list(&cli.region, &models));
        return Ok(true);
    }

    let specs = cli.stage_specs()?;
    let transport = build_transport(&cli).await?;
    let plan = bind_plan(&specs, transport)?;

    print!("{}", output::render_banner(&cli.request, &specs));

    let executor = PipelineExecutor::new();
    let report = tokio::select! {
        report = executor.execute(&plan, &cli.request) => report,
        _ = tokio::signal::ctrl_c() => {
            warn!("interrupted; abandoning the in-flight stage");
            println!("\nPipeline cancelled.");
            return Ok(false);
        }
    };

    println!("{}", output::render_report(&report, cli.quiet));

    if let Some(dir) = &cli.output_dir {
        let written = output::write_artifacts(dir, &report).await?;
        info!(dir = %dir.display(), files = written.len(), "wrote run artifacts");
    }

    Ok(report.succeeded())
}

async fn build_transport(cli: &Cli) -> anyhow::Result<Arc<dyn Transport>> {
    match cli.resolved_transport() {
        TransportKind::Http => {
            let api_key = cli.api_key.clone().unwrap_or_else(|| {
                warn!("AWS_BEARER_TOKEN_BEDROCK is not set; requests will be rejected");
                String::new()
            });
            let transport = match &cli.endpoint {
                Some(endpoint) => {
                    BedrockHttpTransport::with_endpoint(endpoint.as_str(), api_key, cli.timeout())
                }
                None => BedrockHttpTransport::new(&cli.region, api_key, cli.timeout()),
            }
            .context("failed to build HTTP client")?;
            info!(endpoint = transport.endpoint(), "using Bedrock API-key transport");
            Ok(Arc::new(transport))
        }
        TransportKind::Sdk | TransportKind::Auto => {
            let has_keys = std::env::var_os("AWS_ACCESS_KEY_ID").is_some()
                && std::env::var_os("AWS_SECRET_ACCESS_KEY").is_some();
            if has_keys {
                info!(region = %cli.region, "AWS credentials found in environment");
            } else {
                warn!(
                    region = %cli.region,
                    "AWS credentials not in environment; relying on the default provider chain"
                );
            }
            Ok(Arc::new(BedrockSdkTransport::from_region(cli.region.clone()).await))
        }
    }
}

fn bind_plan(specs: &[StageSpec], transport: Arc<dyn Transport>) -> anyhow::Result<StagePlan> {
    let stages = specs
        .iter()
        .map(|spec| -> anyhow::Result<Stage> {
            let agent = InferenceAgent::new(
                spec.model()?,
                spec.system_instruction.clone(),
                Arc::clone(&transport),
            )
            .with_context(|| format!("stage '{}'", spec.name))?;
            Ok(Stage::from_spec(spec, Arc::new(agent))?)
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(StagePlan::new(stages)?)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use llm::TransportError;
    use nodes::{default_chain, ChainModels};
    use pipeline::ModelId;

    use super::*;

    struct NoopTransport;

    #[async_trait]
    impl Transport for NoopTransport {
        async fn invoke(
            &self,
            _model_id: &ModelId,
            _content_type: &str,
            _body: Vec<u8>,
        ) -> Result<Vec<u8>, TransportError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn default_chain_binds_to_a_valid_plan() {
        let specs = default_chain(&ChainModels::default());
        let plan = bind_plan(&specs, Arc::new(NoopTransport)).unwrap();
        assert_eq!(plan.len(), 4);
        assert_eq!(plan.stages()[3].label(), "Documentation (Titan Express)");
    }

    #[test]
    fn unknown_model_is_a_configuration_error() {
        let mut specs = default_chain(&ChainModels::default());
        specs[1].model_id = "meta.llama3-8b-instruct-v1:0".into();
        let err = bind_plan(&specs, Arc::new(NoopTransport)).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("stage 'development'"));
        assert!(message.contains("meta.llama3-8b-instruct-v1:0"));
    }

    #[test]
    fn stage_name_that_escapes_the_output_directory_is_rejected() {
        let mut specs = default_chain(&ChainModels::default());
        specs[0].name = "../architecture".into();
        let err = bind_plan(&specs, Arc::new(NoopTransport)).unwrap_err();
        assert!(format!("{err:#}").contains("'../architecture' is not allowed"));
    }

    #[test]
    fn forward_reference_is_rejected_before_any_call() {
        let mut specs = default_chain(&ChainModels::default());
        specs.swap(0, 1);
        assert!(bind_plan(&specs, Arc::new(NoopTransport)).is_err());
    }
}
