//! Console rendering and on-disk artifacts for a finished run.

use std::fmt::Write as _;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use llm::ModelSummary;
use pipeline::{PipelineReport, StageFailure, StageName, StageSpec};

const RULE_WIDTH: usize = 50;

/// Lists the stage-to-model assignment before the run starts.
pub fn render_banner(request: &str, specs: &[StageSpec]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Starting pipeline for: {request}");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    for (position, spec) in specs.iter().enumerate() {
        let _ = writeln!(
            out,
            "Stage {}: {} -> {}",
            position + 1,
            spec.display_name.as_deref().unwrap_or(&spec.name),
            spec.model_id
        );
    }
    out
}

/// Foundation models in `region`, marking which ones the adapter can drive.
pub fn render_model_list(region: &str, models: &[ModelSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Using region: {region}");
    let _ = writeln!(out, "Found {} models:\n", models.len());
    for model in models {
        let _ = writeln!(out, "Model ID: {}", model.model_id);
        let _ = writeln!(out, "Model Name: {}", model.name.as_deref().unwrap_or("-"));
        let _ = writeln!(out, "Provider: {}", model.provider.as_deref().unwrap_or("-"));
        let family = model.family.map_or("unsupported", |f| f.as_str());
        let _ = writeln!(out, "Adapter: {family}");
        let _ = writeln!(out, "{}", "-".repeat(40));
    }
    out
}

/// Every successful stage output under a `=== NAME ===` heading.
pub fn render_outputs(report: &PipelineReport) -> String {
    let mut out = String::new();
    for (stage, text) in report.outputs.iter() {
        let _ = writeln!(out, "\n=== {} ===", stage.as_str().to_uppercase());
        let _ = writeln!(out, "{text}");
    }
    out
}

/// Everything printed after a run: stage outputs (unless `quiet`), the
/// outcome, and the timing summary.
pub fn render_report(report: &PipelineReport, quiet: bool) -> String {
    let mut out = String::new();
    if !quiet {
        out.push_str(&render_outputs(report));
    }
    out.push('\n');
    match &report.failure {
        Some(failure) => out.push_str(&render_failure(failure)),
        None => out.push_str("PIPELINE COMPLETED SUCCESSFULLY"),
    }
    out.push('\n');
    out.push_str(&report.timing_summary());
    out
}

/// The failure banner: which stage, why, and how long it ran.
pub fn render_failure(failure: &StageFailure) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(
        out,
        "PIPELINE FAILED at Stage {} ({})",
        failure.position, failure.label
    );
    let _ = writeln!(out, "Error: {}", failure.error);
    let _ = writeln!(
        out,
        "Stage time before failure: {:.2} seconds",
        failure.elapsed.as_secs_f64()
    );
    let _ = write!(out, "{rule}");
    out
}

/// Writes `<stage>.md` for each output and `report.json` into `dir`.
///
/// Returns the paths written, in order.
pub async fn write_artifacts(dir: &Path, report: &PipelineReport) -> anyhow::Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("failed to create {}", dir.display()))?;

    let mut files = Vec::with_capacity(report.outputs.len());
    for (stage, text) in report.outputs.iter() {
        files.push((artifact_path(dir, stage)?, text));
    }

    let mut written = Vec::with_capacity(files.len() + 1);
    for (path, text) in files {
        tokio::fs::write(&path, text)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        written.push(path);
    }

    let path = dir.join("report.json");
    let json = serde_json::to_vec_pretty(report).context("failed to serialise report")?;
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    written.push(path);

    Ok(written)
}

/// `<dir>/<stage>.md`, refusing names that would leave `dir`.
fn artifact_path(dir: &Path, stage: &StageName) -> anyhow::Result<PathBuf> {
    let file_name = format!("{}.md", stage.as_str());
    let mut components = Path::new(&file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(dir.join(&file_name)),
        _ => anyhow::bail!("stage name '{stage}' cannot be used as an output file name"),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pipeline::{
        InferenceError, ModelId, PipelineRunId, StageError, StageOutputs, StageRecord, Timestamp,
    };

    use super::*;

    fn name(s: &str) -> StageName {
        StageName::new(s).unwrap()
    }

    fn halted_report() -> PipelineReport {
        let mut outputs = StageOutputs::new();
        outputs.push(name("architecture"), "# Board\n3x3 grid".into());

        let model_id = ModelId::new("amazon.nova-lite-v1:0").unwrap();
        PipelineReport {
            run_id: PipelineRunId::new_random(),
            started_at: Timestamp::now(),
            records: vec![
                StageRecord {
                    name: name("architecture"),
                    label: "Architecture".into(),
                    duration: Duration::from_millis(1_200),
                    succeeded: true,
                },
                StageRecord {
                    name: name("development"),
                    label: "Development".into(),
                    duration: Duration::from_millis(300),
                    succeeded: false,
                },
            ],
            outputs,
            total_elapsed: Duration::from_millis(1_510),
            failure: Some(StageFailure {
                stage: name("development"),
                position: 2,
                label: "Development".into(),
                error: StageError::Inference(InferenceError::EmptyReply { model_id }),
                elapsed: Duration::from_millis(300),
            }),
        }
    }

    #[test]
    fn outputs_are_headed_by_upper_case_stage_name() {
        let text = render_outputs(&halted_report());
        assert!(text.contains("=== ARCHITECTURE ===\n# Board\n3x3 grid\n"));
        assert!(!text.contains("DEVELOPMENT"));
    }

    #[test]
    fn failure_names_position_label_and_time() {
        let report = halted_report();
        let text = render_failure(report.failure.as_ref().unwrap());
        assert!(text.contains("PIPELINE FAILED at Stage 2 (Development)"));
        assert!(text.contains("no content in response from 'amazon.nova-lite-v1:0'"));
        assert!(text.contains("Stage time before failure: 0.30 seconds"));
    }

    #[test]
    fn quiet_report_keeps_outcome_and_summary_only() {
        let report = halted_report();

        let full = render_report(&report, false);
        assert!(full.contains("=== ARCHITECTURE ==="));

        let quiet = render_report(&report, true);
        assert!(!quiet.contains("=== ARCHITECTURE ==="));
        assert!(!quiet.contains("3x3 grid"));
        assert!(quiet.contains("PIPELINE FAILED at Stage 2 (Development)"));
        assert!(quiet.ends_with(&report.timing_summary()));
    }

    #[test]
    fn model_list_marks_unsupported_models() {
        let models = [
            ModelSummary::new(
                "amazon.nova-lite-v1:0",
                Some("Nova Lite".into()),
                Some("Amazon".into()),
            ),
            ModelSummary::new("cohere.command-r-v1:0", None, Some("Cohere".into())),
        ];
        let text = render_model_list("us-east-1", &models);

        assert!(text.starts_with("Using region: us-east-1\nFound 2 models:\n\n"));
        assert!(text.contains(
            "Model ID: amazon.nova-lite-v1:0\nModel Name: Nova Lite\nProvider: Amazon\nAdapter: nova\n"
        ));
        assert!(text.contains("Model Name: -\nProvider: Cohere\nAdapter: unsupported\n"));
    }

    #[test]
    fn banner_falls_back_to_stage_name() {
        let specs = vec![StageSpec {
            name: "draft".into(),
            display_name: None,
            model_id: "amazon.titan-text-express-v1".into(),
            system_instruction: None,
            prompt: "{request}".into(),
        }];
        let text = render_banner("a chess clock", &specs);
        assert!(text.starts_with("Starting pipeline for: a chess clock\n"));
        assert!(text.contains("Stage 1: draft -> amazon.titan-text-express-v1"));
    }

    #[tokio::test]
    async fn artifacts_never_leave_the_output_directory() {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("run");
        let mut report = halted_report();
        report.outputs = StageOutputs::new();
        report.outputs.push(name("../escaped"), "X".into());

        let err = write_artifacts(&target, &report).await.unwrap_err();

        assert!(err.to_string().contains("../escaped"));
        assert!(!root.path().join("escaped.md").exists());
        assert!(!target.join("report.json").exists());
    }

    #[tokio::test]
    async fn artifacts_hold_outputs_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("run");

        let written = write_artifacts(&target, &halted_report()).await.unwrap();

        assert_eq!(written, [target.join("architecture.md"), target.join("report.json")]);
        let arch = std::fs::read_to_string(target.join("architecture.md")).unwrap();
        assert_eq!(arch, "# Board\n3x3 grid");

        let json: serde_json::Value =
            serde_json::from_slice(&std::fs::read(target.join("report.json")).unwrap()).unwrap();
        assert_eq!(json["records"].as_array().unwrap().len(), 2);
        assert_eq!(json["failure"]["position"], 2);
        assert_eq!(json["failure"]["error"]["kind"], "empty_reply");
    }
}
