//! The outcome of one pipeline execution.

use std::fmt::Write as _;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::types::duration_secs;
use crate::{
    InferenceError, PipelineRunId, StageName, StageOutputs, StageRecord, TemplateError, Timestamp,
};

const NAME_WIDTH: usize = 35;
const RULE_WIDTH: usize = 50;

/// Why a stage failed.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum StageError {
    /// The model call failed.
    #[error(transparent)]
    Inference(InferenceError),

    /// The stage prompt could not be rendered.
    #[error("prompt rendering failed: {0}")]
    Prompt(TemplateError),
}

/// The stage that halted a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageFailure {
    /// Name of the failing stage.
    pub stage: StageName,
    /// One-based position of the stage in the plan.
    pub position: usize,
    /// Report label of the failing stage.
    pub label: String,
    /// What went wrong.
    pub error: StageError,
    /// Time spent in the failing stage.
    #[serde(with = "duration_secs")]
    pub elapsed: Duration,
}

/// Everything a finished (or halted) run produced.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Run identifier.
    pub run_id: PipelineRunId,
    /// When the run started.
    pub started_at: Timestamp,
    /// One record per attempted stage, in execution order.
    pub records: Vec<StageRecord>,
    /// Outputs of every stage that succeeded.
    pub outputs: StageOutputs,
    /// Wall-clock time from run start to loop termination.
    #[serde(with = "duration_secs")]
    pub total_elapsed: Duration,
    /// The stage that halted the run, if any.
    pub failure: Option<StageFailure>,
}

impl PipelineReport {
    /// Returns `true` if every stage completed.
    pub fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    /// Sum of the individual stage durations.
    pub fn stage_time(&self) -> Duration {
        self.records.iter().map(|r| r.duration).sum()
    }

    /// Renders the timing summary table.
    ///
    /// ```text
    /// TIMING SUMMARY
    /// --------------------------------------------------
    /// Architecture (Claude Sonnet)       :    12.34 sec ✅
    /// --------------------------------------------------
    /// Total Pipeline Time: 12.35 seconds
    /// ==================================================
    /// ```
    pub fn timing_summary(&self) -> String {
        let rule = "-".repeat(RULE_WIDTH);
        let mut out = String::new();
        let _ = writeln!(out, "TIMING SUMMARY");
        let _ = writeln!(out, "{rule}");
        for record in &self.records {
            let status = if record.succeeded { "✅" } else { "❌" };
            let _ = writeln!(
                out,
                "{:<width$}: {:>8.2} sec {}",
                record.label,
                record.duration.as_secs_f64(),
                status,
                width = NAME_WIDTH,
            );
        }
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "Total Pipeline Time: {:.2} seconds",
            self.total_elapsed.as_secs_f64()
        );
        let _ = write!(out, "{}", "=".repeat(RULE_WIDTH));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelId;

    fn record(label: &str, millis: u64, succeeded: bool) -> StageRecord {
        StageRecord {
            name: StageName::new(label.to_lowercase()).unwrap(),
            label: label.into(),
            duration: Duration::from_millis(millis),
            succeeded,
        }
    }

    fn report(records: Vec<StageRecord>, failure: Option<StageFailure>) -> PipelineReport {
        PipelineReport {
            run_id: PipelineRunId::new_random(),
            started_at: Timestamp::now(),
            records,
            outputs: StageOutputs::new(),
            total_elapsed: Duration::from_millis(3_000),
            failure,
        }
    }

    #[test]
    fn summary_lists_each_stage_with_marker() {
        let report = report(
            vec![record("Architecture", 1_250, true), record("Development", 500, false)],
            None,
        );
        let summary = report.timing_summary();
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines[0], "TIMING SUMMARY");
        assert_eq!(
            lines[2],
            format!("{:<35}: {:>8.2} sec ✅", "Architecture", 1.25)
        );
        assert!(lines[3].starts_with("Development"));
        assert!(lines[3].ends_with("0.50 sec ❌"));
        assert_eq!(lines[5], "Total Pipeline Time: 3.00 seconds");
    }

    #[test]
    fn empty_report_has_no_stage_lines() {
        let report = report(Vec::new(), None);
        assert!(report.succeeded());
        assert_eq!(report.stage_time(), Duration::ZERO);
        assert_eq!(report.timing_summary().lines().count(), 5);
    }

    #[test]
    fn failure_serialises_with_error_detail() {
        let model_id = ModelId::new("anthropic.claude-3-haiku-20240307-v1:0").unwrap();
        let failure = StageFailure {
            stage: StageName::new("development").unwrap(),
            position: 2,
            label: "Development".into(),
            error: StageError::Inference(InferenceError::EmptyReply { model_id }),
            elapsed: Duration::from_millis(250),
        };
        let report = report(vec![record("Development", 250, false)], Some(failure));
        assert!(!report.succeeded());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["failure"]["stage"], "development");
        assert_eq!(json["failure"]["error"]["source"], "inference");
        assert_eq!(json["failure"]["elapsed"], 0.25);
        assert_eq!(json["total_elapsed"], 3.0);
    }
}
