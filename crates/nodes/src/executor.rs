//! [`PipelineExecutor`]: runs a [`StagePlan`] one stage at a time.
//!
//! There is one loop and one failure path. A stage that fails is recorded,
//! and nothing after it runs, even if its inputs happen to exist already.

use std::time::Instant;

use pipeline::{
    PipelineReport, PipelineRunId, Stage, StageError, StageFailure, StageOutputs, StagePlan,
    StageRecord, Timestamp,
};
use tracing::Instrument;

/// Drives stage plans.
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineExecutor;

impl PipelineExecutor {
    /// Creates an executor.
    pub fn new() -> Self {
        Self
    }

    /// Runs `plan` with `request` as the pipeline input.
    ///
    /// Stages execute strictly in order. The first failure ends the run; the
    /// report then holds one record per attempted stage and the outputs of the
    /// stages that succeeded. Dropping the returned future cancels the run at
    /// whichever stage is in flight.
    pub async fn execute(&self, plan: &StagePlan, request: &str) -> PipelineReport {
        let run = PipelineRun::start();
        let span = tracing::info_span!("pipeline_run", run_id = %run.run_id);
        run.drive(plan, request).instrument(span).await
    }
}

/// Transient state of one execution.
struct PipelineRun {
    run_id: PipelineRunId,
    started_at: Timestamp,
    clock: Instant,
    records: Vec<StageRecord>,
    outputs: StageOutputs,
}

impl PipelineRun {
    fn start() -> Self {
        Self {
            run_id: PipelineRunId::new_random(),
            started_at: Timestamp::now(),
            clock: Instant::now(),
            records: Vec::new(),
            outputs: StageOutputs::new(),
        }
    }

    async fn drive(mut self, plan: &StagePlan, request: &str) -> PipelineReport {
        let total = plan.len();
        tracing::info!(stages = total, "pipeline started");

        for (index, stage) in plan.stages().iter().enumerate() {
            let position = index + 1;
            let span = tracing::info_span!(
                "stage",
                stage = %stage.name(),
                position,
                model_id = %stage.agent().model_id(),
            );

            let started = Instant::now();
            let outcome = self.run_stage(stage, request).instrument(span.clone()).await;
            let elapsed = started.elapsed();

            self.records.push(StageRecord {
                name: stage.name().clone(),
                label: stage.label().to_string(),
                duration: elapsed,
                succeeded: outcome.is_ok(),
            });

            match outcome {
                Ok(text) => {
                    tracing::info!(
                        parent: &span,
                        elapsed_secs = elapsed.as_secs_f64(),
                        output_chars = text.len(),
                        "stage {position}/{total} completed"
                    );
                    self.outputs.push(stage.name().clone(), text);
                }
                Err(error) => {
                    tracing::error!(
                        parent: &span,
                        elapsed_secs = elapsed.as_secs_f64(),
                        error = %error,
                        "stage {position}/{total} failed; halting pipeline"
                    );
                    let failure = StageFailure {
                        stage: stage.name().clone(),
                        position,
                        label: stage.label().to_string(),
                        error,
                        elapsed,
                    };
                    return self.finish(Some(failure));
                }
            }
        }

        self.finish(None)
    }

    async fn run_stage(&self, stage: &Stage, request: &str) -> Result<String, StageError> {
        let prompt = stage
            .template()
            .render(request, &self.outputs)
            .map_err(StageError::Prompt)?;
        tracing::debug!(prompt_chars = prompt.len(), "prompt rendered");

        stage
            .agent()
            .run(&prompt)
            .await
            .map_err(StageError::Inference)
    }

    fn finish(self, failure: Option<StageFailure>) -> PipelineReport {
        let total_elapsed = self.clock.elapsed();
        tracing::info!(
            total_secs = total_elapsed.as_secs_f64(),
            attempted = self.records.len(),
            succeeded = failure.is_none(),
            "pipeline finished"
        );
        PipelineReport {
            run_id: self.run_id,
            started_at: self.started_at,
            records: self.records,
            outputs: self.outputs,
            total_elapsed,
            failure,
        }
    }
}
