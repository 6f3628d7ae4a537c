//! Executor behaviour against stub agents.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use nodes::{default_chain, ChainModels, PipelineExecutor};
use pipeline::{
    Agent, InferenceError, InferencePhase, ModelId, PromptTemplate, Stage, StageError, StageName,
    StagePlan,
};

/// Replies with a fixed text (or error) and remembers every prompt it saw.
struct StubAgent {
    model_id: ModelId,
    reply: Result<String, InferenceError>,
    delay: Duration,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl StubAgent {
    fn ok(text: &str) -> Arc<Self> {
        Self::new(Ok(text.to_string()))
    }

    fn failing() -> Arc<Self> {
        let model_id = model();
        Self::new(Err(InferenceError::Transport {
            model_id,
            message: "ThrottlingException: too many requests".into(),
        }))
    }

    fn new(reply: Result<String, InferenceError>) -> Arc<Self> {
        Arc::new(Self {
            model_id: model(),
            reply,
            delay: Duration::from_millis(5),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Agent for StubAgent {
    fn model_id(&self) -> &ModelId {
        &self.model_id
    }

    async fn run(&self, user_text: &str) -> Result<String, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(user_text.to_string());
        tokio::time::sleep(self.delay).await;
        self.reply.clone()
    }
}

fn model() -> ModelId {
    ModelId::new("anthropic.claude-3-haiku-20240307-v1:0").unwrap()
}

fn stage(name: &str, prompt: &str, agent: Arc<StubAgent>) -> Stage {
    Stage::new(
        StageName::new(name).unwrap(),
        PromptTemplate::parse(prompt).unwrap(),
        agent,
    )
}

/// The built-in four-stage chain, with each stage bound to its own agent.
fn four_stage_plan(agents: &[Arc<StubAgent>; 4]) -> StagePlan {
    let stages = default_chain(&ChainModels::default())
        .iter()
        .zip(agents)
        .map(|(spec, agent)| {
            let agent: Arc<dyn Agent> = agent.clone();
            Stage::from_spec(spec, agent).unwrap()
        })
        .collect();
    StagePlan::new(stages).unwrap()
}

#[tokio::test]
async fn all_stages_succeed_in_order() {
    let agents = [
        StubAgent::ok("A"),
        StubAgent::ok("B"),
        StubAgent::ok("C"),
        StubAgent::ok("D"),
    ];
    let plan = four_stage_plan(&agents);

    let report = PipelineExecutor::new().execute(&plan, "a chess clock").await;

    assert!(report.succeeded());
    let names: Vec<_> = report.records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["architecture", "development", "testing", "documentation"]);
    assert!(report.records.iter().all(|r| r.succeeded));
    assert!(report.total_elapsed >= report.stage_time());

    let outputs: Vec<_> = report.outputs.iter().map(|(_, text)| text).collect();
    assert_eq!(outputs, ["A", "B", "C", "D"]);
    assert!(agents.iter().all(|a| a.calls() == 1));
}

#[tokio::test]
async fn prompts_carry_the_growing_context() {
    let agents = [
        StubAgent::ok("ARCH"),
        StubAgent::ok("CODE"),
        StubAgent::ok("TESTS"),
        StubAgent::ok("DOCS"),
    ];
    let plan = four_stage_plan(&agents);

    PipelineExecutor::new().execute(&plan, "a chess clock").await;

    assert_eq!(
        agents[0].prompts(),
        ["Create a detailed architecture and rulebook for: a chess clock"]
    );
    assert!(agents[1].prompts()[0].ends_with("\nARCH"));
    assert!(agents[2].prompts()[0].ends_with("\nCODE"));

    let docs_prompt = &agents[3].prompts()[0];
    let arch = docs_prompt.find("Architecture:\nARCH").unwrap();
    let code = docs_prompt.find("Code Implementation:\nCODE").unwrap();
    let tests = docs_prompt.find("Test Suite:\nTESTS").unwrap();
    assert!(arch < code && code < tests);
}

#[tokio::test]
async fn failure_at_stage_two_halts_the_run() {
    let agents = [
        StubAgent::ok("A"),
        StubAgent::failing(),
        StubAgent::ok("C"),
        StubAgent::ok("D"),
    ];
    let plan = four_stage_plan(&agents);

    let report = PipelineExecutor::new().execute(&plan, "anything").await;

    assert!(!report.succeeded());
    assert_eq!(report.records.len(), 2);
    assert!(report.records[0].succeeded);
    assert!(!report.records[1].succeeded);

    assert_eq!(agents[2].calls(), 0);
    assert_eq!(agents[3].calls(), 0);

    assert_eq!(report.outputs.len(), 1);
    assert_eq!(
        report.outputs.get(&StageName::new("architecture").unwrap()),
        Some("A")
    );

    let failure = report.failure.as_ref().unwrap();
    assert_eq!(failure.stage.as_str(), "development");
    assert_eq!(failure.position, 2);
    assert_eq!(failure.elapsed, report.records[1].duration);
    match &failure.error {
        StageError::Inference(err) => assert_eq!(err.phase(), InferencePhase::Transport),
        other => panic!("unexpected error {other}"),
    }
    assert!(report.total_elapsed >= report.stage_time());
}

#[tokio::test]
async fn failure_at_first_stage_reports_total_elapsed_time() {
    let first = StubAgent::failing();
    let second = StubAgent::ok("unused");
    let plan = StagePlan::new(vec![
        stage("architecture", "{request}", first.clone()),
        stage("development", "{output:architecture}", second.clone()),
    ])
    .unwrap();

    let report = PipelineExecutor::new().execute(&plan, "x").await;

    assert_eq!(report.records.len(), 1);
    assert_eq!(second.calls(), 0);
    assert!(report.outputs.is_empty());
    assert!(report.total_elapsed >= report.failure.as_ref().unwrap().elapsed);
}

#[tokio::test]
async fn independent_later_stage_still_does_not_run_after_failure() {
    let failing = StubAgent::failing();
    let independent = StubAgent::ok("would have worked");
    let plan = StagePlan::new(vec![
        stage("first", "{request}", failing),
        stage("second", "no inputs needed", independent.clone()),
    ])
    .unwrap();

    let report = PipelineExecutor::new().execute(&plan, "x").await;

    assert_eq!(report.records.len(), 1);
    assert_eq!(independent.calls(), 0);
}

#[tokio::test]
async fn empty_plan_produces_empty_report() {
    let plan = StagePlan::new(Vec::new()).unwrap();

    let report = PipelineExecutor::new().execute(&plan, "x").await;

    assert!(report.succeeded());
    assert!(report.records.is_empty());
    assert!(report.outputs.is_empty());
    assert!(report.total_elapsed < Duration::from_secs(1));
}

#[tokio::test]
async fn empty_reply_is_reported_as_its_own_phase() {
    let empty = StubAgent::new(Err(InferenceError::EmptyReply { model_id: model() }));
    let plan = StagePlan::new(vec![stage("only", "{request}", empty)]).unwrap();

    let report = PipelineExecutor::new().execute(&plan, "x").await;

    let failure = report.failure.unwrap();
    assert!(failure.error.to_string().contains("no content in response"));
    match failure.error {
        StageError::Inference(err) => assert_eq!(err.phase(), InferencePhase::EmptyReply),
        other => panic!("unexpected error {other}"),
    }
}
