//! Stage definitions and validated stage plans.
//!
//! A [`StageSpec`] is the serialisable description of a stage (what a plan
//! file or the built-in chain provides). A [`Stage`] binds a spec's name and
//! template to a live [`Agent`]. A [`StagePlan`] is an ordered list of stages
//! that has passed validation:
//!
//! - stage names are unique and usable as plain file names;
//! - every `{output:X}` placeholder in stage *i* names a stage *j < i*.
//!
//! An invalid plan is never constructed, so the executor does not need to
//! handle missing inputs at run time.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Agent, ModelId, PlanError, PromptTemplate, StageName};

// ---------------------------------------------------------------------------
// Stage specification
// ---------------------------------------------------------------------------

/// Declarative description of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSpec {
    /// Unique stage name; the key later prompts use to reference its output.
    pub name: String,

    /// Label used in reports (e.g. `"Architecture (Claude Sonnet)"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Bedrock model identifier.
    pub model_id: String,

    /// Fixed system instruction for every call this stage makes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,

    /// Prompt template (see [`crate::prompt`]).
    pub prompt: String,
}

impl StageSpec {
    /// Validated stage name.
    pub fn stage_name(&self) -> Result<StageName, PlanError> {
        let name = StageName::new(self.name.trim()).ok_or(PlanError::EmptyStageName)?;
        check_stage_name(&name)?;
        Ok(name)
    }

    /// Validated model identifier.
    pub fn model(&self) -> Result<ModelId, PlanError> {
        let stage = self.stage_name()?;
        ModelId::new(self.model_id.trim()).ok_or(PlanError::EmptyModelId { stage })
    }

    /// Parsed prompt template.
    pub fn template(&self) -> Result<PromptTemplate, PlanError> {
        let stage = self.stage_name()?;
        PromptTemplate::parse(self.prompt.as_str())
            .map_err(|source| PlanError::Template { stage, source })
    }
}

// ---------------------------------------------------------------------------
// Bound stages
// ---------------------------------------------------------------------------

/// One stage bound to the agent that will run it.
#[derive(Clone)]
pub struct Stage {
    name: StageName,
    display_name: Option<String>,
    template: PromptTemplate,
    agent: Arc<dyn Agent>,
}

impl Stage {
    /// Creates a stage.
    pub fn new(name: StageName, template: PromptTemplate, agent: Arc<dyn Agent>) -> Self {
        Self {
            name,
            display_name: None,
            template,
            agent,
        }
    }

    /// Binds `spec` to `agent`.
    pub fn from_spec(spec: &StageSpec, agent: Arc<dyn Agent>) -> Result<Self, PlanError> {
        let stage = Self::new(spec.stage_name()?, spec.template()?, agent);
        Ok(match spec.display_name.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => stage.with_display_name(label),
            _ => stage,
        })
    }

    /// Sets the label used in reports.
    pub fn with_display_name(mut self, label: impl Into<String>) -> Self {
        self.display_name = Some(label.into());
        self
    }

    /// Stage name.
    pub fn name(&self) -> &StageName {
        &self.name
    }

    /// Report label: the display name if set, otherwise the stage name.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(self.name.as_str())
    }

    /// Prompt template.
    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    /// Agent that runs this stage.
    pub fn agent(&self) -> &dyn Agent {
        self.agent.as_ref()
    }
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("name", &self.name)
            .field("display_name", &self.display_name)
            .field("model_id", self.agent.model_id())
            .field("template", &self.template.source())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Plans
// ---------------------------------------------------------------------------

/// Stage names become `<name>.md` on disk and `{output:<name>}` in prompts.
fn check_stage_name(name: &StageName) -> Result<(), PlanError> {
    let text = name.as_str();
    let forbidden = |c: char| matches!(c, '/' | '\\' | ':' | '{' | '}') || c.is_control();
    if text.starts_with('.') || text.contains(forbidden) {
        return Err(PlanError::InvalidStageName {
            name: text.to_string(),
        });
    }
    Ok(())
}

/// An ordered, validated list of stages.
#[derive(Debug, Clone, Default)]
pub struct StagePlan {
    stages: Vec<Stage>,
}

impl StagePlan {
    /// Validates and wraps `stages`.
    ///
    /// # Errors
    ///
    /// [`PlanError::InvalidStageName`] if a name is not a plain file name;
    /// [`PlanError::DuplicateStage`] if two stages share a name;
    /// [`PlanError::UnresolvedDependency`] if a template references a stage
    /// that is unknown, later, or the stage itself.
    pub fn new(stages: Vec<Stage>) -> Result<Self, PlanError> {
        for (index, stage) in stages.iter().enumerate() {
            check_stage_name(&stage.name)?;
            let earlier = &stages[..index];
            if earlier.iter().any(|s| s.name == stage.name) {
                return Err(PlanError::DuplicateStage {
                    stage: stage.name.clone(),
                });
            }
            for dependency in stage.template.dependencies() {
                if !earlier.iter().any(|s| &s.name == dependency) {
                    return Err(PlanError::UnresolvedDependency {
                        stage: stage.name.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }
        Ok(Self { stages })
    }

    /// Stages in execution order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` if the plan has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
