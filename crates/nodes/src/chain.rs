//! The built-in software-delivery chain.
//!
//! Four dependent stages, each fed the growing context of the ones before it:
//!
//! | # | Stage | Default model | Uses |
//! |---|-------|---------------|------|
//! | 1 | `architecture` | Claude 3 Sonnet | the project request |
//! | 2 | `development` | Claude 3 Haiku | architecture |
//! | 3 | `testing` | Nova Lite | development |
//! | 4 | `documentation` | Titan Text Express | architecture, development, testing |
//!
//! Titan has no system channel, so the documentation stage carries its
//! persona in the prompt instead.

use pipeline::{strip_inference_profile, StageSpec};
use serde::{Deserialize, Serialize};

/// Project request used when none is supplied.
pub const DEFAULT_PROJECT_REQUEST: &str = "Create a simple Tic-Tac-Toe (X&Os) game in Python";

/// Default model for the architecture stage.
pub const DEFAULT_ARCHITECTURE_MODEL: &str = "anthropic.claude-3-sonnet-20240229-v1:0";
/// Default model for the development stage.
pub const DEFAULT_DEVELOPMENT_MODEL: &str = "anthropic.claude-3-haiku-20240307-v1:0";
/// Default model for the testing stage.
pub const DEFAULT_TESTING_MODEL: &str = "amazon.nova-lite-v1:0";
/// Default model for the documentation stage.
pub const DEFAULT_DOCUMENTATION_MODEL: &str = "amazon.titan-text-express-v1";

const ARCHITECT_INSTRUCTION: &str = "You are a software architect. Create detailed technical \
specifications and architecture for software projects.";
const DEVELOPER_INSTRUCTION: &str =
    "You are a Python developer. Write clean, functional code based on specifications.";
const TESTER_INSTRUCTION: &str =
    "You are a QA engineer. Create comprehensive tests for code to ensure it works correctly.";

const ARCHITECTURE_PROMPT: &str = "Create a detailed architecture and rulebook for: {request}";
const DEVELOPMENT_PROMPT: &str =
    "Based on this architecture, write complete Python code:\n{output:architecture}";
const TESTING_PROMPT: &str =
    "Create comprehensive unit tests for this code:\n{output:development}";
const DOCUMENTATION_PROMPT: &str = "Act as a technical writer. Create comprehensive \
documentation for this project. Include setup instructions, usage guide, architecture \
overview, testing approach, and API reference.\n\n\
Architecture:\n{output:architecture}\n\n\
Code Implementation:\n{output:development}\n\n\
Test Suite:\n{output:testing}\n\n\
Create documentation that explains the architecture decisions, how to use the application, \
and how it was tested.";

/// Model assignment for the four built-in stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainModels {
    /// Model for `architecture`.
    pub architecture: String,
    /// Model for `development`.
    pub development: String,
    /// Model for `testing`.
    pub testing: String,
    /// Model for `documentation`.
    pub documentation: String,
}

impl Default for ChainModels {
    fn default() -> Self {
        Self {
            architecture: DEFAULT_ARCHITECTURE_MODEL.into(),
            development: DEFAULT_DEVELOPMENT_MODEL.into(),
            testing: DEFAULT_TESTING_MODEL.into(),
            documentation: DEFAULT_DOCUMENTATION_MODEL.into(),
        }
    }
}

/// Builds the four-stage chain with `models`.
pub fn default_chain(models: &ChainModels) -> Vec<StageSpec> {
    vec![
        spec(
            "architecture",
            "Architecture",
            &models.architecture,
            Some(ARCHITECT_INSTRUCTION),
            ARCHITECTURE_PROMPT,
        ),
        spec(
            "development",
            "Development",
            &models.development,
            Some(DEVELOPER_INSTRUCTION),
            DEVELOPMENT_PROMPT,
        ),
        spec(
            "testing",
            "Testing",
            &models.testing,
            Some(TESTER_INSTRUCTION),
            TESTING_PROMPT,
        ),
        spec(
            "documentation",
            "Documentation",
            &models.documentation,
            None,
            DOCUMENTATION_PROMPT,
        ),
    ]
}

fn spec(
    name: &str,
    label: &str,
    model_id: &str,
    system_instruction: Option<&str>,
    prompt: &str,
) -> StageSpec {
    StageSpec {
        name: name.into(),
        display_name: Some(format!("{label} ({})", model_label(model_id))),
        model_id: model_id.into(),
        system_instruction: system_instruction.map(str::to_string),
        prompt: prompt.into(),
    }
}

/// Short human name for well-known models; the raw identifier otherwise.
pub fn model_label(model_id: &str) -> String {
    const KNOWN: &[(&str, &str)] = &[
        ("anthropic.claude-3-5-sonnet", "Claude 3.5 Sonnet"),
        ("anthropic.claude-3-5-haiku", "Claude 3.5 Haiku"),
        ("anthropic.claude-3-sonnet", "Claude Sonnet"),
        ("anthropic.claude-3-haiku", "Claude Haiku"),
        ("anthropic.claude-3-opus", "Claude Opus"),
        ("amazon.nova-micro", "Nova Micro"),
        ("amazon.nova-lite", "Nova Lite"),
        ("amazon.nova-pro", "Nova Pro"),
        ("amazon.titan-text-express", "Titan Express"),
        ("amazon.titan-text-lite", "Titan Lite"),
        ("amazon.titan-text-premier", "Titan Premier"),
    ];
    let base = strip_inference_profile(model_id);
    KNOWN
        .iter()
        .find(|(prefix, _)| base.starts_with(prefix))
        .map_or_else(|| model_id.to_string(), |(_, label)| label.to_string())
}
