//! Prompt templates that thread earlier stage outputs into a stage's prompt.
//!
//! A template is plain text with two kinds of placeholder:
//!
//! | Placeholder | Replaced by |
//! |-------------|-------------|
//! | `{request}` | the pipeline input (the project request) |
//! | `{output:<stage>}` | the output of the named stage |
//!
//! Any other brace is literal text, so model output and code samples inside a
//! template need no escaping. Templates are parsed once; the `{output:…}`
//! names are the stage's declared dependencies, which
//! [`crate::StagePlan::new`] checks against stage order.

use crate::{StageName, StageOutputs, TemplateError};

const REQUEST: &str = "{request}";
const OUTPUT_OPEN: &str = "{output:";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Request,
    Output(StageName),
}

/// A parsed prompt template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl PromptTemplate {
    /// Parses `source` into a template.
    ///
    /// # Errors
    ///
    /// [`TemplateError::Unterminated`] if an `{output:` placeholder has no
    /// closing brace, [`TemplateError::EmptyReference`] if it names no stage.
    pub fn parse(source: impl Into<String>) -> Result<Self, TemplateError> {
        let source = source.into();
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source.as_str();
        let mut offset = 0;

        while let Some(pos) = rest.find('{') {
            literal.push_str(&rest[..pos]);
            let tail = &rest[pos..];
            let start = offset + pos;

            let consumed = if tail.starts_with(REQUEST) {
                flush(&mut literal, &mut segments);
                segments.push(Segment::Request);
                REQUEST.len()
            } else if let Some(after) = tail.strip_prefix(OUTPUT_OPEN) {
                let close = after
                    .find('}')
                    .ok_or(TemplateError::Unterminated { offset: start })?;
                let stage = StageName::new(after[..close].trim())
                    .ok_or(TemplateError::EmptyReference { offset: start })?;
                flush(&mut literal, &mut segments);
                segments.push(Segment::Output(stage));
                OUTPUT_OPEN.len() + close + 1
            } else {
                literal.push('{');
                1
            };

            rest = &tail[consumed..];
            offset = start + consumed;
        }
        literal.push_str(rest);
        flush(&mut literal, &mut segments);

        Ok(Self { source, segments })
    }

    /// The template text as written.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Stages whose outputs this template uses, in order of first appearance.
    pub fn dependencies(&self) -> Vec<&StageName> {
        let mut deps: Vec<&StageName> = Vec::new();
        for segment in &self.segments {
            if let Segment::Output(stage) = segment {
                if !deps.contains(&stage) {
                    deps.push(stage);
                }
            }
        }
        deps
    }

    /// Renders the prompt.
    ///
    /// # Errors
    ///
    /// [`TemplateError::MissingOutput`] if a referenced stage has not produced
    /// output. Templates inside a validated plan never hit this.
    pub fn render(&self, request: &str, outputs: &StageOutputs) -> Result<String, TemplateError> {
        let mut prompt = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => prompt.push_str(text),
                Segment::Request => prompt.push_str(request),
                Segment::Output(stage) => {
                    let text = outputs
                        .get(stage)
                        .ok_or_else(|| TemplateError::MissingOutput {
                            stage: stage.clone(),
                        })?;
                    prompt.push_str(text);
                }
            }
        }
        Ok(prompt)
    }
}

fn flush(literal: &mut String, segments: &mut Vec<Segment>) {
    if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(literal)));
    }
}
