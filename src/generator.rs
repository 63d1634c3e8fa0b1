//! Generator definitions and answer resolution.
//!
//! A generator is a named, versioned producer of tasks: metadata, a prompt
//! list, and a pure function from resolved answers to a `Task<()>`. The
//! interpreter knows nothing about any specific generator; catalogs hand
//! definitions to the CLI, which resolves answers and picks a strategy.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::effect::{PromptDefinition, PromptKind};
use crate::error::TaskError;
use crate::interaction::Prompter;
use crate::task::Task;

/// Resolved prompt answers plus any extra preset values, keyed by prompt
/// name.
pub type Answers = Map<String, Value>;

/// Identity and documentation for a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorMeta {
    pub name: String,
    pub description: String,
    pub version: String,
    pub help: Option<String>,
    pub examples: Vec<String>,
}

impl GeneratorMeta {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: version.into(),
            help: None,
            examples: Vec::new(),
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }
}

type GenerateFn = Arc<dyn Fn(&Answers) -> Task<()> + Send + Sync>;

/// A named producer of tasks, stateless between invocations.
///
/// `generate` must be pure: called twice with identical answers it yields
/// structurally identical tasks (their dry runs record identical effect
/// lists).
#[derive(Clone)]
pub struct GeneratorDefinition {
    meta: GeneratorMeta,
    prompts: Vec<PromptDefinition>,
    generate: GenerateFn,
}

impl GeneratorDefinition {
    pub fn new<F>(meta: GeneratorMeta, prompts: Vec<PromptDefinition>, generate: F) -> Self
    where
        F: Fn(&Answers) -> Task<()> + Send + Sync + 'static,
    {
        Self {
            meta,
            prompts,
            generate: Arc::new(generate),
        }
    }

    pub fn meta(&self) -> &GeneratorMeta {
        &self.meta
    }

    pub fn prompts(&self) -> &[PromptDefinition] {
        &self.prompts
    }

    /// Build the task for one invocation. Never performs I/O.
    pub fn generate(&self, answers: &Answers) -> Task<()> {
        (self.generate)(answers)
    }
}

impl std::fmt::Debug for GeneratorDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorDefinition")
            .field("meta", &self.meta)
            .field("prompts", &self.prompts)
            .finish()
    }
}

/// Resolve answers interactively: presets win, everything else is asked.
///
/// Validation failures surface immediately; no task is built.
pub async fn resolve_answers(
    prompts: &[PromptDefinition],
    presets: &Answers,
    prompter: &dyn Prompter,
) -> Result<Answers, TaskError> {
    let mut answers = Answers::new();
    for definition in prompts {
        let value = match presets.get(&definition.name) {
            Some(preset) => coerce_preset(definition, preset)?,
            None => prompter.ask(definition).await?,
        };
        definition.validate_answer(&value)?;
        answers.insert(definition.name.clone(), value);
    }
    carry_extras(&mut answers, presets);
    Ok(answers)
}

/// Resolve answers without a prompter: presets win, prompt defaults fill
/// the rest. A prompt with neither is a validation error.
pub fn resolve_answers_unattended(
    prompts: &[PromptDefinition],
    presets: &Answers,
) -> Result<Answers, TaskError> {
    let mut answers = Answers::new();
    for definition in prompts {
        let value = match presets.get(&definition.name) {
            Some(preset) => coerce_preset(definition, preset)?,
            None => definition.default_answer().ok_or_else(|| {
                TaskError::validation(format!(
                    "no value for '{}' and the prompt has no default",
                    definition.name
                ))
            })?,
        };
        definition.validate_answer(&value)?;
        answers.insert(definition.name.clone(), value);
    }
    carry_extras(&mut answers, presets);
    Ok(answers)
}

/// Presets not matching any prompt pass through untouched; generators may
/// read them directly.
fn carry_extras(answers: &mut Answers, presets: &Answers) {
    for (key, value) in presets {
        if !answers.contains_key(key) {
            answers.insert(key.clone(), value.clone());
        }
    }
}

/// CLI presets arrive as strings; coerce them to the prompt's answer shape.
fn coerce_preset(definition: &PromptDefinition, preset: &Value) -> Result<Value, TaskError> {
    let Value::String(raw) = preset else {
        return Ok(preset.clone());
    };
    match &definition.kind {
        PromptKind::Text { .. } | PromptKind::Select { .. } => Ok(Value::String(raw.clone())),
        PromptKind::Confirm { .. } => match raw.to_lowercase().as_str() {
            "true" | "yes" | "y" | "1" => Ok(Value::Bool(true)),
            "false" | "no" | "n" | "0" => Ok(Value::Bool(false)),
            other => Err(TaskError::validation(format!(
                "{}: '{other}' is not a boolean",
                definition.name
            ))),
        },
        PromptKind::MultiSelect { .. } => Ok(Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| Value::String(s.to_string()))
                .collect(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::ScriptedPrompter;
    use serde_json::json;

    fn prompts() -> Vec<PromptDefinition> {
        vec![
            PromptDefinition::text("componentPath", "Component path?"),
            PromptDefinition::confirm("withStyles", "Include styles?", true),
        ]
    }

    #[tokio::test]
    async fn presets_shadow_the_prompter() {
        let mut presets = Answers::new();
        presets.insert("componentPath".into(), json!("src/components/Button"));
        let prompter = ScriptedPrompter::new([json!(false)]);

        let answers = resolve_answers(&prompts(), &presets, &prompter)
            .await
            .unwrap();
        assert_eq!(answers["componentPath"], json!("src/components/Button"));
        // Only withStyles was asked.
        assert_eq!(answers["withStyles"], json!(false));
    }

    #[tokio::test]
    async fn string_presets_coerce_to_confirm_answers() {
        let mut presets = Answers::new();
        presets.insert("componentPath".into(), json!("src/x/Y"));
        presets.insert("withStyles".into(), json!("false"));
        let prompter = ScriptedPrompter::new(Vec::<Value>::new());

        let answers = resolve_answers(&prompts(), &presets, &prompter)
            .await
            .unwrap();
        assert_eq!(answers["withStyles"], json!(false));
    }

    #[test]
    fn unattended_uses_defaults_and_rejects_gaps() {
        let mut presets = Answers::new();
        presets.insert("componentPath".into(), json!("src/x/Y"));
        let answers = resolve_answers_unattended(&prompts(), &presets).unwrap();
        assert_eq!(answers["withStyles"], json!(true));

        let empty = Answers::new();
        let error = resolve_answers_unattended(&prompts(), &empty).unwrap_err();
        assert_eq!(error.code, crate::error::ErrorCode::Validation);
    }

    #[test]
    fn extras_pass_through() {
        let mut presets = Answers::new();
        presets.insert("componentPath".into(), json!("src/x/Y"));
        presets.insert("team".into(), json!("platform"));
        let answers = resolve_answers_unattended(&prompts(), &presets).unwrap();
        assert_eq!(answers["team"], json!("platform"));
    }
}
