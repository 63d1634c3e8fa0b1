//! Prompt definitions carried by [`Effect::Prompt`](super::Effect) and by
//! generator metadata.
//!
//! A definition describes what to ask and how to validate the answer; it
//! never performs the ask. Answers are `serde_json` values: strings for
//! text and select, booleans for confirm, string arrays for multi-select.

use serde_json::Value;
use std::sync::Arc;

use crate::error::TaskError;

/// Custom answer validator. Returns a message describing the rejection.
pub type PromptValidator = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// The interaction style of a prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptKind {
    Text { default: Option<String> },
    Confirm { default: bool },
    Select { choices: Vec<String>, default: Option<usize> },
    MultiSelect { choices: Vec<String> },
}

/// A single question a generator asks before building its task.
#[derive(Clone)]
pub struct PromptDefinition {
    pub name: String,
    pub message: String,
    pub kind: PromptKind,
    pub validate: Option<PromptValidator>,
}

impl PromptDefinition {
    pub fn text(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            kind: PromptKind::Text { default: None },
            validate: None,
        }
    }

    pub fn text_with_default(
        name: impl Into<String>,
        message: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            kind: PromptKind::Text {
                default: Some(default.into()),
            },
            validate: None,
        }
    }

    pub fn confirm(name: impl Into<String>, message: impl Into<String>, default: bool) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            kind: PromptKind::Confirm { default },
            validate: None,
        }
    }

    pub fn select(
        name: impl Into<String>,
        message: impl Into<String>,
        choices: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            kind: PromptKind::Select {
                choices,
                default: None,
            },
            validate: None,
        }
    }

    pub fn multi_select(
        name: impl Into<String>,
        message: impl Into<String>,
        choices: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            kind: PromptKind::MultiSelect { choices },
            validate: None,
        }
    }

    pub fn with_validator<F>(mut self, validate: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validate = Some(Arc::new(validate));
        self
    }

    /// The answer used when running unattended, when the kind carries one.
    pub fn default_answer(&self) -> Option<Value> {
        match &self.kind {
            PromptKind::Text { default } => default.clone().map(Value::String),
            PromptKind::Confirm { default } => Some(Value::Bool(*default)),
            PromptKind::Select { choices, default } => default
                .and_then(|i| choices.get(i))
                .cloned()
                .map(Value::String),
            PromptKind::MultiSelect { .. } => Some(Value::Array(Vec::new())),
        }
    }

    /// Check an answer against the kind's shape and the custom validator.
    pub fn validate_answer(&self, answer: &Value) -> Result<(), TaskError> {
        match (&self.kind, answer) {
            (PromptKind::Text { .. }, Value::String(_)) => {}
            (PromptKind::Confirm { .. }, Value::Bool(_)) => {}
            (PromptKind::Select { choices, .. }, Value::String(choice)) => {
                if !choices.iter().any(|c| c == choice) {
                    return Err(TaskError::validation(format!(
                        "{}: '{choice}' is not one of {choices:?}",
                        self.name
                    )));
                }
            }
            (PromptKind::MultiSelect { choices }, Value::Array(picked)) => {
                for entry in picked {
                    let Value::String(choice) = entry else {
                        return Err(TaskError::validation(format!(
                            "{}: multi-select answers must be strings",
                            self.name
                        )));
                    };
                    if !choices.iter().any(|c| c == choice) {
                        return Err(TaskError::validation(format!(
                            "{}: '{choice}' is not one of {choices:?}",
                            self.name
                        )));
                    }
                }
            }
            (kind, other) => {
                return Err(TaskError::validation(format!(
                    "{}: answer {other} does not match prompt kind {kind:?}",
                    self.name
                )));
            }
        }

        if let Some(validate) = &self.validate {
            validate(answer).map_err(|reason| {
                TaskError::validation(format!("{}: {reason}", self.name))
            })?;
        }
        Ok(())
    }
}

// Validators are opaque closures; identity of the definition is its data.
impl PartialEq for PromptDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.message == other.message && self.kind == other.kind
    }
}

impl std::fmt::Debug for PromptDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptDefinition")
            .field("name", &self.name)
            .field("message", &self.message)
            .field("kind", &self.kind)
            .field("has_validator", &self.validate.is_some())
            .finish()
    }
}
