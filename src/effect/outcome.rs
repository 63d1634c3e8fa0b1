//! Dynamic results produced by performing effects.
//!
//! Interpreters resolve every effect to an [`EffectOutcome`]; typed task
//! constructors decode outcomes back to concrete types. A shape mismatch is
//! an internal error, never a panic.

use serde_json::Value;
use std::path::PathBuf;

use crate::error::TaskError;
use crate::subprocess::ProcessOutput;

/// The value an interpreter resolved an effect with.
#[derive(Debug, Clone, PartialEq)]
pub enum EffectOutcome {
    Unit,
    Text(String),
    Bool(bool),
    Paths(Vec<PathBuf>),
    Exec(ProcessOutput),
    Answer(Value),
    Context(Option<Value>),
}

impl EffectOutcome {
    pub fn expect_unit(self, what: &str) -> Result<(), TaskError> {
        match self {
            EffectOutcome::Unit => Ok(()),
            other => Err(mismatch(what, "unit", &other)),
        }
    }

    pub fn expect_text(self, what: &str) -> Result<String, TaskError> {
        match self {
            EffectOutcome::Text(s) => Ok(s),
            other => Err(mismatch(what, "text", &other)),
        }
    }

    pub fn expect_bool(self, what: &str) -> Result<bool, TaskError> {
        match self {
            EffectOutcome::Bool(b) => Ok(b),
            other => Err(mismatch(what, "bool", &other)),
        }
    }

    pub fn expect_paths(self, what: &str) -> Result<Vec<PathBuf>, TaskError> {
        match self {
            EffectOutcome::Paths(paths) => Ok(paths),
            other => Err(mismatch(what, "paths", &other)),
        }
    }

    pub fn expect_exec(self, what: &str) -> Result<ProcessOutput, TaskError> {
        match self {
            EffectOutcome::Exec(output) => Ok(output),
            other => Err(mismatch(what, "exec output", &other)),
        }
    }

    pub fn expect_answer(self, what: &str) -> Result<Value, TaskError> {
        match self {
            EffectOutcome::Answer(value) => Ok(value),
            other => Err(mismatch(what, "answer", &other)),
        }
    }

    pub fn expect_context(self, what: &str) -> Result<Option<Value>, TaskError> {
        match self {
            EffectOutcome::Context(value) => Ok(value),
            other => Err(mismatch(what, "context value", &other)),
        }
    }
}

fn mismatch(what: &str, wanted: &str, got: &EffectOutcome) -> TaskError {
    TaskError::internal(format!(
        "{what} resolved to an unexpected outcome: wanted {wanted}, got {got:?}"
    ))
}
