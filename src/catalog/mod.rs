//! Built-in generator catalog.
//!
//! Each generator is a plain producer of tasks over the core: it reads
//! template sources through `ReadFile` effects, renders them at the
//! template-engine boundary, and describes the writes. Nothing here is
//! special-cased by the interpreters.

pub mod init;
pub mod react;
pub mod svelte;

use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::TaskError;
use crate::generator::GeneratorDefinition;
use crate::task::{ops, Task};
use crate::template::TemplateEngine;

/// All built-in generators, bound to an engine and a templates directory.
pub fn builtin(engine: Arc<dyn TemplateEngine>, templates_root: PathBuf) -> Vec<GeneratorDefinition> {
    vec![
        react::definition(engine.clone(), templates_root.clone()),
        svelte::definition(engine.clone(), templates_root.clone()),
        init::definition(templates_root),
    ]
}

/// Look a generator up by its meta name.
pub fn find(
    generators: &[GeneratorDefinition],
    name: &str,
) -> Option<GeneratorDefinition> {
    generators
        .iter()
        .find(|g| g.meta().name == name)
        .cloned()
}

/// Read `template`, render it with `vars`, and write the result to `dest`.
///
/// Rendering happens in the continuation so a dry run with a mocked
/// `ReadFile` produces the real rendered content while recording the write.
pub(crate) fn render_into(
    engine: Arc<dyn TemplateEngine>,
    template: PathBuf,
    dest: PathBuf,
    vars: Map<String, Value>,
) -> Task<()> {
    ops::read_file(template).and_then(move |source| {
        match engine.render_str(&source, &vars) {
            Ok(rendered) => ops::write_file(dest, rendered),
            Err(error) => Task::fail(error),
        }
    })
}

/// The component name is the last segment of the component path.
pub(crate) fn component_name(component_path: &str) -> Result<String, TaskError> {
    PathBuf::from(component_path)
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            TaskError::validation(format!(
                "componentPath '{component_path}' has no trailing component name"
            ))
        })
}

/// Fetch a required string answer.
pub(crate) fn answer_str(answers: &Map<String, Value>, key: &str) -> Result<String, TaskError> {
    answers
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| TaskError::validation(format!("missing answer '{key}'")))
}

/// Fetch a boolean answer, defaulting when absent or null.
pub(crate) fn answer_bool(answers: &Map<String, Value>, key: &str, default: bool) -> bool {
    answers.get(key).and_then(Value::as_bool).unwrap_or(default)
}
