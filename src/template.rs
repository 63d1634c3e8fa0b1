//! Template engine boundary.
//!
//! The core never parses template syntax. Generators read a template source
//! through a `ReadFile` effect and render it in the continuation, which is
//! what lets mixed-mode tests mock `ReadFile` with the real reader and
//! verify rendered content without a single write.

use serde_json::{Map, Value};

use crate::error::TaskError;

/// Renders a template source string with the given variables.
pub trait TemplateEngine: Send + Sync {
    fn render_str(&self, source: &str, vars: &Map<String, Value>) -> Result<String, TaskError>;
}

/// Tera-backed engine doing one-off renders without a registry.
#[derive(Default)]
pub struct TeraEngine;

impl TeraEngine {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateEngine for TeraEngine {
    fn render_str(&self, source: &str, vars: &Map<String, Value>) -> Result<String, TaskError> {
        let context = tera::Context::from_serialize(Value::Object(vars.clone()))
            .map_err(|e| TaskError::template("template variables are not serializable").with_source(e))?;
        tera::Tera::one_off(source, &context, false)
            .map_err(|e| TaskError::template("template rendering failed").with_source(e))
    }
}
