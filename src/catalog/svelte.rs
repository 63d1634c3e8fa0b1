//! Svelte component generator.

use serde_json::{json, Map};
use std::path::PathBuf;
use std::sync::Arc;

use super::{answer_bool, answer_str, component_name, render_into};
use crate::effect::{LogLevel, PromptDefinition};
use crate::generator::{Answers, GeneratorDefinition, GeneratorMeta};
use crate::task::{ops, Task};
use crate::template::TemplateEngine;

pub fn definition(
    engine: Arc<dyn TemplateEngine>,
    templates_root: PathBuf,
) -> GeneratorDefinition {
    let meta = GeneratorMeta::new(
        "component/svelte",
        "Scaffold a Svelte component with tests and an optional stylesheet",
        "1.0.0",
    )
    .with_example("summon run component/svelte --set componentPath=src/lib/Card");

    let prompts = vec![
        PromptDefinition::text("componentPath", "Where should the component live?")
            .with_validator(|value| match value.as_str() {
                Some(s) if !s.trim().is_empty() => Ok(()),
                _ => Err("componentPath must not be empty".into()),
            }),
        PromptDefinition::confirm("withStyles", "Include a stylesheet?", true),
    ];

    GeneratorDefinition::new(meta, prompts, move |answers| {
        build(engine.clone(), templates_root.clone(), answers)
    })
}

fn build(engine: Arc<dyn TemplateEngine>, templates_root: PathBuf, answers: &Answers) -> Task<()> {
    let component_path = match answer_str(answers, "componentPath") {
        Ok(path) => path,
        Err(error) => return Task::fail(error),
    };
    let name = match component_name(&component_path) {
        Ok(name) => name,
        Err(error) => return Task::fail(error),
    };
    let with_styles = answer_bool(answers, "withStyles", true);

    let mut vars = Map::new();
    vars.insert("name".into(), json!(name));
    vars.insert("path".into(), json!(component_path));
    vars.insert("with_styles".into(), json!(with_styles));

    let dir = PathBuf::from(&component_path);
    let templates = templates_root.join("svelte");

    let mut files = vec![
        ("component.svelte.tera", format!("{name}.svelte")),
        ("index.ts.tera", "index.ts".to_string()),
        ("component.test.ts.tera", format!("{name}.test.ts")),
    ];
    if with_styles {
        files.push(("styles.css.tera", "styles.css".to_string()));
    }

    let mut steps = vec![ops::make_dir(dir.clone())];
    for (template, output) in files {
        steps.push(render_into(
            engine.clone(),
            templates.join(template),
            dir.join(output),
            vars.clone(),
        ));
    }
    steps.push(ops::log(
        LogLevel::Info,
        format!("generated svelte component {name} at {component_path}"),
    ));

    Task::sequence_unit(steps)
}
