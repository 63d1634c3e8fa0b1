//! React component generator.

use serde_json::{json, Map, Value};
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
        "component/react",
        "Scaffold a typed React component with tests and optional styles/stories",
        "1.0.0",
    )
    .with_example("summon run component/react --set componentPath=src/components/Button");

    let prompts = vec![
        PromptDefinition::text("componentPath", "Where should the component live?")
            .with_validator(|value| match value.as_str() {
                Some(s) if !s.trim().is_empty() => Ok(()),
                _ => Err("componentPath must not be empty".into()),
            }),
        PromptDefinition::confirm("withStyles", "Include a stylesheet?", true),
        PromptDefinition::confirm("withStories", "Include a Storybook story?", true),
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
    let with_stories = answer_bool(answers, "withStories", true);

    let mut vars = Map::new();
    vars.insert("name".into(), json!(name));
    vars.insert("path".into(), json!(component_path));
    vars.insert("with_styles".into(), json!(with_styles));
    vars.insert("with_stories".into(), json!(with_stories));

    let dir = PathBuf::from(&component_path);
    let templates = templates_root.join("react");

    let mut files = vec![
        ("component.tsx.tera", format!("{name}.tsx")),
        ("types.ts.tera", "types.ts".to_string()),
        ("index.ts.tera", "index.ts".to_string()),
        ("component.test.tsx.tera", format!("{name}.test.tsx")),
    ];
    if with_styles {
        files.push(("styles.css.tera", "styles.css".to_string()));
    }
    if with_stories {
        files.push(("component.stories.tsx.tera", format!("{name}.stories.tsx")));
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
    if let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) {
        steps.push(ops::append_file(
            parent.join("index.ts"),
            format!("export * from './{name}';\n"),
        ));
    }
    steps.push(ops::write_context("componentName", Value::String(name.clone())));
    steps.push(ops::log(
        LogLevel::Info,
        format!("generated react component {name} at {component_path}"),
    ));

    Task::sequence_unit(steps)
}
