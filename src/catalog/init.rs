//! Project initializer.
//!
//! Seeds a project with a `summon.toml`, a copy of the starter templates,
//! and optionally a fresh git repository.

use std::path::PathBuf;

use crate::effect::{ExecOptions, LogLevel, PromptDefinition};
use crate::generator::{Answers, GeneratorDefinition, GeneratorMeta};
use crate::task::{ops, Task};

const CONFIG_TEMPLATE: &str = "\
# Summon project configuration.
templates_dir = \"templates\"

# Preset answers applied before prompting.
[variables]
";

pub fn definition(templates_root: PathBuf) -> GeneratorDefinition {
    let meta = GeneratorMeta::new(
        "init",
        "Initialize a project with summon.toml and starter templates",
        "1.0.0",
    )
    .with_example("summon run init --set useGit=false");

    let prompts = vec![PromptDefinition::confirm(
        "useGit",
        "Initialize a git repository?",
        false,
    )];

    GeneratorDefinition::new(meta, prompts, move |answers| {
        build(templates_root.clone(), answers)
    })
}

fn build(templates_root: PathBuf, answers: &Answers) -> Task<()> {
    let use_git = answers
        .get("useGit")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);

    let mut steps = vec![ops::write_file("summon.toml", CONFIG_TEMPLATE)];
    // Skip the copy when the starter templates already are the project's
    // templates directory.
    if templates_root != std::path::Path::new("templates") {
        steps.push(ops::copy_dir(templates_root, "templates"));
    }
    if use_git {
        steps.push(
            ops::exec(
                "git",
                vec!["init".to_string(), "--quiet".to_string()],
                ExecOptions::default(),
            )
            .map(|_| ()),
        );
    }
    steps.push(ops::log(
        LogLevel::Info,
        "project initialized; edit templates/ and summon.toml to taste",
    ));

    Task::sequence_unit(steps)
}
