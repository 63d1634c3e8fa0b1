//! Typed effect constructors.
//!
//! Each constructor wraps one [`Effect`] in a task whose result type matches
//! the effect's resolution: `read_file` yields the content, `exists` a
//! boolean, `write_file` nothing.

use serde_json::Value;
use std::path::PathBuf;

use crate::effect::{Effect, ExecOptions, GlobOptions, LogLevel, PromptDefinition};
use crate::subprocess::ProcessOutput;
use crate::task::Task;

pub fn write_file(path: impl Into<PathBuf>, content: impl Into<String>) -> Task<()> {
    Task::from_effect(
        Effect::WriteFile {
            path: path.into(),
            content: content.into(),
        },
        |outcome| outcome.expect_unit("write_file"),
    )
}

pub fn append_file(path: impl Into<PathBuf>, content: impl Into<String>) -> Task<()> {
    Task::from_effect(
        Effect::AppendFile {
            path: path.into(),
            content: content.into(),
        },
        |outcome| outcome.expect_unit("append_file"),
    )
}

pub fn make_dir(path: impl Into<PathBuf>) -> Task<()> {
    Task::from_effect(Effect::MakeDir { path: path.into() }, |outcome| {
        outcome.expect_unit("make_dir")
    })
}

pub fn copy_file(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Task<()> {
    Task::from_effect(
        Effect::CopyFile {
            source: source.into(),
            dest: dest.into(),
        },
        |outcome| outcome.expect_unit("copy_file"),
    )
}

pub fn copy_dir(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Task<()> {
    Task::from_effect(
        Effect::CopyDir {
            source: source.into(),
            dest: dest.into(),
        },
        |outcome| outcome.expect_unit("copy_dir"),
    )
}

pub fn delete_file(path: impl Into<PathBuf>) -> Task<()> {
    Task::from_effect(Effect::DeleteFile { path: path.into() }, |outcome| {
        outcome.expect_unit("delete_file")
    })
}

pub fn delete_dir(path: impl Into<PathBuf>) -> Task<()> {
    Task::from_effect(Effect::DeleteDir { path: path.into() }, |outcome| {
        outcome.expect_unit("delete_dir")
    })
}

pub fn read_file(path: impl Into<PathBuf>) -> Task<String> {
    Task::from_effect(Effect::ReadFile { path: path.into() }, |outcome| {
        outcome.expect_text("read_file")
    })
}

pub fn exists(path: impl Into<PathBuf>) -> Task<bool> {
    Task::from_effect(Effect::Exists { path: path.into() }, |outcome| {
        outcome.expect_bool("exists")
    })
}

pub fn glob(pattern: impl Into<String>, options: GlobOptions) -> Task<Vec<PathBuf>> {
    Task::from_effect(
        Effect::Glob {
            pattern: pattern.into(),
            options,
        },
        |outcome| outcome.expect_paths("glob"),
    )
}

pub fn exec(
    command: impl Into<String>,
    args: Vec<String>,
    options: ExecOptions,
) -> Task<ProcessOutput> {
    Task::from_effect(
        Effect::Exec {
            command: command.into(),
            args,
            options,
        },
        |outcome| outcome.expect_exec("exec"),
    )
}

pub fn prompt(definition: PromptDefinition) -> Task<Value> {
    Task::from_effect(Effect::Prompt { definition }, |outcome| {
        outcome.expect_answer("prompt")
    })
}

pub fn log(level: LogLevel, message: impl Into<String>) -> Task<()> {
    Task::from_effect(
        Effect::Log {
            level,
            message: message.into(),
        },
        |outcome| outcome.expect_unit("log"),
    )
}

pub fn read_context(key: impl Into<String>) -> Task<Option<Value>> {
    Task::from_effect(Effect::ReadContext { key: key.into() }, |outcome| {
        outcome.expect_context("read_context")
    })
}

pub fn write_context(key: impl Into<String>, value: Value) -> Task<()> {
    Task::from_effect(
        Effect::WriteContext {
            key: key.into(),
            value,
        },
        |outcome| outcome.expect_unit("write_context"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::EffectKind;
    use crate::interpret::DryRunInterpreter;
    use serde_json::json;

    #[test]
    fn constructors_record_their_effect() {
        let task = write_file("src/index.ts", "export {};\n");
        let report = DryRunInterpreter::new().run(task);
        assert!(report.result.is_ok());
        assert_eq!(report.effects.len(), 1);
        assert_eq!(report.effects[0].kind(), EffectKind::WriteFile);
    }

    #[test]
    fn context_round_trip() {
        let task = write_context("componentName", json!("Button"))
            .and_then(|_| read_context("componentName"));
        let report = DryRunInterpreter::new().run(task);
        assert_eq!(report.result.unwrap(), Some(json!("Button")));
    }
}
