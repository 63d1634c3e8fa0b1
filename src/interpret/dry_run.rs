//! Dry-run interpretation: record, don't perform.
//!
//! The walk mirrors the live interpreter's tree order exactly, but nothing
//! suspends: branches of `parallel`/`race` are visited sequentially in
//! declaration order, so the recorded effect list is deterministic and
//! suitable for snapshot-style assertions.
//!
//! Read effects resolve to deterministic defaults (empty string, `false`,
//! empty list), which means a task branching on a real read follows the
//! "absent" branch. That is a documented limitation, not a defect; supply a
//! mock for the variant when a test needs the real value.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::context::ContextMap;
use crate::effect::{Effect, EffectKind, EffectOutcome, GlobOptions, PromptDefinition};
use crate::error::TaskError;
use crate::interpret::{emit_log, ExecutionObserver};
use crate::subprocess::ProcessOutput;
use crate::task::{BoxedValue, Node, Task};

type MockFn = Arc<dyn Fn(&Effect) -> Result<EffectOutcome, TaskError> + Send + Sync>;

/// Per-variant resolution overrides for mixed-mode dry runs.
///
/// Only the variants present in the registry are overridden; everything
/// else keeps the dry-run defaults. Mutating variants are still recorded,
/// never performed — the mock only supplies the resolved value.
#[derive(Clone, Default)]
pub struct MockRegistry {
    handlers: HashMap<EffectKind, MockFn>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one effect variant.
    pub fn with<F>(mut self, kind: EffectKind, handler: F) -> Self
    where
        F: Fn(&Effect) -> Result<EffectOutcome, TaskError> + Send + Sync + 'static,
    {
        self.handlers.insert(kind, Arc::new(handler));
        self
    }

    /// Resolve `ReadFile` effects through `read`.
    pub fn with_read_file<F>(self, read: F) -> Self
    where
        F: Fn(&Path) -> Result<String, TaskError> + Send + Sync + 'static,
    {
        self.with(EffectKind::ReadFile, move |effect| match effect {
            Effect::ReadFile { path } => read(path).map(EffectOutcome::Text),
            other => Err(wrong_variant("read_file", other)),
        })
    }

    /// Resolve `Exists` effects through `probe`.
    pub fn with_exists<F>(self, probe: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        self.with(EffectKind::Exists, move |effect| match effect {
            Effect::Exists { path } => Ok(EffectOutcome::Bool(probe(path))),
            other => Err(wrong_variant("exists", other)),
        })
    }

    /// Resolve `Glob` effects through `matcher`.
    pub fn with_glob<F>(self, matcher: F) -> Self
    where
        F: Fn(&str, &GlobOptions) -> Vec<PathBuf> + Send + Sync + 'static,
    {
        self.with(EffectKind::Glob, move |effect| match effect {
            Effect::Glob { pattern, options } => {
                Ok(EffectOutcome::Paths(matcher(pattern, options)))
            }
            other => Err(wrong_variant("glob", other)),
        })
    }

    /// Resolve `Exec` effects through `run`.
    pub fn with_exec<F>(self, run: F) -> Self
    where
        F: Fn(&str, &[String]) -> ProcessOutput + Send + Sync + 'static,
    {
        self.with(EffectKind::Exec, move |effect| match effect {
            Effect::Exec { command, args, .. } => Ok(EffectOutcome::Exec(run(command, args))),
            other => Err(wrong_variant("exec", other)),
        })
    }

    /// Resolve `Prompt` effects through `answer`.
    pub fn with_prompt<F>(self, answer: F) -> Self
    where
        F: Fn(&PromptDefinition) -> Value + Send + Sync + 'static,
    {
        self.with(EffectKind::Prompt, move |effect| match effect {
            Effect::Prompt { definition } => Ok(EffectOutcome::Answer(answer(definition))),
            other => Err(wrong_variant("prompt", other)),
        })
    }

    fn get(&self, kind: EffectKind) -> Option<&MockFn> {
        self.handlers.get(&kind)
    }
}

fn wrong_variant(expected: &str, got: &Effect) -> TaskError {
    TaskError::internal(format!(
        "mock for {expected} invoked with {} effect",
        got.kind()
    ))
}

/// Everything a dry run produces: the task's result (or its error) and the
/// ordered list of effects that would have run.
///
/// The list survives failure, holding exactly the effects reached before
/// the error.
pub struct DryRunReport<A> {
    pub result: Result<A, TaskError>,
    pub effects: Vec<Effect>,
}

impl<A> DryRunReport<A> {
    /// Paths of all recorded `WriteFile` effects, in order.
    pub fn written_paths(&self) -> Vec<&Path> {
        self.effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::WriteFile { path, .. } => Some(path.as_path()),
                _ => None,
            })
            .collect()
    }
}

struct DryState {
    effects: Vec<Effect>,
    ctx: ContextMap,
}

/// Interpreter that records effects instead of performing them.
#[derive(Default)]
pub struct DryRunInterpreter {
    mocks: MockRegistry,
    observer: Option<Arc<dyn ExecutionObserver>>,
}

impl DryRunInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dry run with per-variant resolution overrides.
    pub fn with_mocks(mocks: MockRegistry) -> Self {
        Self {
            mocks,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Walk the task, recording every effect reached.
    pub fn run<A: Send + 'static>(&self, task: Task<A>) -> DryRunReport<A> {
        let mut state = DryState {
            effects: Vec::new(),
            ctx: ContextMap::new(),
        };
        let result = self.walk(task, &mut state);
        DryRunReport {
            result,
            effects: state.effects,
        }
    }

    fn walk<A: Send + 'static>(
        &self,
        task: Task<A>,
        state: &mut DryState,
    ) -> Result<A, TaskError> {
        let mut task = task;
        loop {
            match task.node {
                Node::Pure(value) => return Ok(value),
                Node::Fail(error) => return Err(error),
                Node::Suspend(thunk) => task = thunk(),
                Node::Effect { effect, resume } => {
                    let outcome = self.resolve(&effect, state)?;
                    task = resume(outcome);
                }
                Node::Bind { first, resume } => {
                    let value = self.walk(*first, state)?;
                    task = resume(value);
                }
                Node::Parallel { branches, resume } => {
                    let mut values = Vec::with_capacity(branches.len());
                    for branch in branches {
                        values.push(self.walk(branch, state)?);
                    }
                    task = resume(values);
                }
                Node::Race { branches, resume } => {
                    if branches.is_empty() {
                        return Err(TaskError::empty_race());
                    }
                    // Declaration order stands in for completion order:
                    // every branch is walked (and recorded), the first
                    // branch's settlement is the outcome.
                    let mut settled: Vec<Result<BoxedValue, TaskError>> =
                        Vec::with_capacity(branches.len());
                    for branch in branches {
                        settled.push(self.walk(branch, state));
                    }
                    let winner = settled.remove(0)?;
                    task = resume(winner);
                }
                Node::Recover { attempt, rescue } => match self.walk(*attempt, state) {
                    Ok(value) => return Ok(value),
                    Err(error) => task = rescue(error),
                },
            }
        }
    }

    fn resolve(&self, effect: &Effect, state: &mut DryState) -> Result<EffectOutcome, TaskError> {
        state.effects.push(effect.clone());

        // Log and context effects are internal state, performed in every
        // mode; everything else goes through mocks or defaults.
        match effect {
            Effect::Log { level, message } => {
                if let Some(observer) = &self.observer {
                    observer.on_log(*level, message);
                }
                emit_log(*level, message);
                return Ok(EffectOutcome::Unit);
            }
            Effect::WriteContext { key, value } => {
                state.ctx.set(key.clone(), value.clone());
                return Ok(EffectOutcome::Unit);
            }
            Effect::ReadContext { key } => {
                return Ok(EffectOutcome::Context(state.ctx.get(key)));
            }
            _ => {}
        }

        if let Some(mock) = self.mocks.get(effect.kind()) {
            return mock(effect);
        }

        Ok(Self::default_outcome(effect))
    }

    /// Deterministic stand-in values for unmocked effects.
    fn default_outcome(effect: &Effect) -> EffectOutcome {
        match effect {
            Effect::WriteFile { .. }
            | Effect::AppendFile { .. }
            | Effect::MakeDir { .. }
            | Effect::CopyFile { .. }
            | Effect::CopyDir { .. }
            | Effect::DeleteFile { .. }
            | Effect::DeleteDir { .. } => EffectOutcome::Unit,
            Effect::ReadFile { .. } => EffectOutcome::Text(String::new()),
            Effect::Exists { .. } => EffectOutcome::Bool(false),
            Effect::Glob { .. } => EffectOutcome::Paths(Vec::new()),
            Effect::Exec { .. } => EffectOutcome::Exec(ProcessOutput::empty_success()),
            Effect::Prompt { .. } => EffectOutcome::Answer(Value::Null),
            // Handled before the mock lookup.
            Effect::Log { .. } | Effect::ReadContext { .. } | Effect::WriteContext { .. } => {
                EffectOutcome::Unit
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::LogLevel;
    use crate::task::ops;
    use serde_json::json;

    #[test]
    fn records_in_program_order() {
        let task = ops::make_dir("src/components/Button")
            .and_then(|_| ops::write_file("src/components/Button/index.ts", "export {};\n"))
            .and_then(|_| ops::log(LogLevel::Info, "done"));
        let report = DryRunInterpreter::new().run(task);
        assert!(report.result.is_ok());
        let kinds: Vec<_> = report.effects.iter().map(Effect::kind).collect();
        assert_eq!(
            kinds,
            vec![EffectKind::MakeDir, EffectKind::WriteFile, EffectKind::Log]
        );
    }

    #[test]
    fn read_effects_resolve_to_defaults() {
        let task = ops::exists("package.json").and_then(|found| {
            if found {
                ops::write_file("found.txt", "yes")
            } else {
                ops::write_file("missing.txt", "no")
            }
        });
        let report = DryRunInterpreter::new().run(task);
        // Dry runs walk the "does not exist" branch.
        assert_eq!(report.written_paths(), vec![Path::new("missing.txt")]);
    }

    #[test]
    fn parallel_effects_flatten_in_declaration_order() {
        let task = Task::parallel(vec![
            ops::write_file("a.txt", "a"),
            ops::write_file("b.txt", "b"),
            ops::write_file("c.txt", "c"),
        ]);
        let report = DryRunInterpreter::new().run(task);
        assert_eq!(
            report.written_paths(),
            vec![Path::new("a.txt"), Path::new("b.txt"), Path::new("c.txt")]
        );
    }

    #[test]
    fn mocked_read_supplies_real_value() {
        let mocks = MockRegistry::new()
            .with_read_file(|path| Ok(format!("contents of {}", path.display())));
        let task = ops::read_file("template.tera");
        let report = DryRunInterpreter::with_mocks(mocks).run(task);
        assert_eq!(report.result.unwrap(), "contents of template.tera");
        assert_eq!(report.effects.len(), 1);
    }

    #[test]
    fn mocked_prompt_steers_branching() {
        let mocks = MockRegistry::new().with_prompt(|definition| {
            assert_eq!(definition.name, "withStyles");
            json!(true)
        });
        let task = ops::prompt(crate::effect::PromptDefinition::confirm(
            "withStyles",
            "Styles?",
            false,
        ))
        .and_then(|answer| {
            if answer.as_bool().unwrap_or(false) {
                ops::write_file("styles.css", "")
            } else {
                Task::pure(())
            }
        });
        let report = DryRunInterpreter::with_mocks(mocks).run(task);
        assert_eq!(report.written_paths(), vec![Path::new("styles.css")]);
    }

    #[test]
    fn failure_keeps_recorded_prefix() {
        let task = ops::write_file("a.txt", "a")
            .and_then(|_| Task::<()>::fail(TaskError::internal("boom")))
            .and_then(|_| ops::write_file("b.txt", "b"));
        let report = DryRunInterpreter::new().run(task);
        assert!(report.result.is_err());
        assert_eq!(report.written_paths(), vec![Path::new("a.txt")]);
    }

    #[test]
    fn write_context_is_visible_to_later_reads() {
        let task = ops::write_context("name", json!("Button"))
            .and_then(|_| ops::read_context("name"))
            .map(|value| value.and_then(|v| v.as_str().map(String::from)));
        let report = DryRunInterpreter::new().run(task);
        assert_eq!(report.result.unwrap(), Some("Button".to_string()));
        assert_eq!(report.effects.len(), 2);
    }
}
