//! Live interpretation: perform effects against the real world.
//!
//! Collaborators are injected behind trait objects so tests can swap the
//! process runner or prompter without touching the walk itself. File
//! effects go through `tokio::fs`; `Glob` uses the `glob` crate; `Exec`
//! and `Prompt` go through their boundary traits.
//!
//! Failure policy: fail fast, no rollback. Effects already performed when
//! an error propagates stay performed.

use futures::future::{join_all, select_all, BoxFuture};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::context::ContextMap;
use crate::effect::{Effect, EffectOutcome, ExecOptions, GlobOptions};
use crate::error::TaskError;
use crate::interaction::{Prompter, TerminalPrompter};
use crate::interpret::{emit_log, ExecutionObserver, NullObserver};
use crate::subprocess::{ProcessCommand, ProcessRunner, TokioProcessRunner};
use crate::task::{BoxedValue, Node, Task};

/// Interpreter that performs effects for real.
#[derive(Clone)]
pub struct LiveInterpreter {
    process: Arc<dyn ProcessRunner>,
    prompter: Arc<dyn Prompter>,
    observer: Arc<dyn ExecutionObserver>,
}

impl Default for LiveInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveInterpreter {
    pub fn new() -> Self {
        Self {
            process: Arc::new(TokioProcessRunner),
            prompter: Arc::new(TerminalPrompter::new()),
            observer: Arc::new(NullObserver),
        }
    }

    pub fn with_process_runner(mut self, process: Arc<dyn ProcessRunner>) -> Self {
        self.process = process;
        self
    }

    pub fn with_prompter(mut self, prompter: Arc<dyn Prompter>) -> Self {
        self.prompter = prompter;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run a task to completion, performing its effects.
    pub async fn run<A: Send + 'static>(&self, task: Task<A>) -> Result<A, TaskError> {
        let ctx = ContextMap::new();
        self.run_node(task, ctx).await
    }

    fn run_node<'a, A: Send + 'static>(
        &'a self,
        task: Task<A>,
        ctx: ContextMap,
    ) -> BoxFuture<'a, Result<A, TaskError>> {
        Box::pin(async move {
            let mut task = task;
            loop {
                match task.node {
                    Node::Pure(value) => return Ok(value),
                    Node::Fail(error) => return Err(error),
                    Node::Suspend(thunk) => task = thunk(),
                    Node::Effect { effect, resume } => {
                        let outcome = self.perform(&effect, &ctx).await?;
                        task = resume(outcome);
                    }
                    Node::Bind { first, resume } => {
                        let value = self.run_node(*first, ctx.clone()).await?;
                        task = resume(value);
                    }
                    Node::Parallel { branches, resume } => {
                        let settled = join_all(
                            branches
                                .into_iter()
                                .map(|branch| self.run_node(branch, ctx.clone())),
                        )
                        .await;
                        // Fail only after every branch has settled; keep
                        // the first failure in input order.
                        let mut values = Vec::with_capacity(settled.len());
                        let mut first_error = None;
                        for result in settled {
                            match result {
                                Ok(value) => values.push(value),
                                Err(error) if first_error.is_none() => first_error = Some(error),
                                Err(_) => {}
                            }
                        }
                        match first_error {
                            Some(error) => return Err(error),
                            None => task = resume(values),
                        }
                    }
                    Node::Race { branches, resume } => {
                        if branches.is_empty() {
                            return Err(TaskError::empty_race());
                        }
                        // Branches are detached onto the runtime so losers
                        // run to completion with their results discarded.
                        let handles: Vec<_> = branches
                            .into_iter()
                            .map(|branch| {
                                let interpreter = self.clone();
                                let ctx = ctx.clone();
                                tokio::spawn(
                                    async move { interpreter.run_node(branch, ctx).await },
                                )
                            })
                            .collect();
                        let (winner, _index, _losers) = select_all(handles).await;
                        match winner {
                            Ok(Ok(value)) => task = resume(value),
                            Ok(Err(error)) => return Err(error),
                            Err(join_error) => {
                                return Err(TaskError::internal(format!(
                                    "race branch aborted: {join_error}"
                                )))
                            }
                        }
                    }
                    Node::Recover { attempt, rescue } => {
                        match self.run_node(*attempt, ctx.clone()).await {
                            Ok(value) => return Ok(value),
                            Err(error) => task = rescue(error),
                        }
                    }
                }
            }
        })
    }

    async fn perform(&self, effect: &Effect, ctx: &ContextMap) -> Result<EffectOutcome, TaskError> {
        if let Effect::Log { level, message } = effect {
            self.observer.on_log(*level, message);
            emit_log(*level, message);
            return Ok(EffectOutcome::Unit);
        }

        self.observer.on_effect_start(effect);
        let started = Instant::now();
        let outcome = self.perform_inner(effect, ctx).await?;
        self.observer.on_effect_complete(effect, started.elapsed());
        Ok(outcome)
    }

    async fn perform_inner(
        &self,
        effect: &Effect,
        ctx: &ContextMap,
    ) -> Result<EffectOutcome, TaskError> {
        tracing::debug!("performing effect: {}", effect.kind());
        match effect {
            Effect::WriteFile { path, content } => {
                ensure_parent(path).await?;
                tokio::fs::write(path, content)
                    .await
                    .map_err(|e| TaskError::io(format!("write {}", path.display()), e))?;
                Ok(EffectOutcome::Unit)
            }
            Effect::AppendFile { path, content } => {
                ensure_parent(path).await?;
                let mut options = tokio::fs::OpenOptions::new();
                options.append(true).create(true);
                let mut file = options
                    .open(path)
                    .await
                    .map_err(|e| TaskError::io(format!("append {}", path.display()), e))?;
                tokio::io::AsyncWriteExt::write_all(&mut file, content.as_bytes())
                    .await
                    .map_err(|e| TaskError::io(format!("append {}", path.display()), e))?;
                Ok(EffectOutcome::Unit)
            }
            Effect::MakeDir { path } => {
                tokio::fs::create_dir_all(path)
                    .await
                    .map_err(|e| TaskError::io(format!("mkdir {}", path.display()), e))?;
                Ok(EffectOutcome::Unit)
            }
            Effect::CopyFile { source, dest } => {
                ensure_parent(dest).await?;
                tokio::fs::copy(source, dest).await.map_err(|e| {
                    TaskError::io(
                        format!("copy {} -> {}", source.display(), dest.display()),
                        e,
                    )
                })?;
                Ok(EffectOutcome::Unit)
            }
            Effect::CopyDir { source, dest } => {
                copy_dir_recursive(source.clone(), dest.clone()).await?;
                Ok(EffectOutcome::Unit)
            }
            Effect::DeleteFile { path } => {
                tokio::fs::remove_file(path)
                    .await
                    .map_err(|e| TaskError::io(format!("delete {}", path.display()), e))?;
                Ok(EffectOutcome::Unit)
            }
            Effect::DeleteDir { path } => {
                tokio::fs::remove_dir_all(path)
                    .await
                    .map_err(|e| TaskError::io(format!("delete {}", path.display()), e))?;
                Ok(EffectOutcome::Unit)
            }
            Effect::ReadFile { path } => {
                let content = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|e| TaskError::io(format!("read {}", path.display()), e))?;
                Ok(EffectOutcome::Text(content))
            }
            Effect::Exists { path } => {
                let found = tokio::fs::try_exists(path)
                    .await
                    .map_err(|e| TaskError::io(format!("stat {}", path.display()), e))?;
                Ok(EffectOutcome::Bool(found))
            }
            Effect::Glob { pattern, options } => {
                let paths = run_glob(pattern, options)?;
                Ok(EffectOutcome::Paths(paths))
            }
            Effect::Exec {
                command,
                args,
                options,
            } => self.run_exec(command, args, options).await,
            Effect::Prompt { definition } => {
                let answer = self.prompter.ask(definition).await?;
                definition.validate_answer(&answer)?;
                Ok(EffectOutcome::Answer(answer))
            }
            Effect::ReadContext { key } => Ok(EffectOutcome::Context(ctx.get(key))),
            Effect::WriteContext { key, value } => {
                ctx.set(key.clone(), value.clone());
                Ok(EffectOutcome::Unit)
            }
            // Handled in perform().
            Effect::Log { level, message } => {
                self.observer.on_log(*level, message);
                emit_log(*level, message);
                Ok(EffectOutcome::Unit)
            }
        }
    }

    async fn run_exec(
        &self,
        command: &str,
        args: &[String],
        options: &ExecOptions,
    ) -> Result<EffectOutcome, TaskError> {
        let mut process_command = ProcessCommand::new(command).args(args.iter().cloned());
        process_command.env = options.env.clone();
        process_command.working_dir = options.cwd.clone();
        process_command.timeout = options.timeout;

        let line = process_command.display_line();
        let output = self.process.run(process_command).await?;

        if options.check && !output.status.success() {
            let detail = match output.status.code() {
                Some(code) => format!("`{line}` exited with code {code}"),
                None => format!("`{line}` timed out"),
            };
            let message = if output.stderr.trim().is_empty() {
                detail
            } else {
                format!("{detail}: {}", output.stderr.trim())
            };
            return Err(TaskError::process(message));
        }
        Ok(EffectOutcome::Exec(output))
    }
}

async fn ensure_parent(path: &Path) -> Result<(), TaskError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| TaskError::io(format!("mkdir {}", parent.display()), e))?;
        }
    }
    Ok(())
}

fn copy_dir_recursive(source: PathBuf, dest: PathBuf) -> BoxFuture<'static, Result<(), TaskError>> {
    Box::pin(async move {
        tokio::fs::create_dir_all(&dest)
            .await
            .map_err(|e| TaskError::io(format!("mkdir {}", dest.display()), e))?;
        let mut entries = tokio::fs::read_dir(&source)
            .await
            .map_err(|e| TaskError::io(format!("read dir {}", source.display()), e))?;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| TaskError::io(format!("read dir {}", source.display()), e))?
        {
            let from = entry.path();
            let to = dest.join(entry.file_name());
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| TaskError::io(format!("stat {}", from.display()), e))?;
            if file_type.is_dir() {
                copy_dir_recursive(from, to).await?;
            } else {
                tokio::fs::copy(&from, &to).await.map_err(|e| {
                    TaskError::io(format!("copy {} -> {}", from.display(), to.display()), e)
                })?;
            }
        }
        Ok(())
    })
}

fn run_glob(pattern: &str, options: &GlobOptions) -> Result<Vec<PathBuf>, TaskError> {
    let match_options = glob::MatchOptions {
        case_sensitive: options.case_sensitive,
        require_literal_separator: false,
        require_literal_leading_dot: !options.include_hidden,
    };
    let entries = glob::glob_with(pattern, match_options)
        .map_err(|e| TaskError::glob(format!("invalid pattern '{pattern}'")).with_source(e))?;
    let mut paths = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => paths.push(path),
            Err(e) => {
                return Err(
                    TaskError::glob(format!("matching '{pattern}' failed")).with_source(e)
                )
            }
        }
    }
    Ok(paths)
}
