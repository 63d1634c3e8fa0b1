//! Command-line glue: flag parsing, generator dispatch, strategy selection.
//!
//! Everything here is presentation over the core contract: answers come
//! from flags or prompts, `--dry-run` selects the recording interpreter,
//! and the resulting effect list or live progress is rendered as text.

pub mod output;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

use crate::catalog;
use crate::config::SummonConfig;
use crate::effect::ExecOptions;
use crate::generator::{resolve_answers, resolve_answers_unattended, Answers};
use crate::interaction::TerminalPrompter;
use crate::interpret::{DryRunInterpreter, LiveInterpreter};
use crate::task::{ops, Task};
use crate::template::TeraEngine;

/// Scaffold projects from composable effect descriptions.
#[derive(Debug, Parser)]
#[command(name = "summon", version, about = "Project scaffolding from composable effect descriptions", long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List available generators
    List,
    /// Run a generator
    Run {
        /// Generator name, e.g. component/react
        generator: String,

        /// Record what would happen instead of doing it
        #[arg(long)]
        dry_run: bool,

        /// Preset an answer as key=value; repeatable
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Never prompt; use prompt defaults for unanswered questions
        #[arg(long)]
        defaults: bool,

        /// Project root to operate in (defaults to the current directory)
        #[arg(long)]
        dest: Option<PathBuf>,
    },
}

/// The env-filter directive for a `-v` count.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::List => list(),
        Commands::Run {
            generator,
            dry_run,
            set,
            defaults,
            dest,
        } => run_generator(&generator, dry_run, set, defaults, dest).await,
    }
}

fn list() -> anyhow::Result<()> {
    let root = std::env::current_dir()?;
    let config = SummonConfig::load(&root)?;
    let generators = catalog::builtin(Arc::new(TeraEngine::new()), config.templates_dir(&root));
    println!("Available generators:");
    for generator in &generators {
        let meta = generator.meta();
        println!(
            "  {:<20} {} (v{})",
            meta.name, meta.description, meta.version
        );
    }
    Ok(())
}

async fn run_generator(
    name: &str,
    dry_run: bool,
    set: Vec<String>,
    defaults: bool,
    dest: Option<PathBuf>,
) -> anyhow::Result<()> {
    let root = match dest {
        Some(dir) => {
            std::env::set_current_dir(&dir)
                .with_context(|| format!("entering {}", dir.display()))?;
            dir
        }
        None => std::env::current_dir()?,
    };
    let config = SummonConfig::load(&root)?;

    let generators = catalog::builtin(Arc::new(TeraEngine::new()), config.templates_dir(&root));
    let generator = catalog::find(&generators, name)
        .ok_or_else(|| anyhow!("unknown generator '{name}'; try `summon list`"))?;

    let presets = collect_presets(&config, &set)?;
    let answers = if defaults || dry_run {
        // Dry runs stay non-interactive so previews are scriptable.
        resolve_answers_unattended(generator.prompts(), &presets)?
    } else {
        let prompter = TerminalPrompter::new();
        resolve_answers(generator.prompts(), &presets, &prompter).await?
    };

    let mut task = generator.generate(&answers);
    if !dry_run {
        if let Some(hook) = &config.post_generate {
            task = append_post_generate(task, hook)?;
        }
    }

    if dry_run {
        let report = DryRunInterpreter::new().run(task);
        print!("{}", output::render_effects(name, &report.effects));
        report.result?;
    } else {
        let interpreter = LiveInterpreter::new()
            .with_observer(output::ConsoleObserver::shared())
            .with_prompter(Arc::new(TerminalPrompter::new()));
        interpreter.run(task).await?;
    }
    Ok(())
}

/// Config variables first, `--set` flags on top.
fn collect_presets(config: &SummonConfig, set: &[String]) -> anyhow::Result<Answers> {
    let mut presets = Answers::new();
    for (key, value) in &config.variables {
        presets.insert(key.clone(), Value::String(value.clone()));
    }
    for entry in set {
        let (key, value) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("--set expects KEY=VALUE, got '{entry}'"))?;
        presets.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(presets)
}

fn append_post_generate(task: Task<()>, hook: &str) -> anyhow::Result<Task<()>> {
    let words =
        shell_words::split(hook).with_context(|| format!("parsing post_generate '{hook}'"))?;
    let Some((program, args)) = words.split_first() else {
        return Ok(task);
    };
    let exec = ops::exec(program.clone(), args.to_vec(), ExecOptions::default()).map(|_| ());
    Ok(task.and_then(move |_| exec))
}
