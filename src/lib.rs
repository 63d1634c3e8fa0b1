//! # Summon
//!
//! A project-scaffolding tool built on a composable effect/task
//! interpreter. Generators describe file-system and process side effects
//! as pure data; interpreters decide whether to perform, record, or mock
//! them.
//!
//! ## Modules
//!
//! - `effect` - Immutable effect descriptions and their outcomes
//! - `task` - The `Task` composition core and typed effect constructors
//! - `interpret` - Live, dry-run, and mixed-mode interpreter strategies
//! - `context` - Key/value scope threaded through one execution
//! - `subprocess` - Process runner abstraction with real and mock impls
//! - `interaction` - Prompt boundary with terminal and scripted impls
//! - `template` - Template engine boundary (tera-backed)
//! - `generator` - Generator definitions and answer resolution
//! - `catalog` - Built-in generators (component/react, component/svelte, init)
//! - `config` - `summon.toml` project configuration
//! - `cli` - Command-line glue and effect-list rendering

pub mod catalog;
pub mod cli;
pub mod config;
pub mod context;
pub mod effect;
pub mod error;
pub mod generator;
pub mod interaction;
pub mod interpret;
pub mod subprocess;
pub mod task;
pub mod template;

pub use effect::{Effect, EffectKind, EffectOutcome, LogLevel};
pub use error::{ErrorCode, TaskError};
pub use generator::{Answers, GeneratorDefinition, GeneratorMeta};
pub use interpret::{
    DryRunInterpreter, DryRunReport, ExecutionObserver, LiveInterpreter, MockRegistry,
    NullObserver,
};
pub use task::{ops, Task};
