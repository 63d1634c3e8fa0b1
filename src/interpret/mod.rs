//! Interpreter strategies and the progress boundary.
//!
//! Three interchangeable ways to run a task:
//! - [`LiveInterpreter`] performs effects against the real world;
//! - [`DryRunInterpreter`] records effects and substitutes deterministic
//!   stand-ins;
//! - [`DryRunInterpreter::with_mocks`] resolves a chosen subset of effect
//!   variants through caller-supplied handlers while still recording.
//!
//! Ordering and failure semantics are identical across strategies.

pub mod dry_run;
pub mod live;

pub use dry_run::{DryRunInterpreter, DryRunReport, MockRegistry};
pub use live::LiveInterpreter;

use std::time::Duration;

use crate::effect::{Effect, LogLevel};

/// Lifecycle callbacks a UI or test harness subscribes to.
///
/// This is the entire contract between the interpreter and any
/// presentation layer; nothing else couples them.
pub trait ExecutionObserver: Send + Sync {
    fn on_effect_start(&self, _effect: &Effect) {}
    fn on_effect_complete(&self, _effect: &Effect, _duration: Duration) {}
    fn on_log(&self, _level: LogLevel, _message: &str) {}
}

/// Observer that ignores every event.
pub struct NullObserver;

impl ExecutionObserver for NullObserver {}

/// Forward a `Log` effect to the tracing backend.
pub(crate) fn emit_log(level: LogLevel, message: &str) {
    match level {
        LogLevel::Debug => tracing::debug!("{message}"),
        LogLevel::Info => tracing::info!("{message}"),
        LogLevel::Warn => tracing::warn!("{message}"),
        LogLevel::Error => tracing::error!("{message}"),
    }
}
