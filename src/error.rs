//! Error types for task construction and interpretation.
//!
//! Every failure that crosses the interpreter boundary is a [`TaskError`]:
//! a stable machine-readable code, a human-readable message, and the
//! original error preserved as `source`. Wrapping never discards the
//! underlying message or chain; it only adds the code.

use thiserror::Error;

/// Stable error codes surfaced to callers and the CLI.
///
/// Codes are part of the public contract: match on these rather than on
/// message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A file-system operation failed in the live interpreter.
    Io,
    /// A spawned process failed to run, timed out, or exited non-zero.
    Process,
    /// A prompt could not be answered or the answer was rejected.
    Prompt,
    /// Template rendering failed.
    Template,
    /// A prompt validator or answer type check rejected input.
    Validation,
    /// A glob pattern was malformed or matching failed.
    Glob,
    /// A `race` over zero tasks was interpreted.
    EmptyRace,
    /// A malformed task tree or interpreter invariant violation.
    Internal,
}

impl ErrorCode {
    /// The stable string form of this code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Io => "io",
            ErrorCode::Process => "process",
            ErrorCode::Prompt => "prompt",
            ErrorCode::Template => "template",
            ErrorCode::Validation => "validation",
            ErrorCode::Glob => "glob",
            ErrorCode::EmptyRace => "empty_race",
            ErrorCode::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal error for the task it occurred in.
///
/// Already-performed effects are not rolled back when a `TaskError`
/// propagates; scaffolding leaves partial output in place.
#[derive(Debug, Error)]
#[error("[{code}] {message}")]
pub struct TaskError {
    /// Stable code identifying the failure class.
    pub code: ErrorCode,
    /// Human-readable description.
    pub message: String,
    /// The original error, when one exists.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl TaskError {
    /// Create an error with no underlying source.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying error that caused this one.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// File-system failure wrapping an `io::Error`.
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::new(ErrorCode::Io, message).with_source(source)
    }

    /// Process failure.
    pub fn process(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Process, message)
    }

    /// Prompt failure.
    pub fn prompt(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Prompt, message)
    }

    /// Template rendering failure.
    pub fn template(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Template, message)
    }

    /// Validation failure.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    /// Glob pattern or matching failure.
    pub fn glob(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Glob, message)
    }

    /// Interpreter invariant violation.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// A `race` over an empty task list.
    pub fn empty_race() -> Self {
        Self::new(ErrorCode::EmptyRace, "race requires at least one task")
    }
}
