//! Effect data definitions.
//!
//! An [`Effect`] is an immutable, fully self-describing record of one
//! intended side effect. Effects carry no behavior: interpreters decide
//! whether to perform them, record them, or resolve them through mocks.
//! Composition (sequencing, parallelism, racing) lives in the task tree,
//! not here, so the enum stays cheap to clone and compare.

pub mod outcome;
pub mod prompt;

pub use outcome::EffectOutcome;
pub use prompt::{PromptDefinition, PromptKind};

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Severity for [`Effect::Log`] entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for [`Effect::Glob`] matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobOptions {
    pub case_sensitive: bool,
    /// Match entries whose name starts with a dot.
    pub include_hidden: bool,
}

impl Default for GlobOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            include_hidden: false,
        }
    }
}

/// Options for [`Effect::Exec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOptions {
    pub cwd: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
    pub timeout: Option<Duration>,
    /// Treat a non-zero exit (or timeout) as a failure. Defaults to true;
    /// disable to inspect the output instead.
    pub check: bool,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            cwd: None,
            env: BTreeMap::new(),
            timeout: None,
            check: true,
        }
    }
}

/// One intended side effect, as pure data.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    WriteFile {
        path: PathBuf,
        content: String,
    },
    AppendFile {
        path: PathBuf,
        content: String,
    },
    MakeDir {
        path: PathBuf,
    },
    CopyFile {
        source: PathBuf,
        dest: PathBuf,
    },
    CopyDir {
        source: PathBuf,
        dest: PathBuf,
    },
    DeleteFile {
        path: PathBuf,
    },
    DeleteDir {
        path: PathBuf,
    },
    ReadFile {
        path: PathBuf,
    },
    Exists {
        path: PathBuf,
    },
    Glob {
        pattern: String,
        options: GlobOptions,
    },
    Exec {
        command: String,
        args: Vec<String>,
        options: ExecOptions,
    },
    Prompt {
        definition: PromptDefinition,
    },
    Log {
        level: LogLevel,
        message: String,
    },
    ReadContext {
        key: String,
    },
    WriteContext {
        key: String,
        value: Value,
    },
}

/// Variant identifier, used as the mock registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    WriteFile,
    AppendFile,
    MakeDir,
    CopyFile,
    CopyDir,
    DeleteFile,
    DeleteDir,
    ReadFile,
    Exists,
    Glob,
    Exec,
    Prompt,
    Log,
    ReadContext,
    WriteContext,
}

impl EffectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EffectKind::WriteFile => "write_file",
            EffectKind::AppendFile => "append_file",
            EffectKind::MakeDir => "make_dir",
            EffectKind::CopyFile => "copy_file",
            EffectKind::CopyDir => "copy_dir",
            EffectKind::DeleteFile => "delete_file",
            EffectKind::DeleteDir => "delete_dir",
            EffectKind::ReadFile => "read_file",
            EffectKind::Exists => "exists",
            EffectKind::Glob => "glob",
            EffectKind::Exec => "exec",
            EffectKind::Prompt => "prompt",
            EffectKind::Log => "log",
            EffectKind::ReadContext => "read_context",
            EffectKind::WriteContext => "write_context",
        }
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Effect {
    /// The variant identifier of this effect.
    pub fn kind(&self) -> EffectKind {
        match self {
            Effect::WriteFile { .. } => EffectKind::WriteFile,
            Effect::AppendFile { .. } => EffectKind::AppendFile,
            Effect::MakeDir { .. } => EffectKind::MakeDir,
            Effect::CopyFile { .. } => EffectKind::CopyFile,
            Effect::CopyDir { .. } => EffectKind::CopyDir,
            Effect::DeleteFile { .. } => EffectKind::DeleteFile,
            Effect::DeleteDir { .. } => EffectKind::DeleteDir,
            Effect::ReadFile { .. } => EffectKind::ReadFile,
            Effect::Exists { .. } => EffectKind::Exists,
            Effect::Glob { .. } => EffectKind::Glob,
            Effect::Exec { .. } => EffectKind::Exec,
            Effect::Prompt { .. } => EffectKind::Prompt,
            Effect::Log { .. } => EffectKind::Log,
            Effect::ReadContext { .. } => EffectKind::ReadContext,
            Effect::WriteContext { .. } => EffectKind::WriteContext,
        }
    }

    /// Whether performing this effect mutates external state.
    ///
    /// Mutating effects are recorded but never performed during a dry run.
    /// `Prompt` counts as mutating: it reaches outside the process even
    /// though it writes nothing. `Log` and the context effects are internal
    /// and are performed in every mode.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self.kind(),
            EffectKind::WriteFile
                | EffectKind::AppendFile
                | EffectKind::MakeDir
                | EffectKind::CopyFile
                | EffectKind::CopyDir
                | EffectKind::DeleteFile
                | EffectKind::DeleteDir
                | EffectKind::Exec
                | EffectKind::Prompt
        )
    }

    /// Whether this effect only reads external state.
    pub fn is_query(&self) -> bool {
        matches!(
            self.kind(),
            EffectKind::ReadFile | EffectKind::Exists | EffectKind::Glob
        )
    }
}
