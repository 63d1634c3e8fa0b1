//! Unified subprocess abstraction for the live interpreter.
//!
//! The interpreter never spawns processes directly; it goes through the
//! [`ProcessRunner`] trait so tests can substitute a mock with scripted
//! responses.

pub mod error;
pub mod mock;
pub mod runner;

pub use error::ProcessError;
pub use mock::{MockCommandConfig, MockProcessRunner};
pub use runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner, TokioProcessRunner};
