//! Core Error Types
//!
//! Defines the error taxonomy shared by every crate in the Behave Explorer
//! workspace. Only thiserror + serde_json + std are needed here so the core
//! crate stays lightweight.
//!
//! Cache staleness is not represented: a stale or missing cache entry is a
//! normal lookup outcome (see the runner crate's `CacheLookup`), not a failure.

use thiserror::Error;

/// Core error type for the Behave Explorer workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// File I/O errors (read, stat, mkdir, rm)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in a runner report
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Well-formed JSON that does not match the report schema
    #[error("Parse error: {0}")]
    Parse(String),

    /// The runner exited with a non-zero status during analysis
    #[error("Runner failed with status {status:?}")]
    RunnerFailed {
        status: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// A debug session could not be started
    #[error("Failed to start: {0}")]
    FailedToStart(String),

    /// Command execution errors (spawn, wait, kill)
    #[error("Command error: {0}")]
    Command(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a parse error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a runner failure carrying the captured output
    pub fn runner_failed(status: Option<i32>, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::RunnerFailed {
            status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a failed-to-start error
    pub fn failed_to_start(msg: impl Into<String>) -> Self {
        Self::FailedToStart(msg.into())
    }

    /// Create a command error
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error came from reading or decoding a report.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::Serialization(_) | Self::Parse(_))
    }
}

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
