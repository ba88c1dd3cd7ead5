//! Runner Process Collaborators
//!
//! Trait seams for everything that launches the external runner, plus the
//! tokio-backed implementation used outside of tests.

use std::process::Stdio;

use async_trait::async_trait;
use behave_explorer_core::{CoreError, CoreResult};
use tokio::process::{Child, Command};

use crate::command::{DebugConfiguration, Invocation};

/// Captured result of an awaited process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code (`None` when killed by a signal)
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// A running runner process or debug session.
#[async_trait]
pub trait RunnerSession: Send {
    /// Wait for the session to end, returning its exit code if known.
    async fn wait(&mut self) -> CoreResult<Option<i32>>;

    /// Request termination. `wait` returns afterwards.
    async fn stop(&mut self) -> CoreResult<()>;
}

/// Launches the runner as a directly managed process.
#[async_trait]
pub trait ProcessLauncher: Send + Sync {
    /// Run to completion and capture output. A non-zero exit is not an error here.
    async fn output(&self, invocation: &Invocation) -> CoreResult<ProcessOutput>;

    /// Start the process and return immediately.
    async fn spawn(&self, invocation: &Invocation) -> CoreResult<Box<dyn RunnerSession>>;
}

/// Launches the runner under a debugger.
#[async_trait]
pub trait DebugLauncher: Send + Sync {
    /// Start a debug session. Refusal must be reported as `FailedToStart`.
    async fn start_debugging(&self, config: &DebugConfiguration) -> CoreResult<Box<dyn RunnerSession>>;
}

// ============================================================================
// Tokio implementation
// ============================================================================

/// Handle to a spawned child process
pub struct ChildSession {
    child: Child,
    pid: u32,
}

impl ChildSession {
    pub fn new(child: Child) -> Self {
        let pid = child.id().unwrap_or(0);
        Self { child, pid }
    }

    /// Get the process ID
    pub fn pid(&self) -> u32 {
        self.pid
    }
}

#[async_trait]
impl RunnerSession for ChildSession {
    async fn wait(&mut self) -> CoreResult<Option<i32>> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|e| CoreError::command(format!("Failed to wait for process: {}", e)))?;

        Ok(status.code())
    }

    async fn stop(&mut self) -> CoreResult<()> {
        self.child
            .kill()
            .await
            .map_err(|e| CoreError::command(format!("Failed to kill process: {}", e)))
    }
}

impl Drop for ChildSession {
    fn drop(&mut self) {
        // Non-async kill so an abandoned session never leaves a zombie runner
        let _ = self.child.start_kill();
    }
}

/// Process launcher backed by `tokio::process`
#[derive(Debug, Default, Clone)]
pub struct TokioLauncher;

impl TokioLauncher {
    pub fn new() -> Self {
        Self
    }

    fn command(invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&invocation.executable);
        cmd.args(&invocation.args).current_dir(&invocation.cwd);
        cmd
    }
}

/// Map a spawn failure to a command error naming the executable.
pub fn spawn_error(executable: &str, e: std::io::Error) -> CoreError {
    if e.kind() == std::io::ErrorKind::NotFound {
        CoreError::command(format!("Runner executable '{}' not found in PATH", executable))
    } else {
        CoreError::command(format!("Failed to spawn '{}': {}", executable, e))
    }
}

#[async_trait]
impl ProcessLauncher for TokioLauncher {
    async fn output(&self, invocation: &Invocation) -> CoreResult<ProcessOutput> {
        let output = Self::command(invocation)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| spawn_error(&invocation.executable, e))?;

        Ok(ProcessOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn spawn(&self, invocation: &Invocation) -> CoreResult<Box<dyn RunnerSession>> {
        let child = Self::command(invocation)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| spawn_error(&invocation.executable, e))?;

        let session = ChildSession::new(child);
        tracing::info!("Spawned runner process {}", session.pid());

        Ok(Box::new(session))
    }
}
