//! Execution Session Manager
//!
//! Starts live runs (plain or under a debugger) writing their report to a
//! scoped cache entry. A background task waits for the session to end or for
//! an abort, records the final state, parses whatever report exists and
//! releases the entry exactly once.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use behave_explorer_core::{CoreError, CoreResult, Tree};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::{ResultCache, ScopedEntry};
use crate::command::{build_command, CommandOptions, DebugConfiguration, RunnerConfig};
use crate::process::{DebugLauncher, ProcessLauncher, RunnerSession};
use crate::report::read_report;

/// How a run is launched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    #[default]
    Run,
    Debug,
}

/// Options for starting a run
#[derive(Debug, Clone, Default)]
pub struct StartOptions {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub mode: LaunchMode,
}

/// Lifecycle of a run session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Pending,
    Running,
    Completed { exit_code: Option<i32> },
    Aborted,
    Failed { message: String },
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed { .. } | SessionState::Aborted | SessionState::Failed { .. }
        )
    }
}

/// Cloneable handle that stops a running session
#[derive(Debug, Clone)]
pub struct AbortHandle {
    token: CancellationToken,
}

impl AbortHandle {
    /// Request termination. Calling it again, or after the run ended, is a no-op.
    pub fn abort(&self) {
        self.token.cancel();
    }

    pub fn is_aborted(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// A started run
pub struct RunHandle {
    task: JoinHandle<CoreResult<Tree>>,
    abort: AbortHandle,
    state: watch::Receiver<SessionState>,
    output: PathBuf,
}

impl RunHandle {
    pub fn abort_handle(&self) -> AbortHandle {
        self.abort.clone()
    }

    pub fn abort(&self) {
        self.abort.abort();
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn state_changes(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }

    /// Report path the runner writes to (removed once the run settles).
    pub fn output_path(&self) -> &Path {
        &self.output
    }

    /// Wait for the run to settle and return the parsed report.
    ///
    /// An aborted run still yields whatever report the runner managed to write,
    /// which usually fails with an I/O or parse error.
    pub async fn result(self) -> CoreResult<Tree> {
        self.task
            .await
            .map_err(|e| CoreError::internal(format!("Run task failed: {}", e)))?
    }
}

/// Starts and supervises live run sessions
pub struct SessionManager {
    cache: Arc<ResultCache>,
    launcher: Arc<dyn ProcessLauncher>,
    debugger: Option<Arc<dyn DebugLauncher>>,
    config: RunnerConfig,
}

impl SessionManager {
    pub fn new(cache: Arc<ResultCache>, launcher: Arc<dyn ProcessLauncher>, config: RunnerConfig) -> Self {
        Self {
            cache,
            launcher,
            debugger: None,
            config,
        }
    }

    /// Enable `LaunchMode::Debug`.
    pub fn with_debugger(mut self, debugger: Arc<dyn DebugLauncher>) -> Self {
        self.debugger = Some(debugger);
        self
    }

    /// Start a run. Returns once the session is launched.
    pub async fn start(&self, workspace: &Path, options: StartOptions) -> CoreResult<RunHandle> {
        let entry = self.cache.scoped_entry(workspace).await?;
        let (state_tx, state_rx) = watch::channel(SessionState::Pending);

        let mut command = CommandOptions {
            output: Some(entry.path().to_path_buf()),
            include: options.include,
            exclude: options.exclude,
            ..Default::default()
        };

        // A launch failure drops `entry`, which removes the file
        let session = match options.mode {
            LaunchMode::Run => {
                let invocation = build_command(&self.config, workspace, &command);
                info!("Starting run: {}", invocation.display());
                self.launcher.spawn(&invocation).await?
            }
            LaunchMode::Debug => {
                let debugger = self
                    .debugger
                    .as_ref()
                    .ok_or_else(|| CoreError::failed_to_start("No debugger is configured"))?;

                command.skip_python = true;
                let invocation = build_command(&self.config, workspace, &command);
                let config = DebugConfiguration::behave(invocation.args, workspace);
                info!("Starting debug session: {:?}", config.args);

                debugger.start_debugging(&config).await.map_err(|e| match e {
                    CoreError::FailedToStart(_) => e,
                    other => CoreError::failed_to_start(other.to_string()),
                })?
            }
        };

        state_tx.send_replace(SessionState::Running);

        let token = CancellationToken::new();
        let output = entry.path().to_path_buf();
        let task = tokio::spawn(supervise(
            session,
            entry,
            workspace.to_path_buf(),
            token.clone(),
            state_tx,
        ));

        Ok(RunHandle {
            task,
            abort: AbortHandle { token },
            state: state_rx,
            output,
        })
    }
}

enum Outcome {
    Exited(CoreResult<Option<i32>>),
    Aborted,
}

async fn supervise(
    mut session: Box<dyn RunnerSession>,
    entry: ScopedEntry,
    workspace: PathBuf,
    token: CancellationToken,
    state: watch::Sender<SessionState>,
) -> CoreResult<Tree> {
    let outcome = tokio::select! {
        status = session.wait() => Outcome::Exited(status),
        _ = token.cancelled() => Outcome::Aborted,
    };

    let final_state = match outcome {
        // The runner exits non-zero when scenarios fail; that is still a completed run
        Outcome::Exited(Ok(exit_code)) => {
            debug!("Run exited with {:?}", exit_code);
            SessionState::Completed { exit_code }
        }
        Outcome::Exited(Err(e)) => {
            warn!("Run session failed: {}", e);
            SessionState::Failed { message: e.to_string() }
        }
        Outcome::Aborted => {
            info!("Aborting run");
            if let Err(e) = session.stop().await {
                warn!("Failed to stop run session: {}", e);
            }
            if let Err(e) = session.wait().await {
                debug!("Wait after abort failed: {}", e);
            }
            SessionState::Aborted
        }
    };

    state.send_replace(final_state);

    let tree = read_report(entry.path(), &workspace).await;
    entry.release();
    tree
}
