//! Debugpy Launcher
//!
//! Runs the runner module under `debugpy`, waiting for an editor to attach on
//! the configured port.

use std::sync::Arc;

use async_trait::async_trait;
use behave_explorer_core::{CoreError, CoreResult};
use behave_explorer_runner::{
    DebugConfiguration, DebugLauncher, Invocation, ProcessLauncher, RunnerSession, TokioLauncher,
};
use tracing::info;

/// `DebugLauncher` starting `<python> -m debugpy --listen <port> --wait-for-client`
pub struct DebugpyLauncher {
    python: String,
    port: u16,
    launcher: Arc<dyn ProcessLauncher>,
}

impl DebugpyLauncher {
    pub fn new(python: impl Into<String>, port: u16) -> Self {
        Self {
            python: python.into(),
            port,
            launcher: Arc::new(TokioLauncher::new()),
        }
    }

    /// Use a different process launcher.
    pub fn with_launcher(mut self, launcher: Arc<dyn ProcessLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Invocation for a debug configuration.
    pub fn invocation(&self, config: &DebugConfiguration) -> CoreResult<Invocation> {
        if config.kind != "python" || config.request != "launch" {
            return Err(CoreError::failed_to_start(format!(
                "Unsupported debug configuration: {} {}",
                config.kind, config.request
            )));
        }

        let mut args = vec![
            "-m".to_string(),
            "debugpy".to_string(),
            "--listen".to_string(),
            self.port.to_string(),
            "--wait-for-client".to_string(),
            "-m".to_string(),
            config.module.clone(),
        ];
        args.extend(config.args.iter().cloned());

        Ok(Invocation {
            executable: self.python.clone(),
            args,
            cwd: config.cwd.clone(),
        })
    }
}

#[async_trait]
impl DebugLauncher for DebugpyLauncher {
    async fn start_debugging(&self, config: &DebugConfiguration) -> CoreResult<Box<dyn RunnerSession>> {
        let invocation = self.invocation(config)?;
        info!("Waiting for debugger on port {}", self.port);

        self.launcher
            .spawn(&invocation)
            .await
            .map_err(|e| CoreError::failed_to_start(e.to_string()))
    }
}
