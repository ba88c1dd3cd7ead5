//! Scripted launchers for tests.
//!
//! Compiled for this crate's tests and, with the `test-util` feature, for
//! dependents that need a runner double.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use behave_explorer_core::{CoreError, CoreResult};

use crate::command::{DebugConfiguration, Invocation};
use crate::process::{DebugLauncher, ProcessLauncher, ProcessOutput, RunnerSession};

/// One feature, one scenario, a passing and a failing step.
pub const REPORT: &str = r#"[
  {"keyword": "Feature", "name": "A", "location": "features/a.feature:1", "status": "failed",
   "elements": [
    {"keyword": "Scenario", "name": "S", "location": "features/a.feature:3", "status": "failed",
     "steps": [
      {"keyword": "Given", "name": "one", "location": "features/a.feature:4",
       "result": {"status": "passed", "duration": 0.1}},
      {"keyword": "Then", "name": "two", "location": "features/a.feature:5",
       "result": {"status": "failed", "duration": 0.2, "error_message": ["boom"]}}
    ]}
  ]}
]"#;

/// Stderr of a failing dry run.
pub const FAILURE_STDERR: &str = "ConfigError: No steps directory";

fn write_outfile(args: &[String], report: &str) -> CoreResult<()> {
    let invocation = Invocation {
        executable: String::new(),
        args: args.to_vec(),
        cwd: Default::default(),
    };
    if let Some(path) = invocation.output_path() {
        std::fs::write(path, report)?;
    }
    Ok(())
}

/// Writes a canned report to `--outfile` and exits with a fixed status.
pub struct FakeLauncher {
    report: Mutex<String>,
    status: Option<i32>,
    hang: bool,
    /// Spawned runs leave the output file unwritten when false
    spawn_writes: bool,
    calls: AtomicUsize,
    invocations: Mutex<Vec<Invocation>>,
}

impl FakeLauncher {
    pub fn new(report: impl Into<String>) -> Self {
        Self {
            report: Mutex::new(report.into()),
            status: Some(0),
            hang: false,
            spawn_writes: true,
            calls: AtomicUsize::new(0),
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Dry runs exit with `status` and write nothing; spawned runs write an empty report.
    pub fn failing(status: i32) -> Self {
        Self {
            status: Some(status),
            ..Self::new("")
        }
    }

    /// Spawned sessions never exit on their own.
    pub fn hanging(report: impl Into<String>) -> Self {
        Self {
            hang: true,
            ..Self::new(report)
        }
    }

    /// Dry runs write `report`; spawned sessions hang and never produce one.
    pub fn hanging_without_report(report: impl Into<String>) -> Self {
        Self {
            spawn_writes: false,
            ..Self::hanging(report)
        }
    }

    pub fn set_report(&self, report: impl Into<String>) {
        *self.report.lock().unwrap_or_else(PoisonError::into_inner) = report.into();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Arguments of the most recent invocation (empty before the first).
    pub fn last_args(&self) -> Vec<String> {
        self.invocations()
            .last()
            .map(|invocation| invocation.args.clone())
            .unwrap_or_default()
    }

    fn record(&self, invocation: &Invocation) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.invocations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(invocation.clone());
    }

    fn write_report(&self, invocation: &Invocation) -> CoreResult<()> {
        let report = self.report.lock().unwrap_or_else(PoisonError::into_inner).clone();
        write_outfile(&invocation.args, &report)
    }
}

#[async_trait]
impl ProcessLauncher for FakeLauncher {
    async fn output(&self, invocation: &Invocation) -> CoreResult<ProcessOutput> {
        self.record(invocation);
        if self.status == Some(0) {
            self.write_report(invocation)?;
        }
        Ok(ProcessOutput {
            status: self.status,
            stdout: String::new(),
            stderr: FAILURE_STDERR.to_string(),
        })
    }

    async fn spawn(&self, invocation: &Invocation) -> CoreResult<Box<dyn RunnerSession>> {
        self.record(invocation);
        if self.spawn_writes {
            self.write_report(invocation)?;
        }
        Ok(Box::new(FakeSession {
            hang: self.hang,
            status: self.status,
            stopped: false,
        }))
    }
}

/// Session that exits with a fixed status, or waits until stopped.
pub struct FakeSession {
    hang: bool,
    status: Option<i32>,
    stopped: bool,
}

#[async_trait]
impl RunnerSession for FakeSession {
    async fn wait(&mut self) -> CoreResult<Option<i32>> {
        if self.stopped {
            return Ok(None);
        }
        if self.hang {
            std::future::pending::<()>().await;
        }
        Ok(self.status)
    }

    async fn stop(&mut self) -> CoreResult<()> {
        self.stopped = true;
        Ok(())
    }
}

/// Debug host that records the configuration, or refuses to start.
pub struct FakeDebugger {
    report: String,
    refuse: bool,
    configs: Mutex<Vec<DebugConfiguration>>,
}

impl FakeDebugger {
    pub fn new(report: impl Into<String>) -> Self {
        Self {
            report: report.into(),
            refuse: false,
            configs: Mutex::new(Vec::new()),
        }
    }

    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Self::new("")
        }
    }

    pub fn configs(&self) -> Vec<DebugConfiguration> {
        self.configs.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl DebugLauncher for FakeDebugger {
    async fn start_debugging(&self, config: &DebugConfiguration) -> CoreResult<Box<dyn RunnerSession>> {
        self.configs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(config.clone());
        if self.refuse {
            return Err(CoreError::command("debugger unavailable"));
        }

        write_outfile(&config.args, &self.report)?;
        Ok(Box::new(FakeSession {
            hang: false,
            status: Some(0),
            stopped: false,
        }))
    }
}
