//! Behave Explorer Runner
//!
//! Everything that talks to the external runner: command construction, the
//! process and debugger seams, the on-disk result cache, dry-run analysis and
//! live run sessions.
//!
//! ## Module Organization
//!
//! - `command` - Argument vectors for dry runs, live runs and debug sessions
//! - `process` - `ProcessLauncher` / `DebugLauncher` / `RunnerSession` traits and the tokio launcher
//! - `cache` - Workspace-partitioned report files with mtime freshness
//! - `report` - Async report loading
//! - `analyzer` - Cached dry-run analysis of one file
//! - `session` - Live runs with abort and final state
//! - `testing` - Scripted launchers for tests (`test-util` feature)

pub mod analyzer;
pub mod cache;
pub mod command;
pub mod process;
pub mod report;
pub mod session;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

// ── Command Construction ───────────────────────────────────────────────
pub use command::{build_command, CommandOptions, DebugConfiguration, Invocation, RunnerConfig};

// ── Process Seams ──────────────────────────────────────────────────────
pub use process::{
    ChildSession, DebugLauncher, ProcessLauncher, ProcessOutput, RunnerSession, TokioLauncher,
};

// ── Result Cache ───────────────────────────────────────────────────────
pub use cache::{check_fresh, CacheLookup, ResultCache, ScopedEntry, CACHE_DIR_NAME};
pub use report::read_report;

// ── Analysis & Sessions ────────────────────────────────────────────────
pub use analyzer::{AnalyzeOptions, Analyzer};
pub use session::{
    AbortHandle, LaunchMode, RunHandle, SessionManager, SessionState, StartOptions,
};
