//! Integration Tests Module
//!
//! End-to-end tests of the explorer over temporary workspaces. The runner is
//! replaced by scripted launchers that write a JSON report to `--outfile`.

// Shared fakes and fixtures
mod common;

// Result cache freshness and analysis tests
mod analysis_test;

// Discovery, reconciliation and unloading
mod explorer_test;

// Live runs, aborts, debug sessions and projection
mod run_test;

// Settings loading and validation
mod config_test;
