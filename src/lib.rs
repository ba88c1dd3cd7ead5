//! Behave Explorer - Application Library
//!
//! Test explorer backend for behave feature files. It includes:
//! - Host command functions over a per-workspace `AppState`
//! - The `TestExplorer` service (discovery, runs, projection, editor features)
//! - Settings storage and the debugpy launcher
//! - Data models and utilities

pub mod cli;
pub mod commands;
pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used items from commands
pub use commands::{
    // Discovery
    analyze_file, discover,
    // Runs
    run_tests,
    // Editor features
    find_definition, outline_groups,
    // Maintenance
    clear_cache, get_settings, update_settings,
};
pub use models::response::*;
pub use models::run_report::{Outcome, RunReport, TestMessage};
pub use models::settings::{Settings, SettingsUpdate};
pub use models::test_item::{ItemKind, TestItem};
pub use services::explorer::{RunRequest, TestExplorer};
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
