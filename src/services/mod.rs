//! Services
//!
//! Business logic services for the application.
//! Services handle the core functionality and are called by commands.

pub mod debug;
pub mod explorer;

pub use debug::DebugpyLauncher;
pub use explorer::{LoadOutcome, RunRequest, TestExplorer, TestItemCollection};
