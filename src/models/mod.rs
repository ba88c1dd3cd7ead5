//! Data Models
//!
//! Contains all data structures used throughout the application.

pub mod response;
pub mod run_report;
pub mod settings;
pub mod test_item;

pub use response::*;
pub use run_report::*;
pub use settings::*;
pub use test_item::*;
