//! Response Types
//!
//! Standard response types for all host commands.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Generic command response for all host commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResponse<T> {
    /// Create a successful response with data
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response with message
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T> From<Result<T, crate::utils::error::AppError>> for CommandResponse<T> {
    fn from(result: Result<T, crate::utils::error::AppError>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::err(e.to_string()),
        }
    }
}

/// Result of discovering the workspace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoverySummary {
    /// Files matched by `allowedFiles`
    pub matched: usize,
    /// Files analyzed and reconciled by this call
    pub loaded: usize,
    /// Files skipped because they were already loaded
    pub skipped: usize,
    /// Files whose analysis failed
    pub failed: Vec<PathBuf>,
    /// Test items in the collection afterwards
    pub items: usize,
}

/// Location of a step definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefinitionLocation {
    pub path: PathBuf,
    /// Zero-based line
    pub line: u32,
}

/// A run of consecutive outline scenarios that can be launched together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineGroup {
    /// Zero-based line the group is displayed at
    pub line: u32,
    /// Bare locations of the grouped scenarios
    pub include: Vec<String>,
}
