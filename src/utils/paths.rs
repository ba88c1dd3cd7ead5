//! Cross-Platform Path Utilities
//!
//! Functions for resolving configuration locations across platforms.
//! Handles ~/.behave-explorer/ and the per-workspace settings file.

use std::path::{Path, PathBuf};

use crate::utils::error::{AppError, AppResult};

/// Name of the per-workspace settings file
pub const WORKSPACE_CONFIG_FILE: &str = ".behave-explorer.json";

/// Get the user's home directory
pub fn home_dir() -> AppResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| AppError::config("Could not determine home directory"))
}

/// Get the Behave Explorer directory (~/.behave-explorer/)
pub fn behave_explorer_dir() -> AppResult<PathBuf> {
    Ok(home_dir()?.join(".behave-explorer"))
}

/// Get the user config file path (~/.behave-explorer/config.json)
pub fn user_config_path() -> AppResult<PathBuf> {
    Ok(behave_explorer_dir()?.join("config.json"))
}

/// Get the workspace config file path (<root>/.behave-explorer.json)
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(WORKSPACE_CONFIG_FILE)
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> AppResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Resolve a workspace argument to an absolute directory
pub fn resolve_workspace(path: Option<&Path>) -> AppResult<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir()?,
    };

    let resolved = path
        .canonicalize()
        .map_err(|e| AppError::bad_workspace(format!("{}: {}", path.display(), e)))?;

    if !resolved.is_dir() {
        return Err(AppError::bad_workspace(format!("{} is not a directory", resolved.display())));
    }

    Ok(resolved)
}

/// Resolve a file argument against the workspace
pub fn resolve_in_workspace(workspace: &Path, file: &Path) -> PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        workspace.join(file)
    }
}
