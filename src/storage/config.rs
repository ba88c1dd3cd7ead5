//! JSON Configuration Management
//!
//! Handles reading and writing the explorer settings file. The workspace file
//! `<root>/.behave-explorer.json` takes precedence over the user file
//! `~/.behave-explorer/config.json`; without either, defaults apply.

use std::fs;
use std::path::{Path, PathBuf};

use crate::models::settings::{Settings, SettingsUpdate};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{ensure_dir, user_config_path, workspace_config_path};

/// Configuration service for managing explorer settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    settings: Settings,
}

impl ConfigService {
    /// Load settings for a workspace, falling back to the user file, then defaults
    pub fn new(workspace: &Path) -> AppResult<Self> {
        let workspace_path = workspace_config_path(workspace);
        if workspace_path.exists() {
            return Self::from_path(workspace_path);
        }

        match user_config_path() {
            Ok(user_path) => Self::from_path(user_path),
            Err(e) => {
                tracing::debug!("No user config available: {}", e);
                Ok(Self {
                    config_path: workspace_path,
                    settings: Settings::default(),
                })
            }
        }
    }

    /// Load settings from an explicit file; a missing file yields defaults
    pub fn from_path(config_path: PathBuf) -> AppResult<Self> {
        let settings = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Settings::default()
        };

        tracing::debug!("Settings loaded from {}", config_path.display());

        Ok(Self {
            config_path,
            settings,
        })
    }

    /// Service over settings that did not come from disk
    pub fn from_settings(config_path: PathBuf, settings: Settings) -> Self {
        Self {
            config_path,
            settings,
        }
    }

    /// Load settings from a file
    fn load_from_file(path: &Path) -> AppResult<Settings> {
        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)
            .map_err(|e| AppError::config(format!("{}: {}", path.display(), e)))?;
        settings.validate().map_err(AppError::validation)?;
        Ok(settings)
    }

    /// Save settings to a file with pretty formatting
    fn save_to_file(path: &Path, settings: &Settings) -> AppResult<()> {
        settings.validate().map_err(AppError::validation)?;
        if let Some(parent) = path.parent() {
            ensure_dir(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Path settings are loaded from and saved to
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get the current settings
    pub fn get_settings(&self) -> &Settings {
        &self.settings
    }

    /// Get a clone of the current settings
    pub fn get_settings_clone(&self) -> Settings {
        self.settings.clone()
    }

    /// Update the settings with a partial update
    pub fn update_settings(&mut self, update: SettingsUpdate) -> AppResult<Settings> {
        let mut next = self.settings.clone();
        next.apply_update(update);
        next.validate().map_err(AppError::validation)?;
        self.settings = next;
        self.save()?;
        Ok(self.settings.clone())
    }

    /// Save the current settings to disk
    pub fn save(&self) -> AppResult<()> {
        Self::save_to_file(&self.config_path, &self.settings)
    }

    /// Reload settings from disk
    pub fn reload(&mut self) -> AppResult<()> {
        self.settings = if self.config_path.exists() {
            Self::load_from_file(&self.config_path)?
        } else {
            Settings::default()
        };
        Ok(())
    }

    /// Reset settings to defaults
    pub fn reset(&mut self) -> AppResult<()> {
        self.settings = Settings::default();
        self.save()?;
        Ok(())
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            settings: Settings::default(),
        }
    }
}
