//! Application State
//!
//! Per-workspace state shared by every host command: the settings service
//! and the test explorer built from it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use behave_explorer_runner::{DebugLauncher, ProcessLauncher, ResultCache, TokioLauncher};
use tokio::sync::RwLock;

use crate::models::settings::{Settings, SettingsUpdate};
use crate::services::debug::DebugpyLauncher;
use crate::services::explorer::TestExplorer;
use crate::storage::ConfigService;
use crate::utils::error::AppResult;
use crate::utils::paths::workspace_config_path;

/// Application state for one workspace
pub struct AppState {
    workspace: PathBuf,
    /// Configuration service for explorer settings
    config: Arc<RwLock<ConfigService>>,
    explorer: Arc<TestExplorer>,
}

impl AppState {
    /// Load settings for `workspace` and wire the real runner and debugger
    pub fn new(workspace: &Path) -> AppResult<Self> {
        let config = ConfigService::new(workspace)?;
        let settings = config.get_settings_clone();

        let debugger = Arc::new(DebugpyLauncher::new(settings.python.clone(), settings.debug_port));
        let explorer = TestExplorer::new(
            workspace,
            settings,
            Arc::new(ResultCache::new()),
            Arc::new(TokioLauncher::new()),
        )?
        .with_debugger(debugger);

        Ok(Self::from_parts(workspace, config, explorer))
    }

    /// State over explicit collaborators
    pub fn with_launchers(
        workspace: &Path,
        settings: Settings,
        cache: Arc<ResultCache>,
        launcher: Arc<dyn ProcessLauncher>,
        debugger: Option<Arc<dyn DebugLauncher>>,
    ) -> AppResult<Self> {
        let mut explorer = TestExplorer::new(workspace, settings.clone(), cache, launcher)?;
        if let Some(debugger) = debugger {
            explorer = explorer.with_debugger(debugger);
        }

        let config = ConfigService::from_settings(workspace_config_path(workspace), settings);
        Ok(Self::from_parts(workspace, config, explorer))
    }

    fn from_parts(workspace: &Path, config: ConfigService, explorer: TestExplorer) -> Self {
        Self {
            workspace: workspace.to_path_buf(),
            config: Arc::new(RwLock::new(config)),
            explorer: Arc::new(explorer),
        }
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn explorer(&self) -> &Arc<TestExplorer> {
        &self.explorer
    }

    /// Get a clone of the current settings
    pub async fn get_settings(&self) -> Settings {
        self.config.read().await.get_settings_clone()
    }

    /// Update and persist settings. The explorer keeps its snapshot until the
    /// state is rebuilt.
    pub async fn update_settings(&self, update: SettingsUpdate) -> AppResult<Settings> {
        self.config.write().await.update_settings(update)
    }
}
