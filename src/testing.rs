//! State fixtures over the runner crate's scripted launcher.

use std::path::Path;
use std::sync::Arc;

use behave_explorer_runner::ResultCache;

pub(crate) use behave_explorer_runner::testing::FakeLauncher;

use crate::models::settings::Settings;
use crate::state::AppState;

pub(crate) const REPORT: &str = r#"[
  {"keyword": "Feature", "name": "A", "location": "features/a.feature:1", "status": "failed",
   "elements": [
    {"keyword": "Scenario", "name": "S", "location": "features/a.feature:3", "status": "failed",
     "steps": [
      {"keyword": "Given", "name": "one", "location": "features/a.feature:4",
       "match": {"location": "steps/a.py:10"},
       "result": {"status": "passed", "duration": 0.1}},
      {"keyword": "Then", "name": "two", "location": "features/a.feature:5",
       "result": {"status": "failed", "duration": 0.2, "error_message": ["boom"]}}
    ]}
  ]}
]"#;

/// State over `launcher` with default settings and a cache inside `workspace`.
pub(crate) fn state_with(workspace: &Path, launcher: Arc<FakeLauncher>) -> AppState {
    state_with_settings(workspace, launcher, Settings::default())
}

pub(crate) fn state_with_settings(workspace: &Path, launcher: Arc<FakeLauncher>, settings: Settings) -> AppState {
    let cache = Arc::new(ResultCache::with_root(workspace.join(".cache")));
    AppState::with_launchers(workspace, settings, cache, launcher, None).unwrap()
}
