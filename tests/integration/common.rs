//! Workspace fixtures shared by the integration tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use behave_explorer::models::settings::Settings;
use behave_explorer::state::AppState;
use behave_explorer_runner::{DebugLauncher, ResultCache};

pub use behave_explorer_runner::testing::{FakeDebugger, FakeLauncher};

pub const FEATURE: &str = "features/calc.feature";

/// Dry-run style report of one feature with a plain scenario and two outline rows
pub fn report(first_step: &str, second_status: &str) -> String {
    let second_result = if second_status == "failed" {
        serde_json::json!({"status": "failed", "duration": 0.02,
            "error_message": ["Traceback", "Expected: 5 but: was 6"]})
    } else {
        serde_json::json!({"status": second_status, "duration": 0.02})
    };

    serde_json::json!([{
        "keyword": "Feature",
        "name": "Calculator",
        "location": "features/calc.feature:1",
        "status": second_status,
        "tags": ["math"],
        "elements": [
            {
                "keyword": "Scenario",
                "name": "Add",
                "location": "features/calc.feature:3",
                "status": second_status,
                "steps": [
                    {
                        "keyword": "Given", "name": first_step, "location": "features/calc.feature:4",
                        "match": {"location": "features/steps/calc.py:12"},
                        "result": {"status": "passed", "duration": 0.01}
                    },
                    {
                        "keyword": "Then", "name": "the result is 5", "location": "features/calc.feature:5",
                        "result": second_result
                    }
                ]
            },
            {
                "keyword": "Scenario Outline", "name": "Sum -- @1.1", "location": "features/calc.feature:12",
                "status": "passed", "steps": []
            },
            {
                "keyword": "Scenario Outline", "name": "Sum -- @1.2", "location": "features/calc.feature:13",
                "status": "skipped", "steps": []
            }
        ]
    }])
    .to_string()
}

/// Temporary workspace with one feature file
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("features/steps")).unwrap();
        std::fs::write(dir.path().join(FEATURE), "Feature: Calculator\n").unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn feature(&self) -> PathBuf {
        self.root().join(FEATURE)
    }

    pub fn cache(&self) -> Arc<ResultCache> {
        Arc::new(ResultCache::with_root(self.root().join(".results")))
    }

    pub fn state(&self, runner: Arc<FakeLauncher>, settings: Settings) -> AppState {
        AppState::with_launchers(self.root(), settings, self.cache(), runner, None).unwrap()
    }

    pub fn state_with_debugger(
        &self,
        runner: Arc<FakeLauncher>,
        debugger: Arc<FakeDebugger>,
    ) -> AppState {
        AppState::with_launchers(self.root(), Settings::default(), self.cache(), runner, Some(debugger as Arc<dyn DebugLauncher>))
            .unwrap()
    }
}
