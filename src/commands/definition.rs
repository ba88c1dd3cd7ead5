//! Editor Commands
//!
//! Step definition lookup and outline groups for one feature file.

use std::path::Path;

use crate::models::response::{DefinitionLocation, OutlineGroup};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::resolve_in_workspace;

/// Definition of the step on a one-based `line`.
///
/// The returned location is zero-based, like every other line the explorer reports.
pub async fn find_definition(state: &AppState, file: &Path, line: u32) -> AppResult<Option<DefinitionLocation>> {
    if line == 0 {
        return Err(AppError::validation("Lines are numbered from 1"));
    }

    let path = resolve_in_workspace(state.workspace(), file);
    state.explorer().find_definition(&path, line - 1).await
}

/// Outline groups of a feature file
pub async fn outline_groups(state: &AppState, file: &Path) -> AppResult<Vec<OutlineGroup>> {
    let path = resolve_in_workspace(state.workspace(), file);
    state.explorer().outline_groups(&path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::Settings;
    use crate::testing::{state_with, state_with_settings, FakeLauncher, REPORT};
    use std::sync::Arc;

    const OUTLINES: &str = r#"[{"keyword": "Feature", "name": "F", "location": "a.feature:1", "elements": [
        {"keyword": "Scenario Outline", "name": "O -- @1.1", "location": "a.feature:8", "steps": []},
        {"keyword": "Scenario Outline", "name": "O -- @1.2", "location": "a.feature:9", "steps": []}]}]"#;

    #[tokio::test]
    async fn test_find_definition_is_memoised() {
        let tmp = tempfile::TempDir::new().unwrap();
        let launcher = Arc::new(FakeLauncher::new(REPORT));
        let state = state_with(tmp.path(), launcher.clone());
        let file = Path::new("features/a.feature");

        let found = find_definition(&state, file, 4).await.unwrap().unwrap();
        assert_eq!(found.path, tmp.path().join("steps/a.py"));
        assert_eq!(found.line, 9);

        find_definition(&state, file, 4).await.unwrap();
        assert_eq!(launcher.calls(), 1);

        // Steps without a match have no definition
        assert!(find_definition(&state, file, 5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_definition_rejects_line_zero() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = state_with(tmp.path(), Arc::new(FakeLauncher::new(REPORT)));

        let err = find_definition(&state, Path::new("a.feature"), 0).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_outline_groups_respect_code_lens() {
        let tmp = tempfile::TempDir::new().unwrap();
        let state = state_with(tmp.path(), Arc::new(FakeLauncher::new(OUTLINES)));

        let groups = outline_groups(&state, Path::new("a.feature")).await.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].line, 5);
        assert_eq!(groups[0].include, vec!["a.feature:8", "a.feature:9"]);

        let settings = Settings {
            code_lens: false,
            ..Default::default()
        };
        let state = state_with_settings(tmp.path(), Arc::new(FakeLauncher::new(OUTLINES)), settings);
        assert!(outline_groups(&state, Path::new("a.feature")).await.unwrap().is_empty());
    }
}
