//! Analysis Commands

use std::path::Path;

use behave_explorer_runner::AnalyzeOptions;

use crate::models::test_item::TestItem;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::resolve_in_workspace;

/// Analyze one feature file and return its items, parents first.
///
/// `skip_cache` re-runs the dry run even when the cached report is fresh,
/// the same as a save event.
pub async fn analyze_file(state: &AppState, file: &Path, skip_cache: bool) -> AppResult<Vec<TestItem>> {
    let path = resolve_in_workspace(state.workspace(), file);
    if !path.is_file() {
        return Err(AppError::not_found(format!("Feature file not found: {}", path.display())));
    }

    let explorer = state.explorer();
    if skip_cache {
        explorer.reload_file(&path).await?;
    } else {
        explorer.analyze(&path, AnalyzeOptions::default()).await?;
    }

    Ok(explorer.items_for_path(&path).await)
}
