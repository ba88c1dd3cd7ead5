//! Discovery Commands

use tracing::error;

use crate::models::response::DiscoverySummary;
use crate::state::AppState;
use crate::utils::error::AppResult;

/// Load every allowed feature file in the workspace
pub async fn discover(state: &AppState) -> AppResult<DiscoverySummary> {
    let summary = state.explorer().discover().await?;

    for file in &summary.failed {
        error!("Discovery failed for {}", file.display());
    }
    Ok(summary)
}
