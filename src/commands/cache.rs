//! Cache Commands

use crate::state::AppState;
use crate::utils::error::AppResult;

/// Remove every cached report and forget discovered items
pub async fn clear_cache(state: &AppState) -> AppResult<()> {
    state.explorer().clear_cache().await
}
