//! Settings Commands
//!
//! Commands for reading and updating explorer settings.

use crate::models::settings::{Settings, SettingsUpdate};
use crate::state::AppState;
use crate::utils::error::AppResult;

/// Get current explorer settings
pub async fn get_settings(state: &AppState) -> AppResult<Settings> {
    Ok(state.get_settings().await)
}

/// Update explorer settings with a partial update
pub async fn update_settings(state: &AppState, update: SettingsUpdate) -> AppResult<Settings> {
    state.update_settings(update).await
}
