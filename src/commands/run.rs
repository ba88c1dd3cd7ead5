//! Run Commands
//!
//! Live runs of discovered items, plain or under the debugger.

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::models::run_report::RunReport;
use crate::services::explorer::RunRequest;
use crate::state::AppState;
use crate::utils::error::AppResult;

/// Run the requested items and return their outcomes.
///
/// The workspace is discovered first so requested ids resolve to items and
/// results can be projected onto them. Cancelling `token` aborts the run; the
/// report of whatever finished is still returned, marked aborted.
pub async fn run_tests(state: &AppState, request: RunRequest, token: CancellationToken) -> AppResult<RunReport> {
    let explorer = state.explorer();
    explorer.discover().await?;

    let report = explorer.run(request, token).await.map_err(|e| {
        error!("Test run failed: {}", e);
        e
    })?;

    if report.aborted {
        info!("Run aborted after {} outcome(s)", report.outcomes.len());
    }
    Ok(report)
}
