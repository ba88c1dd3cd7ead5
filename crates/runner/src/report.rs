//! Report file loading

use std::path::Path;

use behave_explorer_core::{parse_report, CoreResult, Tree};

/// Read and parse a report file written by the runner.
pub async fn read_report(path: &Path, workspace: &Path) -> CoreResult<Tree> {
    let content = tokio::fs::read_to_string(path).await?;
    parse_report(&content, workspace)
}
