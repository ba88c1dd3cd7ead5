//! Analysis Orchestrator
//!
//! Produces the dry-run tree for one feature file, reusing the cached report
//! when it is not older than the source.

use std::path::Path;
use std::sync::Arc;

use behave_explorer_core::{CoreError, CoreResult, Tree};
use tracing::{debug, error, warn};

use crate::cache::{CacheLookup, ResultCache, ScopedEntry};
use crate::command::{build_command, CommandOptions, RunnerConfig};
use crate::process::ProcessLauncher;
use crate::report::read_report;

/// Options for a single analysis
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeOptions {
    /// Re-run the runner even when the cached report is fresh
    pub skip_cache: bool,
}

/// Runs dry-run analysis through the result cache
pub struct Analyzer {
    cache: Arc<ResultCache>,
    launcher: Arc<dyn ProcessLauncher>,
    config: RunnerConfig,
}

impl Analyzer {
    pub fn new(cache: Arc<ResultCache>, launcher: Arc<dyn ProcessLauncher>, config: RunnerConfig) -> Self {
        Self {
            cache,
            launcher,
            config,
        }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Analyze one feature file.
    ///
    /// A runner failure or an unparsable report removes the cache entry so the
    /// next call starts over. A cached report that no longer parses is
    /// discarded and replaced by a fresh dry run.
    pub async fn analyze(&self, file: &Path, workspace: &Path, options: AnalyzeOptions) -> CoreResult<Tree> {
        let entry = if options.skip_cache {
            self.cache.entry_for(&file.to_string_lossy(), workspace).await?
        } else {
            match self.cache.lookup(file, workspace).await? {
                CacheLookup::Fresh(path) => match read_report(&path, workspace).await {
                    Ok(tree) => {
                        debug!("Using previous result for {}", file.display());
                        return Ok(tree);
                    }
                    Err(e) => {
                        warn!("Discarding unreadable result for {}: {}", file.display(), e);
                        discard(&path).await;
                        path
                    }
                },
                CacheLookup::Stale(path) => path,
            }
        };

        let entry = ScopedEntry::new(entry);
        let invocation = build_command(
            &self.config,
            workspace,
            &CommandOptions {
                output: Some(entry.path().to_path_buf()),
                include: vec![file.to_string_lossy().into_owned()],
                dry: true,
                ..Default::default()
            },
        );

        debug!("Analyzing {}: {}", file.display(), invocation.display());
        let output = self.launcher.output(&invocation).await?;

        if !output.success() {
            error!(
                "Runner failed analyzing {} (status {:?}): {}",
                file.display(),
                output.status,
                output.stderr.trim()
            );
            return Err(CoreError::runner_failed(output.status, output.stdout, output.stderr));
        }

        let tree = read_report(entry.path(), workspace).await?;
        entry.persist();

        Ok(tree)
    }
}

async fn discard(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove cache entry {}: {}", path.display(), e),
    }
}
