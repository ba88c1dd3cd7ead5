//! Test Explorer Service
//!
//! Owns the test item collection for one workspace and drives analysis,
//! runs, outline groups and definition lookup through the runner crate.
//!
//! ## Module Organization
//!
//! - `collection` - Persistent item tree keyed by bare location
//! - `reconcile` - Parsed tree to items
//! - `project` - Run results to outcomes (`RunSink`, `TestRun`)
//! - `lens` - Outline groups
//! - `definition` - Step definition lookup and memoisation

pub mod collection;
pub mod definition;
pub mod lens;
pub mod project;
pub mod reconcile;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use behave_explorer_core::Tree;
use behave_explorer_runner::{
    AnalyzeOptions, Analyzer, DebugLauncher, LaunchMode, ProcessLauncher, ResultCache,
    SessionManager, StartOptions,
};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::models::response::{DefinitionLocation, DiscoverySummary, OutlineGroup};
use crate::models::run_report::RunReport;
use crate::models::settings::Settings;
use crate::models::test_item::TestItem;
use crate::utils::error::AppResult;

pub use collection::TestItemCollection;
pub use definition::{definition_at, find_step_at, DefinitionCache};
pub use lens::outline_groups;
pub use project::{project, DiffPatterns, Projector, RunSink, TestRun};
pub use reconcile::{reconcile, ReconcileOutcome};

/// Which items to run, and how
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunRequest {
    /// Item ids (or raw locations) to run; empty runs everything
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub mode: LaunchMode,
}

/// Result of loading one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(ReconcileOutcome),
    /// Already loaded or in flight
    Skipped,
}

/// Test explorer for one workspace
pub struct TestExplorer {
    workspace: PathBuf,
    settings: Settings,
    patterns: DiffPatterns,
    analyzer: Analyzer,
    sessions: SessionManager,
    items: RwLock<TestItemCollection>,
    loaded: RwLock<HashSet<PathBuf>>,
    definitions: RwLock<DefinitionCache>,
}

impl TestExplorer {
    pub fn new(
        workspace: impl Into<PathBuf>,
        settings: Settings,
        cache: Arc<ResultCache>,
        launcher: Arc<dyn ProcessLauncher>,
    ) -> AppResult<Self> {
        let patterns = DiffPatterns::compile(&settings.diff_regex)?;
        let runner = settings.runner_config();

        Ok(Self {
            workspace: workspace.into(),
            patterns,
            analyzer: Analyzer::new(cache.clone(), launcher.clone(), runner.clone()),
            sessions: SessionManager::new(cache, launcher, runner),
            settings,
            items: RwLock::new(TestItemCollection::new()),
            loaded: RwLock::new(HashSet::new()),
            definitions: RwLock::new(DefinitionCache::new()),
        })
    }

    /// Enable debug runs.
    pub fn with_debugger(mut self, debugger: Arc<dyn DebugLauncher>) -> Self {
        self.sessions = self.sessions.with_debugger(debugger);
        self
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Snapshot of the current items.
    pub async fn items(&self) -> TestItemCollection {
        self.items.read().await.clone()
    }

    /// Items of one file, parents first.
    pub async fn items_for_path(&self, path: &Path) -> Vec<TestItem> {
        self.items
            .read()
            .await
            .items_for_path(path)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn is_loaded(&self, path: &Path) -> bool {
        self.loaded.read().await.contains(path)
    }

    // ========================================================================
    // Discovery
    // ========================================================================

    /// Analyze a file and reconcile its tree into the collection.
    pub async fn analyze(&self, path: &Path, options: AnalyzeOptions) -> AppResult<(Tree, ReconcileOutcome)> {
        let tree = self.analyzer.analyze(path, &self.workspace, options).await?;

        let outcome = {
            let mut items = self.items.write().await;
            reconcile(&tree, &mut items, self.settings.discover_steps)
        };

        Ok((tree, outcome))
    }

    /// Load a file once. Later calls are skipped until it is unloaded or fails.
    pub async fn load_file(&self, path: &Path) -> AppResult<LoadOutcome> {
        if !self.loaded.write().await.insert(path.to_path_buf()) {
            debug!("Skipping reevaluation of {}", path.display());
            return Ok(LoadOutcome::Skipped);
        }

        match self.analyze(path, AnalyzeOptions::default()).await {
            Ok((_, outcome)) => Ok(LoadOutcome::Loaded(outcome)),
            Err(e) => {
                self.loaded.write().await.remove(path);
                error!("Failed to analyze {}: {}", path.display(), e);
                Err(e)
            }
        }
    }

    /// Re-analyze a saved file, bypassing the result cache.
    pub async fn reload_file(&self, path: &Path) -> AppResult<ReconcileOutcome> {
        self.definitions.write().await.invalidate(path);

        let (_, outcome) = self.analyze(path, AnalyzeOptions { skip_cache: true }).await?;
        self.loaded.write().await.insert(path.to_path_buf());
        Ok(outcome)
    }

    /// Drop every item whose source lives under `path`. Returns how many were removed.
    pub async fn unload_file(&self, path: &Path) -> usize {
        let removed = self.items.write().await.remove_matching(path);
        self.loaded.write().await.retain(|file| !file.starts_with(path));
        self.definitions.write().await.invalidate(path);

        debug!("Unloaded {} item(s) under {}", removed, path.display());
        removed
    }

    /// Files selected by `allowedFiles`, sorted.
    pub fn matching_files(&self) -> AppResult<Vec<PathBuf>> {
        let root = glob::Pattern::escape(&self.workspace.to_string_lossy());
        let pattern = format!("{}/{}", root.trim_end_matches('/'), self.settings.allowed_files);

        let mut files = Vec::new();
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable path: {}", e),
            }
        }
        files.sort();
        Ok(files)
    }

    /// Load every allowed file concurrently.
    pub async fn discover(&self) -> AppResult<DiscoverySummary> {
        let files = self.matching_files()?;
        info!("Discovering {} file(s) in {}", files.len(), self.workspace.display());

        let results = join_all(files.iter().map(|file| self.load_file(file))).await;

        let mut summary = DiscoverySummary {
            matched: files.len(),
            ..Default::default()
        };
        for (file, result) in files.into_iter().zip(results) {
            match result {
                Ok(LoadOutcome::Loaded(_)) => summary.loaded += 1,
                Ok(LoadOutcome::Skipped) => summary.skipped += 1,
                Err(_) => summary.failed.push(file),
            }
        }
        summary.items = self.items.read().await.len();

        Ok(summary)
    }

    // ========================================================================
    // Runs
    // ========================================================================

    fn resolve_ids(items: &TestItemCollection, ids: &[String]) -> Vec<String> {
        let mut out: Vec<String> = Vec::with_capacity(ids.len());
        for id in ids {
            let runnable = items.runnable_id(id);
            if !out.iter().any(|existing| existing == runnable) {
                out.push(runnable.to_string());
            }
        }
        out
    }

    /// Run the requested items and project the results.
    ///
    /// Cancelling `token` aborts the session. An aborted run whose report
    /// cannot be parsed yields an empty report marked aborted.
    pub async fn run(&self, request: RunRequest, token: CancellationToken) -> AppResult<RunReport> {
        let options = {
            let items = self.items.read().await;
            StartOptions {
                include: Self::resolve_ids(&items, &request.include),
                exclude: Self::resolve_ids(&items, &request.exclude),
                mode: request.mode,
            }
        };

        let handle = self.sessions.start(&self.workspace, options).await?;
        let abort = handle.abort_handle();

        let result = handle.result();
        tokio::pin!(result);

        let parsed = tokio::select! {
            parsed = &mut result => parsed,
            _ = token.cancelled() => {
                abort.abort();
                result.await
            }
        };

        let aborted = abort.is_aborted();
        let tree = match parsed {
            Ok(tree) => tree,
            Err(e) if aborted => {
                warn!("Aborted run left no usable report: {}", e);
                return Ok(TestRun::new().finish(true));
            }
            Err(e) => {
                error!("Could not parse run results: {}", e);
                return Err(e.into());
            }
        };

        let items = self.items.read().await;
        let mut run = TestRun::new();
        project(&tree, &items, &self.patterns, self.settings.discover_steps, &mut run);

        let report = run.finish(aborted);
        info!(
            "Run finished: {} passed, {} failed, {} skipped",
            report.counts.passed, report.counts.failed, report.counts.skipped
        );
        Ok(report)
    }

    // ========================================================================
    // Editor features
    // ========================================================================

    /// Definition of the step on a zero-based line.
    pub async fn find_definition(&self, path: &Path, line: u32) -> AppResult<Option<DefinitionLocation>> {
        if let Some(found) = self.definitions.read().await.get(path, line) {
            return Ok(Some(found.clone()));
        }

        let tree = self
            .analyzer
            .analyze(path, &self.workspace, AnalyzeOptions::default())
            .await?;

        let found = definition_at(&tree, line);
        if let Some(ref definition) = found {
            self.definitions.write().await.insert(path, line, definition.clone());
        }
        Ok(found)
    }

    /// Outline groups of a file (empty when code lenses are disabled).
    pub async fn outline_groups(&self, path: &Path) -> AppResult<Vec<OutlineGroup>> {
        if !self.settings.code_lens {
            return Ok(Vec::new());
        }

        let tree = self
            .analyzer
            .analyze(path, &self.workspace, AnalyzeOptions::default())
            .await?;
        Ok(outline_groups(&tree))
    }

    /// Remove all cached reports and forget everything discovered.
    pub async fn clear_cache(&self) -> AppResult<()> {
        self.analyzer.cache().clear().await?;
        self.items.write().await.clear();
        self.loaded.write().await.clear();
        self.definitions.write().await.clear();

        info!("Cache cleared");
        Ok(())
    }
}
