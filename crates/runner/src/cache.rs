//! Result Cache
//!
//! Report files live under `<temp>/behave-explorer/<base64url(workspace)>/`,
//! one file per identifier, named `base64url(identifier)`. Analysis entries are
//! keyed by source path and persist across calls; run entries use a random
//! identifier and are removed when their `ScopedEntry` is dropped.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use behave_explorer_core::CoreResult;
use tracing::{debug, warn};
use uuid::Uuid;

/// Directory name under the system temp dir
pub const CACHE_DIR_NAME: &str = "behave-explorer";

/// Filesystem-safe encoding of an identifier.
pub fn encode(value: &str) -> String {
    URL_SAFE_NO_PAD.encode(value)
}

/// Outcome of looking up an analysis entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// The entry exists and is at least as new as its source
    Fresh(PathBuf),
    /// The entry is missing, older than its source, or could not be stat'ed
    Stale(PathBuf),
}

impl CacheLookup {
    pub fn is_fresh(&self) -> bool {
        matches!(self, CacheLookup::Fresh(_))
    }

    pub fn path(&self) -> &Path {
        match self {
            CacheLookup::Fresh(path) | CacheLookup::Stale(path) => path,
        }
    }
}

/// Workspace-partitioned store of runner reports
#[derive(Debug, Clone)]
pub struct ResultCache {
    root: PathBuf,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCache {
    /// Cache rooted in the system temp directory.
    pub fn new() -> Self {
        Self::with_root(std::env::temp_dir().join(CACHE_DIR_NAME))
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding a workspace's entries, created if missing.
    pub async fn resolve_path(&self, workspace: &Path) -> CoreResult<PathBuf> {
        let dir = self.root.join(encode(&workspace.to_string_lossy()));
        tokio::fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Entry path for an identifier. Deterministic for a given workspace.
    pub async fn entry_for(&self, identifier: &str, workspace: &Path) -> CoreResult<PathBuf> {
        Ok(self.resolve_path(workspace).await?.join(encode(identifier)))
    }

    /// Look up the analysis entry for a source file.
    pub async fn lookup(&self, source: &Path, workspace: &Path) -> CoreResult<CacheLookup> {
        let entry = self.entry_for(&source.to_string_lossy(), workspace).await?;

        if check_fresh(source, &entry).await {
            Ok(CacheLookup::Fresh(entry))
        } else {
            Ok(CacheLookup::Stale(entry))
        }
    }

    /// Fresh entry for a single run, removed when the guard drops.
    pub async fn scoped_entry(&self, workspace: &Path) -> CoreResult<ScopedEntry> {
        let identifier = Uuid::new_v4().to_string();
        let path = self.entry_for(&identifier, workspace).await?;
        Ok(ScopedEntry::new(path))
    }

    /// Remove every entry of every workspace.
    pub async fn clear(&self) -> CoreResult<()> {
        match tokio::fs::remove_dir_all(&self.root).await {
            Ok(()) => {
                debug!("Cleared result cache at {}", self.root.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

async fn modified(path: &Path) -> std::io::Result<SystemTime> {
    tokio::fs::metadata(path).await?.modified()
}

/// True iff both files exist and the entry is not older than the source.
///
/// Any stat failure counts as stale.
pub async fn check_fresh(source: &Path, entry: &Path) -> bool {
    let (source_time, entry_time) = match (modified(source).await, modified(entry).await) {
        (Ok(s), Ok(c)) => (s, c),
        _ => return false,
    };

    entry_time >= source_time
}

// ============================================================================
// Scoped entries
// ============================================================================

/// Cache entry owned by one operation. Dropping it deletes the file.
#[derive(Debug)]
pub struct ScopedEntry {
    path: PathBuf,
    armed: bool,
}

impl ScopedEntry {
    pub fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keep the file on disk and return its path.
    pub fn persist(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }

    /// Delete the file now.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for ScopedEntry {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed cache entry {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove cache entry {}: {}", self.path.display(), e),
        }
    }
}
