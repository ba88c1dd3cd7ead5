//! Step definition lookup

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use behave_explorer_core::{iterate_leaves, Node};

use crate::models::response::DefinitionLocation;

/// The step displayed on a zero-based line.
pub fn find_step_at(tree: &[Node], line: u32) -> Option<&Node> {
    iterate_leaves(tree).find(|step| step.location.line == line)
}

/// Definition bound to the step on `line`, if the runner matched one.
pub fn definition_at(tree: &[Node], line: u32) -> Option<DefinitionLocation> {
    let matched = find_step_at(tree, line)?.as_step()?.matched.as_ref()?;
    Some(DefinitionLocation {
        path: matched.location.full.clone(),
        line: matched.location.line,
    })
}

/// Found definitions memoised per `(file, line)`
#[derive(Debug, Default)]
pub struct DefinitionCache {
    entries: HashMap<(PathBuf, u32), DefinitionLocation>,
}

impl DefinitionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path, line: u32) -> Option<&DefinitionLocation> {
        self.entries.get(&(path.to_path_buf(), line))
    }

    pub fn insert(&mut self, path: &Path, line: u32, definition: DefinitionLocation) {
        self.entries.insert((path.to_path_buf(), line), definition);
    }

    /// Forget every entry of files under `path`.
    pub fn invalidate(&mut self, path: &Path) {
        self.entries.retain(|(file, _), _| !file.starts_with(path));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
