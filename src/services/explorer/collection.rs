//! Test Item Collection
//!
//! Persistent tree of test items keyed by bare location. Items are created or
//! updated in place so an id keeps its identity across re-analysis; they are
//! only removed explicitly.

use std::collections::HashMap;
use std::path::Path;

use crate::models::test_item::{ItemKind, TestItem};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestItemCollection {
    items: HashMap<String, TestItem>,
    roots: Vec<String>,
}

impl TestItemCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TestItem> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Top-level items in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &TestItem> {
        self.roots.iter().filter_map(|id| self.items.get(id))
    }

    pub fn children(&self, id: &str) -> Vec<&TestItem> {
        self.items
            .get(id)
            .map(|item| item.children.iter().filter_map(|c| self.items.get(c)).collect())
            .unwrap_or_default()
    }

    /// Every item, parents before children, roots in insertion order.
    pub fn walk(&self) -> Vec<&TestItem> {
        let mut out = Vec::with_capacity(self.items.len());
        let mut stack: Vec<&str> = self.roots.iter().rev().map(String::as_str).collect();

        while let Some(id) = stack.pop() {
            if let Some(item) = self.items.get(id) {
                out.push(item);
                stack.extend(item.children.iter().rev().map(String::as_str));
            }
        }
        out
    }

    /// Items whose source file is `path`, in walk order.
    pub fn items_for_path(&self, path: &Path) -> Vec<&TestItem> {
        self.walk().into_iter().filter(|item| item.path == path).collect()
    }

    /// Id to pass to the runner for an item: steps run through their scenario.
    pub fn runnable_id<'a>(&'a self, id: &'a str) -> &'a str {
        match self.items.get(id) {
            Some(item) if item.kind == ItemKind::Step => item.parent.as_deref().unwrap_or(id),
            _ => id,
        }
    }

    /// Create or update an item under `parent`. Returns true if anything changed.
    ///
    /// The children of an existing item are kept. An item seen under a new
    /// parent moves there.
    pub fn upsert(&mut self, item: TestItem, parent: Option<&str>) -> bool {
        let id = item.id.clone();
        let parent = parent.map(str::to_string);
        let mut changed = false;

        match self.items.get_mut(&id) {
            Some(existing) => {
                if existing.label != item.label
                    || existing.path != item.path
                    || existing.range != item.range
                    || existing.tags != item.tags
                    || existing.kind != item.kind
                {
                    existing.label = item.label;
                    existing.path = item.path;
                    existing.range = item.range;
                    existing.tags = item.tags;
                    existing.kind = item.kind;
                    changed = true;
                }

                if existing.parent != parent {
                    let previous = std::mem::replace(&mut existing.parent, parent.clone());
                    self.detach(&id, previous.as_deref());
                    changed = true;
                }
            }
            None => {
                self.items.insert(
                    id.clone(),
                    TestItem {
                        parent: parent.clone(),
                        children: Vec::new(),
                        ..item
                    },
                );
                changed = true;
            }
        }

        self.attach(&id, parent.as_deref()) || changed
    }

    fn siblings_mut(&mut self, parent: Option<&str>) -> &mut Vec<String> {
        match parent.and_then(|p| self.items.get_mut(p)) {
            Some(parent) => &mut parent.children,
            None => &mut self.roots,
        }
    }

    fn attach(&mut self, id: &str, parent: Option<&str>) -> bool {
        let siblings = self.siblings_mut(parent);
        if siblings.iter().any(|s| s == id) {
            return false;
        }
        siblings.push(id.to_string());
        true
    }

    fn detach(&mut self, id: &str, parent: Option<&str>) {
        self.siblings_mut(parent).retain(|s| s != id);
    }

    /// Remove an item and all its descendants. Returns how many were removed.
    pub fn remove_subtree(&mut self, id: &str) -> usize {
        let parent = match self.items.get(id) {
            Some(item) => item.parent.clone(),
            None => return 0,
        };
        self.detach(id, parent.as_deref());

        let mut removed = 0;
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            if let Some(item) = self.items.remove(&current) {
                removed += 1;
                stack.extend(item.children);
            }
        }
        removed
    }

    /// Remove every item whose source path starts with `prefix`.
    pub fn remove_matching(&mut self, prefix: &Path) -> usize {
        let ids: Vec<String> = self
            .items
            .values()
            .filter(|item| item.path.starts_with(prefix))
            .map(|item| item.id.clone())
            .collect();

        ids.iter().map(|id| self.remove_subtree(id)).sum()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.roots.clear();
    }
}
