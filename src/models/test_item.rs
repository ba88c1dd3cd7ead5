//! Test Item Models
//!
//! Host-side test items, keyed by the bare location of the node they mirror.

use std::path::PathBuf;

use behave_explorer_core::{Node, NodeKind};
use serde::{Deserialize, Serialize};

/// Which kind of result node an item mirrors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Container,
    Scenario,
    Step,
}

impl From<&NodeKind> for ItemKind {
    fn from(kind: &NodeKind) -> Self {
        match kind {
            NodeKind::Container(_) => ItemKind::Container,
            NodeKind::Scenario(_) => ItemKind::Scenario,
            NodeKind::Step(_) => ItemKind::Step,
        }
    }
}

/// Zero-based source range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    /// Range covering one line
    pub fn line(line: u32) -> Self {
        Self {
            start: line,
            end: line.saturating_add(1),
        }
    }
}

/// A discovered test item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestItem {
    /// Bare location, stable across re-analysis
    pub id: String,
    pub label: String,
    /// Absolute path of the source file
    pub path: PathBuf,
    pub range: LineRange,
    /// Runner tags followed by the node keyword
    pub tags: Vec<String>,
    pub kind: ItemKind,
    pub parent: Option<String>,
    /// Child ids in discovery order
    pub children: Vec<String>,
}

impl TestItem {
    /// Item describing a result node (no parent or children yet)
    pub fn from_node(node: &Node) -> Self {
        let mut tags = node.tags().to_vec();
        tags.push(node.keyword.clone());

        Self {
            id: node.location.bare.clone(),
            label: node.name.clone(),
            path: node.location.full.clone(),
            range: LineRange::line(node.location.line),
            tags,
            kind: ItemKind::from(&node.kind),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}
