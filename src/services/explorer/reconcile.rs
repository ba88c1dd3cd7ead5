//! Test-tree reconciliation
//!
//! Mirrors a parsed tree into the item collection, parent before children.

use behave_explorer_core::{traverse, Node};
use serde::Serialize;

use super::collection::TestItemCollection;
use crate::models::test_item::TestItem;

/// What a reconcile pass did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileOutcome {
    /// Ids of the top-level items of the tree
    pub roots: Vec<String>,
    /// Items created or modified
    pub changed: usize,
}

/// Create or update an item for every node of `tree`.
///
/// Steps only become items when `discover_steps` is set. Running this twice
/// with the same tree leaves the collection untouched the second time.
pub fn reconcile(tree: &[Node], collection: &mut TestItemCollection, discover_steps: bool) -> ReconcileOutcome {
    let mut changed = 0;

    let roots = traverse(tree, |node, parent: Option<&String>| {
        if node.is_step() && !discover_steps {
            return None;
        }

        let item = TestItem::from_node(node);
        let id = item.id.clone();
        if collection.upsert(item, parent.map(String::as_str)) {
            changed += 1;
        }
        Some(id)
    });

    tracing::debug!("Reconciled {} root item(s), {} changed", roots.len(), changed);

    ReconcileOutcome { roots, changed }
}
