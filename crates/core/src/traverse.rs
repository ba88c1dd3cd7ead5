//! Tree Traversal
//!
//! Depth-first visiting with an accumulator threaded from parent to children,
//! and lazy iterators over all nodes or only the steps of a tree.

use std::slice;

use crate::model::Node;

/// Visit every node depth-first, parent before children.
///
/// The visitor receives the accumulator its parent produced (`None` for
/// top-level nodes or when the parent produced none) and returns the
/// accumulator handed to its own children. The accumulators produced for the
/// top-level nodes are returned in order, skipping `None`s.
pub fn traverse<A, F>(tree: &[Node], mut visitor: F) -> Vec<A>
where
    F: FnMut(&Node, Option<&A>) -> Option<A>,
{
    fn visit<A, F>(node: &Node, parent: Option<&A>, visitor: &mut F) -> Option<A>
    where
        F: FnMut(&Node, Option<&A>) -> Option<A>,
    {
        let acc = visitor(node, parent);
        for child in node.children() {
            visit(child, acc.as_ref(), visitor);
        }
        acc
    }

    tree.iter()
        .filter_map(|node| visit(node, None, &mut visitor))
        .collect()
}

/// Pre-order iterator over every node reachable from a sequence.
#[derive(Debug, Clone)]
pub struct Nodes<'a> {
    stack: Vec<slice::Iter<'a, Node>>,
}

impl<'a> Nodes<'a> {
    pub fn new(nodes: &'a [Node]) -> Self {
        Self {
            stack: vec![nodes.iter()],
        }
    }

    /// Iterate a single node and its descendants.
    pub fn from_node(node: &'a Node) -> Self {
        Self::new(slice::from_ref(node))
    }
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(node) => {
                    let children = node.children();
                    if !children.is_empty() {
                        self.stack.push(children.iter());
                    }
                    return Some(node);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Iterator over the steps reachable from a sequence, skipping containers and
/// scenarios. Cloning yields an independent iterator from the same position.
#[derive(Debug, Clone)]
pub struct Leaves<'a> {
    nodes: Nodes<'a>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        self.nodes.by_ref().find(|node| node.is_step())
    }
}

/// Steps reachable from a sequence of nodes.
pub fn iterate_leaves(nodes: &[Node]) -> Leaves<'_> {
    Leaves {
        nodes: Nodes::new(nodes),
    }
}

/// Steps reachable from one node (the node itself if it is a step).
pub fn node_leaves(node: &Node) -> Leaves<'_> {
    Leaves {
        nodes: Nodes::from_node(node),
    }
}
