//! Outline groups
//!
//! Consecutive outline example scenarios are offered as one launchable group.

use behave_explorer_core::{Node, Nodes};

use crate::models::response::OutlineGroup;

/// Group outline scenarios whose lines are at most one apart.
///
/// A group is displayed two lines above its first scenario (the examples
/// header), clamped to the first line.
pub fn outline_groups(tree: &[Node]) -> Vec<OutlineGroup> {
    let mut groups: Vec<Vec<&Node>> = Vec::new();
    let mut previous: Option<u32> = None;

    for node in Nodes::new(tree).filter(|node| node.is_outline()) {
        let line = node.location.line;
        let starts_group = match previous {
            Some(prev) => line.saturating_sub(prev) > 1,
            None => true,
        };

        if starts_group {
            groups.push(Vec::new());
        }
        previous = Some(line);

        if let Some(group) = groups.last_mut() {
            group.push(node);
        }
    }

    groups
        .into_iter()
        .filter_map(|scenarios| {
            let first = scenarios.first()?;
            Some(OutlineGroup {
                line: first.location.line.saturating_sub(2),
                include: scenarios.iter().map(|s| s.location.bare.clone()).collect(),
            })
        })
        .collect()
}
