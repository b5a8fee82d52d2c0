//! Cycle detection over the decision/start subgraph.

use crate::tree::{Node, NodeId, Tree};
use ahash::AHashMap;

/// Finds every cycle reachable from the start node, in discovery order.
///
/// Traversal follows branches of decision-like nodes only; action nodes,
/// dangling targets, and unknown ids end a branch silently. The visited path
/// is local to each branch (duplicated at every fan-out), so independent
/// cycles sharing a prefix are each reported once at the point they close.
///
/// A reported cycle starts at the first occurrence of the repeated id and
/// ends with that id appended once more: `start -> A, A -> A` reports
/// `[A, A]`, and the start id only appears when the start node itself
/// repeats.
pub fn find_loops(tree: &Tree) -> Vec<Vec<NodeId>> {
    let index: AHashMap<NodeId, &Node> = tree.iter().map(|node| (node.id(), node)).collect();
    let mut loops = Vec::new();

    if let Some(start) = tree.iter().find(|node| matches!(node, Node::Start { .. })) {
        visit(&index, Some(start.id()), Vec::new(), &mut loops);
    }

    loops
}

fn visit(
    index: &AHashMap<NodeId, &Node>,
    target: Option<NodeId>,
    mut path: Vec<NodeId>,
    loops: &mut Vec<Vec<NodeId>>,
) {
    // dangling branch
    let Some(id) = target else { return };
    // stale reference
    let Some(node) = index.get(&id) else { return };
    // action nodes are terminal
    let Some(branches) = node.branches() else { return };

    if let Some(first_seen) = path.iter().position(|seen| *seen == id) {
        let mut cycle = path.split_off(first_seen);
        cycle.push(id);
        loops.push(cycle);
        return;
    }

    path.push(id);
    for (_, next) in branches.iter() {
        visit(index, next, path.clone(), loops);
    }
}
