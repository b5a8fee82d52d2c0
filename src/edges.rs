//! The derived edge collection and its synchronizer.
//!
//! Edges are never hand-authored: they are rebuilt from the tree whenever a
//! mutation lands, reusing untouched edges by stable identity so unrelated
//! geometry is neither recomputed nor re-identified.

use crate::geometry::{self, NodeBox};
use crate::ports::MeasurePort;
use crate::tree::{EdgeId, Node, NodeId, Tree};
use ahash::AHashMap;

/// A rendered connection from a branch anchor to a target node's top anchor,
/// or the reserved dummy slot at index 0.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeItem {
    pub id: EdgeId,
    pub from: Option<NodeId>,
    pub to: Option<NodeId>,
    /// Branch label on the source node.
    pub key: String,
    pub length: f64,
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
}

impl EdgeItem {
    /// The reserved slot-0 edge: zeroed geometry, unset endpoints. It is the
    /// only edge whose endpoints may be empty; interactive drags overwrite
    /// its geometry in place.
    pub fn dummy() -> Self {
        Self {
            id: EdgeId::fresh(),
            from: None,
            to: None,
            key: String::new(),
            length: 0.0,
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
        }
    }
}

/// Measurement results memoized for one rebuild, so each node is queried at
/// most once however many branches touch it.
struct BoxCache<'a> {
    port: &'a dyn MeasurePort,
    boxes: AHashMap<NodeId, Option<NodeBox>>,
}

impl<'a> BoxCache<'a> {
    fn new(port: &'a dyn MeasurePort) -> Self {
        Self {
            port,
            boxes: AHashMap::new(),
        }
    }

    fn get(&mut self, id: NodeId) -> Option<NodeBox> {
        let port = self.port;
        *self.boxes.entry(id).or_insert_with(|| port.measure(id))
    }
}

/// Rebuilds the edge collection from `tree`.
///
/// With a `changed` node id, edges touching neither endpoint are reused
/// verbatim from `previous` (same id, same cached geometry); everything else
/// is recomputed from freshly measured boxes. Without one, every edge is
/// recomputed. Branches whose target is dangling or unknown produce no edge,
/// and a node whose box the measurement port cannot supply yet causes its
/// edges to be skipped this rebuild and retried on the next.
///
/// The caller swaps the returned collection in atomically; partial results
/// are never published.
pub fn rebuild(
    tree: &Tree,
    previous: &[EdgeItem],
    measure: &dyn MeasurePort,
    changed: Option<NodeId>,
) -> Vec<EdgeItem> {
    let nodes: AHashMap<NodeId, &Node> = tree.iter().map(|node| (node.id(), node)).collect();
    let reusable: AHashMap<(NodeId, String, NodeId), &EdgeItem> = previous
        .iter()
        .filter_map(|edge| match (edge.from, edge.to) {
            (Some(from), Some(to)) => Some(((from, edge.key.clone(), to), edge)),
            _ => None,
        })
        .collect();
    let mut boxes = BoxCache::new(measure);

    let mut next = vec![EdgeItem::dummy()];
    for node in tree {
        let Some(branches) = node.branches() else {
            continue;
        };
        let count = branches.len();

        for (slot, (key, target)) in branches.iter().enumerate() {
            let untouched =
                changed.is_some_and(|changed| node.id() != changed && target != Some(changed));
            if untouched {
                let stable = target
                    .and_then(|to| reusable.get(&(node.id(), key.to_owned(), to)))
                    .copied();
                if let Some(stable) = stable {
                    next.push(stable.clone());
                    continue;
                }
            }

            if let Some(edge) = compute_edge(&nodes, &mut boxes, node, slot, count, key, target) {
                next.push(edge);
            }
        }
    }

    next
}

fn compute_edge(
    nodes: &AHashMap<NodeId, &Node>,
    boxes: &mut BoxCache<'_>,
    from: &Node,
    slot: usize,
    count: usize,
    key: &str,
    target: Option<NodeId>,
) -> Option<EdgeItem> {
    let to_id = target?;
    let to = nodes.get(&to_id)?;
    let from_box = boxes.get(from.id())?;
    let to_box = boxes.get(to_id)?;

    let source = geometry::anchor_from_branch(from.position().into(), &from_box, slot, count);
    let target_point = geometry::anchor_top(to.position().into(), &to_box);
    let line = geometry::edge_geometry(source, target_point);

    Some(EdgeItem {
        id: EdgeId::fresh(),
        from: Some(from.id()),
        to: Some(to_id),
        key: key.to_owned(),
        length: line.length,
        x: source.x,
        y: source.y,
        rotation: line.rotation,
    })
}
