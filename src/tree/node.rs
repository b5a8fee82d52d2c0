use super::NodeId;
use indexmap::IndexMap;
use itertools::{EitherOrBoth, Itertools};
use serde::{Deserialize, Serialize};

/// Ordered outgoing-branch mapping of a decision-like node.
///
/// Insertion order is rendering order: a branch's position selects its
/// bottom-edge anchor slot. Labels are unique within a node. A `None` target
/// is a dangling branch, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Branches(IndexMap<String, Option<NodeId>>);

impl Branches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds a branch, or retargets an existing label in place.
    pub fn insert(&mut self, label: impl Into<String>, target: Option<NodeId>) {
        self.0.insert(label.into(), target);
    }

    /// The target of `label`, if the branch exists.
    pub fn target(&self, label: &str) -> Option<Option<NodeId>> {
        self.0.get(label).copied()
    }

    /// Points an existing branch at `target`. Returns `false` when the
    /// label is unknown.
    pub fn set_target(&mut self, label: &str, target: Option<NodeId>) -> bool {
        match self.0.get_mut(label) {
            Some(slot) => {
                *slot = target;
                true
            }
            None => false,
        }
    }

    /// Positional slot of `label`, in insertion order.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.0.get_index_of(label)
    }

    /// Clears every branch pointing at `id`, keeping the labels.
    pub fn disconnect(&mut self, id: NodeId) {
        for target in self.0.values_mut() {
            if *target == Some(id) {
                *target = None;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<NodeId>)> {
        self.0.iter().map(|(label, target)| (label.as_str(), *target))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn targets(&self) -> impl Iterator<Item = Option<NodeId>> + '_ {
        self.0.values().copied()
    }

    /// Rebuilds the mapping around `labels`: the i-th label keeps the i-th
    /// existing target, labels past the old branch count start dangling, and
    /// old branches past the new label count are dropped.
    pub fn rewired(&self, labels: Vec<String>) -> Branches {
        labels
            .into_iter()
            .zip_longest(self.targets())
            .filter_map(|pair| match pair {
                EitherOrBoth::Both(label, target) => Some((label, target)),
                EitherOrBoth::Left(label) => Some((label, None)),
                EitherOrBoth::Right(_) => None,
            })
            .collect()
    }
}

impl FromIterator<(String, Option<NodeId>)> for Branches {
    fn from_iter<I: IntoIterator<Item = (String, Option<NodeId>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A single node of the editable tree, tagged by `type` in the canonical
/// JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    /// The traversal root. Exactly one per tree; carries only its implicit
    /// branch mapping and is treated as decision-like for traversal and
    /// edge synthesis.
    Start {
        id: NodeId,
        x: f64,
        y: f64,
        next: Branches,
    },
    Decision {
        id: NodeId,
        x: f64,
        y: f64,
        test: String,
        next: Branches,
    },
    /// Terminal; no outgoing branches.
    Action {
        id: NodeId,
        x: f64,
        y: f64,
        command: String,
    },
}

impl Node {
    pub fn id(&self) -> NodeId {
        match self {
            Node::Start { id, .. } | Node::Decision { id, .. } | Node::Action { id, .. } => *id,
        }
    }

    /// Logical position in tree coordinates.
    pub fn position(&self) -> (f64, f64) {
        match self {
            Node::Start { x, y, .. } | Node::Decision { x, y, .. } | Node::Action { x, y, .. } => {
                (*x, *y)
            }
        }
    }

    pub fn set_position(&mut self, new_x: f64, new_y: f64) {
        match self {
            Node::Start { x, y, .. } | Node::Decision { x, y, .. } | Node::Action { x, y, .. } => {
                *x = new_x;
                *y = new_y;
            }
        }
    }

    /// Outgoing branches of decision-like nodes; `None` for actions.
    pub fn branches(&self) -> Option<&Branches> {
        match self {
            Node::Start { next, .. } | Node::Decision { next, .. } => Some(next),
            Node::Action { .. } => None,
        }
    }

    pub fn branches_mut(&mut self) -> Option<&mut Branches> {
        match self {
            Node::Start { next, .. } | Node::Decision { next, .. } => Some(next),
            Node::Action { .. } => None,
        }
    }
}

/// Ordered node sequence. Order is insertion/render order, never semantic;
/// lookups go by id.
pub type Tree = Vec<Node>;
