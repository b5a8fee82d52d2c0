//! The graph aggregate: owns the tree, its derived edges, and the
//! write -> validate -> commit -> persist lifecycle around every mutation.

mod lifecycle;

use crate::edges::{self, EdgeItem};
use crate::error::GraphError;
use crate::geometry::{self, Point};
use crate::ports::{
    Catalog, EmptyCatalog, MeasurePort, TemplateStore, ThreadTimer, TimerHandle, TimerPort,
    Unmeasured,
};
use crate::tree::{Branches, Node, NodeId, Tree, TreeId, TreeTemplate};
use std::sync::Arc;
use std::time::Duration;

/// Cycle report, stored as data and surfaced for the UI to render as a
/// warning; editing remains possible while loops exist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorReport {
    /// One entry per detected cycle, each ending with the repeated id.
    pub loops: Vec<Vec<NodeId>>,
}

/// Width and height of the surface needed to fit every measurable node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

/// Surface margin added around the outermost measured node extents.
const SIZE_MARGIN: f64 = 200.0;

/// Quiet period between the last commit and the persist call.
const QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Branch labels of a freshly created decision node; both start dangling.
const DEFAULT_BRANCH_LABELS: [&str; 2] = ["<1>", "<2>"];

/// An editable, visually-laid-out decision tree.
///
/// Constructed by loading a named tree through the store port and mutated
/// exclusively through the operations below. The edge collection and the
/// error report are derived state: always re-computable from the nodes,
/// never independently authoritative.
pub struct Graph {
    id: TreeId,
    name: String,
    nodes: Tree,
    edges: Vec<EdgeItem>,
    errors: ErrorReport,
    measure: Box<dyn MeasurePort>,
    store: Arc<dyn TemplateStore>,
    catalog: Box<dyn Catalog>,
    timer: Box<dyn TimerPort>,
    quiet_period: Duration,
    pending_persist: Option<TimerHandle>,
}

/// Configures and loads a [`Graph`].
pub struct GraphBuilder {
    id: TreeId,
    store: Arc<dyn TemplateStore>,
    measure: Box<dyn MeasurePort>,
    catalog: Box<dyn Catalog>,
    timer: Box<dyn TimerPort>,
    quiet_period: Duration,
}

impl GraphBuilder {
    pub fn new(id: TreeId, store: Arc<dyn TemplateStore>) -> Self {
        Self {
            id,
            store,
            measure: Box::new(Unmeasured),
            catalog: Box::new(EmptyCatalog),
            timer: Box::new(ThreadTimer),
            quiet_period: QUIET_PERIOD,
        }
    }

    pub fn with_measure(mut self, measure: impl MeasurePort + 'static) -> Self {
        self.measure = Box::new(measure);
        self
    }

    pub fn with_catalog(mut self, catalog: impl Catalog + 'static) -> Self {
        self.catalog = Box::new(catalog);
        self
    }

    pub fn with_timer(mut self, timer: impl TimerPort + 'static) -> Self {
        self.timer = Box::new(timer);
        self
    }

    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period = quiet_period;
        self
    }

    /// Loads the tree and derives its initial edge and error state.
    ///
    /// The first rebuild is best effort: nodes the measurement port cannot
    /// supply boxes for yet contribute no edges until a later full rebuild.
    pub fn build(self) -> Result<Graph, GraphError> {
        let template = self
            .store
            .load(self.id)
            .ok_or(GraphError::UnknownTree(self.id))?;

        let mut graph = Graph {
            id: self.id,
            name: template.name,
            nodes: template.tree,
            edges: Vec::new(),
            errors: ErrorReport::default(),
            measure: self.measure,
            store: self.store,
            catalog: self.catalog,
            timer: self.timer,
            quiet_period: self.quiet_period,
            pending_persist: None,
        };
        graph.rebuild_edges(None);
        graph.refresh_errors();
        Ok(graph)
    }
}

impl Graph {
    pub fn builder(id: TreeId, store: Arc<dyn TemplateStore>) -> GraphBuilder {
        GraphBuilder::new(id, store)
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nodes(&self) -> &Tree {
        &self.nodes
    }

    /// The derived edge collection; index 0 is always the dummy edge.
    pub fn edges(&self) -> &[EdgeItem] {
        &self.edges
    }

    pub fn errors(&self) -> &ErrorReport {
        &self.errors
    }

    pub fn find_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id() == id)
    }

    /// Snapshot in the canonical persisted form.
    pub fn template(&self) -> TreeTemplate {
        TreeTemplate {
            id: self.id,
            name: self.name.clone(),
            tree: self.nodes.clone(),
        }
    }

    /// Pretty-printed canonical JSON of the current state.
    pub fn export(&self) -> serde_json::Result<String> {
        self.template().to_json()
    }

    /// Appends a decision node at the origin with two dangling branches and
    /// the catalog's default test.
    pub fn add_decision_node(&mut self) -> NodeId {
        let test = self
            .catalog
            .decision_tests()
            .first()
            .cloned()
            .unwrap_or_default();

        self.apply(|graph| {
            let id = NodeId::fresh();
            let mut next = Branches::new();
            for label in DEFAULT_BRANCH_LABELS {
                next.insert(label, None);
            }
            graph.nodes.push(Node::Decision {
                id,
                x: 0.0,
                y: 0.0,
                test,
                next,
            });
            graph.rebuild_edges(Some(id));
            id
        })
    }

    /// Appends an action node at the origin with the catalog's default
    /// command.
    pub fn add_action_node(&mut self) -> NodeId {
        let command = self
            .catalog
            .action_commands()
            .first()
            .cloned()
            .unwrap_or_default();

        self.apply(|graph| {
            let id = NodeId::fresh();
            graph.nodes.push(Node::Action {
                id,
                x: 0.0,
                y: 0.0,
                command,
            });
            graph.rebuild_edges(Some(id));
            id
        })
    }

    /// Removes a node. Every branch targeting it goes dangling with its
    /// label retained, so deleting a target never changes branch
    /// cardinality.
    pub fn delete_node(&mut self, id: NodeId) {
        self.apply(|graph| {
            for node in &mut graph.nodes {
                if let Some(branches) = node.branches_mut() {
                    branches.disconnect(id);
                }
            }
            graph.nodes.retain(|node| node.id() != id);
            graph.rebuild_edges(Some(id));
        });
    }

    /// Signals that `id`'s fields changed out of band: recomputes the edges
    /// touching it and commits.
    pub fn update_node(&mut self, id: NodeId) {
        self.apply(|graph| graph.rebuild_edges(Some(id)));
    }

    /// Full unscoped rebuild, for after a global layout pass.
    pub fn update_nodes(&mut self) {
        self.apply(|graph| graph.rebuild_edges(None));
    }

    /// Moves a node to a new logical position.
    pub fn move_node(&mut self, id: NodeId, x: f64, y: f64) {
        self.apply(|graph| {
            if let Some(node) = graph.node_mut(id) {
                node.set_position(x, y);
            }
            graph.rebuild_edges(Some(id));
        });
    }

    /// Replaces a decision node's test; a no-op on other variants.
    pub fn set_decision_test(&mut self, id: NodeId, test: impl Into<String>) {
        let test = test.into();
        self.apply(|graph| {
            if let Some(Node::Decision { test: slot, .. }) = graph.node_mut(id) {
                *slot = test;
            }
            graph.rebuild_edges(Some(id));
        });
    }

    /// Replaces an action node's command; a no-op on other variants.
    pub fn set_action_command(&mut self, id: NodeId, command: impl Into<String>) {
        let command = command.into();
        self.apply(|graph| {
            if let Some(Node::Action { command: slot, .. }) = graph.node_mut(id) {
                *slot = command;
            }
            graph.rebuild_edges(Some(id));
        });
    }

    /// Wires branch `label` of `from` to `target`, or back to dangling.
    pub fn connect_branch(&mut self, from: NodeId, label: &str, target: Option<NodeId>) {
        self.apply(|graph| {
            if let Some(branches) = graph.node_mut(from).and_then(Node::branches_mut) {
                branches.set_target(label, target);
            }
            graph.rebuild_edges(Some(from));
        });
    }

    /// Rebuilds a node's branch mapping around `labels`, keeping targets by
    /// position: renames preserve wiring when counts match, shrinking drops
    /// the tail connections, growing adds dangling branches.
    pub fn update_branches(&mut self, id: NodeId, labels: Vec<String>) {
        self.apply(|graph| {
            if let Some(branches) = graph.node_mut(id).and_then(Node::branches_mut) {
                let rewired = branches.rewired(labels);
                *branches = rewired;
            }
            graph.rebuild_edges(Some(id));
        });
    }

    /// Recomputes only the dummy edge slot, from the branch anchor of
    /// (`from`, `key`) to the live pointer position.
    ///
    /// Pointer coordinates arrive in viewport space; the measured box origin
    /// translates them into logical space. Persisted edges are untouched.
    pub fn update_dummy_edge(&mut self, from: NodeId, key: &str, pointer_x: f64, pointer_y: f64) {
        self.apply(|graph| {
            let Some(node) = graph.find_node(from) else {
                return;
            };
            let Some(branches) = node.branches() else {
                return;
            };
            let Some(slot) = branches.index_of(key) else {
                return;
            };
            let count = branches.len();
            let origin = Point::from(node.position());

            let Some(node_box) = graph.measure.measure(from) else {
                return;
            };

            let source = geometry::anchor_from_branch(origin, &node_box, slot, count);
            let target = Point {
                x: pointer_x - node_box.x + origin.x,
                y: pointer_y - node_box.y + origin.y,
            };
            let line = geometry::edge_geometry(source, target);

            if let Some(dummy) = graph.edges.first_mut() {
                dummy.length = line.length;
                dummy.x = source.x;
                dummy.y = source.y;
                dummy.rotation = line.rotation;
            }
        });
    }

    /// Bounding box over every node's logical position plus measured
    /// extent, with a fixed margin per axis. Nodes without a box contribute
    /// nothing, so an unmeasured tree yields the bare margin.
    pub fn size(&self) -> Extent {
        let mut width: f64 = 0.0;
        let mut height: f64 = 0.0;

        for node in &self.nodes {
            if let Some(node_box) = self.measure.measure(node.id()) {
                let (x, y) = node.position();
                width = width.max(x + node_box.width);
                height = height.max(y + node_box.height);
            }
        }

        Extent {
            width: width + SIZE_MARGIN,
            height: height + SIZE_MARGIN,
        }
    }

    /// Wholesale swap of name and node list, for after an external import.
    ///
    /// Deliberately does not rebuild, validate, or persist: the caller
    /// decides when to [`commit`](Graph::commit).
    pub fn replace(&mut self, template: TreeTemplate) {
        self.name = template.name;
        self.nodes = template.tree;
    }

    /// Renames the tree.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.apply(|graph| graph.name = name);
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id() == id)
    }

    /// Swaps in a freshly synchronized edge collection.
    fn rebuild_edges(&mut self, changed: Option<NodeId>) {
        let next = edges::rebuild(&self.nodes, &self.edges, self.measure.as_ref(), changed);
        self.edges = next;
    }
}
