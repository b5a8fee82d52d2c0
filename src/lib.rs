//! # Bunki - Editable Decision-Tree Graph Model
//!
//! **Bunki** is the data model behind a visually-laid-out decision-tree
//! editor: a directed graph of typed nodes (start, decision, action) whose
//! branches are user-editable and whose rendering geometry is re-derived
//! whenever nodes move, are added, removed, or rewired.
//!
//! ## Core Workflow
//!
//! The crate owns no rendering surface and no storage. It operates against
//! injected ports and keeps three pieces of state consistent:
//!
//! 1. **Nodes**: the authoritative tree, mutated through the [`graph::Graph`]
//!    operations.
//! 2. **Edges**: a derived collection rebuilt after every mutation, reusing
//!    untouched edges by stable identity and computing geometry from
//!    externally measured boxes.
//! 3. **Errors**: the cycle report, re-checked on every commit and stored as
//!    data for the UI to surface.
//!
//! Every mutation ends in a commit, and every commit re-arms a debounce
//! timer; once edits go quiet, the final state is persisted through the
//! store port exactly once.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bunki::prelude::*;
//! use std::collections::HashMap;
//! use std::sync::Mutex;
//!
//! // 1. Provide the collaborators the model is generic over.
//! #[derive(Default)]
//! struct MemoryStore {
//!     templates: Mutex<HashMap<TreeId, TreeTemplate>>,
//! }
//!
//! impl TemplateStore for MemoryStore {
//!     fn load(&self, id: TreeId) -> Option<TreeTemplate> {
//!         self.templates.lock().unwrap().get(&id).cloned()
//!     }
//!
//!     fn persist(&self, template: &TreeTemplate) {
//!         self.templates
//!             .lock()
//!             .unwrap()
//!             .insert(template.id, template.clone());
//!     }
//! }
//!
//! // A real host reports each node's on-screen box; a fixed box works for
//! // headless use.
//! struct Screen;
//!
//! impl MeasurePort for Screen {
//!     fn measure(&self, _id: NodeId) -> Option<NodeBox> {
//!         Some(NodeBox { x: 0.0, y: 0.0, width: 160.0, height: 60.0 })
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 2. Seed the store with a tree holding its start node.
//!     let id = TreeId::fresh();
//!     let store = Arc::new(MemoryStore::default());
//!     store.persist(&TreeTemplate {
//!         id,
//!         name: "patrol".to_string(),
//!         tree: vec![Node::Start {
//!             id: NodeId::fresh(),
//!             x: 0.0,
//!             y: 0.0,
//!             next: Branches::new(),
//!         }],
//!     });
//!
//!     // 3. Load the aggregate and edit through its operations.
//!     let mut graph = Graph::builder(id, store).with_measure(Screen).build()?;
//!
//!     let decision = graph.add_decision_node();
//!     let action = graph.add_action_node();
//!     graph.connect_branch(decision, "<1>", Some(action));
//!     graph.move_node(action, 120.0, 240.0);
//!
//!     // Edges and the cycle report are derived automatically; persistence
//!     // happens on its own once the edits go quiet.
//!     assert!(graph.errors().loops.is_empty());
//!     println!("{}", graph.export()?);
//!     Ok(())
//! }
//! ```

pub mod edges;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod ports;
pub mod prelude;
pub mod tree;
pub mod validate;
