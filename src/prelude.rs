//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types and traits from the bunki crate.
//! Import this module to get access to the core functionality without having
//! to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use bunki::prelude::*;
//!
//! # fn run_example(store: Arc<dyn TemplateStore>) -> Result<(), GraphError> {
//! let mut graph = Graph::builder(TreeId::fresh(), store).build()?;
//! let decision = graph.add_decision_node();
//! graph.update_branches(decision, vec!["hot".to_string(), "cold".to_string()]);
//! # Ok(())
//! # }
//! ```

// The aggregate and its derived state
pub use crate::graph::{ErrorReport, Extent, Graph, GraphBuilder};

// Data model
pub use crate::tree::{Branches, EdgeId, Node, NodeId, Tree, TreeId, TreeTemplate};

// Derived edges and geometry
pub use crate::edges::EdgeItem;
pub use crate::geometry::{EdgeGeometry, NodeBox, Point};

// Collaborator ports
pub use crate::ports::{
    Catalog, EmptyCatalog, MeasurePort, TemplateStore, ThreadTimer, TimerHandle, TimerPort,
    Unmeasured,
};

// Error types
pub use crate::error::{GraphError, ImportError};

// Standard library re-exports commonly used with this crate
pub use std::sync::Arc;
pub use std::time::Duration;
