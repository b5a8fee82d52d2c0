use super::{Node, Tree, TreeId};
use crate::error::ImportError;
use serde::{Deserialize, Serialize};

/// Canonical serialized form of a tree: what the store persists and loads,
/// and what import/export exchange with the outside world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeTemplate {
    pub id: TreeId,
    pub name: String,
    pub tree: Tree,
}

impl TreeTemplate {
    /// Pretty-printed canonical JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// The import boundary: any parse or validation failure is logged and
    /// collapses to `None`. No parse error escapes past this point.
    pub fn from_json(json: &str) -> Option<Self> {
        match Self::parse_json(json) {
            Ok(template) => Some(template),
            Err(err) => {
                log::warn!("rejected tree template import: {err}");
                None
            }
        }
    }

    /// Typed parse and structural validation of an arbitrary payload.
    pub fn parse_json(json: &str) -> Result<Self, ImportError> {
        let template: TreeTemplate =
            serde_json::from_str(json).map_err(|err| ImportError::JsonParse(err.to_string()))?;

        let starts = template
            .tree
            .iter()
            .filter(|node| matches!(node, Node::Start { .. }))
            .count();
        if starts != 1 {
            return Err(ImportError::StartCount { found: starts });
        }

        Ok(template)
    }
}
