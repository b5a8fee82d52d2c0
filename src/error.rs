use crate::tree::TreeId;
use thiserror::Error;

/// Errors raised while constructing a graph aggregate.
///
/// Editing itself never fails: cycles are reported as data, dangling branch
/// targets are a normal state, and missing measurements skip edges instead
/// of erroring.
#[derive(Error, Debug, Clone)]
pub enum GraphError {
    #[error("no stored tree with id '{0}'")]
    UnknownTree(TreeId),
}

/// Errors behind the import boundary. Callers of
/// [`TreeTemplate::from_json`](crate::tree::TreeTemplate::from_json) only
/// ever observe `None`; the typed variant feeds the log line.
#[derive(Error, Debug, Clone)]
pub enum ImportError {
    #[error("failed to parse template JSON: {0}")]
    JsonParse(String),

    #[error("expected exactly one start node, found {found}")]
    StartCount { found: usize },
}
