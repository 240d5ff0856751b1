pub mod completions;
pub mod cycles;
pub mod edges;
pub mod find;
pub mod nodes;
pub mod order;
pub mod paths;
pub mod prune;
pub mod remove;
pub mod tree;
pub mod up;

use depgraph_core::Graph;

use crate::manifest::DepGraph;

/// Command-level failures that are not graph or manifest errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("node '{node}' is not declared in the manifest")]
    UnknownNode { node: String },
}

impl CommandError {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::UnknownNode { .. } => "E2002",
        }
    }

    /// Remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> &'static str {
        match self {
            Self::UnknownNode { .. } => "Run `dg nodes` to list the declared nodes.",
        }
    }
}

/// Fail with [`CommandError::UnknownNode`] unless `node` is in the graph.
pub fn require_node(graph: &DepGraph, node: &str) -> Result<(), CommandError> {
    if graph.contains(&node.to_string()) {
        Ok(())
    } else {
        Err(CommandError::UnknownNode {
            node: node.to_string(),
        })
    }
}
