//! Error type shared by every graph operation that can fail.

/// Errors raised by traversal-family operations.
///
/// Node values are rendered with their `Debug` form so the error type stays
/// independent of the graph's generic parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A node was reached again while it was still on the active DFS path.
    #[error("encountered the graph node [{node}] twice; the graph has a cycle")]
    Cyclic { node: String },

    /// The traversal root is not a member of the graph.
    #[error("invalid root value [{node}] to start the traversal from")]
    InvalidRoot { node: String },
}

impl GraphError {
    pub(crate) fn cyclic(node: &impl std::fmt::Debug) -> Self {
        Self::Cyclic {
            node: format!("{node:?}"),
        }
    }

    pub(crate) fn invalid_root(node: &impl std::fmt::Debug) -> Self {
        Self::InvalidRoot {
            node: format!("{node:?}"),
        }
    }

    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidRoot { .. } => "E2001",
            Self::Cyclic { .. } => "E2003",
        }
    }

    /// Optional remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Cyclic { .. } => {
                Some("Remove or redirect one dependency edge on the cycle and retry.")
            }
            Self::InvalidRoot { .. } => None,
        }
    }

    /// Rendered value of the node the error refers to.
    #[must_use]
    pub fn node(&self) -> &str {
        match self {
            Self::Cyclic { node } | Self::InvalidRoot { node } => node,
        }
    }
}
