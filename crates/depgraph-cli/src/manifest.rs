//! Dependency manifest: the TOML file `dg` loads into a [`DepGraph`].
//!
//! ```toml
//! nodes = ["docs"]
//!
//! [defaults]
//! kind = "compile"
//!
//! [[edges]]
//! from = "app"
//! to = "core"
//! kind = "runtime"
//! ```
//!
//! `from → to` reads "`from` depends on `to`". Edges are inserted in file
//! order; duplicate edges collapse into one.

use std::path::Path;

use anyhow::{Context, Result};
use depgraph_core::{Graph, HashGraph};
use serde::Deserialize;
use tracing::{debug, instrument};

/// Graph shape used by every command: node names and edge kinds.
pub type DepGraph = HashGraph<String, String>;

/// Default manifest file name, resolved against the working directory.
pub const DEFAULT_MANIFEST: &str = "depgraph.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Nodes declared without any edge.
    #[serde(default)]
    pub nodes: Vec<String>,
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    /// Edge kind applied when an edge omits `kind`.
    #[serde(default = "default_kind")]
    pub kind: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            kind: default_kind(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub kind: Option<String>,
}

fn default_kind() -> String {
    "compile".to_string()
}

/// Structural problems toml/serde cannot catch on their own.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestError {
    #[error("edge #{index} has an empty `{field}`")]
    EmptyEndpoint { index: usize, field: &'static str },

    #[error("node #{index} has an empty name")]
    EmptyNode { index: usize },
}

impl ManifestError {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyEndpoint { .. } => "E1002",
            Self::EmptyNode { .. } => "E1003",
        }
    }

    /// Remediation hint for operators.
    #[must_use]
    pub const fn hint(&self) -> &'static str {
        match self {
            Self::EmptyEndpoint { .. } => "Every [[edges]] entry needs non-empty `from` and `to`.",
            Self::EmptyNode { .. } => "Remove the empty entry from `nodes`.",
        }
    }
}

impl Manifest {
    /// Parse and validate manifest text.
    ///
    /// # Errors
    ///
    /// Returns an error on malformed TOML, unknown keys, or empty node names.
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content).context("malformed manifest")?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn validate(&self) -> Result<(), ManifestError> {
        if let Some(index) = self.nodes.iter().position(|n| n.trim().is_empty()) {
            return Err(ManifestError::EmptyNode { index });
        }
        for (index, edge) in self.edges.iter().enumerate() {
            if edge.from.trim().is_empty() {
                return Err(ManifestError::EmptyEndpoint { index, field: "from" });
            }
            if edge.to.trim().is_empty() {
                return Err(ManifestError::EmptyEndpoint { index, field: "to" });
            }
        }
        Ok(())
    }

    /// Build the graph: edges in file order, then isolated nodes.
    #[must_use]
    pub fn to_graph(&self) -> DepGraph {
        let mut graph = DepGraph::with_capacity(self.nodes.len() + self.edges.len());
        for edge in &self.edges {
            let kind = edge.kind.as_ref().unwrap_or(&self.defaults.kind);
            if !graph.add_edge(edge.from.clone(), edge.to.clone(), kind.clone()) {
                debug!(from = %edge.from, to = %edge.to, %kind, "duplicate edge ignored");
            }
        }
        for node in &self.nodes {
            graph.add_node(node.clone());
        }
        graph
    }
}

/// Read, validate and build the graph described by the manifest at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or fails validation.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<DepGraph> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest {}", path.display()))?;
    let manifest = Manifest::parse(&content)
        .with_context(|| format!("failed to load manifest {}", path.display()))?;

    let graph = manifest.to_graph();
    debug!(nodes = graph.size(), edges = graph.edge_count(), "manifest loaded");
    Ok(graph)
}
