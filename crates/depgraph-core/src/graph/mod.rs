//! Directed multigraph contract and its adjacency-map implementation.
//!
//! # Overview
//!
//! [`Graph`] is the capability surface every backing store provides:
//! mutation, membership and edge queries, depth-first traversal (pre-order
//! and post-order), predicate search and path discovery. [`HashGraph`] is the
//! concrete store used by the rest of the workspace.
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A depends on B". Traversals walk outbound edges,
//! so a walk from a target visits its dependencies; [`Graph::traverse_up`]
//! reports the deepest dependencies first.
//!
//! ## Cycles
//!
//! Traversal-family operations track the nodes on the active DFS path and
//! fail with [`GraphError::Cyclic`](crate::GraphError::Cyclic) as soon as one
//! of them is reached again. Reaching a node twice through disjoint paths is
//! not a cycle.
//!
//! ## Typical Usage
//!
//! ```rust
//! use depgraph_core::{Graph, HashGraph};
//!
//! let mut graph: HashGraph<&str, &str> = HashGraph::new();
//! graph.add_edge("app", "core", "compile");
//! graph.add_edge("core", "util", "compile");
//! graph.add_edge("app", "util", "runtime");
//!
//! let paths = graph.get_paths(&"app", &"util")?;
//! assert_eq!(paths.len(), 2);
//! # Ok::<(), depgraph_core::GraphError>(())
//! ```

pub mod analysis;
pub mod edge;
pub mod hash_graph;
mod traversal;

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::GraphError;

pub use analysis::{build_order, find_cycles};
pub use edge::{Edge, Path};
pub use hash_graph::HashGraph;

/// Identity contract for node values.
///
/// Equal values are the same node. `Debug` is only used to name the node in
/// errors.
pub trait NodeValue: Eq + Hash + Clone + Debug {}

impl<T: Eq + Hash + Clone + Debug> NodeValue for T {}

/// Contract for edge payloads. Equality decides duplicate edges.
pub trait EdgeValue: PartialEq + Clone {}

impl<U: PartialEq + Clone> EdgeValue for U {}

/// Decides whether a traversal follows an edge.
///
/// Arguments are the candidate edge and the edge used to enter the current
/// node (`None` at the root). For `A -1-> B -2-> C`, standing on `B` and
/// looking at `C`, the candidate is `2` and the entry edge is `1`.
pub type EdgeFilter<'f, T, U> = dyn Fn(&Edge<T, U>, Option<&Edge<T, U>>) -> bool + 'f;

/// Filter that keeps every edge. Equivalent to passing `None`.
pub const fn identity_filter<T, U>(_edge: &Edge<T, U>, _entry: Option<&Edge<T, U>>) -> bool {
    true
}

/// The generic directed multigraph contract.
///
/// `T` is the node value, `U` the edge payload. Implementations store at most
/// one node per distinct `T` and drop edges whose `(origin, destination,
/// payload)` triple already exists.
pub trait Graph<T: NodeValue, U: EdgeValue> {
    /// Insert an isolated node. Returns `false` if the value already exists;
    /// the stored value is left untouched in that case.
    fn add_node(&mut self, value: T) -> bool;

    /// Add `origin -(value)-> destination`, creating missing endpoints.
    ///
    /// Returns `false` if an identical edge already exists.
    fn add_edge(&mut self, origin: T, destination: T, value: U) -> bool;

    /// O(1) membership test.
    fn contains(&self, value: &T) -> bool;

    /// Depth-first search from `root` for the first value matching
    /// `predicate`. The root itself is tested first.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidRoot`] if `root` is absent and
    /// [`GraphError::Cyclic`] if the search re-enters a node on its own path.
    fn find(&self, root: &T, predicate: impl FnMut(&T) -> bool) -> Result<Option<&T>, GraphError>;

    /// Inbound edges of `value` in insertion order, or `None` if the node
    /// does not exist.
    fn inbound_edges(&self, value: &T) -> Option<Vec<Edge<T, U>>>;

    /// Outbound edges of `value` in insertion order, or `None` if the node
    /// does not exist.
    fn outbound_edges(&self, value: &T) -> Option<Vec<Edge<T, U>>>;

    /// Every walk from `origin` to `destination`, in discovery order.
    ///
    /// Empty when either endpoint is absent or unreachable.
    ///
    /// # Errors
    ///
    /// [`GraphError::Cyclic`] if a cycle is reachable from `origin`.
    fn get_paths(&self, origin: &T, destination: &T) -> Result<Vec<Path<T>>, GraphError>;

    /// Remove every node with no inbound edges, except `excludes`.
    ///
    /// A single leaf pass: nodes that become roots because of this call
    /// survive until the next one. Returns the removed values.
    fn prune(&mut self, excludes: &[T]) -> Vec<T>;

    /// Remove one edge from both endpoints. Returns `false` if no such edge.
    fn remove_edge(&mut self, origin: &T, destination: &T, value: &U) -> bool;

    /// Remove a node, its edges, and every dependency orphaned as a result.
    ///
    /// Returns the removed values in removal order; empty if `value` is
    /// absent.
    ///
    /// # Errors
    ///
    /// [`GraphError::Cyclic`] if the cascade would re-enter a node on the
    /// active removal chain. Nodes already removed stay removed.
    ///
    /// A node with an edge to itself is rejected this way before anything
    /// changes; drop the self-loop with [`Graph::remove_edge`] first.
    fn remove_node(&mut self, value: &T) -> Result<Vec<T>, GraphError>;

    /// Number of nodes.
    fn size(&self) -> usize;

    /// Pre-order depth-first traversal from `root`.
    ///
    /// `consumer(origin, destination, value, depth, is_last)` runs once per
    /// followed edge and returns whether to descend past `destination`.
    /// Edges leaving the root have depth 1. `is_last` marks the final edge,
    /// in insertion order, among the origin's edges kept by `edge_filter`.
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidRoot`] before any callback if `root` is absent;
    /// [`GraphError::Cyclic`] if a destination is on the active path.
    fn traverse(
        &self,
        root: &T,
        visit_nodes_once: bool,
        edge_filter: Option<&EdgeFilter<'_, T, U>>,
        consumer: impl FnMut(&T, &T, &U, usize, bool) -> bool,
    ) -> Result<(), GraphError>;

    /// Post-order depth-first traversal: `visitor(origin, destination, value,
    /// depth)` runs after everything below `destination` was visited.
    ///
    /// # Errors
    ///
    /// Same contract as [`Graph::traverse`].
    fn traverse_up(
        &self,
        root: &T,
        visitor: impl FnMut(&T, &T, &U, usize),
    ) -> Result<(), GraphError>;

    /// All node values in insertion order.
    fn values(&self) -> Vec<&T>;
}
