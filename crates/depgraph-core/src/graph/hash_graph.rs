//! Adjacency-map implementation of [`Graph`].
//!
//! # Storage
//!
//! Nodes live in an arena of slots addressed by [`NodeId`]. Handles are never
//! reused, so slot order is insertion order and a stale handle can only ever
//! point at an empty slot. A `HashMap<T, NodeId>` gives O(1) lookup by value.
//!
//! Each node keeps its own outbound and inbound lists. Both sides of an edge
//! store the same `(origin, destination, payload)` triple as handles, and
//! every mutation updates the two lists together.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::{debug, instrument, trace};

use super::edge::{Edge, Path};
use super::{EdgeFilter, EdgeValue, Graph, NodeValue};
use crate::error::GraphError;

/// Stable handle to a node slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(super) struct NodeId(usize);

impl NodeId {
    pub(super) const fn index(self) -> usize {
        self.0
    }
}

/// One side of an edge as stored in a node's adjacency list.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Link<U> {
    pub(super) origin: NodeId,
    pub(super) destination: NodeId,
    pub(super) value: U,
}

#[derive(Debug, Clone)]
pub(super) struct Node<T, U> {
    pub(super) value: T,
    pub(super) outbound: Vec<Link<U>>,
    pub(super) inbound: Vec<Link<U>>,
}

impl<T, U> Node<T, U> {
    const fn new(value: T) -> Self {
        Self {
            value,
            outbound: Vec::new(),
            inbound: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// HashGraph
// ---------------------------------------------------------------------------

/// A directed multigraph keyed by node value.
///
/// Iteration order (values, edges, traversal tie-breaking) follows insertion
/// order. Not internally synchronized; share it behind a lock if needed.
#[derive(Clone)]
pub struct HashGraph<T, U> {
    slots: Vec<Option<Node<T, U>>>,
    index: HashMap<T, NodeId>,
}

impl<T: NodeValue, U: EdgeValue> HashGraph<T, U> {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Create an empty graph with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.live().map(|(_, node)| node.outbound.len()).sum()
    }

    /// Every edge, grouped by origin in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = Edge<T, U>> + '_ {
        self.live()
            .flat_map(move |(_, node)| node.outbound.iter().filter_map(move |link| self.to_edge(link)))
    }

    // -----------------------------------------------------------------------
    // Internal accessors shared with the traversal module
    // -----------------------------------------------------------------------

    pub(super) fn id_of(&self, value: &T) -> Option<NodeId> {
        self.index.get(value).copied()
    }

    pub(super) fn slot(&self, id: NodeId) -> Option<&Node<T, U>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Node<T, U>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Live nodes in insertion order.
    pub(super) fn live(&self) -> impl Iterator<Item = (NodeId, &Node<T, U>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|node| (NodeId(i), node)))
    }

    /// Value stored at `id`. Links only ever reference live slots.
    pub(super) fn value_of(&self, id: NodeId) -> Option<&T> {
        self.slot(id).map(|node| &node.value)
    }

    /// Caller-facing copy of a stored link. `None` only if the link is
    /// dangling, which the mirror invariant rules out.
    pub(super) fn to_edge(&self, link: &Link<U>) -> Option<Edge<T, U>> {
        let origin = self.value_of(link.origin)?;
        let destination = self.value_of(link.destination)?;
        Some(Edge::new(origin.clone(), destination.clone(), link.value.clone()))
    }

    fn intern(&mut self, value: T) -> NodeId {
        if let Some(id) = self.id_of(&value) {
            return id;
        }
        let id = NodeId(self.slots.len());
        self.index.insert(value.clone(), id);
        self.slots.push(Some(Node::new(value)));
        id
    }

    fn edge_list(&self, value: &T, outbound: bool) -> Option<Vec<Edge<T, U>>> {
        let node = self.slot(self.id_of(value)?)?;
        let links = if outbound { &node.outbound } else { &node.inbound };
        Some(links.iter().filter_map(|link| self.to_edge(link)).collect())
    }

    /// Take a node out of the arena and strip every edge that references it
    /// from its neighbours.
    fn detach(&mut self, id: NodeId) -> Option<Node<T, U>> {
        let node = self.slots.get_mut(id.0)?.take()?;
        self.index.remove(&node.value);

        for link in &node.outbound {
            if let Some(destination) = self.slot_mut(link.destination) {
                destination.inbound.retain(|l| l.origin != id);
            }
        }
        for link in &node.inbound {
            if let Some(origin) = self.slot_mut(link.origin) {
                origin.outbound.retain(|l| l.destination != id);
            }
        }

        trace!(
            node = ?node.value,
            outbound = node.outbound.len(),
            inbound = node.inbound.len(),
            "detached node"
        );
        Some(node)
    }

    fn remove_cascading(
        &mut self,
        id: NodeId,
        chain: &mut HashSet<NodeId>,
        removed: &mut Vec<T>,
    ) -> Result<(), GraphError> {
        let Some(node) = self.slot(id) else {
            return Ok(());
        };

        // Snapshot before any list below is mutated by the cascade.
        let targets: Vec<NodeId> = node.outbound.iter().map(|link| link.destination).collect();
        if let Some(&repeat) = targets.iter().find(|t| **t == id || chain.contains(*t)) {
            let node = self.value_of(repeat).unwrap_or(&node.value);
            return Err(GraphError::cyclic(node));
        }

        let Some(node) = self.detach(id) else {
            return Ok(());
        };
        removed.push(node.value);
        chain.insert(id);

        for target in targets {
            let orphaned = self.slot(target).is_some_and(|n| n.inbound.is_empty());
            if orphaned {
                debug!(node = ?self.value_of(target), "removing orphaned dependency");
                self.remove_cascading(target, chain, removed)?;
            }
        }

        chain.remove(&id);
        Ok(())
    }
}

impl<T: NodeValue, U: EdgeValue> Graph<T, U> for HashGraph<T, U> {
    fn add_node(&mut self, value: T) -> bool {
        if self.contains(&value) {
            return false;
        }
        self.intern(value);
        true
    }

    fn add_edge(&mut self, origin: T, destination: T, value: U) -> bool {
        let origin = self.intern(origin);
        let destination = self.intern(destination);

        let exists = self.slot(origin).is_some_and(|node| {
            node.outbound
                .iter()
                .any(|l| l.destination == destination && l.value == value)
        });
        if exists {
            return false;
        }

        let link = Link {
            origin,
            destination,
            value,
        };
        if let Some(node) = self.slot_mut(destination) {
            node.inbound.push(link.clone());
        }
        if let Some(node) = self.slot_mut(origin) {
            node.outbound.push(link);
        }
        true
    }

    fn contains(&self, value: &T) -> bool {
        self.index.contains_key(value)
    }

    fn find(&self, root: &T, mut predicate: impl FnMut(&T) -> bool) -> Result<Option<&T>, GraphError> {
        let root = self.id_of(root).ok_or_else(|| GraphError::invalid_root(root))?;
        let mut ancestry = HashSet::new();
        let found = self.find_from(root, &mut ancestry, &mut predicate)?;
        Ok(found.and_then(|id| self.value_of(id)))
    }

    fn inbound_edges(&self, value: &T) -> Option<Vec<Edge<T, U>>> {
        self.edge_list(value, false)
    }

    fn outbound_edges(&self, value: &T) -> Option<Vec<Edge<T, U>>> {
        self.edge_list(value, true)
    }

    fn get_paths(&self, origin: &T, destination: &T) -> Result<Vec<Path<T>>, GraphError> {
        if !self.contains(origin) || !self.contains(destination) {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        let mut current = vec![origin.clone()];
        self.traverse(origin, false, None, |_, to, _, depth, _| {
            current.truncate(depth);
            current.push(to.clone());

            let finished = to == destination;
            if finished {
                paths.push(Path::new(current.clone()));
            }
            !finished
        })?;

        Ok(paths)
    }

    // Candidates are fixed before any detach so the pass never cascades.
    #[allow(clippy::needless_collect)]
    #[instrument(skip_all, fields(excludes = excludes.len()))]
    fn prune(&mut self, excludes: &[T]) -> Vec<T> {
        let keep: HashSet<&T> = excludes.iter().collect();
        let candidates: Vec<NodeId> = self
            .live()
            .filter(|(_, node)| node.inbound.is_empty() && !keep.contains(&node.value))
            .map(|(id, _)| id)
            .collect();

        let pruned: Vec<T> = candidates
            .into_iter()
            .filter_map(|id| self.detach(id).map(|node| node.value))
            .collect();
        debug!(pruned = pruned.len(), remaining = self.size(), "pruned root nodes");
        pruned
    }

    fn remove_edge(&mut self, origin: &T, destination: &T, value: &U) -> bool {
        let (Some(origin), Some(destination)) = (self.id_of(origin), self.id_of(destination)) else {
            return false;
        };

        let removed_out = self.slot_mut(origin).is_some_and(|node| {
            node.outbound
                .iter()
                .position(|l| l.destination == destination && l.value == *value)
                .map(|pos| node.outbound.remove(pos))
                .is_some()
        });
        let removed_in = self.slot_mut(destination).is_some_and(|node| {
            node.inbound
                .iter()
                .position(|l| l.origin == origin && l.value == *value)
                .map(|pos| node.inbound.remove(pos))
                .is_some()
        });
        removed_out || removed_in
    }

    #[instrument(skip_all, fields(node = ?value))]
    fn remove_node(&mut self, value: &T) -> Result<Vec<T>, GraphError> {
        let Some(id) = self.id_of(value) else {
            return Ok(Vec::new());
        };

        let mut removed = Vec::new();
        let mut chain = HashSet::new();
        self.remove_cascading(id, &mut chain, &mut removed)?;
        debug!(removed = removed.len(), "removed node and orphans");
        Ok(removed)
    }

    fn size(&self) -> usize {
        self.index.len()
    }

    fn traverse(
        &self,
        root: &T,
        visit_nodes_once: bool,
        edge_filter: Option<&EdgeFilter<'_, T, U>>,
        mut consumer: impl FnMut(&T, &T, &U, usize, bool) -> bool,
    ) -> Result<(), GraphError> {
        let root = self.id_of(root).ok_or_else(|| GraphError::invalid_root(root))?;
        self.walk_down(root, visit_nodes_once, edge_filter, &mut consumer)
    }

    fn traverse_up(
        &self,
        root: &T,
        mut visitor: impl FnMut(&T, &T, &U, usize),
    ) -> Result<(), GraphError> {
        let root = self.id_of(root).ok_or_else(|| GraphError::invalid_root(root))?;
        let mut ancestry = HashSet::new();
        self.walk_up(root, &mut ancestry, &mut visitor, 1)
    }

    fn values(&self) -> Vec<&T> {
        self.live().map(|(_, node)| &node.value).collect()
    }
}

// ---------------------------------------------------------------------------
// Std trait impls
// ---------------------------------------------------------------------------

impl<T: NodeValue, U: EdgeValue> Default for HashGraph<T, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U> fmt::Debug for HashGraph<T, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edge_count: usize = self.slots.iter().flatten().map(|n| n.outbound.len()).sum();
        f.debug_struct("HashGraph")
            .field("node_count", &self.index.len())
            .field("edge_count", &edge_count)
            .finish()
    }
}

/// Structural equality: the same node values, and for each node the same
/// outbound and inbound edges regardless of the order they were added in.
impl<T: NodeValue, U: EdgeValue> PartialEq for HashGraph<T, U> {
    fn eq(&self, other: &Self) -> bool {
        if self.size() != other.size() || self.edge_count() != other.edge_count() {
            return false;
        }

        self.live().all(|(_, mine)| {
            let Some(theirs) = other.id_of(&mine.value).and_then(|id| other.slot(id)) else {
                return false;
            };
            if mine.outbound.len() != theirs.outbound.len()
                || mine.inbound.len() != theirs.inbound.len()
            {
                return false;
            }
            mine.outbound.iter().all(|link| {
                let edge = self.to_edge(link);
                edge.is_some() && theirs.outbound.iter().any(|l| other.to_edge(l) == edge)
            })
        })
    }
}

impl<T: NodeValue, U: EdgeValue> Extend<(T, T, U)> for HashGraph<T, U> {
    fn extend<I: IntoIterator<Item = (T, T, U)>>(&mut self, iter: I) {
        for (origin, destination, value) in iter {
            self.add_edge(origin, destination, value);
        }
    }
}

impl<T: NodeValue, U: EdgeValue> FromIterator<(T, T, U)> for HashGraph<T, U> {
    fn from_iter<I: IntoIterator<Item = (T, T, U)>>(iter: I) -> Self {
        let mut graph = Self::new();
        graph.extend(iter);
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> HashGraph<&'static str, &'static str> {
        [
            ("one", "two", "one-two"),
            ("two", "three", "two-three"),
            ("one", "three", "one-three"),
            ("two", "four", "two-four"),
            ("three", "five", "three-five"),
        ]
        .into_iter()
        .collect()
    }

    fn assert_mirrored<U: EdgeValue + fmt::Debug>(graph: &HashGraph<&'static str, U>) {
        for (id, node) in graph.live() {
            for link in &node.outbound {
                assert_eq!(link.origin, id);
                let dest = graph.slot(link.destination).expect("destination is live");
                assert_eq!(dest.inbound.iter().filter(|l| *l == link).count(), 1);
            }
            for link in &node.inbound {
                assert_eq!(link.destination, id);
                let origin = graph.slot(link.origin).expect("origin is live");
                assert_eq!(origin.outbound.iter().filter(|l| *l == link).count(), 1);
            }
        }
    }

    #[test]
    fn add_edge_creates_endpoints_in_order() {
        let graph = sample();
        assert_eq!(graph.size(), 5);
        assert_eq!(graph.values(), vec![&"one", &"two", &"three", &"four", &"five"]);
        assert_eq!(graph.edge_count(), 5);
        assert_mirrored(&graph);
    }

    #[test]
    fn duplicate_triples_are_dropped() {
        let mut graph = sample();
        assert!(!graph.add_edge("one", "two", "one-two"));
        assert!(graph.add_edge("one", "two", "other"));

        let out = graph.outbound_edges(&"one").expect("one exists");
        assert_eq!(out.iter().filter(|e| **e == Edge::new("one", "two", "one-two")).count(), 1);
        assert_eq!(graph.inbound_edges(&"two").expect("two exists").len(), 2);
        assert_mirrored(&graph);
    }

    #[test]
    fn add_node_keeps_existing_node() {
        let mut graph = sample();
        assert!(!graph.add_node("two"));
        assert!(graph.add_node("six"));
        assert_eq!(graph.outbound_edges(&"six"), Some(vec![]));
        assert_eq!(graph.outbound_edges(&"two").map(|e| e.len()), Some(2));
    }

    #[test]
    fn edge_queries_distinguish_missing_from_empty() {
        let graph = sample();
        assert_eq!(graph.inbound_edges(&"one"), Some(vec![]));
        assert_eq!(graph.outbound_edges(&"five"), Some(vec![]));
        assert_eq!(graph.inbound_edges(&"six"), None);
        assert_eq!(graph.outbound_edges(&"six"), None);
    }

    #[test]
    fn self_loop_is_mirrored_on_one_node() {
        let mut graph: HashGraph<&str, u8> = HashGraph::new();
        assert!(graph.add_edge("a", "a", 1));
        assert_eq!(graph.outbound_edges(&"a"), Some(vec![Edge::new("a", "a", 1)]));
        assert_eq!(graph.inbound_edges(&"a"), Some(vec![Edge::new("a", "a", 1)]));

        assert!(graph.remove_edge(&"a", &"a", &1));
        assert_eq!(graph.outbound_edges(&"a"), Some(vec![]));
        assert_eq!(graph.inbound_edges(&"a"), Some(vec![]));
    }

    #[test]
    fn remove_edge_is_noop_for_unknown_triples() {
        let mut graph = sample();
        assert!(!graph.remove_edge(&"one", &"two", &"wrong"));
        assert!(!graph.remove_edge(&"one", &"six", &"one-six"));
        assert!(!graph.remove_edge(&"six", &"one", &"six-one"));
        assert_eq!(graph.edge_count(), 5);
    }

    #[test]
    fn removed_value_is_reinserted_at_the_end() {
        let mut graph = sample();
        graph.remove_node(&"one").expect("acyclic");
        assert!(graph.is_empty());

        graph.add_edge("five", "one", "again");
        assert_eq!(graph.values(), vec![&"five", &"one"]);
        assert_mirrored(&graph);
    }

    #[test]
    fn remove_node_rejects_self_loop_without_mutating() {
        let mut graph: HashGraph<&str, u8> = HashGraph::new();
        graph.add_edge("a", "a", 1);
        graph.add_edge("a", "b", 1);

        let err = graph.remove_node(&"a").expect_err("self loop is a cycle");
        assert!(matches!(err, GraphError::Cyclic { .. }));
        assert_eq!(graph.size(), 2);
        assert_mirrored(&graph);
    }

    #[test]
    fn remove_node_succeeds_once_self_loop_is_dropped() {
        let mut graph: HashGraph<&str, u8> = HashGraph::new();
        graph.add_edge("a", "a", 1);
        graph.add_edge("a", "b", 1);

        assert!(graph.remove_edge(&"a", &"a", &1));
        assert_eq!(graph.remove_node(&"a"), Ok(vec!["a", "b"]));
        assert!(graph.is_empty());
        assert_mirrored(&graph);
    }

    #[test]
    fn remove_node_collects_cycle_once_entry_is_cut() {
        // a -> b -> c -> a: removing a cuts c -> a first, so the cascade
        // never re-enters the chain.
        let mut graph: HashGraph<&str, ()> =
            [("a", "b", ()), ("b", "c", ()), ("c", "a", ())].into_iter().collect();

        let removed = graph.remove_node(&"a").expect("cascade terminates");
        assert_eq!(removed, vec!["a", "b", "c"]);
        assert!(graph.is_empty());
    }

    #[test]
    fn prune_does_not_cascade() {
        let mut graph: HashGraph<&str, ()> =
            [("root", "mid", ()), ("mid", "leaf", ())].into_iter().collect();

        assert_eq!(graph.prune(&[]), vec!["root"]);
        assert_eq!(graph.values(), vec![&"mid", &"leaf"]);
        assert_eq!(graph.prune(&[]), vec!["mid"]);
        assert_mirrored(&graph);
    }

    #[test]
    fn structural_equality_ignores_insertion_order() {
        let other: HashGraph<&str, &str> = [
            ("three", "five", "three-five"),
            ("two", "four", "two-four"),
            ("two", "three", "two-three"),
            ("one", "three", "one-three"),
            ("one", "two", "one-two"),
        ]
        .into_iter()
        .collect();
        assert_eq!(sample(), other);

        let mut different = other;
        different.add_edge("one", "two", "second");
        assert_ne!(sample(), different);
    }

    #[test]
    fn debug_reports_counts() {
        assert_eq!(
            format!("{:?}", sample()),
            "HashGraph { node_count: 5, edge_count: 5 }"
        );
    }
}
