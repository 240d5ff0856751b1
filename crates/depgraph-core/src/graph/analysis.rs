//! Whole-graph analysis backed by petgraph.
//!
//! # Edge Direction
//!
//! `A → B` reads "A depends on B", so a build order lists `B` before `A`.
//!
//! These helpers copy the graph into a petgraph [`DiGraph`] whose node
//! indices follow the [`HashGraph`] insertion order. That keeps every result
//! deterministic without sorting on the node values themselves.

#![allow(clippy::module_name_repetitions)]

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use tracing::instrument;

use super::{EdgeValue, Graph, HashGraph, NodeValue};
use crate::error::GraphError;

impl<T: NodeValue, U: EdgeValue> HashGraph<T, U> {
    /// Copy the graph into a petgraph [`DiGraph`].
    ///
    /// Node `i` of the result is the `i`-th value of [`Graph::values`];
    /// parallel edges are preserved.
    #[must_use]
    pub fn to_digraph(&self) -> DiGraph<T, U> {
        let mut graph = DiGraph::with_capacity(self.size(), self.edge_count());
        let mut positions: HashMap<&T, NodeIndex> = HashMap::with_capacity(self.size());

        for value in self.values() {
            positions.insert(value, graph.add_node(value.clone()));
        }
        for edge in self.edges() {
            if let (Some(&from), Some(&to)) =
                (positions.get(edge.origin()), positions.get(edge.destination()))
            {
                graph.add_edge(from, to, edge.value().clone());
            }
        }

        graph
    }
}

/// Find every cycle currently present in `graph`.
///
/// Each entry holds the members of one strongly connected component with more
/// than one node, or a single node with a self-loop. Members are listed in
/// insertion order and components are ordered by their earliest member.
#[must_use]
pub fn find_cycles<T: NodeValue, U: EdgeValue>(graph: &HashGraph<T, U>) -> Vec<Vec<T>> {
    let digraph = graph.to_digraph();

    let mut components: Vec<Vec<NodeIndex>> = tarjan_scc(&digraph)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .is_some_and(|node| digraph.find_edge(*node, *node).is_some())
        })
        .map(|mut component| {
            component.sort_unstable();
            component
        })
        .collect();
    components.sort_unstable();

    components
        .into_iter()
        .map(|component| {
            component
                .into_iter()
                .filter_map(|idx| digraph.node_weight(idx).cloned())
                .collect()
        })
        .collect()
}

/// Order every node so that dependencies come before their dependents.
///
/// Kahn's algorithm over the reversed edges; among nodes that are ready at
/// the same time, the one inserted first wins. `petgraph::algo::toposort`
/// gives no control over that tie-break, so the ready set is a min-heap of
/// insertion positions.
///
/// # Errors
///
/// [`GraphError::Cyclic`] naming a member of a cycle if no order exists.
#[instrument(skip_all, fields(nodes = graph.size()))]
pub fn build_order<T: NodeValue, U: EdgeValue>(
    graph: &HashGraph<T, U>,
) -> Result<Vec<T>, GraphError> {
    let digraph = graph.to_digraph();

    // Pending dependencies per node, i.e. distinct outbound targets.
    let mut pending: Vec<usize> = digraph
        .node_indices()
        .map(|idx| {
            let mut targets: Vec<NodeIndex> =
                digraph.neighbors_directed(idx, Direction::Outgoing).collect();
            targets.sort_unstable();
            targets.dedup();
            targets.len()
        })
        .collect();

    let mut ready: BinaryHeap<Reverse<NodeIndex>> = digraph
        .node_indices()
        .filter(|idx| pending.get(idx.index()).is_some_and(|n| *n == 0))
        .map(Reverse)
        .collect();

    let mut order = Vec::with_capacity(digraph.node_count());
    while let Some(Reverse(idx)) = ready.pop() {
        if let Some(value) = digraph.node_weight(idx) {
            order.push(value.clone());
        }

        let mut dependents: Vec<NodeIndex> =
            digraph.neighbors_directed(idx, Direction::Incoming).collect();
        dependents.sort_unstable();
        dependents.dedup();

        for dependent in dependents {
            if let Some(count) = pending.get_mut(dependent.index()) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }
    }

    if order.len() < digraph.node_count() {
        // Nodes downstream of a cycle are stuck too; name a real member.
        let member = find_cycles(graph)
            .into_iter()
            .next()
            .and_then(|cycle| cycle.into_iter().next());
        return Err(member.map_or_else(
            || GraphError::cyclic(&"<unknown>"),
            |value| GraphError::cyclic(&value),
        ));
    }

    Ok(order)
}
