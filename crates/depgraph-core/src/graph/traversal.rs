//! Depth-first search and traversal over [`HashGraph`].
//!
//! # Walk State
//!
//! Two sets are threaded through every walk and must not be conflated:
//!
//! - **ancestry**: the nodes on the active DFS path. Reaching one of them
//!   again is a structural cycle and aborts the walk.
//! - **visited**: every node reached so far. Only consulted when the caller
//!   asked to visit each node once.
//!
//! All walks recurse, so stack depth is bounded by the longest acyclic path
//! from the root.

use std::collections::HashSet;

use super::edge::Edge;
use super::hash_graph::{HashGraph, NodeId};
use super::{EdgeFilter, EdgeValue, NodeValue};
use crate::error::GraphError;

struct DownWalk<'w, 'f, T, U, C> {
    visit_nodes_once: bool,
    edge_filter: Option<&'w EdgeFilter<'f, T, U>>,
    consumer: &'w mut C,
    ancestry: HashSet<NodeId>,
    visited: HashSet<NodeId>,
}

impl<T: NodeValue, U: EdgeValue> HashGraph<T, U> {
    pub(super) fn find_from<P>(
        &self,
        id: NodeId,
        ancestry: &mut HashSet<NodeId>,
        predicate: &mut P,
    ) -> Result<Option<NodeId>, GraphError>
    where
        P: FnMut(&T) -> bool,
    {
        let Some(node) = self.slot(id) else {
            return Ok(None);
        };
        if predicate(&node.value) {
            return Ok(Some(id));
        }

        ancestry.insert(id);
        for link in &node.outbound {
            if ancestry.contains(&link.destination) {
                return Err(self.cycle_at(link.destination));
            }
            if let Some(found) = self.find_from(link.destination, ancestry, predicate)? {
                return Ok(Some(found));
            }
        }
        ancestry.remove(&id);

        Ok(None)
    }

    pub(super) fn walk_down<C>(
        &self,
        root: NodeId,
        visit_nodes_once: bool,
        edge_filter: Option<&EdgeFilter<'_, T, U>>,
        consumer: &mut C,
    ) -> Result<(), GraphError>
    where
        C: FnMut(&T, &T, &U, usize, bool) -> bool,
    {
        let mut walk = DownWalk {
            visit_nodes_once,
            edge_filter,
            consumer,
            ancestry: HashSet::new(),
            visited: HashSet::new(),
        };
        self.descend(root, None, 1, &mut walk)
    }

    fn descend<C>(
        &self,
        id: NodeId,
        entry: Option<&Edge<T, U>>,
        depth: usize,
        walk: &mut DownWalk<'_, '_, T, U, C>,
    ) -> Result<(), GraphError>
    where
        C: FnMut(&T, &T, &U, usize, bool) -> bool,
    {
        let Some(node) = self.slot(id) else {
            return Ok(());
        };

        // `is_last` is decided over the filtered list, before visited-once
        // skips are applied.
        let kept: Vec<(NodeId, Edge<T, U>)> = node
            .outbound
            .iter()
            .filter_map(|link| self.to_edge(link).map(|edge| (link.destination, edge)))
            .filter(|(_, edge)| walk.edge_filter.is_none_or(|keep| keep(edge, entry)))
            .collect();
        let last = kept.len().saturating_sub(1);

        walk.ancestry.insert(id);
        for (position, (destination, edge)) in kept.iter().enumerate() {
            if walk.ancestry.contains(destination) {
                return Err(self.cycle_at(*destination));
            }
            if walk.visit_nodes_once && walk.visited.contains(destination) {
                continue;
            }

            let descend = (walk.consumer)(
                edge.origin(),
                edge.destination(),
                edge.value(),
                depth,
                position == last,
            );
            walk.visited.insert(*destination);

            if descend {
                self.descend(*destination, Some(edge), depth + 1, walk)?;
            }
        }
        walk.ancestry.remove(&id);

        Ok(())
    }

    pub(super) fn walk_up<V>(
        &self,
        id: NodeId,
        ancestry: &mut HashSet<NodeId>,
        visitor: &mut V,
        depth: usize,
    ) -> Result<(), GraphError>
    where
        V: FnMut(&T, &T, &U, usize),
    {
        let Some(node) = self.slot(id) else {
            return Ok(());
        };

        ancestry.insert(id);
        for link in &node.outbound {
            if ancestry.contains(&link.destination) {
                return Err(self.cycle_at(link.destination));
            }
            self.walk_up(link.destination, ancestry, visitor, depth + 1)?;

            if let Some(destination) = self.value_of(link.destination) {
                visitor(&node.value, destination, &link.value, depth);
            }
        }
        ancestry.remove(&id);

        Ok(())
    }

    fn cycle_at(&self, id: NodeId) -> GraphError {
        self.value_of(id)
            .map_or_else(|| GraphError::cyclic(&id.index()), GraphError::cyclic)
    }
}
