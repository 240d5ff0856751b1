//! Caller-facing value types: [`Edge`] and [`Path`].
//!
//! Both are detached copies. Once handed out they no longer track the graph
//! they were read from, so holding one across a mutation is always safe.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// A directed, payload-carrying connection between two node values.
///
/// Two edges are equal iff origin, destination and payload all compare equal.
/// This is also the rule the graph uses to drop duplicate insertions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge<T, U> {
    origin: T,
    destination: T,
    value: U,
}

impl<T, U> Edge<T, U> {
    /// Create an edge `origin -(value)-> destination`.
    #[must_use]
    pub const fn new(origin: T, destination: T, value: U) -> Self {
        Self {
            origin,
            destination,
            value,
        }
    }

    /// The node value this edge leaves from.
    #[must_use]
    pub const fn origin(&self) -> &T {
        &self.origin
    }

    /// The node value this edge points at.
    #[must_use]
    pub const fn destination(&self) -> &T {
        &self.destination
    }

    /// The payload attached to this edge.
    #[must_use]
    pub const fn value(&self) -> &U {
        &self.value
    }

    /// Returns `true` if origin and destination are the same node.
    #[must_use]
    pub fn is_self_loop(&self) -> bool
    where
        T: PartialEq,
    {
        self.origin == self.destination
    }

    /// Split the edge into `(origin, destination, value)`.
    #[must_use]
    pub fn into_parts(self) -> (T, T, U) {
        (self.origin, self.destination, self.value)
    }
}

impl<T: fmt::Display, U: fmt::Display> fmt::Display for Edge<T, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-({})->{}", self.origin, self.value, self.destination)
    }
}

// ---------------------------------------------------------------------------
// Path
// ---------------------------------------------------------------------------

/// One concrete walk from an origin to a destination, in discovery order.
///
/// The first element is the origin and the last is the destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path<T> {
    nodes: Vec<T>,
}

impl<T> Path<T> {
    /// Wrap an ordered sequence of node values.
    #[must_use]
    pub const fn new(nodes: Vec<T>) -> Self {
        Self { nodes }
    }

    /// The node values along the walk.
    #[must_use]
    pub fn nodes(&self) -> &[T] {
        &self.nodes
    }

    /// Number of node values on the walk (edges + 1).
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.nodes.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.nodes.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.nodes.iter()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<T> {
        self.nodes
    }
}

impl<T> From<Vec<T>> for Path<T> {
    fn from(nodes: Vec<T>) -> Self {
        Self::new(nodes)
    }
}

impl<T> IntoIterator for Path<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Path<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

impl<T: fmt::Display> fmt::Display for Path<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}
