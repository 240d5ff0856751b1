//! depgraph-core library.
//!
//! A generic directed multigraph keyed by node value, with cycle-aware
//! depth-first traversal, predicate search, path discovery, and cascading
//! removal of orphaned dependencies.
//!
//! # Conventions
//!
//! - **Errors**: fallible operations return `Result<_, GraphError>`; lookups
//!   that may simply miss return `Option`.
//! - **Logging**: mutating operations emit `tracing` events (`debug!`,
//!   `trace!`); nothing is printed.
//! - **Ordering**: node values, edge lists, and traversal callbacks all follow
//!   insertion order.

#![forbid(unsafe_code)]

pub mod error;
pub mod graph;

pub use error::GraphError;
pub use graph::{
    Edge, EdgeFilter, EdgeValue, Graph, HashGraph, NodeValue, Path, build_order, find_cycles,
    identity_filter,
};
