//! Compound multigraph container for `strata`.
//!
//! The layout pipeline only needs a small surface: node and edge CRUD keyed by string ids,
//! insertion-ordered adjacency queries, and a parent/child hierarchy over nodes. Traversal
//! helpers live in [`alg`].

#![forbid(unsafe_code)]

pub mod alg;
mod edge_key;
mod error;
mod graph;

pub use edge_key::EdgeKey;
pub use error::{GraphError, Result};
pub use graph::{Graph, GraphOptions};
