//! Hierarchical ("layered") layout for directed and compound graphs.
//!
//! [`layout`] assigns every node a rank and an order within its rank, then derives `x`/`y`
//! coordinates for nodes and polyline points for edges. Subgraphs are kept contiguous and
//! sized to fit their members.
//!
//! The pipeline runs in this order: cycle breaking ([`acyclic`]), nesting edges for
//! subgraphs ([`nesting_graph`]), network-simplex ranking ([`rank`]), dummy chains for long
//! edges ([`normalize`], [`parent_dummy_chains`]), crossing reduction ([`order`]) and
//! Brandes–Köpf coordinates ([`position`]), followed by the stages in [`pipeline`] that undo
//! the temporary structure.

#![forbid(unsafe_code)]

pub use strata_graphlib as graphlib;

pub mod acyclic;
pub mod add_border_segments;
pub mod coordinate_system;
mod error;
pub mod greedy_fas;
pub mod model;
pub mod nesting_graph;
pub mod normalize;
pub mod order;
pub mod parent_dummy_chains;
pub mod pipeline;
pub mod position;
pub mod rank;
pub mod self_edges;
pub mod util;

pub use error::{LayoutError, Result};
pub use model::{
    Acyclicer, Align, BorderSide, Dummy, EdgeLabel, GraphLabel, LabelPos, LayoutGraph, NodeLabel,
    Point, RankDir, Ranker, SelfEdge,
};
pub use pipeline::{LayoutOptions, layout, try_layout};
