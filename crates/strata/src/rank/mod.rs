//! Rank assignment: every node gets an integer layer such that each edge spans at least its
//! `minlen`, while the weighted total edge length stays small.

pub mod feasible_tree;
pub mod network_simplex;
pub mod tree;
pub mod util;

use crate::model::{LayoutGraph, Ranker};

pub use feasible_tree::{feasible_tree, feasible_tree_with_layer};
pub use network_simplex::network_simplex;
pub use util::{longest_path, longest_path_with_layer, slack};

/// Ranks `g` with the configured ranker.
///
/// Graphs with caller-pinned layers are always ranked by the layer-aware tight tree, since the
/// other rankers would move pinned nodes.
pub fn rank(g: &mut LayoutGraph) {
    let has_pins = g.node_labels().any(|(_, n)| n.layer.is_some());
    let ranker = g.graph().ranker;

    if has_pins || ranker == Ranker::TightTree {
        longest_path_with_layer(g);
        feasible_tree_with_layer(g);
        return;
    }

    match ranker {
        Ranker::LongestPath => longest_path(g),
        Ranker::NetworkSimplex | Ranker::TightTree => network_simplex(g),
    }
}
