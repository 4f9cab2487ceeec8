//! Crossing minimization: assigns every ranked node an `order` within its rank.
//!
//! Layer-by-layer sweeps sort each rank by the barycenter of its neighbours on the previous
//! rank, alternating downward and upward and flipping the tie-break bias every other pair of
//! sweeps. Each sweep is followed by adjacent-swap transposition. The best layering seen,
//! by weighted crossing count, is kept.

mod barycenter;
mod constraints;
mod cross_count;
mod init_order;
mod layer_graph;
mod resolve_conflicts;
mod sort;
mod sort_subgraph;
mod transpose;

pub use barycenter::{BarycenterEntry, barycenter};
pub use constraints::add_subgraph_constraints;
pub use cross_count::cross_count;
pub use init_order::{init_data_order, init_order};
pub use layer_graph::{
    LayerEdge, LayerGraph, LayerGraphLabel, LayerNode, Relationship, build_layer_graph,
};
pub use resolve_conflicts::{SortEntry, resolve_conflicts};
pub use sort::{SortResult, sort};
pub use sort_subgraph::sort_subgraph;
pub use transpose::transpose;

use crate::graphlib::{Graph, GraphOptions};
use crate::model::LayoutGraph;
use crate::util::{build_layer_matrix, max_rank};
use crate::Result;

/// Left-to-right constraints between sibling subgraphs, accumulated over one sweep.
pub type ConstraintGraph = Graph<(), (), ()>;

/// Sweeps without improvement before a round stops.
const PATIENCE: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct OrderOptions<'a> {
    /// Pin real nodes to their sequence in `node_order` before sorting.
    pub keep_node_order: bool,
    pub node_order: &'a [String],
}

pub fn order(g: &mut LayoutGraph, opts: OrderOptions<'_>) -> Result<()> {
    let Some(max) = max_rank(g) else {
        return Ok(());
    };
    if opts.keep_node_order {
        init_data_order(g, opts.node_order);
    }

    let mut down = Vec::new();
    for rank in 1..=max {
        down.push(build_layer_graph(g, rank, Relationship::InEdges)?);
    }
    let mut up = Vec::new();
    for rank in (0..max).rev() {
        up.push(build_layer_graph(g, rank, Relationship::OutEdges)?);
    }

    let mut best: Option<(f64, Vec<Vec<String>>)> = None;
    // The second round starts over but breaks barycenter ties by the order already reached.
    for use_prev in [false, true] {
        assign_order(g, &init_order(g));

        let mut i = 0;
        let mut since_best = 0;
        while since_best < PATIENCE {
            let layer_graphs = if i % 2 == 1 { &down } else { &up };
            sweep(g, layer_graphs, i % 4 >= 2, use_prev);
            let swaps = transpose(g);

            let layering = build_layer_matrix(g);
            let cc = cross_count(g, &layering);
            tracing::trace!(sweep = i, use_prev, cc, swaps, "order sweep");
            if best.as_ref().is_none_or(|(best_cc, _)| cc < *best_cc) {
                best = Some((cc, layering));
                since_best = 0;
            }
            i += 1;
            since_best += 1;
        }
    }

    if let Some((_, layering)) = best {
        assign_order(g, &layering);
    }
    Ok(())
}

fn sweep(
    g: &mut LayoutGraph,
    layer_graphs: &[LayerGraph],
    bias_right: bool,
    use_prev: bool,
) {
    let mut cg: ConstraintGraph = Graph::new(GraphOptions::default());
    for lg in layer_graphs {
        let root = lg.graph().root.as_str();
        let sorted = sort_subgraph(lg, root, &cg, g, bias_right, use_prev);
        for (i, v) in sorted.vs.iter().enumerate() {
            if let Some(node) = g.node_mut(v) {
                node.order = Some(i);
            }
        }
        add_subgraph_constraints(lg, &mut cg, &sorted.vs);
    }
}

fn assign_order(g: &mut LayoutGraph, layering: &[Vec<String>]) {
    for layer in layering {
        for (i, v) in layer.iter().enumerate() {
            if let Some(node) = g.node_mut(v) {
                node.order = Some(i);
            }
        }
    }
}
