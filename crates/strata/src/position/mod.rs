//! Coordinate assignment: y from the rank heights, x from Brandes-Köpf.
//!
//! Both run on a flat view of the graph; subgraph nodes get their box later from their border
//! nodes.

pub mod bk;

use crate::model::LayoutGraph;
use crate::util::{as_non_compound_graph, build_layer_matrix};

pub fn position(g: &mut LayoutGraph) {
    let mut flat = as_non_compound_graph(g);
    position_y(&mut flat);
    let xs = bk::position_x(&flat);

    for (v, node) in flat.node_labels() {
        if let Some(target) = g.node_mut(v) {
            target.y = node.y;
            target.x = xs.get(v).copied();
        }
    }
}

/// Stacks ranks top to bottom, each centred on its tallest node and `ranksep` apart.
fn position_y(g: &mut LayoutGraph) {
    let ranksep = g.graph().ranksep;
    let mut prev_y = 0.0;
    for layer in build_layer_matrix(g) {
        let max_height = layer
            .iter()
            .filter_map(|v| g.node(v))
            .map(|n| n.height)
            .fold(0.0, f64::max);
        for v in &layer {
            if let Some(node) = g.node_mut(v) {
                node.y = Some(prev_y + max_height / 2.0);
            }
        }
        prev_y += max_height + ranksep;
    }
}
