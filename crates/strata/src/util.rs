//! Shared helpers used by several pipeline stages.

use crate::graphlib::{Graph, GraphOptions};
use crate::model::{Dummy, EdgeLabel, LayoutGraph, NodeLabel, Point};
use rustc_hash::FxHashMap as HashMap;

/// Next dummy id for `prefix` that is not already taken in `g`.
pub fn unique_id(g: &mut LayoutGraph, prefix: &str) -> String {
    loop {
        let id = g.graph_mut().ids.next(prefix);
        if !g.has_node(&id) {
            return id;
        }
    }
}

/// Adds `label` as a synthetic node of kind `dummy` and returns its id.
pub fn add_dummy_node(
    g: &mut LayoutGraph,
    dummy: Dummy,
    mut label: NodeLabel,
    prefix: &str,
) -> String {
    let v = unique_id(g, prefix);
    label.dummy = Some(dummy);
    g.set_node(v.clone(), label);
    v
}

/// Adds a zero-sized border node, optionally already placed at `(rank, order)`.
pub fn add_border_node(
    g: &mut LayoutGraph,
    side: crate::model::BorderSide,
    prefix: &str,
    rank: Option<i32>,
    order: Option<usize>,
) -> String {
    let label = NodeLabel {
        rank,
        order: rank.and(order),
        ..Default::default()
    };
    add_dummy_node(g, Dummy::Border(side), label, prefix)
}

/// Collapses parallel edges into one edge per `(v, w)` pair: weights are summed and the
/// largest `minlen` wins. The result is neither a multigraph nor compound.
pub fn simplify(g: &LayoutGraph) -> LayoutGraph {
    let mut simplified: LayoutGraph = Graph::new(GraphOptions::default());
    simplified.set_graph(g.graph().clone());
    for (v, label) in g.node_labels() {
        simplified.set_node(v, label.clone());
    }
    for (e, label) in g.edge_labels() {
        let (weight, minlen) = simplified
            .edge(&e.v, &e.w, None)
            .map_or((0.0, 1), |s| (s.weight, s.minlen));
        simplified.set_edge(
            e.v.clone(),
            e.w.clone(),
            EdgeLabel {
                weight: weight + label.weight,
                minlen: minlen.max(label.minlen),
                ..Default::default()
            },
        );
    }
    simplified
}

/// Copy of `g` without the hierarchy and without subgraph nodes (nodes that have children).
pub fn as_non_compound_graph(g: &LayoutGraph) -> LayoutGraph {
    let mut flat: LayoutGraph = Graph::new(GraphOptions {
        multigraph: g.is_multigraph(),
        compound: false,
    });
    flat.set_graph(g.graph().clone());
    for (v, label) in g.node_labels() {
        if !g.has_children(v) {
            flat.set_node(v, label.clone());
        }
    }
    for (e, label) in g.edge_labels() {
        flat.set_edge_key(e.clone(), label.clone());
    }
    flat
}

/// Where a line from `point` towards the centre of the rectangle crosses its boundary.
///
/// A point sitting exactly on the centre has no direction, and a rectangle with no extent has
/// no boundary. Both return the centre itself rather than the origin.
pub fn intersect_rect(center: Point, width: f64, height: f64, point: Point) -> Point {
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    let mut w = width / 2.0;
    let mut h = height / 2.0;

    if (dx == 0.0 && dy == 0.0) || (w == 0.0 && h == 0.0) {
        return center;
    }

    let (sx, sy) = if dx == 0.0 || dy.abs() * w > dx.abs() * h {
        // top or bottom side
        if dy < 0.0 {
            h = -h;
        }
        (h * dx / dy, h)
    } else {
        if dx < 0.0 {
            w = -w;
        }
        (w, w * dy / dx)
    };

    Point::new(center.x + sx, center.y + sy)
}

pub fn max_rank(g: &LayoutGraph) -> Option<i32> {
    g.node_labels().filter_map(|(_, n)| n.rank).max()
}

/// Node ids grouped by rank (index) and sorted by `order` within each rank.
pub fn build_layer_matrix(g: &LayoutGraph) -> Vec<Vec<String>> {
    let Some(max) = max_rank(g) else {
        return Vec::new();
    };
    let mut layers: Vec<Vec<(usize, &str)>> = vec![Vec::new(); (max.max(-1) + 1) as usize];
    for (v, node) in g.node_labels() {
        let Some(rank) = node.rank.filter(|r| *r >= 0) else {
            continue;
        };
        layers[rank as usize].push((node.order.unwrap_or(0), v));
    }
    layers
        .into_iter()
        .map(|mut layer| {
            layer.sort_by_key(|(order, _)| *order);
            layer.into_iter().map(|(_, v)| v.to_string()).collect()
        })
        .collect()
}

/// Shifts ranks so the smallest one is 0.
pub fn normalize_ranks(g: &mut LayoutGraph) {
    let Some(min) = g.node_labels().filter_map(|(_, n)| n.rank).min() else {
        return;
    };
    for (_, node) in g.node_labels_mut() {
        if let Some(rank) = node.rank.as_mut() {
            *rank -= min;
        }
    }
}

/// Drops ranks left empty by the nesting graph, except those on a multiple of the node rank
/// factor, which are kept so that real nodes stay on their own ranks.
pub fn remove_empty_ranks(g: &mut LayoutGraph) {
    let Some(offset) = g.node_labels().filter_map(|(_, n)| n.rank).min() else {
        return;
    };
    let factor = g.graph().node_rank_factor.filter(|f| *f > 0);

    let mut layers: HashMap<i32, Vec<String>> = HashMap::default();
    let mut top = 0;
    for (v, node) in g.node_labels() {
        let Some(rank) = node.rank else {
            continue;
        };
        top = top.max(rank - offset);
        layers.entry(rank - offset).or_default().push(v.to_string());
    }

    let mut delta = 0;
    for i in 0..=top {
        match layers.get(&i) {
            None if factor.is_none_or(|f| i % f != 0) => delta -= 1,
            Some(vs) if delta != 0 => {
                for v in vs {
                    if let Some(rank) = g.node_mut(v).and_then(|n| n.rank.as_mut()) {
                        *rank += delta;
                    }
                }
            }
            _ => {}
        }
    }
}

/// Copies the ranks of each subgraph's top and bottom border nodes into its
/// `min_rank`/`max_rank`, and records the largest rank on the graph label.
pub fn assign_rank_min_max(g: &mut LayoutGraph) {
    let mut spans: Vec<(String, Option<i32>, Option<i32>)> = Vec::new();
    for (v, node) in g.node_labels() {
        let Some(top) = node.border_top.as_deref() else {
            continue;
        };
        let min = g.node(top).and_then(|n| n.rank);
        let max = node
            .border_bottom
            .as_deref()
            .and_then(|b| g.node(b))
            .and_then(|n| n.rank);
        spans.push((v.to_string(), min, max));
    }

    let mut max_rank = 0;
    for (v, min, max) in spans {
        if let Some(node) = g.node_mut(&v) {
            node.min_rank = min;
            node.max_rank = max;
        }
        if let Some(max) = max {
            max_rank = max_rank.max(max);
        }
    }
    g.graph_mut().max_rank = Some(max_rank);
}
