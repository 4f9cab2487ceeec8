use crate::model::LayoutGraph;
use crate::util::build_layer_matrix;

/// Repeatedly swaps neighbouring siblings on every rank while doing so strictly lowers the
/// weighted crossings they take part in. Returns the number of swaps made.
///
/// Border nodes and nodes pinned with `fixorder` never move, and only nodes with the same
/// parent are swapped so every subgraph stays contiguous.
pub fn transpose(g: &mut LayoutGraph) -> usize {
    let mut layering = build_layer_matrix(g);
    let mut swaps = 0;

    loop {
        let mut improved = false;
        for layer in &mut layering {
            for i in 1..layer.len() {
                let (a, b) = (&layer[i - 1], &layer[i]);
                if !swappable(g, a, b) {
                    continue;
                }
                if crossings(g, b, a) >= crossings(g, a, b) {
                    continue;
                }
                layer.swap(i - 1, i);
                for (order, v) in layer.iter().enumerate().skip(i - 1).take(2) {
                    if let Some(node) = g.node_mut(v) {
                        node.order = Some(order);
                    }
                }
                swaps += 1;
                improved = true;
            }
        }
        if !improved {
            break;
        }
    }

    swaps
}

fn swappable(g: &LayoutGraph, a: &str, b: &str) -> bool {
    let free = |v: &str| {
        g.node(v)
            .is_some_and(|n| n.fixorder.is_none() && !n.dummy.is_some_and(|d| d.is_border()))
    };
    free(a) && free(b) && g.parent(a) == g.parent(b)
}

/// Weighted crossings between the edges of `left` and `right` towards both adjacent ranks,
/// with `left` placed first.
fn crossings(g: &LayoutGraph, left: &str, right: &str) -> f64 {
    let rank = |v: &str| g.node(v).and_then(|n| n.rank);
    let Some(r) = rank(left) else {
        return 0.0;
    };

    let ends = |v: &str, side: i32| -> Vec<(usize, f64)> {
        let edges = if side < 0 {
            g.in_edges(v, None)
        } else {
            g.out_edges(v, None)
        };
        edges
            .into_iter()
            .filter_map(|e| {
                let other = if e.v == v { &e.w } else { &e.v };
                let node = g.node(other)?;
                if node.rank != Some(r + side) {
                    return None;
                }
                Some((node.order?, g.edge_by_key(&e).map_or(0.0, |l| l.weight)))
            })
            .collect()
    };

    let mut total = 0.0;
    for side in [-1, 1] {
        let right_ends = ends(right, side);
        for (lp, lw) in ends(left, side) {
            total += right_ends
                .iter()
                .filter(|(rp, _)| *rp < lp)
                .map(|(_, rw)| lw * rw)
                .sum::<f64>();
        }
    }
    total
}
