use crate::graphlib::{EdgeKey, alg};
use crate::model::LayoutGraph;
use rustc_hash::FxHashMap as HashMap;

/// Initial ranking: every node as low as its successors allow, with sinks on rank 0.
///
/// Ranks are not normalized and are usually negative. Requires an acyclic graph.
pub fn longest_path(g: &mut LayoutGraph) {
    let sources: Vec<String> = g.sources().into_iter().map(str::to_string).collect();
    let roots: Vec<&str> = sources.iter().map(String::as_str).collect();
    // Postorder finishes every successor of a node before the node itself.
    let order = alg::postorder(g, &roots);

    let mut ranks: HashMap<String, i32> = HashMap::default();
    for v in order {
        let rank = g
            .out_edges(&v, None)
            .iter()
            .filter_map(|e| {
                let minlen = g.edge_by_key(e).map_or(1, |l| l.minlen);
                ranks.get(&e.w).map(|r| r - minlen)
            })
            .min()
            .unwrap_or(0);
        if let Some(node) = g.node_mut(&v) {
            node.rank = Some(rank);
        }
        ranks.insert(v, rank);
    }
}

/// Longest path ranking that honours nodes pinned with `layer`.
///
/// Free nodes are shifted so the smallest rank is 0. Each pinned node then takes its layer
/// and pushes its descendants down until every edge below it respects `minlen`.
pub fn longest_path_with_layer(g: &mut LayoutGraph) {
    longest_path(g);
    let min_rank = g
        .node_labels()
        .filter_map(|(_, n)| n.rank)
        .min()
        .unwrap_or(0);

    let mut pinned: Vec<(String, i32)> = Vec::new();
    for (v, node) in g.node_labels_mut() {
        match node.layer {
            Some(layer) => pinned.push((v.to_string(), layer)),
            None => {
                if let Some(rank) = node.rank.as_mut() {
                    *rank -= min_rank;
                }
            }
        }
    }

    for (start, layer) in pinned {
        let mut stack = vec![(start.clone(), layer)];
        while let Some((v, next_rank)) = stack.pop() {
            let Some(node) = g.node_mut(&v) else {
                continue;
            };
            let current = node.layer.unwrap_or(next_rank);
            let raised = node.rank.is_none_or(|r| r < current);
            if raised {
                node.rank = Some(current);
            }
            if !raised && v != start {
                continue;
            }
            for e in g.out_edges(&v, None) {
                let minlen = g.edge_by_key(&e).map_or(1, |l| l.minlen);
                stack.push((e.w, current + minlen));
            }
        }
    }
}

/// How much longer than its `minlen` the edge currently is. Missing ranks count as 0.
pub fn slack(g: &LayoutGraph, e: &EdgeKey) -> i32 {
    let rank = |v: &str| g.node(v).and_then(|n| n.rank).unwrap_or(0);
    let minlen = g.edge_by_key(e).map_or(1, |l| l.minlen);
    rank(&e.w) - rank(&e.v) - minlen
}
