use crate::graphlib::alg;
use crate::model::LayoutGraph;
use rustc_hash::FxHashSet as HashSet;

/// Initial layering (Gansner et al.): nodes pinned with `fixorder` go first on their rank in
/// `fixorder` order, then a depth-first walk from nodes sorted by rank appends every other
/// node to its rank as it is first reached.
pub fn init_order(g: &LayoutGraph) -> Vec<Vec<String>> {
    let mut simple: Vec<(i32, &str)> = g
        .node_labels()
        .filter(|(v, _)| !g.has_children(v))
        .filter_map(|(v, n)| n.rank.map(|r| (r, v)))
        .collect();
    let Some(max_rank) = simple.iter().map(|(r, _)| *r).max() else {
        return Vec::new();
    };
    simple.sort_by_key(|(r, _)| *r);

    let mut layers: Vec<Vec<String>> = vec![Vec::new(); (max_rank.max(-1) + 1) as usize];
    let push = |layers: &mut Vec<Vec<String>>, v: &str| {
        let rank = g.node(v).and_then(|n| n.rank).and_then(|r| usize::try_from(r).ok());
        if let Some(layer) = rank.and_then(|r| layers.get_mut(r)) {
            layer.push(v.to_string());
        }
    };

    let mut visited: HashSet<String> = HashSet::default();
    let mut pinned: Vec<(usize, &str)> = simple
        .iter()
        .filter_map(|&(_, v)| g.node(v).and_then(|n| n.fixorder).map(|f| (f, v)))
        .collect();
    pinned.sort_by_key(|(f, _)| *f);
    for (_, v) in pinned {
        push(&mut layers, v);
        visited.insert(v.to_string());
    }

    for &(_, start) in &simple {
        if visited.contains(start) {
            continue;
        }
        let walk = alg::dfs(&[start], alg::DfsOrder::Pre, |v| {
            g.successors(v)
                .into_iter()
                .filter(|w| !visited.contains(*w))
                .map(str::to_string)
                .collect::<Vec<_>>()
        });
        for v in walk {
            push(&mut layers, &v);
            visited.insert(v);
        }
    }

    layers
}

/// Pins real nodes listed in `node_order` to their listed sequence within each rank.
pub fn init_data_order(g: &mut LayoutGraph, node_order: &[String]) {
    let mut next: Vec<usize> = Vec::new();
    for v in node_order {
        let Some(node) = g.node_mut(v) else {
            continue;
        };
        if node.is_dummy() {
            continue;
        }
        let Some(rank) = node.rank.and_then(|r| usize::try_from(r).ok()) else {
            continue;
        };
        if next.len() <= rank {
            next.resize(rank + 1, 0);
        }
        node.fixorder = Some(next[rank]);
        next[rank] += 1;
    }
}
