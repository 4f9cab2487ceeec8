//! Network simplex ranking (Gansner et al., "A Technique for Drawing Directed Graphs").
//!
//! 1. Longest path gives a feasible initial ranking.
//! 2. A feasible tree of tight edges is built on top of it.
//! 3. While some tree edge has a negative cut value, it is swapped for the non-tree edge
//!    with minimum slack that reconnects the two halves, and ranks are re-derived from the
//!    new tree.
//!
//! The pivot loop runs on a simplified copy of the graph; only the resulting ranks are
//! written back.

use super::feasible_tree::feasible_tree;
use super::tree::FeasibleTree;
use super::util::{longest_path, slack};
use crate::graphlib::EdgeKey;
use crate::model::LayoutGraph;
use crate::util::simplify;
use rustc_hash::FxHashSet as HashSet;

pub fn network_simplex(g: &mut LayoutGraph) {
    let mut simple = simplify(g);
    longest_path(&mut simple);
    let mut t = feasible_tree(&mut simple);
    init_low_lim_values(&mut t, None);
    init_cut_values(&mut t, &simple);

    let mut pivots = 0usize;
    while let Some(e) = leave_edge(&t) {
        let Some(f) = enter_edge(&t, &simple, &e) else {
            break;
        };
        exchange_edges(&mut t, &mut simple, &e, &f);
        pivots += 1;
    }
    tracing::trace!(pivots, nodes = simple.node_count(), "network simplex converged");

    for (v, node) in simple.node_labels() {
        if let Some(target) = g.node_mut(v) {
            target.rank = node.rank;
        }
    }
}

/// Numbers the tree by a depth-first walk from `root` (the first tree node by default):
/// `lim` is the postorder index and `low` the smallest `lim` in the node's subtree.
pub fn init_low_lim_values(t: &mut FeasibleTree, root: Option<&str>) {
    let Some(root) = root.or_else(|| t.nodes().next()).map(str::to_string) else {
        return;
    };

    let mut numbering: Vec<(String, i32, i32, Option<String>)> = Vec::new();
    let mut visited: HashSet<String> = HashSet::default();
    visited.insert(root.clone());
    let first: Vec<String> = t.neighbors(&root).map(str::to_string).collect();
    // (node, parent, low, unvisited neighbours)
    let mut stack = vec![(root, None::<String>, 1, first.into_iter())];
    let mut next_lim = 1;

    while let Some((_, _, _, pending)) = stack.last_mut() {
        match pending.next() {
            Some(w) => {
                if !visited.insert(w.clone()) {
                    continue;
                }
                let parent = stack.last().map(|(v, ..)| v.clone());
                let kids: Vec<String> = t.neighbors(&w).map(str::to_string).collect();
                stack.push((w, parent, next_lim, kids.into_iter()));
            }
            None => {
                if let Some((v, parent, low, _)) = stack.pop() {
                    numbering.push((v, low, next_lim, parent));
                    next_lim += 1;
                }
            }
        }
    }

    for (v, low, lim, parent) in numbering {
        if let Some(node) = t.node_mut(&v) {
            node.low = low;
            node.lim = lim;
            node.parent = parent;
        }
    }
}

/// Tree nodes ordered by `lim`, so children always come before their parent.
fn by_lim(t: &FeasibleTree) -> Vec<String> {
    let mut vs: Vec<(i32, String)> = t
        .nodes()
        .filter_map(|v| t.node(v).map(|n| (n.lim, v.to_string())))
        .collect();
    vs.sort_by_key(|(lim, _)| *lim);
    vs.into_iter().map(|(_, v)| v).collect()
}

pub fn init_cut_values(t: &mut FeasibleTree, g: &LayoutGraph) {
    for child in by_lim(t) {
        let Some(parent) = t.node(&child).and_then(|n| n.parent.clone()) else {
            continue;
        };
        let cut = calc_cut_value(t, g, &child);
        t.set_cut_value(&child, &parent, cut);
    }
}

/// Cut value of the tree edge between `child` and its tree parent.
///
/// Every other graph edge at `child` adds its weight when it points the same way as the tree
/// edge and subtracts it otherwise. Tree edges below `child` fold their own, already
/// computed, cut values back in.
pub fn calc_cut_value(t: &FeasibleTree, g: &LayoutGraph, child: &str) -> f64 {
    let Some(parent) = t.node(child).and_then(|n| n.parent.as_deref()) else {
        return 0.0;
    };

    let (child_is_tail, tree_edge) = match g.edge(child, parent, None) {
        Some(edge) => (true, edge),
        None => match g.edge(parent, child, None) {
            Some(edge) => (false, edge),
            None => return 0.0,
        },
    };
    let mut cut = tree_edge.weight;

    for e in g.node_edges(child, None) {
        let is_out = e.v == child;
        let other = if is_out { &e.w } else { &e.v };
        if other == parent {
            continue;
        }
        let points_to_head = is_out == child_is_tail;
        let weight = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
        cut += if points_to_head { weight } else { -weight };

        if let Some(other_cut) = t.cut_value(child, other) {
            cut += if points_to_head { -other_cut } else { other_cut };
        }
    }

    cut
}

/// First tree edge with a negative cut value.
pub fn leave_edge(t: &FeasibleTree) -> Option<(String, String)> {
    t.edges()
        .find(|(_, _, cut)| *cut < 0.0)
        .map(|(v, w, _)| (v.to_string(), w.to_string()))
}

/// The non-tree edge with minimum slack that crosses from the head component of the
/// leaving edge back to its tail component.
pub fn enter_edge(t: &FeasibleTree, g: &LayoutGraph, edge: &(String, String)) -> Option<EdgeKey> {
    let (mut v, mut w) = (edge.0.as_str(), edge.1.as_str());
    if !g.has_edge(v, w, None) {
        std::mem::swap(&mut v, &mut w);
    }

    let v_label = t.node(v)?;
    let w_label = t.node(w)?;
    // When the root lies on the tail side, the component test flips.
    let (tail, flip) = if v_label.lim > w_label.lim {
        (w_label, true)
    } else {
        (v_label, false)
    };
    let in_tail = |x: &str| {
        t.node(x)
            .is_some_and(|n| tail.low <= n.lim && n.lim <= tail.lim)
    };

    let mut best: Option<(i32, &EdgeKey)> = None;
    for e in g.edges() {
        if flip != in_tail(&e.v) || flip == in_tail(&e.w) {
            continue;
        }
        let s = slack(g, e);
        if best.is_none_or(|(min, _)| s < min) {
            best = Some((s, e));
        }
    }
    best.map(|(_, e)| e.clone())
}

/// Replaces tree edge `e` with graph edge `f` and recomputes numbering, cut values and ranks.
pub fn exchange_edges(
    t: &mut FeasibleTree,
    g: &mut LayoutGraph,
    e: &(String, String),
    f: &EdgeKey,
) {
    t.remove_edge(&e.0, &e.1);
    t.add_edge(&f.v, &f.w);
    init_low_lim_values(t, None);
    init_cut_values(t, g);
    update_ranks(t, g);
}

/// Re-derives every rank from the root of the tree, each node `minlen` away from its parent.
fn update_ranks(t: &FeasibleTree, g: &mut LayoutGraph) {
    let mut order = by_lim(t);
    order.reverse();

    for v in order.into_iter().skip(1) {
        let Some(parent) = t.node(&v).and_then(|n| n.parent.clone()) else {
            continue;
        };
        let (minlen, flipped) = match g.edge(&v, &parent, None) {
            Some(edge) => (edge.minlen, false),
            None => match g.edge(&parent, &v, None) {
                Some(edge) => (edge.minlen, true),
                None => continue,
            },
        };
        let parent_rank = g.node(&parent).and_then(|n| n.rank).unwrap_or(0);
        if let Some(node) = g.node_mut(&v) {
            node.rank = Some(if flipped {
                parent_rank + minlen
            } else {
                parent_rank - minlen
            });
        }
    }
}
