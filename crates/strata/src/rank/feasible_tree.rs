//! Spanning tree of tight edges (Gansner et al., "A Technique for Drawing Directed Graphs").
//!
//! Starting from the first node, the tree grows along edges with zero slack. When it cannot
//! grow any further, the tree is shifted by the slack of the cheapest edge leaving it, which
//! makes that edge tight, and growth resumes. Ranks must already respect `minlen`.

use super::tree::FeasibleTree;
use super::util::slack;
use crate::graphlib::EdgeKey;
use crate::model::LayoutGraph;

pub fn feasible_tree(g: &mut LayoutGraph) -> FeasibleTree {
    build(g, false)
}

/// Like [`feasible_tree`], but nodes pinned with `layer` join the tree as if their edge were
/// tight, so their ranks are never adjusted relative to the tree.
pub fn feasible_tree_with_layer(g: &mut LayoutGraph) -> FeasibleTree {
    build(g, true)
}

fn build(g: &mut LayoutGraph, pinned_are_tight: bool) -> FeasibleTree {
    let mut t = FeasibleTree::new();
    let Some(start) = g.nodes().next().map(str::to_string) else {
        return t;
    };
    let size = g.node_count();
    t.add_node(&start);

    while tight_tree(&mut t, g, pinned_are_tight) < size {
        let Some(e) = find_min_slack_edge(&t, g) else {
            break;
        };
        let delta = if t.has_node(&e.v) {
            slack(g, &e)
        } else {
            -slack(g, &e)
        };
        shift_ranks(&t, g, delta);
    }

    t
}

/// Grows `t` along tight edges as far as possible and returns its size.
fn tight_tree(t: &mut FeasibleTree, g: &LayoutGraph, pinned_are_tight: bool) -> usize {
    let seeds: Vec<String> = t.nodes().map(str::to_string).collect();
    for seed in seeds {
        let mut stack = vec![seed];
        while let Some(v) = stack.pop() {
            for e in g.node_edges(&v, None) {
                let w = if e.v == v { &e.w } else { &e.v };
                if t.has_node(w) {
                    continue;
                }
                let pinned = pinned_are_tight && g.node(w).is_some_and(|n| n.layer.is_some());
                if pinned || slack(g, &e) == 0 {
                    t.add_edge(&v, w);
                    stack.push(w.clone());
                }
            }
        }
    }
    t.node_count()
}

/// The edge with exactly one endpoint in `t` and the smallest slack; the first one wins ties.
fn find_min_slack_edge(t: &FeasibleTree, g: &LayoutGraph) -> Option<EdgeKey> {
    let mut best: Option<(i32, &EdgeKey)> = None;
    for e in g.edges() {
        if t.has_node(&e.v) == t.has_node(&e.w) {
            continue;
        }
        let s = slack(g, e);
        if best.is_none_or(|(min, _)| s < min) {
            best = Some((s, e));
        }
    }
    best.map(|(_, e)| e.clone())
}

fn shift_ranks(t: &FeasibleTree, g: &mut LayoutGraph, delta: i32) {
    for v in t.nodes() {
        if let Some(node) = g.node_mut(v) {
            node.rank = Some(node.rank.unwrap_or(0) + delta);
        }
    }
}
