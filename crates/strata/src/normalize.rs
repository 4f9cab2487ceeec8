//! Splits every edge spanning more than one rank into a chain of unit-length edges through
//! dummy nodes, and folds the chains back into bend points once coordinates are known.

use crate::graphlib::EdgeKey;
use crate::model::{Dummy, EdgeLabel, LayoutGraph, NodeLabel, Point};
use crate::util::add_dummy_node;

pub fn run(g: &mut LayoutGraph) {
    g.graph_mut().dummy_chains.clear();
    for e in g.edge_keys() {
        normalize_edge(g, e);
    }
}

fn normalize_edge(g: &mut LayoutGraph, e: EdgeKey) {
    let rank = |g: &LayoutGraph, v: &str| g.node(v).and_then(|n| n.rank).unwrap_or(0);
    let v_rank = rank(g, &e.v);
    let w_rank = rank(g, &e.w);
    // Unit edges need no chain, and a flat or upward edge has no rank to put a dummy on:
    // either way the edge keeps its label untouched.
    if w_rank <= v_rank + 1 {
        return;
    }
    let Some(mut label) = g.remove_edge_key(&e) else {
        return;
    };
    label.points.clear();
    let weight = label.weight;
    let label_rank = label.label_rank;

    let mut prev = e.v.clone();
    for r in v_rank + 1..w_rank {
        let mut dummy = NodeLabel {
            rank: Some(r),
            edge_obj: Some(e.clone()),
            ..Default::default()
        };
        let mut kind = Dummy::Edge;
        if label_rank == Some(r) {
            dummy.width = label.width;
            dummy.height = label.height;
            dummy.labelpos = Some(label.labelpos);
            kind = Dummy::EdgeLabel;
        }
        let first = prev == e.v;
        if first {
            dummy.edge_label = Some(Box::new(label.clone()));
        }

        let id = add_dummy_node(g, kind, dummy, "_d");
        if first {
            g.graph_mut().dummy_chains.push(id.clone());
        }
        g.set_edge_named(prev, id.clone(), e.name.clone(), EdgeLabel::with_weight(weight));
        prev = id;
    }

    g.set_edge_named(prev, e.w.clone(), e.name.clone(), EdgeLabel::with_weight(weight));
}

/// Removes each dummy chain, restoring the original edge with one bend point per dummy.
/// The label dummy also hands its position and size to the edge label.
pub fn undo(g: &mut LayoutGraph) {
    let chains = std::mem::take(&mut g.graph_mut().dummy_chains);
    for start in chains {
        let Some(node) = g.node(&start) else {
            continue;
        };
        let (Some(mut label), Some(edge_obj)) = (node.edge_label.clone(), node.edge_obj.clone())
        else {
            continue;
        };

        let mut v = Some(start);
        while let Some(id) = v.take() {
            let Some(node) = g.node(&id) else {
                break;
            };
            if !node.is_dummy() {
                break;
            }
            let (x, y) = (node.x.unwrap_or(0.0), node.y.unwrap_or(0.0));
            label.points.push(Point::new(x, y));
            if node.dummy == Some(Dummy::EdgeLabel) {
                label.x = Some(x);
                label.y = Some(y);
                label.width = node.width;
                label.height = node.height;
            }
            v = g.successors(&id).first().map(|w| w.to_string());
            g.remove_node(&id);
        }

        g.set_edge_key(edge_obj, *label);
    }
}
