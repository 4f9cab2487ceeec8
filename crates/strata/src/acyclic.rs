//! Makes the graph acyclic by reversing a feedback arc set, and restores it afterwards.

use crate::greedy_fas::greedy_fas;
use crate::graphlib::EdgeKey;
use crate::model::{Acyclicer, EdgeLabel, LayoutGraph};
use rustc_hash::FxHashSet as HashSet;

pub fn run(g: &mut LayoutGraph) {
    let fas = match g.graph().acyclicer {
        Acyclicer::Greedy => greedy_fas(&*g, edge_weight),
        Acyclicer::Dfs => dfs_fas(g),
    };

    for e in fas {
        if e.is_self_loop() {
            continue;
        }
        let Some(mut label) = g.remove_edge_key(&e) else {
            continue;
        };
        label.forward_name = e.name.clone();
        label.reversed = true;
        let name = reversed_name(g, &e);
        g.set_edge_named(e.w, e.v, Some(name), label);
    }
}

/// Flips every reversed edge back to its original orientation and name.
pub fn undo(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        if !g.edge_by_key(&e).is_some_and(|l| l.reversed) {
            continue;
        }
        let Some(mut label) = g.remove_edge_key(&e) else {
            continue;
        };
        label.reversed = false;
        let name = label.forward_name.take();
        g.set_edge_named(e.w, e.v, name, label);
    }
}

/// Zero and non-finite weights count as 1.
fn edge_weight(label: &EdgeLabel) -> i64 {
    let w = label.weight.round();
    if w == 0.0 || !w.is_finite() { 1 } else { w as i64 }
}

fn reversed_name(g: &mut LayoutGraph, e: &EdgeKey) -> String {
    loop {
        let name = g.graph_mut().ids.next("rev");
        if !g.has_edge(&e.w, &e.v, Some(&name)) {
            return name;
        }
    }
}

/// Back edges of a depth-first walk started from every node in insertion order.
fn dfs_fas(g: &LayoutGraph) -> Vec<EdgeKey> {
    let mut fas = Vec::new();
    let mut visited: HashSet<String> = HashSet::default();
    let mut on_stack: HashSet<String> = HashSet::default();

    for root in g.nodes() {
        if !visited.insert(root.to_string()) {
            continue;
        }
        on_stack.insert(root.to_string());
        let mut stack = vec![(root.to_string(), g.out_edges(root, None).into_iter())];

        while let Some((v, pending)) = stack.last_mut() {
            let Some(e) = pending.next() else {
                on_stack.remove(v.as_str());
                stack.pop();
                continue;
            };
            if e.is_self_loop() {
                continue;
            }
            if on_stack.contains(&e.w) {
                fas.push(e);
            } else if visited.insert(e.w.clone()) {
                on_stack.insert(e.w.clone());
                let next = g.out_edges(&e.w, None).into_iter();
                stack.push((e.w, next));
            }
        }
    }

    fas
}
