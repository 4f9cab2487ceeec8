//! Maps between the caller's rank direction and the top-to-bottom frame the pipeline works in.

use crate::model::{LayoutGraph, RankDir};

/// Enters the top-to-bottom frame. Horizontal layouts swap node and label sizes so ranks are
/// spaced by width; any coordinates already present are mapped as well.
pub fn adjust(g: &mut LayoutGraph) {
    let rankdir = g.graph().rankdir;
    if rankdir.is_horizontal() {
        swap_width_height(g);
        swap_xy(g);
    }
    if matches!(rankdir, RankDir::BT | RankDir::RL) {
        reverse_y(g);
    }
}

/// Leaves the top-to-bottom frame; the exact inverse of [`adjust`].
pub fn undo(g: &mut LayoutGraph) {
    let rankdir = g.graph().rankdir;
    if matches!(rankdir, RankDir::BT | RankDir::RL) {
        reverse_y(g);
    }
    if rankdir.is_horizontal() {
        swap_xy(g);
        swap_width_height(g);
    }
}

fn swap_width_height(g: &mut LayoutGraph) {
    for (_, node) in g.node_labels_mut() {
        std::mem::swap(&mut node.width, &mut node.height);
        for se in &mut node.self_edges {
            std::mem::swap(&mut se.label.width, &mut se.label.height);
        }
    }
    for (_, edge) in g.edge_labels_mut() {
        std::mem::swap(&mut edge.width, &mut edge.height);
    }
}

fn reverse_y(g: &mut LayoutGraph) {
    for (_, node) in g.node_labels_mut() {
        node.y = node.y.map(|y| -y);
    }
    for (_, edge) in g.edge_labels_mut() {
        for p in &mut edge.points {
            p.y = -p.y;
        }
        edge.y = edge.y.map(|y| -y);
    }
}

fn swap_xy(g: &mut LayoutGraph) {
    for (_, node) in g.node_labels_mut() {
        std::mem::swap(&mut node.x, &mut node.y);
    }
    for (_, edge) in g.edge_labels_mut() {
        for p in &mut edge.points {
            std::mem::swap(&mut p.x, &mut p.y);
        }
        std::mem::swap(&mut edge.x, &mut edge.y);
    }
}
