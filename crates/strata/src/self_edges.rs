//! Self-loops are parked on their node while the graph is ranked and ordered, occupy a dummy
//! slot beside the node during positioning, and come back as a five-point loop.

use crate::model::{Dummy, LayoutGraph, NodeLabel, Point, SelfEdge};
use crate::util::{add_dummy_node, build_layer_matrix};

pub fn remove_self_edges(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        if !e.is_self_loop() {
            continue;
        }
        let Some(label) = g.remove_edge_key(&e) else {
            continue;
        };
        if let Some(node) = g.node_mut(&e.v) {
            node.self_edges.push(SelfEdge { edge_obj: e, label });
        }
    }
}

/// Gives each parked self-loop a dummy right after its node, shifting the rest of the rank.
pub fn insert_self_edges(g: &mut LayoutGraph) {
    for layer in build_layer_matrix(g) {
        let mut shift = 0;
        for (i, v) in layer.iter().enumerate() {
            let Some(node) = g.node_mut(v) else {
                continue;
            };
            node.order = Some(i + shift);
            let rank = node.rank;
            let self_edges = std::mem::take(&mut node.self_edges);

            for se in self_edges {
                shift += 1;
                let label = NodeLabel {
                    width: se.label.width,
                    height: se.label.height,
                    rank,
                    order: Some(i + shift),
                    edge_obj: Some(se.edge_obj),
                    edge_label: Some(Box::new(se.label)),
                    ..Default::default()
                };
                add_dummy_node(g, Dummy::SelfEdge, label, "_se");
            }
        }
    }
}

/// Replaces each self-loop dummy with its edge, looping from the node's right side out to
/// the dummy's position and back.
pub fn position_self_edges(g: &mut LayoutGraph) {
    for id in g.node_ids() {
        let Some(dummy) = g.node(&id).filter(|n| n.dummy == Some(Dummy::SelfEdge)) else {
            continue;
        };
        let (Some(x), Some(y)) = (dummy.x, dummy.y) else {
            continue;
        };
        let (Some(edge_obj), Some(label)) = (dummy.edge_obj.clone(), dummy.edge_label.clone())
        else {
            continue;
        };
        let Some(owner) = g.node(&edge_obj.v) else {
            continue;
        };
        let (Some(owner_x), Some(owner_y)) = (owner.x, owner.y) else {
            continue;
        };

        let start = owner_x + owner.width / 2.0;
        let dx = x - start;
        let dy = owner.height / 2.0;
        let mut label = *label;
        label.points = vec![
            Point::new(start + 2.0 * dx / 3.0, owner_y - dy),
            Point::new(start + 5.0 * dx / 6.0, owner_y - dy),
            Point::new(start + dx, owner_y),
            Point::new(start + 5.0 * dx / 6.0, owner_y + dy),
            Point::new(start + 2.0 * dx / 3.0, owner_y + dy),
        ];
        label.x = Some(x);
        label.y = Some(y);

        g.set_edge_key(edge_obj, label);
        g.remove_node(&id);
    }
}
