//! Left and right border nodes for every rank a subgraph spans, linked top to bottom so that
//! ordering keeps each subgraph's contents between its two borders.

use crate::model::{BorderSide, EdgeLabel, LayoutGraph};
use crate::util::add_border_node;
use crate::Result;

pub fn run(g: &mut LayoutGraph) -> Result<()> {
    for v in subgraphs_postorder(g) {
        let Some((min_rank, max_rank)) = g.node(&v).and_then(|n| Some((n.min_rank?, n.max_rank?)))
        else {
            continue;
        };
        let len = max_rank.max(0) as usize + 1;
        if let Some(node) = g.node_mut(&v) {
            node.border_left = vec![None; len];
            node.border_right = vec![None; len];
        }
        for rank in min_rank..=max_rank {
            add_segment(g, &v, BorderSide::Left, "_bl", rank)?;
            add_segment(g, &v, BorderSide::Right, "_br", rank)?;
        }
    }
    Ok(())
}

fn add_segment(
    g: &mut LayoutGraph,
    sg: &str,
    side: BorderSide,
    prefix: &str,
    rank: i32,
) -> Result<()> {
    let column = |g: &LayoutGraph, r: i32| -> Option<String> {
        let node = g.node(sg)?;
        let slots = match side {
            BorderSide::Left => &node.border_left,
            _ => &node.border_right,
        };
        slots.get(usize::try_from(r).ok()?).cloned().flatten()
    };
    let prev = column(g, rank - 1);

    let curr = add_border_node(g, side, prefix, Some(rank), None);
    if let Some(node) = g.node_mut(sg) {
        let slots = match side {
            BorderSide::Left => &mut node.border_left,
            _ => &mut node.border_right,
        };
        let idx = rank.max(0) as usize;
        if idx >= slots.len() {
            slots.resize(idx + 1, None);
        }
        slots[idx] = Some(curr.clone());
    }
    g.set_parent(&curr, Some(sg))?;
    if let Some(prev) = prev {
        g.set_edge(prev, curr, EdgeLabel::with_weight(1.0));
    }
    Ok(())
}

/// Every node of the hierarchy, children before parents.
fn subgraphs_postorder(g: &LayoutGraph) -> Vec<String> {
    let mut out = Vec::new();
    let mut stack: Vec<(String, bool)> = g
        .children_root()
        .into_iter()
        .rev()
        .map(|v| (v.to_string(), false))
        .collect();
    while let Some((v, expanded)) = stack.pop() {
        if expanded {
            out.push(v);
            continue;
        }
        let children: Vec<String> = g.children(&v).into_iter().map(str::to_string).collect();
        stack.push((v, true));
        stack.extend(children.into_iter().rev().map(|c| (c, false)));
    }
    out
}
