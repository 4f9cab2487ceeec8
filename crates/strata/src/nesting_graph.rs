//! Nesting graph: forces every subgraph onto a contiguous span of ranks.
//!
//! A synthetic root is connected to every node, each subgraph gets top and bottom border
//! nodes, and nesting edges keep members between their subgraph's borders. Original edge
//! lengths are stretched by `node_sep` so real nodes never share a rank with a border node;
//! the stretch factor is kept in `node_rank_factor` for `util::remove_empty_ranks`.
//!
//! Based on Sander, "Layout of Compound Directed Graphs".

use crate::model::{BorderSide, Dummy, EdgeLabel, LayoutGraph, NodeLabel};
use crate::util::{add_border_node, add_dummy_node};
use crate::Result;
use rustc_hash::FxHashMap as HashMap;

enum Step {
    Visit(String),
    Link { parent: String, child: String },
    Finish(String),
}

pub fn run(g: &mut LayoutGraph) -> Result<()> {
    let root = add_dummy_node(g, Dummy::Root, NodeLabel::default(), "_root");
    let depths = tree_depths(g);
    let height = depths.values().copied().max().unwrap_or(1).max(1) - 1;
    let node_sep = 2 * height + 1;

    g.graph_mut().nesting_root = Some(root.clone());

    for (_, e) in g.edge_labels_mut() {
        e.minlen *= node_sep;
    }
    let weight = g.edge_labels().map(|(_, e)| e.weight).sum::<f64>() + 1.0;

    let mut steps: Vec<Step> = g
        .children_root()
        .into_iter()
        .rev()
        .map(|v| Step::Visit(v.to_string()))
        .collect();

    while let Some(step) = steps.pop() {
        match step {
            Step::Visit(v) => {
                let children: Vec<String> =
                    g.children(&v).into_iter().map(str::to_string).collect();
                if children.is_empty() {
                    if v != root {
                        g.set_edge(
                            root.clone(),
                            v,
                            EdgeLabel {
                                weight: 0.0,
                                minlen: node_sep,
                                ..Default::default()
                            },
                        );
                    }
                    continue;
                }

                let top = add_border_node(g, BorderSide::Top, "_bt", None, None);
                let bottom = add_border_node(g, BorderSide::Bottom, "_bb", None, None);
                g.set_parent(&top, Some(&v))?;
                g.set_parent(&bottom, Some(&v))?;
                if let Some(label) = g.node_mut(&v) {
                    label.border_top = Some(top);
                    label.border_bottom = Some(bottom);
                }

                steps.push(Step::Finish(v.clone()));
                for child in children.into_iter().rev() {
                    steps.push(Step::Link {
                        parent: v.clone(),
                        child: child.clone(),
                    });
                    steps.push(Step::Visit(child));
                }
            }
            Step::Link { parent, child } => {
                let Some(node) = g.node(&parent) else {
                    continue;
                };
                let (Some(top), Some(bottom)) = (node.border_top.clone(), node.border_bottom.clone())
                else {
                    continue;
                };
                let child_node = g.node(&child);
                let child_top = child_node
                    .and_then(|n| n.border_top.clone())
                    .unwrap_or_else(|| child.clone());
                let child_bottom = child_node
                    .and_then(|n| n.border_bottom.clone())
                    .unwrap_or_else(|| child.clone());
                let this_weight = if child_top != child { weight } else { 2.0 * weight };
                let minlen = if child_top != child_bottom {
                    1
                } else {
                    height - depths.get(&parent).copied().unwrap_or(0) + 1
                };

                let nesting = EdgeLabel {
                    minlen,
                    weight: this_weight,
                    nesting_edge: true,
                    ..Default::default()
                };
                g.set_edge(top, child_top, nesting.clone());
                g.set_edge(child_bottom, bottom, nesting);
            }
            Step::Finish(v) => {
                if g.parent(&v).is_some() {
                    continue;
                }
                let Some(top) = g.node(&v).and_then(|n| n.border_top.clone()) else {
                    continue;
                };
                let depth = depths.get(&v).copied().unwrap_or(0);
                g.set_edge(
                    root.clone(),
                    top,
                    EdgeLabel {
                        weight: 0.0,
                        minlen: height + depth,
                        ..Default::default()
                    },
                );
            }
        }
    }

    g.graph_mut().node_rank_factor = Some(node_sep);
    Ok(())
}

/// Removes the synthetic root and every nesting edge.
pub fn cleanup(g: &mut LayoutGraph) {
    if let Some(root) = g.graph_mut().nesting_root.take() {
        g.remove_node(&root);
    }
    let nesting: Vec<_> = g
        .edge_labels()
        .filter(|(_, e)| e.nesting_edge)
        .map(|(k, _)| k.clone())
        .collect();
    for e in nesting {
        g.remove_edge_key(&e);
    }
}

/// Depth of every node in the hierarchy; top-level nodes have depth 1.
fn tree_depths(g: &LayoutGraph) -> HashMap<String, i32> {
    let mut depths = HashMap::default();
    let mut stack: Vec<(&str, i32)> = g.children_root().into_iter().map(|v| (v, 1)).collect();
    while let Some((v, depth)) = stack.pop() {
        depths.insert(v.to_string(), depth);
        stack.extend(g.children(v).into_iter().map(|c| (c, depth + 1)));
    }
    depths
}
