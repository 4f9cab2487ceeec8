use crate::graphlib::{Graph, GraphOptions};
use crate::model::LayoutGraph;
use crate::util::unique_id;
use crate::Result;

/// Which neighbours of a rank feed its barycenters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    InEdges,
    OutEdges,
}

/// A layer graph only carries what sorting needs that cannot be read live from the layout
/// graph: the border nodes a subgraph owns on this rank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerNode {
    pub border_left: Option<String>,
    pub border_right: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayerEdge {
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerGraphLabel {
    pub root: String,
}

pub type LayerGraph = Graph<LayerNode, LayerEdge, LayerGraphLabel>;

/// Builds the graph used to sort one rank.
///
/// It holds every node on `rank` (and every subgraph spanning it) under its original parent,
/// with top-level nodes hung under a fresh root. Neighbours on the adjacent rank selected by
/// `relationship` are added without hierarchy, and their edges always point into the rank,
/// parallel edges collapsed into one summed weight.
pub fn build_layer_graph(
    g: &mut LayoutGraph,
    rank: i32,
    relationship: Relationship,
) -> Result<LayerGraph> {
    let root = unique_id(g, "_root");
    let mut lg: LayerGraph = Graph::new(GraphOptions {
        multigraph: false,
        compound: true,
    });
    lg.set_graph(LayerGraphLabel { root: root.clone() });
    lg.set_node(root.clone(), LayerNode::default());

    for (v, node) in g.node_labels() {
        let spans = node
            .min_rank
            .zip(node.max_rank)
            .is_some_and(|(min, max)| min <= rank && rank <= max);
        if node.rank != Some(rank) && !spans {
            continue;
        }

        let mut label = LayerNode::default();
        if node.min_rank.is_some() {
            let at = |slots: &[Option<String>]| {
                usize::try_from(rank).ok().and_then(|r| slots.get(r).cloned().flatten())
            };
            label.border_left = at(&node.border_left);
            label.border_right = at(&node.border_right);
        }
        lg.set_node(v, label);
        lg.set_parent(v, Some(g.parent(v).unwrap_or(root.as_str())))?;

        let edges = match relationship {
            Relationship::InEdges => g.in_edges(v, None),
            Relationship::OutEdges => g.out_edges(v, None),
        };
        for e in edges {
            let u = if e.v == v { &e.w } else { &e.v };
            let weight = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
            lg.ensure_edge(u, v).weight += weight;
        }
    }

    Ok(lg)
}
