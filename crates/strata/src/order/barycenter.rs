use super::layer_graph::LayerGraph;
use crate::model::LayoutGraph;

#[derive(Debug, Clone, PartialEq)]
pub struct BarycenterEntry {
    pub v: String,
    /// Weighted mean order of the node's neighbours; `None` when it has none.
    pub barycenter: Option<f64>,
    pub weight: f64,
}

pub fn barycenter(lg: &LayerGraph, g: &LayoutGraph, movable: &[String]) -> Vec<BarycenterEntry> {
    movable
        .iter()
        .map(|v| {
            let in_edges = lg.in_edges(v, None);
            let mut sum = 0.0;
            let mut weight = 0.0;
            for e in &in_edges {
                let w = lg.edge_by_key(e).map_or(0.0, |l| l.weight);
                let order = g.node(&e.v).and_then(|n| n.order).unwrap_or(0);
                sum += w * order as f64;
                weight += w;
            }
            BarycenterEntry {
                v: v.clone(),
                barycenter: (!in_edges.is_empty() && weight != 0.0).then(|| sum / weight),
                weight,
            }
        })
        .collect()
}
