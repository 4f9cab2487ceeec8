use super::barycenter::{BarycenterEntry, barycenter};
use super::layer_graph::LayerGraph;
use super::resolve_conflicts::{SortEntry, resolve_conflicts};
use super::sort::{SortResult, sort};
use super::ConstraintGraph;
use crate::model::LayoutGraph;
use rustc_hash::FxHashMap as HashMap;

/// Orders the children of `v` in the layer graph, sorting nested subgraphs first so each
/// one moves as a single block with its aggregated barycenter.
///
/// A subgraph's own border nodes bracket its result, and the orders of the border nodes'
/// predecessors pull the block towards where the subgraph sat on the previous rank.
pub fn sort_subgraph(
    lg: &LayerGraph,
    v: &str,
    cg: &ConstraintGraph,
    g: &LayoutGraph,
    bias_right: bool,
    use_prev: bool,
) -> SortResult {
    let borders = lg
        .node(v)
        .and_then(|n| n.border_left.clone().zip(n.border_right.clone()));
    let movable: Vec<String> = lg
        .children(v)
        .into_iter()
        .filter(|w| {
            borders
                .as_ref()
                .is_none_or(|(bl, br)| *w != bl.as_str() && *w != br.as_str())
        })
        .map(str::to_string)
        .collect();

    let mut barycenters = barycenter(lg, g, &movable);
    let mut subgraphs: HashMap<String, SortResult> = HashMap::default();
    for entry in &mut barycenters {
        if !lg.has_children(&entry.v) {
            continue;
        }
        let result = sort_subgraph(lg, &entry.v, cg, g, bias_right, use_prev);
        if result.barycenter.is_some() {
            merge_barycenters(entry, &result);
        }
        subgraphs.insert(entry.v.clone(), result);
    }

    let mut entries = resolve_conflicts(&barycenters, cg);
    expand_subgraphs(&mut entries, &mut subgraphs);
    for entry in &mut entries {
        if let Some(node) = entry.vs.first().and_then(|first| g.node(first)) {
            entry.fixorder = node.fixorder;
            entry.order = node.order;
        }
    }

    let mut result = sort(entries, bias_right, use_prev);

    if let Some((bl, br)) = borders {
        let order_of_pred = |border: &str| {
            lg.predecessors(border)
                .first()
                .and_then(|p| g.node(p))
                .and_then(|n| n.order)
                .unwrap_or(0) as f64
        };
        if !lg.predecessors(&bl).is_empty() {
            let (b, w) = (result.barycenter.unwrap_or(0.0), result.weight);
            let pull = order_of_pred(bl.as_str()) + order_of_pred(br.as_str());
            result.barycenter = Some((b * w + pull) / (w + 2.0));
            result.weight = w + 2.0;
        }
        let mut vs = Vec::with_capacity(result.vs.len() + 2);
        vs.push(bl);
        vs.append(&mut result.vs);
        vs.push(br);
        result.vs = vs;
    }

    result
}

fn expand_subgraphs(entries: &mut [SortEntry], subgraphs: &mut HashMap<String, SortResult>) {
    for entry in entries {
        entry.vs = std::mem::take(&mut entry.vs)
            .into_iter()
            .flat_map(|v| match subgraphs.remove(&v) {
                Some(sub) => sub.vs,
                None => vec![v],
            })
            .collect();
    }
}

fn merge_barycenters(target: &mut BarycenterEntry, other: &SortResult) {
    let Some(other_bc) = other.barycenter else {
        return;
    };
    match target.barycenter {
        Some(bc) => {
            let weight = target.weight + other.weight;
            target.barycenter = Some((bc * target.weight + other_bc * other.weight) / weight);
            target.weight = weight;
        }
        None => {
            target.barycenter = Some(other_bc);
            target.weight = other.weight;
        }
    }
}
