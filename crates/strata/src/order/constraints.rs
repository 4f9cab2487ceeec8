use super::ConstraintGraph;
use super::layer_graph::LayerGraph;
use rustc_hash::FxHashMap as HashMap;

/// Records, for each pair of sibling subgraphs that appear one after the other in `vs`, that
/// the first must stay left of the second on later ranks.
pub fn add_subgraph_constraints(lg: &LayerGraph, cg: &mut ConstraintGraph, vs: &[String]) {
    let mut prev: HashMap<&str, &str> = HashMap::default();
    let mut root_prev: Option<&str> = None;

    for v in vs {
        let mut child = lg.parent(v);
        while let Some(c) = child {
            let parent = lg.parent(c);
            let prev_child = match parent {
                Some(p) => prev.insert(p, c),
                None => root_prev.replace(c),
            };
            if let Some(prev_child) = prev_child.filter(|&pc| pc != c) {
                cg.set_edge(prev_child, c, ());
                break;
            }
            child = parent;
        }
    }
}
