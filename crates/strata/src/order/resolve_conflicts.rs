//! Coalesces barycenter entries that would violate the constraint graph (Forster, "A Fast
//! and Simple Heuristic for Constrained Two-Level Crossing Reduction").

use super::barycenter::BarycenterEntry;
use super::ConstraintGraph;
use rustc_hash::FxHashMap as HashMap;

/// One or more nodes that must stay together, in this internal order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortEntry {
    pub vs: Vec<String>,
    /// Smallest original index of any node in `vs`.
    pub i: usize,
    pub barycenter: Option<f64>,
    pub weight: f64,
    pub fixorder: Option<usize>,
    pub order: Option<usize>,
}

#[derive(Debug)]
struct Pending {
    entry: SortEntry,
    indegree: usize,
    ins: Vec<usize>,
    outs: Vec<usize>,
    merged: bool,
}

/// Walks the constraint graph in topological order. Whenever a constrained predecessor has a
/// barycenter at or after its successor's (or either lacks one), the two are merged into a
/// single entry that keeps the predecessor first.
pub fn resolve_conflicts(entries: &[BarycenterEntry], cg: &ConstraintGraph) -> Vec<SortEntry> {
    let mut index: HashMap<&str, usize> = HashMap::default();
    let mut pending: Vec<Pending> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| {
            index.insert(e.v.as_str(), i);
            Pending {
                entry: SortEntry {
                    vs: vec![e.v.clone()],
                    i,
                    barycenter: e.barycenter,
                    weight: if e.barycenter.is_some() { e.weight } else { 0.0 },
                    ..Default::default()
                },
                indegree: 0,
                ins: Vec::new(),
                outs: Vec::new(),
                merged: false,
            }
        })
        .collect();

    for e in cg.edges() {
        if let (Some(&v), Some(&w)) = (index.get(e.v.as_str()), index.get(e.w.as_str())) {
            pending[w].indegree += 1;
            pending[v].outs.push(w);
        }
    }

    let mut sources: Vec<usize> = (0..pending.len())
        .filter(|&i| pending[i].indegree == 0)
        .collect();
    let mut visited = Vec::new();

    while let Some(v) = sources.pop() {
        visited.push(v);

        let ins: Vec<usize> = pending[v].ins.iter().rev().copied().collect();
        for u in ins {
            if pending[u].merged {
                continue;
            }
            let should_merge = match (pending[u].entry.barycenter, pending[v].entry.barycenter) {
                (Some(ub), Some(vb)) => ub >= vb,
                _ => true,
            };
            if should_merge {
                merge_entries(&mut pending, v, u);
            }
        }

        let outs = std::mem::take(&mut pending[v].outs);
        for w in outs {
            pending[w].ins.push(v);
            pending[w].indegree -= 1;
            if pending[w].indegree == 0 {
                sources.push(w);
            }
        }
    }

    let mut out = Vec::with_capacity(visited.len());
    for i in visited {
        if !pending[i].merged {
            out.push(std::mem::take(&mut pending[i].entry));
        }
    }
    out
}

fn merge_entries(pending: &mut [Pending], target: usize, source: usize) {
    let mut sum = 0.0;
    let mut weight = 0.0;
    for idx in [target, source] {
        let e = &pending[idx].entry;
        if let Some(b) = e.barycenter.filter(|_| e.weight != 0.0) {
            sum += b * e.weight;
            weight += e.weight;
        }
    }

    let mut vs = std::mem::take(&mut pending[source].entry.vs);
    vs.append(&mut pending[target].entry.vs);
    let source_i = pending[source].entry.i;
    pending[source].merged = true;

    let t = &mut pending[target].entry;
    t.vs = vs;
    t.barycenter = (weight != 0.0).then(|| sum / weight);
    t.weight = weight;
    t.i = t.i.min(source_i);
}
