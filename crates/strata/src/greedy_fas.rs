//! Weighted greedy feedback arc set (Eades, Lin and Smyth).
//!
//! Nodes are bucketed by `out - in` weight. Sinks and sources are peeled off first; when
//! neither remains, the node with the largest imbalance is removed and its remaining
//! in-edges join the feedback set.

use crate::graphlib::{EdgeKey, Graph};
use rustc_hash::FxHashMap as HashMap;
use std::collections::VecDeque;

struct Entry {
    id: String,
    in_w: i64,
    out_w: i64,
    alive: bool,
    stamp: u32,
    ins: Vec<(usize, i64)>,
    outs: Vec<(usize, i64)>,
}

struct State {
    nodes: Vec<Entry>,
    buckets: Vec<VecDeque<(usize, u32)>>,
    zero_idx: i64,
    alive: usize,
}

impl State {
    fn assign_bucket(&mut self, v: usize) {
        let last = self.buckets.len() - 1;
        let entry = &mut self.nodes[v];
        entry.stamp += 1;
        let idx = if entry.out_w == 0 {
            0
        } else if entry.in_w == 0 {
            last
        } else {
            (entry.out_w - entry.in_w + self.zero_idx).clamp(0, last as i64) as usize
        };
        self.buckets[idx].push_back((v, entry.stamp));
    }

    /// Oldest live entry of bucket `idx`.
    fn dequeue(&mut self, idx: usize) -> Option<usize> {
        while let Some((v, stamp)) = self.buckets[idx].pop_front() {
            let entry = &self.nodes[v];
            if entry.alive && entry.stamp == stamp {
                return Some(v);
            }
        }
        None
    }

    fn remove(&mut self, v: usize, feedback: Option<&mut Vec<(usize, usize)>>) {
        self.nodes[v].alive = false;
        self.alive -= 1;

        let ins = std::mem::take(&mut self.nodes[v].ins);
        let outs = std::mem::take(&mut self.nodes[v].outs);
        let mut collected = Vec::new();
        for &(u, weight) in &ins {
            if !self.nodes[u].alive {
                continue;
            }
            collected.push((u, v));
            self.nodes[u].out_w -= weight;
            self.assign_bucket(u);
        }
        for &(w, weight) in &outs {
            if !self.nodes[w].alive {
                continue;
            }
            self.nodes[w].in_w -= weight;
            self.assign_bucket(w);
        }
        if let Some(feedback) = feedback {
            feedback.extend(collected);
        }
    }
}

/// Returns edges of `g` whose reversal makes it acyclic, favouring light edges.
/// `weight` gives each edge's integral weight; parallel edges are summed.
pub fn greedy_fas<N, E, G>(g: &Graph<N, E, G>, weight: impl Fn(&E) -> i64) -> Vec<EdgeKey>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    if g.node_count() <= 1 {
        return Vec::new();
    }

    let mut index: HashMap<&str, usize> = HashMap::default();
    let mut nodes: Vec<Entry> = Vec::with_capacity(g.node_count());
    for v in g.nodes() {
        index.insert(v, nodes.len());
        nodes.push(Entry {
            id: v.to_string(),
            in_w: 0,
            out_w: 0,
            alive: true,
            stamp: 0,
            ins: Vec::new(),
            outs: Vec::new(),
        });
    }

    let mut pairs: HashMap<(usize, usize), usize> = HashMap::default();
    let mut aggregated: Vec<((usize, usize), i64)> = Vec::new();
    let (mut max_in, mut max_out) = (0, 0);
    for (e, label) in g.edge_labels() {
        let (Some(&v), Some(&w)) = (index.get(e.v.as_str()), index.get(e.w.as_str())) else {
            continue;
        };
        let weight = weight(label);
        match pairs.get(&(v, w)) {
            Some(&slot) => aggregated[slot].1 += weight,
            None => {
                pairs.insert((v, w), aggregated.len());
                aggregated.push(((v, w), weight));
            }
        }
        nodes[v].out_w += weight;
        max_out = max_out.max(nodes[v].out_w);
        nodes[w].in_w += weight;
        max_in = max_in.max(nodes[w].in_w);
    }
    for &((v, w), weight) in &aggregated {
        nodes[v].outs.push((w, weight));
        nodes[w].ins.push((v, weight));
    }

    let bucket_count = (max_out + max_in + 3).max(3) as usize;
    let alive = nodes.len();
    let mut state = State {
        nodes,
        buckets: (0..bucket_count).map(|_| VecDeque::new()).collect(),
        zero_idx: max_in + 1,
        alive,
    };
    for v in 0..state.nodes.len() {
        state.assign_bucket(v);
    }

    let sinks = 0;
    let sources = bucket_count - 1;
    let mut feedback: Vec<(usize, usize)> = Vec::new();
    while state.alive > 0 {
        while let Some(v) = state.dequeue(sinks) {
            state.remove(v, None);
        }
        while let Some(v) = state.dequeue(sources) {
            state.remove(v, None);
        }
        if state.alive == 0 {
            break;
        }
        let picked = (1..sources).rev().find_map(|i| state.dequeue(i));
        match picked {
            Some(v) => state.remove(v, Some(&mut feedback)),
            // Every live node sits in a sink or source bucket; the next round drains them.
            None => continue,
        }
    }

    feedback
        .into_iter()
        .flat_map(|(u, v)| g.out_edges(&state.nodes[u].id, Some(&state.nodes[v].id)))
        .collect()
}
