//! The spanning tree pivoted by network simplex.
//!
//! Kept apart from the layout graph: nodes carry their low/lim numbering and tree parent,
//! edges are undirected and carry a cut value.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeNode {
    pub low: i32,
    pub lim: i32,
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FeasibleTree {
    nodes: FxIndexMap<String, TreeNode>,
    adjacency: FxIndexMap<String, FxIndexSet<String>>,
    /// Cut value per edge, keyed by the lexicographically ordered endpoint pair.
    edges: FxIndexMap<(String, String), f64>,
}

fn edge_key(v: &str, w: &str) -> (String, String) {
    if v <= w {
        (v.to_string(), w.to_string())
    } else {
        (w.to_string(), v.to_string())
    }
}

impl FeasibleTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, v: &str) {
        if !self.nodes.contains_key(v) {
            self.nodes.insert(v.to_string(), TreeNode::default());
            self.adjacency.insert(v.to_string(), FxIndexSet::default());
        }
    }

    pub fn has_node(&self, v: &str) -> bool {
        self.nodes.contains_key(v)
    }

    pub fn node(&self, v: &str) -> Option<&TreeNode> {
        self.nodes.get(v)
    }

    pub fn node_mut(&mut self, v: &str) -> Option<&mut TreeNode> {
        self.nodes.get_mut(v)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Node ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.keys().map(String::as_str)
    }

    pub fn neighbors(&self, v: &str) -> impl Iterator<Item = &str> + '_ {
        self.adjacency
            .get(v)
            .into_iter()
            .flat_map(|ws| ws.iter().map(String::as_str))
    }

    /// Adds the undirected edge `v - w` with a zero cut value, creating missing endpoints.
    pub fn add_edge(&mut self, v: &str, w: &str) {
        self.add_node(v);
        self.add_node(w);
        if let Some(ws) = self.adjacency.get_mut(v) {
            ws.insert(w.to_string());
        }
        if let Some(vs) = self.adjacency.get_mut(w) {
            vs.insert(v.to_string());
        }
        self.edges.entry(edge_key(v, w)).or_insert(0.0);
    }

    pub fn remove_edge(&mut self, v: &str, w: &str) {
        if let Some(ws) = self.adjacency.get_mut(v) {
            ws.shift_remove(w);
        }
        if let Some(vs) = self.adjacency.get_mut(w) {
            vs.shift_remove(v);
        }
        self.edges.shift_remove(&edge_key(v, w));
    }

    pub fn has_edge(&self, v: &str, w: &str) -> bool {
        self.edges.contains_key(&edge_key(v, w))
    }

    /// Edges in insertion order, each with its smaller endpoint first.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str, f64)> + '_ {
        self.edges
            .iter()
            .map(|((v, w), cut)| (v.as_str(), w.as_str(), *cut))
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn cut_value(&self, v: &str, w: &str) -> Option<f64> {
        self.edges.get(&edge_key(v, w)).copied()
    }

    pub fn set_cut_value(&mut self, v: &str, w: &str, cut: f64) {
        if let Some(slot) = self.edges.get_mut(&edge_key(v, w)) {
            *slot = cut;
        }
    }
}
