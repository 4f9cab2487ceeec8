use crate::edge_key::EdgeKey;
use crate::error::{GraphError, Result};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::sync::Arc;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;
type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

type NodeLabelFn<N> = Arc<dyn Fn(&str) -> N + Send + Sync>;
type EdgeLabelFn<E> = Arc<dyn Fn() -> E + Send + Sync>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphOptions {
    pub multigraph: bool,
    pub compound: bool,
}

/// Borrowed form of [`EdgeKey`], hashed exactly like the owned key so lookups never allocate.
#[derive(Hash)]
struct EdgeRef<'a> {
    v: &'a str,
    w: &'a str,
    name: Option<&'a str>,
}

impl indexmap::Equivalent<EdgeKey> for EdgeRef<'_> {
    fn equivalent(&self, key: &EdgeKey) -> bool {
        key.v == self.v && key.w == self.w && key.name.as_deref() == self.name
    }
}

#[derive(Clone)]
struct NodeSlot<N> {
    label: N,
    ins: FxIndexSet<EdgeKey>,
    outs: FxIndexSet<EdgeKey>,
}

impl<N> NodeSlot<N> {
    fn new(label: N) -> Self {
        Self {
            label,
            ins: FxIndexSet::default(),
            outs: FxIndexSet::default(),
        }
    }
}

/// A directed graph with optional parallel edges and an optional parent/child hierarchy.
///
/// Nodes, edges, adjacency lists and child lists all iterate in insertion order, so every
/// algorithm built on top of this container is deterministic.
#[derive(Clone)]
pub struct Graph<N, E, G> {
    options: GraphOptions,
    label: G,
    default_node_label: NodeLabelFn<N>,
    default_edge_label: EdgeLabelFn<E>,
    nodes: FxIndexMap<String, NodeSlot<N>>,
    edges: FxIndexMap<EdgeKey, E>,
    parent: HashMap<String, String>,
    children: HashMap<String, FxIndexSet<String>>,
}

impl<N, E, G> fmt::Debug for Graph<N, E, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("options", &self.options)
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("edges", &self.edges.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<N, E, G> Default for Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    fn default() -> Self {
        Self::new(GraphOptions::default())
    }
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            label: G::default(),
            default_node_label: Arc::new(|_| N::default()),
            default_edge_label: Arc::new(E::default),
            nodes: FxIndexMap::default(),
            edges: FxIndexMap::default(),
            parent: HashMap::default(),
            children: HashMap::default(),
        }
    }

    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_multigraph(&self) -> bool {
        self.options.multigraph
    }

    pub fn is_compound(&self) -> bool {
        self.options.compound
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.label = label;
        self
    }

    pub fn graph(&self) -> &G {
        &self.label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.label
    }

    /// Label factory used when a node is created implicitly (by an edge or a parent link).
    pub fn set_default_node_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&str) -> N + Send + Sync + 'static,
    {
        self.default_node_label = Arc::new(f);
        self
    }

    pub fn set_default_edge_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.default_edge_label = Arc::new(f);
        self
    }

    // ---- nodes -------------------------------------------------------------------------------

    pub fn has_node(&self, v: &str) -> bool {
        self.nodes.contains_key(v)
    }

    pub fn set_node(&mut self, v: impl Into<String>, label: N) -> &mut Self {
        let v = v.into();
        match self.nodes.get_mut(&v) {
            Some(slot) => slot.label = label,
            None => {
                self.nodes.insert(v, NodeSlot::new(label));
            }
        }
        self
    }

    /// Returns the label of `v`, creating the node with the default label first if needed.
    pub fn ensure_node(&mut self, v: &str) -> &mut N {
        let idx = match self.nodes.get_index_of(v) {
            Some(idx) => idx,
            None => {
                let label = (self.default_node_label)(v);
                self.nodes.insert_full(v.to_string(), NodeSlot::new(label)).0
            }
        };
        &mut self.nodes[idx].label
    }

    pub fn node(&self, v: &str) -> Option<&N> {
        self.nodes.get(v).map(|slot| &slot.label)
    }

    pub fn node_mut(&mut self, v: &str) -> Option<&mut N> {
        self.nodes.get_mut(v).map(|slot| &mut slot.label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.keys().map(String::as_str)
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    pub fn node_labels(&self) -> impl Iterator<Item = (&str, &N)> + '_ {
        self.nodes.iter().map(|(v, slot)| (v.as_str(), &slot.label))
    }

    pub fn node_labels_mut(&mut self) -> impl Iterator<Item = (&str, &mut N)> + '_ {
        self.nodes
            .iter_mut()
            .map(|(v, slot)| (v.as_str(), &mut slot.label))
    }

    /// Removes `v`, its incident edges, and its hierarchy links. Children of `v` become roots.
    pub fn remove_node(&mut self, v: &str) -> Option<N> {
        let slot = self.nodes.shift_remove(v)?;
        for key in slot.ins.iter().chain(slot.outs.iter()) {
            self.edges.shift_remove(key);
            let other = key.other(v);
            if other == v {
                continue;
            }
            if let Some(o) = self.nodes.get_mut(other) {
                o.ins.shift_remove(key);
                o.outs.shift_remove(key);
            }
        }
        if self.options.compound {
            self.detach(v);
            if let Some(kids) = self.children.remove(v) {
                for kid in kids {
                    self.parent.remove(&kid);
                }
            }
        }
        Some(slot.label)
    }

    // ---- edges -------------------------------------------------------------------------------

    fn edge_ref<'a>(&self, v: &'a str, w: &'a str, name: Option<&'a str>) -> EdgeRef<'a> {
        EdgeRef {
            v,
            w,
            name: if self.options.multigraph { name } else { None },
        }
    }

    fn normalize_key(&self, mut key: EdgeKey) -> EdgeKey {
        if !self.options.multigraph {
            key.name = None;
        }
        key
    }

    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>, label: E) -> &mut Self {
        self.set_edge_key(EdgeKey::new(v, w), label)
    }

    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<String>,
        label: E,
    ) -> &mut Self {
        self.set_edge_key(EdgeKey::named(v, w, name), label)
    }

    /// Inserts or relabels the edge. Missing endpoints are created with default labels.
    pub fn set_edge_key(&mut self, key: EdgeKey, label: E) -> &mut Self {
        let key = self.normalize_key(key);
        if let Some(existing) = self.edges.get_mut(&key) {
            *existing = label;
            return self;
        }
        self.ensure_node(&key.v);
        self.ensure_node(&key.w);
        if let Some(slot) = self.nodes.get_mut(key.v.as_str()) {
            slot.outs.insert(key.clone());
        }
        if let Some(slot) = self.nodes.get_mut(key.w.as_str()) {
            slot.ins.insert(key.clone());
        }
        self.edges.insert(key, label);
        self
    }

    /// Returns the label of the edge, creating it with the default label first if needed.
    pub fn ensure_edge(&mut self, v: &str, w: &str) -> &mut E {
        let idx = match self.edges.get_index_of(&self.edge_ref(v, w, None)) {
            Some(idx) => idx,
            None => {
                let label = (self.default_edge_label)();
                self.set_edge(v, w, label);
                self.edges.len() - 1
            }
        };
        &mut self.edges[idx]
    }

    pub fn set_path(&mut self, path: &[&str]) -> &mut Self {
        for pair in path.windows(2) {
            self.ensure_edge(pair[0], pair[1]);
        }
        self
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edges.contains_key(&self.edge_ref(v, w, name))
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        self.edges.get(&self.edge_ref(v, w, name))
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        let r = self.edge_ref(v, w, name);
        self.edges.get_mut(&r)
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edge_mut_by_key(&mut self, key: &EdgeKey) -> Option<&mut E> {
        self.edge_mut(&key.v, &key.w, key.name.as_deref())
    }

    pub fn remove_edge(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<E> {
        let r = self.edge_ref(v, w, name);
        let (key, label) = self.edges.shift_remove_entry(&r)?;
        if let Some(slot) = self.nodes.get_mut(key.v.as_str()) {
            slot.outs.shift_remove(&key);
        }
        if let Some(slot) = self.nodes.get_mut(key.w.as_str()) {
            slot.ins.shift_remove(&key);
        }
        Some(label)
    }

    pub fn remove_edge_key(&mut self, key: &EdgeKey) -> Option<E> {
        self.remove_edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> + '_ {
        self.edges.keys()
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges.keys().cloned().collect()
    }

    pub fn edge_labels(&self) -> impl Iterator<Item = (&EdgeKey, &E)> + '_ {
        self.edges.iter()
    }

    pub fn edge_labels_mut(&mut self) -> impl Iterator<Item = (&EdgeKey, &mut E)> + '_ {
        self.edges.iter_mut()
    }

    // ---- adjacency ---------------------------------------------------------------------------

    /// Edges ending at `v`, optionally restricted to those starting at `u`.
    pub fn in_edges(&self, v: &str, u: Option<&str>) -> Vec<EdgeKey> {
        let Some(slot) = self.nodes.get(v) else {
            return Vec::new();
        };
        slot.ins
            .iter()
            .filter(|e| u.is_none_or(|u| e.v == u))
            .cloned()
            .collect()
    }

    /// Edges starting at `v`, optionally restricted to those ending at `w`.
    pub fn out_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        let Some(slot) = self.nodes.get(v) else {
            return Vec::new();
        };
        slot.outs
            .iter()
            .filter(|e| w.is_none_or(|w| e.w == w))
            .cloned()
            .collect()
    }

    /// In-edges followed by out-edges of `v`, optionally restricted to edges touching `w`.
    pub fn node_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        let mut out = self.in_edges(v, w);
        out.extend(self.out_edges(v, w));
        out
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        let Some(slot) = self.nodes.get(v) else {
            return Vec::new();
        };
        let seen: FxIndexSet<&str> = slot.ins.iter().map(|e| e.v.as_str()).collect();
        seen.into_iter().collect()
    }

    pub fn successors(&self, v: &str) -> Vec<&str> {
        let Some(slot) = self.nodes.get(v) else {
            return Vec::new();
        };
        let seen: FxIndexSet<&str> = slot.outs.iter().map(|e| e.w.as_str()).collect();
        seen.into_iter().collect()
    }

    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        let Some(slot) = self.nodes.get(v) else {
            return Vec::new();
        };
        let seen: FxIndexSet<&str> = slot
            .ins
            .iter()
            .map(|e| e.v.as_str())
            .chain(slot.outs.iter().map(|e| e.w.as_str()))
            .collect();
        seen.into_iter().collect()
    }

    pub fn in_degree(&self, v: &str) -> usize {
        self.nodes.get(v).map_or(0, |slot| slot.ins.len())
    }

    pub fn out_degree(&self, v: &str) -> usize {
        self.nodes.get(v).map_or(0, |slot| slot.outs.len())
    }

    /// Nodes without in-edges.
    pub fn sources(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|(_, slot)| slot.ins.is_empty())
            .map(|(v, _)| v.as_str())
            .collect()
    }

    /// Nodes without out-edges.
    pub fn sinks(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|(_, slot)| slot.outs.is_empty())
            .map(|(v, _)| v.as_str())
            .collect()
    }

    // ---- hierarchy ---------------------------------------------------------------------------

    fn detach(&mut self, v: &str) {
        if let Some(p) = self.parent.remove(v) {
            if let Some(kids) = self.children.get_mut(&p) {
                kids.shift_remove(v);
            }
        }
    }

    /// Moves `child` under `parent`, or back to the root when `parent` is `None`. Both nodes
    /// are created if missing.
    pub fn set_parent(&mut self, child: &str, parent: Option<&str>) -> Result<()> {
        if !self.options.compound {
            return Err(GraphError::NotCompound);
        }
        if let Some(p) = parent {
            let mut ancestor = Some(p);
            while let Some(a) = ancestor {
                if a == child {
                    return Err(GraphError::ParentCycle {
                        child: child.to_string(),
                        parent: p.to_string(),
                    });
                }
                ancestor = self.parent(a);
            }
            self.ensure_node(p);
        }
        self.ensure_node(child);
        self.detach(child);
        if let Some(p) = parent {
            self.parent.insert(child.to_string(), p.to_string());
            self.children
                .entry(p.to_string())
                .or_default()
                .insert(child.to_string());
        }
        Ok(())
    }

    pub fn clear_parent(&mut self, child: &str) {
        self.detach(child);
    }

    pub fn parent(&self, v: &str) -> Option<&str> {
        self.parent.get(v).map(String::as_str)
    }

    pub fn children(&self, v: &str) -> Vec<&str> {
        self.children
            .get(v)
            .map(|kids| kids.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn has_children(&self, v: &str) -> bool {
        self.children.get(v).is_some_and(|kids| !kids.is_empty())
    }

    /// Top-level nodes: every node without a parent.
    pub fn children_root(&self) -> Vec<&str> {
        self.nodes
            .keys()
            .filter(|v| !self.parent.contains_key(v.as_str()))
            .map(String::as_str)
            .collect()
    }
}
