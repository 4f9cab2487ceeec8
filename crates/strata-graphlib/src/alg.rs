//! Traversals over graphs and tree-shaped views of graphs.
//!
//! Every walk uses an explicit stack, so deep hierarchies cannot overflow the call stack.

use crate::Graph;
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;
use std::collections::VecDeque;

type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DfsOrder {
    Pre,
    Post,
}

/// Depth-first walk from each root in turn, following `next` to find the nodes reachable from
/// a node. Each node is reported once, in pre- or post-order.
pub fn dfs<F, I>(roots: &[&str], order: DfsOrder, mut next: F) -> Vec<String>
where
    F: FnMut(&str) -> I,
    I: IntoIterator<Item = String>,
{
    let mut visited: HashSet<String> = HashSet::default();
    let mut out = Vec::new();

    for &root in roots {
        if !visited.insert(root.to_string()) {
            continue;
        }
        if order == DfsOrder::Pre {
            out.push(root.to_string());
        }
        let first: Vec<String> = next(root).into_iter().collect();
        let mut stack = vec![(root.to_string(), first.into_iter())];

        while let Some((_, pending)) = stack.last_mut() {
            match pending.next() {
                Some(w) => {
                    if !visited.insert(w.clone()) {
                        continue;
                    }
                    if order == DfsOrder::Pre {
                        out.push(w.clone());
                    }
                    let kids: Vec<String> = next(&w).into_iter().collect();
                    stack.push((w, kids.into_iter()));
                }
                None => {
                    if let Some((v, _)) = stack.pop() {
                        if order == DfsOrder::Post {
                            out.push(v);
                        }
                    }
                }
            }
        }
    }

    out
}

pub fn preorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Vec<String>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    dfs(roots, DfsOrder::Pre, |v| {
        g.successors(v).into_iter().map(str::to_string)
    })
}

pub fn postorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Vec<String>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    dfs(roots, DfsOrder::Post, |v| {
        g.successors(v).into_iter().map(str::to_string)
    })
}

/// Weakly connected components, each listed in discovery order.
pub fn components<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    let mut seen: IndexSet<&str, FxBuildHasher> = IndexSet::default();
    let mut out = Vec::new();

    for start in g.nodes() {
        if !seen.insert(start) {
            continue;
        }
        let mut component = Vec::new();
        let mut queue = VecDeque::from([start]);
        while let Some(v) = queue.pop_front() {
            component.push(v.to_string());
            for w in g.neighbors(v) {
                if seen.insert(w) {
                    queue.push_back(w);
                }
            }
        }
        out.push(component);
    }

    out
}
