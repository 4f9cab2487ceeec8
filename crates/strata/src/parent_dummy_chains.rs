//! Moves each dummy chain into the subgraphs its edge passes through.
//!
//! A chain climbs from its source up to the lowest common ancestor of both endpoints, then
//! descends towards the target, entering each subgraph once the chain reaches that
//! subgraph's rank span.

use crate::model::LayoutGraph;
use crate::Result;
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone, Copy)]
struct PostorderNum {
    low: usize,
    lim: usize,
}

pub fn run(g: &mut LayoutGraph) -> Result<()> {
    let nums = postorder(g);

    for start in g.graph().dummy_chains.clone() {
        let Some(edge_obj) = g.node(&start).and_then(|n| n.edge_obj.clone()) else {
            continue;
        };
        let (path, lca) = find_path(g, &nums, &edge_obj.v, &edge_obj.w);

        let mut idx = 0;
        let mut path_v = path.first().cloned().flatten();
        let mut ascending = true;
        let mut v = start;

        while v != edge_obj.w {
            let rank = g.node(&v).and_then(|n| n.rank).unwrap_or(0);
            let bounds = |p: Option<&String>| p.and_then(|p| g.node(p)).map(|n| (n.min_rank, n.max_rank));

            if ascending {
                loop {
                    path_v = path.get(idx).cloned().flatten();
                    if path_v == lca {
                        break;
                    }
                    let below = bounds(path_v.as_ref())
                        .and_then(|(_, max)| max)
                        .is_some_and(|max| max < rank);
                    if !below {
                        break;
                    }
                    idx += 1;
                }
                if path_v == lca {
                    ascending = false;
                }
            }

            if !ascending {
                while idx + 1 < path.len()
                    && bounds(path[idx + 1].as_ref())
                        .and_then(|(min, _)| min)
                        .is_some_and(|min| min <= rank)
                {
                    idx += 1;
                }
                path_v = path.get(idx).cloned().flatten();
            }

            g.set_parent(&v, path_v.as_deref())?;
            let Some(next) = g.successors(&v).first().map(|w| w.to_string()) else {
                break;
            };
            v = next;
        }
    }

    Ok(())
}

/// The hierarchy path from `v` up to the lowest common ancestor and back down to `w`, and
/// the ancestor itself (`None` for the graph root).
fn find_path(
    g: &LayoutGraph,
    nums: &HashMap<String, PostorderNum>,
    v: &str,
    w: &str,
) -> (Vec<Option<String>>, Option<String>) {
    let num = |x: &str| nums.get(x).copied().unwrap_or(PostorderNum { low: 0, lim: 0 });
    let low = num(v).low.min(num(w).low);
    let lim = num(v).lim.max(num(w).lim);

    let mut path = Vec::new();
    let mut parent = Some(v.to_string());
    loop {
        parent = parent.as_deref().and_then(|p| g.parent(p)).map(str::to_string);
        path.push(parent.clone());
        match parent.as_deref() {
            Some(p) if num(p).low > low || lim > num(p).lim => continue,
            _ => break,
        }
    }
    let lca = parent;

    let mut down = Vec::new();
    let mut cur = w.to_string();
    while let Some(p) = g.parent(&cur).map(str::to_string) {
        if Some(&p) == lca.as_ref() {
            break;
        }
        down.push(Some(p.clone()));
        cur = p;
    }
    down.reverse();
    path.extend(down);

    (path, lca)
}

/// Postorder numbering of the hierarchy: `lim` is the finishing index and `low` the smallest
/// index in the subtree.
fn postorder(g: &LayoutGraph) -> HashMap<String, PostorderNum> {
    let mut nums = HashMap::default();
    let mut lim = 0;

    for root in g.children_root() {
        let mut stack = vec![(root.to_string(), lim, children_of(g, root).into_iter())];
        while let Some((_, _, pending)) = stack.last_mut() {
            match pending.next() {
                Some(child) => {
                    let kids = children_of(g, &child);
                    stack.push((child, lim, kids.into_iter()));
                }
                None => {
                    if let Some((v, low, _)) = stack.pop() {
                        nums.insert(v, PostorderNum { low, lim });
                        lim += 1;
                    }
                }
            }
        }
    }

    nums
}

fn children_of(g: &LayoutGraph, v: &str) -> Vec<String> {
    g.children(v).into_iter().map(str::to_string).collect()
}
