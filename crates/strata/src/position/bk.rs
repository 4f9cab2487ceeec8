//! Horizontal coordinate assignment after Brandes and Köpf, "Fast and Simple Horizontal
//! Coordinate Assignment".
//!
//! Four extreme alignments are computed (up/down crossed with left/right). Each aligns nodes
//! into vertical blocks with a median neighbour, then compacts the blocks as far as the
//! separation rules allow. The narrowest alignment anchors the others, and the final x is
//! the median of the four candidates unless an alignment is pinned.

use crate::graphlib::{Graph, GraphOptions};
use crate::model::{Align, BorderSide, Dummy, LabelPos, LayoutGraph};
use crate::util::build_layer_matrix;
use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap as HashMap, FxHashSet as HashSet};

/// Unordered node pairs that must not be aligned, stored smaller id first.
pub type Conflicts = HashSet<(String, String)>;

/// x coordinate per node for one alignment.
pub type Xs = HashMap<String, f64>;

pub type Alignments = IndexMap<Align, Xs, FxBuildHasher>;

type BlockGraph = Graph<(), f64, ()>;

pub fn add_conflict(conflicts: &mut Conflicts, v: &str, w: &str) {
    let (v, w) = if v <= w { (v, w) } else { (w, v) };
    conflicts.insert((v.to_string(), w.to_string()));
}

pub fn has_conflict(conflicts: &Conflicts, v: &str, w: &str) -> bool {
    let (v, w) = if v <= w { (v, w) } else { (w, v) };
    conflicts.contains(&(v.to_string(), w.to_string()))
}

fn is_dummy(g: &LayoutGraph, v: &str) -> bool {
    g.node(v).is_some_and(|n| n.is_dummy())
}

fn order_of(g: &LayoutGraph, v: &str) -> usize {
    g.node(v).and_then(|n| n.order).unwrap_or(0)
}

/// Type-1 conflicts: a non-inner segment crossing an inner segment (an edge between two
/// dummies). Inner segments win, so the crossing edge is flagged.
///
/// Each layer is scanned left to right up to the next node with an inner segment; every
/// predecessor edge in that stretch reaching outside the bracket formed by the last two inner
/// segments is a conflict.
pub fn find_type1_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts = Conflicts::default();

    for pair in layering.windows(2) {
        let (prev_layer, layer) = (&pair[0], &pair[1]);
        let mut k0 = 0;
        let mut scan_pos = 0;

        for (i, v) in layer.iter().enumerate() {
            let w = other_inner_segment_node(g, v);
            let k1 = w.map_or(prev_layer.len(), |w| order_of(g, w));
            if w.is_none() && i + 1 != layer.len() {
                continue;
            }

            for scan_node in &layer[scan_pos..=i] {
                let scan_dummy = is_dummy(g, scan_node);
                for u in g.predecessors(scan_node) {
                    let u_pos = order_of(g, u);
                    if (u_pos < k0 || k1 < u_pos) && !(scan_dummy && is_dummy(g, u)) {
                        add_conflict(&mut conflicts, u, scan_node);
                    }
                }
            }
            scan_pos = i + 1;
            k0 = k1;
        }
    }

    conflicts
}

/// Type-2 conflicts: two inner segments crossing. Border dummies bracket the scan so that
/// segments on either side of a subgraph boundary are compared against that boundary.
pub fn find_type2_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts = Conflicts::default();

    for pair in layering.windows(2) {
        let (north, south) = (&pair[0], &pair[1]);
        // `None` is the open left end of the layer: no order falls below it.
        let mut prev_north_pos: Option<usize> = None;
        let mut next_north_pos: Option<usize> = None;
        let mut south_pos = 0;
        let mut scanned: HashSet<(usize, usize, Option<usize>, Option<usize>)> =
            HashSet::default();

        let mut scan = |conflicts: &mut Conflicts,
                        from: usize,
                        to: usize,
                        prev: Option<usize>,
                        next: Option<usize>| {
            if !scanned.insert((from, to, prev, next)) {
                return;
            }
            for v in &south[from..to] {
                if !is_dummy(g, v) {
                    continue;
                }
                for u in g.predecessors(v) {
                    let Some(u_node) = g.node(u).filter(|n| n.is_dummy()) else {
                        continue;
                    };
                    let u_order = u_node.order.unwrap_or(0);
                    let outside = prev.is_some_and(|p| u_order < p)
                        || next.is_some_and(|n| u_order > n);
                    if outside {
                        add_conflict(conflicts, u, v);
                    }
                }
            }
        };

        for (lookahead, v) in south.iter().enumerate() {
            let is_border = g
                .node(v)
                .and_then(|n| n.dummy)
                .is_some_and(Dummy::is_border);
            if is_border {
                if let Some(u) = g.predecessors(v).first() {
                    next_north_pos = Some(order_of(g, u));
                    scan(
                        &mut conflicts,
                        south_pos,
                        lookahead,
                        prev_north_pos,
                        next_north_pos,
                    );
                    south_pos = lookahead;
                    prev_north_pos = next_north_pos;
                }
            }
            scan(
                &mut conflicts,
                south_pos,
                south.len(),
                next_north_pos,
                Some(north.len()),
            );
        }
    }

    conflicts
}

fn other_inner_segment_node<'a>(g: &'a LayoutGraph, v: &str) -> Option<&'a str> {
    if !is_dummy(g, v) {
        return None;
    }
    g.predecessors(v).into_iter().find(|u| is_dummy(g, u))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment {
    /// Block root of every node.
    pub root: HashMap<String, String>,
    /// Next node in the node's block, cycling back to the root.
    pub align: HashMap<String, String>,
}

/// Groups nodes into vertical blocks, aligning each node with a median neighbour (both
/// medians, in order, for an even count) unless the neighbour is taken, lies left of the
/// previous alignment on this layer, or conflicts.
pub fn vertical_alignment<F>(
    layering: &[Vec<String>],
    conflicts: &Conflicts,
    neighbors: F,
) -> Alignment
where
    F: Fn(&str) -> Vec<String>,
{
    let mut root: HashMap<String, String> = HashMap::default();
    let mut align: HashMap<String, String> = HashMap::default();
    let mut pos: HashMap<String, usize> = HashMap::default();
    for layer in layering {
        for (order, v) in layer.iter().enumerate() {
            root.insert(v.clone(), v.clone());
            align.insert(v.clone(), v.clone());
            pos.insert(v.clone(), order);
        }
    }

    for layer in layering {
        let mut prev_idx: Option<usize> = None;
        for v in layer {
            let mut ws = neighbors(v);
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|w| pos.get(w).copied().unwrap_or(usize::MAX));
            let lo = (ws.len() - 1) / 2;
            let hi = ws.len() / 2;

            for w in &ws[lo..=hi] {
                let Some(&w_pos) = pos.get(w) else {
                    continue;
                };
                let unaligned = align.get(v) == Some(v);
                if unaligned
                    && prev_idx.is_none_or(|p| p < w_pos)
                    && !has_conflict(conflicts, v, w)
                {
                    let w_root = root.get(w).cloned().unwrap_or_else(|| w.clone());
                    align.insert(w.clone(), v.clone());
                    align.insert(v.clone(), w_root.clone());
                    root.insert(v.clone(), w_root);
                    prev_idx = Some(w_pos);
                }
            }
        }
    }

    Alignment { root, align }
}

/// Places every block as far left as separation allows, then pulls blocks right into any
/// slack left over. Border nodes on the trailing side of their subgraph stay put in the
/// second pass.
pub fn horizontal_compaction(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    alignment: &Alignment,
    reverse_sep: bool,
) -> Xs {
    let block_g = build_block_graph(g, layering, &alignment.root, reverse_sep);
    let pinned_side = if reverse_sep {
        BorderSide::Left
    } else {
        BorderSide::Right
    };
    let mut xs: Xs = HashMap::default();

    for v in finish_order(&block_g, |v| block_g.predecessors(v)) {
        let x = block_g
            .in_edges(&v, None)
            .iter()
            .map(|e| {
                let sep = block_g.edge_by_key(e).copied().unwrap_or(0.0);
                xs.get(&e.v).copied().unwrap_or(0.0) + sep
            })
            .fold(0.0, f64::max);
        xs.insert(v, x);
    }

    for v in finish_order(&block_g, |v| block_g.successors(v)) {
        let min = block_g
            .out_edges(&v, None)
            .iter()
            .map(|e| {
                let sep = block_g.edge_by_key(e).copied().unwrap_or(0.0);
                xs.get(&e.w).copied().unwrap_or(0.0) - sep
            })
            .fold(f64::INFINITY, f64::min);
        let pinned = g
            .node(&v)
            .is_some_and(|n| n.dummy == Some(Dummy::Border(pinned_side)));
        if min.is_finite() && !pinned {
            let x = xs.entry(v).or_insert(0.0);
            *x = x.max(min);
        }
    }

    alignment
        .root
        .iter()
        .map(|(v, root)| (v.clone(), xs.get(root).copied().unwrap_or(0.0)))
        .collect()
}

/// Nodes in the order a depth-first walk along `next` finishes them, starting from every
/// node, last inserted first.
fn finish_order<'a, F>(block_g: &'a BlockGraph, next: F) -> Vec<String>
where
    F: Fn(&str) -> Vec<&'a str>,
{
    let mut stack: Vec<(&str, bool)> = block_g.nodes().map(|v| (v, false)).collect();
    let mut visited: HashSet<&str> = HashSet::default();
    let mut out = Vec::new();

    while let Some((v, expanded)) = stack.pop() {
        if expanded || visited.contains(v) {
            if expanded {
                out.push(v.to_string());
            }
            continue;
        }
        visited.insert(v);
        stack.push((v, true));
        stack.extend(next(v).into_iter().map(|w| (w, false)));
    }

    out
}

/// One node per block root; an edge between the roots of horizontally adjacent nodes carries
/// the largest separation required between them.
pub fn build_block_graph(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    root: &HashMap<String, String>,
    reverse_sep: bool,
) -> BlockGraph {
    let mut block_g: BlockGraph = Graph::new(GraphOptions::default());
    for layer in layering {
        let mut prev: Option<&str> = None;
        for v in layer {
            let v_root = root.get(v).map_or(v.as_str(), String::as_str);
            block_g.ensure_node(v_root);
            if let Some(u) = prev {
                let u_root = root.get(u).map_or(u, String::as_str);
                let required = sep(g, v, u, reverse_sep);
                let edge = block_g.ensure_edge(u_root, v_root);
                *edge = edge.max(required);
            }
            prev = Some(v);
        }
    }
    block_g
}

/// Distance required between the centres of `v` and its left neighbour `w`.
fn sep(g: &LayoutGraph, v: &str, w: &str, reverse_sep: bool) -> f64 {
    let graph = g.graph();
    let (Some(v_label), Some(w_label)) = (g.node(v), g.node(w)) else {
        return 0.0;
    };
    let spacing = |dummy: bool| if dummy { graph.edgesep } else { graph.nodesep };
    let shift = |delta: f64| if reverse_sep { delta } else { -delta };

    let mut sum = v_label.width / 2.0;
    sum += match v_label.labelpos {
        Some(LabelPos::L) => shift(-v_label.width / 2.0),
        Some(LabelPos::R) => shift(v_label.width / 2.0),
        _ => 0.0,
    };
    sum += spacing(v_label.is_dummy()) / 2.0;
    sum += spacing(w_label.is_dummy()) / 2.0;
    sum += w_label.width / 2.0;
    sum += match w_label.labelpos {
        Some(LabelPos::L) => shift(w_label.width / 2.0),
        Some(LabelPos::R) => shift(-w_label.width / 2.0),
        _ => 0.0,
    };
    sum
}

fn width_span(g: &LayoutGraph, xs: &Xs) -> f64 {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for (v, x) in xs {
        let half = g.node(v).map_or(0.0, |n| n.width / 2.0);
        min = min.min(x - half);
        max = max.max(x + half);
    }
    max - min
}

/// The alignment with the smallest total width; the first one wins ties.
pub fn find_smallest_width_alignment(g: &LayoutGraph, xss: &Alignments) -> Option<Align> {
    let mut best: Option<(f64, Align)> = None;
    for (&align, xs) in xss {
        let width = width_span(g, xs);
        if best.is_none_or(|(w, _)| width < w) {
            best = Some((width, align));
        }
    }
    best.map(|(_, align)| align)
}

/// Shifts every alignment so left-biased ones share the minimum and right-biased ones the
/// maximum coordinate of `align_to`.
pub fn align_coordinates(xss: &mut Alignments, align_to: Align) {
    let Some(target) = xss.get(&align_to) else {
        return;
    };
    let lo = target.values().copied().fold(f64::INFINITY, f64::min);
    let hi = target.values().copied().fold(f64::NEG_INFINITY, f64::max);

    for (&align, xs) in xss.iter_mut() {
        if align == align_to || xs.is_empty() {
            continue;
        }
        let delta = if align.is_right() {
            hi - xs.values().copied().fold(f64::NEG_INFINITY, f64::max)
        } else {
            lo - xs.values().copied().fold(f64::INFINITY, f64::min)
        };
        if delta != 0.0 {
            for x in xs.values_mut() {
                *x += delta;
            }
        }
    }
}

/// Final x per node: the pinned alignment's value, or the mean of the two middle values of
/// the four candidates.
pub fn balance(xss: &Alignments, align: Option<Align>) -> Xs {
    let Some(ul) = xss.get(&Align::UL) else {
        return Xs::default();
    };
    ul.keys()
        .map(|v| {
            if let Some(pin) = align {
                let x = xss.get(&pin).and_then(|xs| xs.get(v)).copied().unwrap_or(0.0);
                return (v.clone(), x);
            }
            let mut values: Vec<f64> = xss.values().filter_map(|xs| xs.get(v).copied()).collect();
            values.sort_by(f64::total_cmp);
            let n = values.len();
            let x = match n {
                0 => 0.0,
                _ => (values[(n - 1) / 2] + values[n / 2]) / 2.0,
            };
            (v.clone(), x)
        })
        .collect()
}

pub fn position_x(g: &LayoutGraph) -> Xs {
    let layering = build_layer_matrix(g);
    let mut conflicts = find_type1_conflicts(g, &layering);
    conflicts.extend(find_type2_conflicts(g, &layering));

    let mut xss = Alignments::default();
    for align in Align::ALL {
        let mut adjusted: Vec<Vec<String>> = layering.clone();
        if !align.is_up() {
            adjusted.reverse();
        }
        if align.is_right() {
            for layer in &mut adjusted {
                layer.reverse();
            }
        }

        let alignment = vertical_alignment(&adjusted, &conflicts, |v| {
            let ws = if align.is_up() {
                g.predecessors(v)
            } else {
                g.successors(v)
            };
            ws.into_iter().map(str::to_string).collect()
        });
        let mut xs = horizontal_compaction(g, &adjusted, &alignment, align.is_right());
        if align.is_right() {
            for x in xs.values_mut() {
                *x = -*x;
            }
        }
        xss.insert(align, xs);
    }

    if let Some(smallest) = find_smallest_width_alignment(g, &xss) {
        align_coordinates(&mut xss, smallest);
    }
    balance(&xss, g.graph().align)
}
