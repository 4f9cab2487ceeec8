//! The layout entry points and the glue stages between the core algorithms.

use crate::graphlib::{Graph, GraphOptions};
use crate::model::{
    Dummy, EdgeLabel, GraphLabel, LabelPos, LayoutGraph, NodeLabel, Point, RankDir,
};
use crate::order::OrderOptions;
use crate::util::{
    add_dummy_node, as_non_compound_graph, assign_rank_min_max, intersect_rect,
    normalize_ranks, remove_empty_ranks,
};
use crate::{
    LayoutError, Result, acyclic, add_border_segments, coordinate_system, nesting_graph, normalize, order,
    parent_dummy_chains, position, rank, self_edges,
};

/// Per-call knobs; graph-wide ones live on [`GraphLabel`].
#[derive(Debug, Clone)]
pub struct LayoutOptions<'a> {
    /// Halve `ranksep` and double every `minlen` so edge labels get a rank of their own.
    pub edge_label_space: bool,
    /// Pin real nodes to their sequence in `node_order` within each rank.
    pub keep_node_order: bool,
    pub node_order: Vec<String>,
    /// A previous layout whose published orders seed `fixorder`, keeping relayouts stable.
    pub prev_graph: Option<&'a LayoutGraph>,
}

impl Default for LayoutOptions<'_> {
    fn default() -> Self {
        Self {
            edge_label_space: true,
            keep_node_order: false,
            node_order: Vec::new(),
            prev_graph: None,
        }
    }
}

/// Lays out `g` in place, logging and swallowing the one recoverable failure: manual
/// `layer` pins that contradict the edges. In that case `g` is left as it was.
pub fn layout(g: &mut LayoutGraph, opts: &LayoutOptions<'_>) -> Result<()> {
    match try_layout(g, opts) {
        Err(LayoutError::InconsistentLayer { v, w }) => {
            tracing::warn!(
                %v,
                %w,
                "layout skipped: manual layer assignment contradicts the graph structure"
            );
            Ok(())
        }
        other => other,
    }
}

/// Lays out `g` in place.
///
/// Writes node `x`, `y`, `out_order` and `out_rank`, subgraph `width`/`height`, edge
/// `points` and label `x`/`y`, and the graph's `width`/`height`. Nothing is written when an
/// error is returned.
pub fn try_layout(g: &mut LayoutGraph, opts: &LayoutOptions<'_>) -> Result<()> {
    let mut lg = build_layout_graph(g)?;
    if !opts.keep_node_order {
        if let Some(prev) = opts.prev_graph {
            inherit_order(&mut lg, prev);
        }
    }
    if opts.edge_label_space {
        make_space_for_edge_labels(&mut lg);
    }
    run_layout(&mut lg, opts)?;
    update_input_graph(g, &lg);
    Ok(())
}

fn stage<T>(name: &'static str, f: impl FnOnce() -> T) -> T {
    let _span = tracing::debug_span!("layout_stage", stage = name).entered();
    f()
}

fn run_layout(g: &mut LayoutGraph, opts: &LayoutOptions<'_>) -> Result<()> {
    stage("remove_self_edges", || self_edges::remove_self_edges(g));
    stage("acyclic", || acyclic::run(g));
    stage("nesting_graph", || nesting_graph::run(g))?;
    stage("rank", || rank_compound(g));
    stage("check_layers", || check_layers(g))?;
    stage("inject_edge_label_proxies", || inject_edge_label_proxies(g));
    stage("remove_empty_ranks", || remove_empty_ranks(g));
    stage("nesting_graph_cleanup", || nesting_graph::cleanup(g));
    stage("normalize_ranks", || normalize_ranks(g));
    stage("assign_rank_min_max", || assign_rank_min_max(g));
    stage("remove_edge_label_proxies", || remove_edge_label_proxies(g));
    stage("normalize", || normalize::run(g));
    stage("parent_dummy_chains", || parent_dummy_chains::run(g))?;
    stage("add_border_segments", || add_border_segments::run(g))?;
    stage("order", || {
        order::order(
            g,
            OrderOptions {
                keep_node_order: opts.keep_node_order,
                node_order: &opts.node_order,
            },
        )
    })?;
    stage("insert_self_edges", || self_edges::insert_self_edges(g));
    stage("coordinate_system_adjust", || coordinate_system::adjust(g));
    stage("position", || position::position(g));
    stage("position_self_edges", || self_edges::position_self_edges(g));
    stage("remove_border_nodes", || remove_border_nodes(g));
    stage("normalize_undo", || normalize::undo(g));
    stage("fixup_edge_label_coords", || fixup_edge_label_coords(g));
    stage("coordinate_system_undo", || coordinate_system::undo(g));
    stage("translate_graph", || translate_graph(g));
    stage("assign_node_intersects", || assign_node_intersects(g));
    stage("reverse_points", || reverse_points_for_reversed_edges(g));
    stage("acyclic_undo", || acyclic::undo(g));
    Ok(())
}

/// Ranks a flat copy of `g` and copies the ranks of leaf nodes back.
fn rank_compound(g: &mut LayoutGraph) {
    let mut flat = as_non_compound_graph(g);
    rank::rank(&mut flat);
    for (v, node) in flat.node_labels() {
        if g.has_children(v) {
            continue;
        }
        if let Some(target) = g.node_mut(v) {
            target.rank = node.rank;
        }
    }
}

/// Every caller edge must reach a later rank (the same one for `minlen` 0). Manual layers are
/// the only way to break this. Edges of the nesting scaffold are dropped before anything reads
/// their ranks, so they are not checked.
fn check_layers(g: &LayoutGraph) -> Result<()> {
    let is_real = |v: &str| g.node(v).is_some_and(|n| !n.is_dummy()) && !g.has_children(v);
    for (e, label) in g.edge_labels() {
        if label.nesting_edge || !is_real(&e.v) || !is_real(&e.w) {
            continue;
        }
        let rank = |v: &str| g.node(v).and_then(|n| n.rank);
        let (Some(v_rank), Some(w_rank)) = (rank(&e.v), rank(&e.w)) else {
            continue;
        };
        if w_rank < v_rank + label.minlen.clamp(0, 1) {
            return Err(LayoutError::InconsistentLayer {
                v: e.v.clone(),
                w: e.w.clone(),
            });
        }
    }
    Ok(())
}

/// Copies the layout-relevant attributes of `input` into a fresh compound multigraph.
pub fn build_layout_graph(input: &LayoutGraph) -> Result<LayoutGraph> {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        multigraph: true,
        compound: true,
    });
    let config = input.graph();
    g.set_graph(GraphLabel {
        rankdir: config.rankdir,
        align: config.align,
        nodesep: config.nodesep,
        edgesep: config.edgesep,
        ranksep: config.ranksep,
        marginx: config.marginx,
        marginy: config.marginy,
        acyclicer: config.acyclicer,
        ranker: config.ranker,
        ..Default::default()
    });

    for (v, node) in input.node_labels() {
        g.set_node(
            v,
            NodeLabel {
                width: node.width,
                height: node.height,
                layer: node.layer,
                fixorder: node.fixorder,
                ..Default::default()
            },
        );
    }
    if input.is_compound() {
        for v in input.nodes() {
            if let Some(parent) = input.parent(v) {
                g.set_parent(v, Some(parent))?;
            }
        }
    }

    for (e, edge) in input.edge_labels() {
        g.set_edge_key(
            e.clone(),
            EdgeLabel {
                minlen: edge.minlen,
                weight: edge.weight,
                width: edge.width,
                height: edge.height,
                labelpos: edge.labelpos,
                labeloffset: edge.labeloffset,
                ..Default::default()
            },
        );
    }

    Ok(g)
}

/// Seeds `fixorder` from the orders a previous layout published; nodes new to this layout
/// are left unpinned.
pub fn inherit_order(g: &mut LayoutGraph, prev: &LayoutGraph) {
    for (v, node) in g.node_labels_mut() {
        node.fixorder = prev.node(v).and_then(|p| p.out_order);
    }
}

/// Splits every rank in two so edge labels can sit on the middle ranks, and pads label boxes
/// by their offset along the rank axis.
pub fn make_space_for_edge_labels(g: &mut LayoutGraph) {
    let rankdir = g.graph().rankdir;
    g.graph_mut().ranksep /= 2.0;
    for (_, node) in g.node_labels_mut() {
        if let Some(layer) = node.layer.as_mut() {
            *layer *= 2;
        }
    }
    for (_, edge) in g.edge_labels_mut() {
        edge.minlen *= 2;
        if edge.labelpos == LabelPos::C {
            continue;
        }
        match rankdir {
            RankDir::TB | RankDir::BT => edge.width += edge.labeloffset,
            RankDir::LR | RankDir::RL => edge.height += edge.labeloffset,
        }
    }
}

/// Marks the middle rank of each labelled edge with a proxy node, so that removing empty
/// ranks keeps the label rank balanced between the endpoints.
pub fn inject_edge_label_proxies(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        let Some(label) = g.edge_by_key(&e) else {
            continue;
        };
        if label.width == 0.0 || label.height == 0.0 {
            continue;
        }
        let rank = |v: &str| g.node(v).and_then(|n| n.rank).unwrap_or(0);
        let (v_rank, w_rank) = (rank(&e.v), rank(&e.w));
        let proxy = NodeLabel {
            rank: Some((w_rank - v_rank) / 2 + v_rank),
            edge_obj: Some(e),
            ..Default::default()
        };
        add_dummy_node(g, Dummy::EdgeProxy, proxy, "_ep");
    }
}

pub fn remove_edge_label_proxies(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        let Some(node) = g.node(&v).filter(|n| n.dummy == Some(Dummy::EdgeProxy)) else {
            continue;
        };
        let rank = node.rank;
        if let Some(edge) = node.edge_obj.clone() {
            if let Some(label) = g.edge_mut_by_key(&edge) {
                label.label_rank = rank;
            }
        }
        g.remove_node(&v);
    }
}

/// Gives each subgraph the box spanned by its border nodes, then drops all border nodes.
pub fn remove_border_nodes(g: &mut LayoutGraph) {
    for v in g.node_ids() {
        if !g.has_children(&v) {
            continue;
        }
        let Some(node) = g.node(&v) else {
            continue;
        };
        let at = |id: Option<&String>| id.and_then(|id| g.node(id));
        let top = at(node.border_top.as_ref());
        let bottom = at(node.border_bottom.as_ref());
        let left = at(node.border_left.iter().rev().flatten().next());
        let right = at(node.border_right.iter().rev().flatten().next());

        let x_of = |n: Option<&NodeLabel>| n.and_then(|n| n.x).unwrap_or(0.0);
        let y_of = |n: Option<&NodeLabel>| n.and_then(|n| n.y).unwrap_or(0.0);
        let or_min = |d: f64| if d == 0.0 || d.is_nan() { 10.0 } else { d };
        let width = or_min((x_of(right) - x_of(left)).abs());
        let height = or_min((y_of(bottom) - y_of(top)).abs());
        let x = x_of(left) + width / 2.0;
        let y = y_of(top) + height / 2.0;

        if let Some(node) = g.node_mut(&v) {
            node.width = width;
            node.height = height;
            node.x = Some(x);
            node.y = Some(y);
        }
    }

    for v in g.node_ids() {
        if g.node(&v).and_then(|n| n.dummy).is_some_and(Dummy::is_border) {
            g.remove_node(&v);
        }
    }
}

/// Moves side labels off the edge by their offset and removes the padding added for them.
pub fn fixup_edge_label_coords(g: &mut LayoutGraph) {
    for (_, edge) in g.edge_labels_mut() {
        let Some(x) = edge.x else {
            continue;
        };
        match edge.labelpos {
            LabelPos::L => {
                edge.width -= edge.labeloffset;
                edge.x = Some(x - edge.width / 2.0 - edge.labeloffset);
            }
            LabelPos::R => {
                edge.width -= edge.labeloffset;
                edge.x = Some(x + edge.width / 2.0 + edge.labeloffset);
            }
            LabelPos::C => {}
        }
    }
}

/// Shifts everything so the layout starts at the margins, and records the graph size.
pub fn translate_graph(g: &mut LayoutGraph) {
    let mut min_x = f64::INFINITY;
    let mut max_x: f64 = 0.0;
    let mut min_y = f64::INFINITY;
    let mut max_y: f64 = 0.0;
    let mut extend = |x: Option<f64>, y: Option<f64>, w: f64, h: f64| {
        if let Some(x) = x {
            min_x = min_x.min(x - w / 2.0);
            max_x = max_x.max(x + w / 2.0);
        }
        if let Some(y) = y {
            min_y = min_y.min(y - h / 2.0);
            max_y = max_y.max(y + h / 2.0);
        }
    };
    for (_, node) in g.node_labels() {
        extend(node.x, node.y, node.width, node.height);
    }
    for (_, edge) in g.edge_labels() {
        if edge.x.is_some() {
            extend(edge.x, edge.y, edge.width, edge.height);
        }
    }

    let (marginx, marginy) = (g.graph().marginx, g.graph().marginy);
    let min_x = if min_x.is_finite() { min_x } else { 0.0 } - marginx;
    let min_y = if min_y.is_finite() { min_y } else { 0.0 } - marginy;

    for (_, node) in g.node_labels_mut() {
        node.x = node.x.map(|x| x - min_x);
        node.y = node.y.map(|y| y - min_y);
    }
    for (_, edge) in g.edge_labels_mut() {
        for p in &mut edge.points {
            p.x -= min_x;
            p.y -= min_y;
        }
        edge.x = edge.x.map(|x| x - min_x);
        edge.y = edge.y.map(|y| y - min_y);
    }

    let graph = g.graph_mut();
    graph.width = max_x - min_x + marginx;
    graph.height = max_y - min_y + marginy;
}

/// Clips both ends of every edge to the boundary of its endpoint nodes.
pub fn assign_node_intersects(g: &mut LayoutGraph) {
    for e in g.edge_keys() {
        let center_and_size = |v: &str| {
            g.node(v).map(|n| {
                let center = Point::new(n.x.unwrap_or(0.0), n.y.unwrap_or(0.0));
                (center, n.width, n.height)
            })
        };
        let (Some((v_center, v_w, v_h)), Some((w_center, w_w, w_h))) =
            (center_and_size(&e.v), center_and_size(&e.w))
        else {
            continue;
        };
        let Some(edge) = g.edge_mut_by_key(&e) else {
            continue;
        };
        let (toward_v, toward_w) = match (edge.points.first(), edge.points.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => (w_center, v_center),
        };
        edge.points.insert(0, intersect_rect(v_center, v_w, v_h, toward_v));
        edge.points.push(intersect_rect(w_center, w_w, w_h, toward_w));
    }
}

pub fn reverse_points_for_reversed_edges(g: &mut LayoutGraph) {
    for (_, edge) in g.edge_labels_mut() {
        if edge.reversed {
            edge.points.reverse();
        }
    }
}

/// Publishes the results held in `lg` onto the caller's graph.
pub fn update_input_graph(input: &mut LayoutGraph, lg: &LayoutGraph) {
    for (v, node) in input.node_labels_mut() {
        let Some(laid) = lg.node(v) else {
            continue;
        };
        node.x = laid.x;
        node.y = laid.y;
        node.out_order = laid.order;
        node.out_rank = laid.rank;
        if lg.has_children(v) {
            node.width = laid.width;
            node.height = laid.height;
        }
    }

    for (e, edge) in input.edge_labels_mut() {
        let Some(laid) = lg.edge_by_key(e) else {
            edge.points.clear();
            continue;
        };
        edge.points = laid.points.clone();
        if laid.x.is_some() {
            edge.x = laid.x;
            edge.y = laid.y;
        }
    }

    let graph = input.graph_mut();
    graph.width = lg.graph().width;
    graph.height = lg.graph().height;
}
