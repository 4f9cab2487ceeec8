use strata::graphlib::{Graph, GraphOptions};
use strata::position::{self, bk};
use strata::{Align, BorderSide, Dummy, EdgeLabel, GraphLabel, LayoutGraph, NodeLabel};

fn new_graph() -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions::default());
    g.set_graph(GraphLabel::default());
    g
}

fn place(g: &mut LayoutGraph, v: &str, rank: i32, order: usize, width: f64) {
    g.set_node(
        v,
        NodeLabel {
            rank: Some(rank),
            order: Some(order),
            width,
            height: 10.0,
            ..Default::default()
        },
    );
}

fn xs(entries: &[(&str, f64)]) -> bk::Xs {
    entries.iter().map(|(v, x)| (v.to_string(), *x)).collect()
}

#[test]
fn position_x_puts_a_single_node_at_the_origin() {
    let mut g = new_graph();
    place(&mut g, "a", 0, 0, 100.0);

    let xs = bk::position_x(&g);

    assert_eq!(xs.get("a"), Some(&0.0));
}

#[test]
fn position_x_separates_neighbours_by_half_widths_and_nodesep() {
    let mut g = new_graph();
    g.graph_mut().nodesep = 100.0;
    place(&mut g, "a", 0, 0, 100.0);
    place(&mut g, "b", 0, 1, 200.0);

    let xs = bk::position_x(&g);

    assert_eq!(xs["b"] - xs["a"], 250.0);
}

#[test]
fn position_x_uses_edgesep_between_dummies() {
    let mut g = new_graph();
    g.graph_mut().nodesep = 100.0;
    g.graph_mut().edgesep = 20.0;
    place(&mut g, "a", 0, 0, 100.0);
    place(&mut g, "d", 0, 1, 0.0);
    g.node_mut("d").unwrap().dummy = Some(Dummy::Edge);

    let xs = bk::position_x(&g);

    assert_eq!(xs["d"] - xs["a"], 50.0 + 50.0 + 10.0);
}

#[test]
fn position_x_centres_a_parent_over_two_children() {
    let mut g = new_graph();
    g.graph_mut().nodesep = 10.0;
    place(&mut g, "a", 0, 0, 20.0);
    place(&mut g, "b", 1, 0, 50.0);
    place(&mut g, "c", 1, 1, 50.0);
    g.set_edge("a", "b", EdgeLabel::default());
    g.set_edge("a", "c", EdgeLabel::default());

    let xs = bk::position_x(&g);

    let a = xs["a"];
    assert_eq!(xs["b"], a - 30.0);
    assert_eq!(xs["c"], a + 30.0);
}

#[test]
fn position_x_honours_a_pinned_alignment() {
    let mut g = new_graph();
    g.graph_mut().nodesep = 10.0;
    g.graph_mut().align = Some(Align::UL);
    place(&mut g, "a", 0, 0, 20.0);
    place(&mut g, "b", 1, 0, 50.0);
    place(&mut g, "c", 1, 1, 50.0);
    g.set_edge("a", "b", EdgeLabel::default());
    g.set_edge("a", "c", EdgeLabel::default());

    let xs = bk::position_x(&g);

    assert_eq!(xs["a"], xs["b"]);
    assert_eq!(xs["c"] - xs["b"], 60.0);
}

#[test]
fn bk_flags_segments_crossing_inner_segments() {
    let mut g = new_graph();
    place(&mut g, "a", 0, 0, 0.0);
    place(&mut g, "b", 0, 1, 0.0);
    place(&mut g, "c", 1, 0, 0.0);
    place(&mut g, "d", 1, 1, 0.0);
    g.node_mut("b").unwrap().dummy = Some(Dummy::Edge);
    g.node_mut("c").unwrap().dummy = Some(Dummy::Edge);
    g.set_edge("a", "d", EdgeLabel::default());
    g.set_edge("b", "c", EdgeLabel::default());

    let layering = vec![
        vec!["a".to_string(), "b".to_string()],
        vec!["c".to_string(), "d".to_string()],
    ];
    let conflicts = bk::find_type1_conflicts(&g, &layering);

    assert!(bk::has_conflict(&conflicts, "a", "d"));
    assert!(bk::has_conflict(&conflicts, "d", "a"));
    assert!(!bk::has_conflict(&conflicts, "b", "c"));
}

#[test]
fn bk_flags_inner_segments_crossing_a_subgraph_border() {
    let mut g = new_graph();
    let border = Dummy::Border(BorderSide::Left);
    let north = [("u0", Dummy::Edge), ("bt", border), ("u2", Dummy::Edge)];
    let south = [("x", Dummy::Edge), ("bs", border), ("y", Dummy::Edge)];
    for (rank, row) in [north, south].iter().enumerate() {
        for (order, (v, dummy)) in row.iter().enumerate() {
            place(&mut g, v, rank as i32, order, 0.0);
            g.node_mut(v).unwrap().dummy = Some(*dummy);
        }
    }
    g.set_edge("u2", "x", EdgeLabel::default());
    g.set_edge("bt", "bs", EdgeLabel::default());
    g.set_edge("u0", "y", EdgeLabel::default());

    let layering = vec![
        vec!["u0".to_string(), "bt".to_string(), "u2".to_string()],
        vec!["x".to_string(), "bs".to_string(), "y".to_string()],
    ];
    let conflicts = bk::find_type2_conflicts(&g, &layering);

    assert!(bk::has_conflict(&conflicts, "u2", "x"));
    assert!(bk::has_conflict(&conflicts, "u0", "y"));
    assert!(!bk::has_conflict(&conflicts, "bt", "bs"));
}

#[test]
fn bk_ignores_inner_segments_on_one_side_of_a_border() {
    let mut g = new_graph();
    let border = Dummy::Border(BorderSide::Left);
    let north = [("u0", Dummy::Edge), ("bt", border)];
    let south = [("x", Dummy::Edge), ("bs", border)];
    for (rank, row) in [north, south].iter().enumerate() {
        for (order, (v, dummy)) in row.iter().enumerate() {
            place(&mut g, v, rank as i32, order, 0.0);
            g.node_mut(v).unwrap().dummy = Some(*dummy);
        }
    }
    g.set_edge("u0", "x", EdgeLabel::default());
    g.set_edge("bt", "bs", EdgeLabel::default());

    let layering = vec![
        vec!["u0".to_string(), "bt".to_string()],
        vec!["x".to_string(), "bs".to_string()],
    ];
    let conflicts = bk::find_type2_conflicts(&g, &layering);

    assert!(!bk::has_conflict(&conflicts, "u0", "x"));
    assert!(!bk::has_conflict(&conflicts, "bt", "bs"));
}

#[test]
fn bk_conflicts_are_unordered_pairs() {
    let mut conflicts = bk::Conflicts::default();
    bk::add_conflict(&mut conflicts, "b", "a");

    assert!(bk::has_conflict(&conflicts, "a", "b"));
    assert!(!bk::has_conflict(&conflicts, "a", "c"));
}

#[test]
fn bk_vertical_alignment_skips_conflicting_medians() {
    let layering = vec![
        vec!["a".to_string(), "b".to_string()],
        vec!["c".to_string()],
    ];
    let neighbors = |v: &str| match v {
        "c" => vec!["a".to_string(), "b".to_string()],
        _ => Vec::new(),
    };

    let free = bk::vertical_alignment(&layering, &bk::Conflicts::default(), neighbors);
    assert_eq!(free.root["c"], "a");
    assert_eq!(free.align["a"], "c");

    let mut conflicts = bk::Conflicts::default();
    bk::add_conflict(&mut conflicts, "a", "c");
    let blocked = bk::vertical_alignment(&layering, &conflicts, neighbors);
    assert_eq!(blocked.root["c"], "b");
    assert_eq!(blocked.root["a"], "a");
}

#[test]
fn bk_balance_takes_the_median_of_four_candidates() {
    let mut xss = bk::Alignments::default();
    xss.insert(Align::UL, xs(&[("a", 0.0), ("b", 1.0)]));
    xss.insert(Align::UR, xs(&[("a", 10.0), ("b", 2.0)]));
    xss.insert(Align::DL, xs(&[("a", 20.0), ("b", 3.0)]));
    xss.insert(Align::DR, xs(&[("a", 30.0), ("b", 4.0)]));

    let balanced = bk::balance(&xss, None);
    assert_eq!(balanced["a"], 15.0);
    assert_eq!(balanced["b"], 2.5);

    let pinned = bk::balance(&xss, Some(Align::DR));
    assert_eq!(pinned["a"], 30.0);
}

#[test]
fn bk_align_coordinates_matches_the_narrowest_alignment() {
    let mut xss = bk::Alignments::default();
    xss.insert(Align::UL, xs(&[("a", 0.0), ("b", 50.0)]));
    xss.insert(Align::UR, xs(&[("a", -50.0), ("b", 0.0)]));
    xss.insert(Align::DL, xs(&[("a", 50.0), ("b", 100.0)]));
    xss.insert(Align::DR, xs(&[("a", -100.0), ("b", -50.0)]));

    bk::align_coordinates(&mut xss, Align::UL);

    assert_eq!(xss[&Align::UR]["b"], 50.0);
    assert_eq!(xss[&Align::DL]["a"], 0.0);
    assert_eq!(xss[&Align::DR]["b"], 50.0);
}

#[test]
fn position_stacks_ranks_by_height_and_ranksep() {
    let mut g = new_graph();
    g.graph_mut().ranksep = 20.0;
    place(&mut g, "a", 0, 0, 10.0);
    place(&mut g, "b", 1, 0, 10.0);
    g.node_mut("a").unwrap().height = 40.0;
    g.set_edge("a", "b", EdgeLabel::default());

    position::position(&mut g);

    assert_eq!(g.node("a").unwrap().y, Some(20.0));
    assert_eq!(g.node("b").unwrap().y, Some(40.0 + 20.0 + 5.0));
    assert_eq!(g.node("a").unwrap().x, g.node("b").unwrap().x);
}
