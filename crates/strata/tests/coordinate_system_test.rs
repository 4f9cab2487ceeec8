use strata::graphlib::{Graph, GraphOptions};
use strata::{
    EdgeLabel, GraphLabel, LayoutGraph, NodeLabel, Point, RankDir, coordinate_system,
};

fn sample(rankdir: RankDir) -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions::default());
    g.set_graph(GraphLabel {
        rankdir,
        ..Default::default()
    });
    g.set_node(
        "a",
        NodeLabel {
            width: 100.0,
            height: 200.0,
            x: Some(5.0),
            y: Some(-7.0),
            ..Default::default()
        },
    );
    g.set_node("b", NodeLabel::sized(30.0, 40.0));
    g.set_edge(
        "a",
        "b",
        EdgeLabel {
            width: 10.0,
            height: 20.0,
            x: Some(1.0),
            y: Some(2.0),
            points: vec![Point::new(3.0, 4.0), Point::new(-5.0, 6.0)],
            ..Default::default()
        },
    );
    g
}

#[test]
fn coordinate_system_undo_inverts_adjust() {
    for rankdir in [RankDir::TB, RankDir::BT, RankDir::LR, RankDir::RL] {
        let original = sample(rankdir);
        let mut g = original.clone();

        coordinate_system::adjust(&mut g);
        coordinate_system::undo(&mut g);

        for v in ["a", "b"] {
            assert_eq!(g.node(v), original.node(v), "{rankdir:?} node {v}");
        }
        assert_eq!(
            g.edge("a", "b", None),
            original.edge("a", "b", None),
            "{rankdir:?}"
        );
    }
}

#[test]
fn coordinate_system_adjust_swaps_sizes_for_horizontal_layouts() {
    let mut g = sample(RankDir::LR);

    coordinate_system::adjust(&mut g);

    let a = g.node("a").unwrap();
    assert_eq!((a.width, a.height), (200.0, 100.0));
    assert_eq!((a.x, a.y), (Some(-7.0), Some(5.0)));
    let e = g.edge("a", "b", None).unwrap();
    assert_eq!((e.width, e.height), (20.0, 10.0));
}

#[test]
fn coordinate_system_bottom_to_top_mirrors_y() {
    let mut g = sample(RankDir::BT);

    coordinate_system::undo(&mut g);

    let a = g.node("a").unwrap();
    assert_eq!((a.width, a.height), (100.0, 200.0));
    assert_eq!(a.y, Some(7.0));
    let e = g.edge("a", "b", None).unwrap();
    assert_eq!(e.points[1], Point::new(-5.0, -6.0));
    assert_eq!(e.y, Some(-2.0));
}

#[test]
fn coordinate_system_right_to_left_swaps_then_mirrors() {
    let mut g = sample(RankDir::RL);

    coordinate_system::undo(&mut g);

    // y is mirrored first, then the axes swap.
    let a = g.node("a").unwrap();
    assert_eq!((a.x, a.y), (Some(7.0), Some(5.0)));
    assert_eq!((a.width, a.height), (200.0, 100.0));
}
