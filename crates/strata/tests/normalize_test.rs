use strata::graphlib::{EdgeKey, Graph, GraphOptions};
use strata::{
    Dummy, EdgeLabel, GraphLabel, LabelPos, LayoutGraph, NodeLabel, normalize,
    parent_dummy_chains,
};

fn new_graph() -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        multigraph: true,
        compound: true,
    });
    g.set_graph(GraphLabel::default());
    g
}

fn ranked(rank: i32) -> NodeLabel {
    NodeLabel {
        rank: Some(rank),
        ..Default::default()
    }
}

fn chain(g: &LayoutGraph, from: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut v = from.to_string();
    while let Some(w) = g.successors(&v).first().map(|w| w.to_string()) {
        out.push(w.clone());
        v = w;
    }
    out
}

#[test]
fn normalize_leaves_unit_edges_alone() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(1));
    g.set_edge("a", "b", EdgeLabel::default());

    normalize::run(&mut g);

    assert_eq!(g.node_count(), 2);
    assert!(g.graph().dummy_chains.is_empty());
}

#[test]
fn normalize_splits_long_edges_into_dummy_chains() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(3));
    g.set_edge("a", "b", EdgeLabel::with_weight(2.0));

    normalize::run(&mut g);

    let path = chain(&g, "a");
    assert_eq!(path.len(), 3);
    assert_eq!(path[2], "b");
    assert_eq!(g.graph().dummy_chains, vec![path[0].clone()]);
    for (i, d) in path[..2].iter().enumerate() {
        let node = g.node(d).unwrap();
        assert_eq!(node.dummy, Some(Dummy::Edge));
        assert_eq!(node.rank, Some(i as i32 + 1));
    }
    assert!(!g.has_edge("a", "b", None));
    assert!(g.edge_labels().all(|(_, e)| e.weight == 2.0));
}

#[test]
fn normalize_reserves_the_label_rank() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(4));
    g.set_edge(
        "a",
        "b",
        EdgeLabel {
            width: 40.0,
            height: 20.0,
            labelpos: LabelPos::L,
            label_rank: Some(2),
            ..Default::default()
        },
    );

    normalize::run(&mut g);

    let path = chain(&g, "a");
    let label = g.node(&path[1]).unwrap();
    assert_eq!(label.dummy, Some(Dummy::EdgeLabel));
    assert_eq!((label.width, label.height), (40.0, 20.0));
    assert_eq!(label.labelpos, Some(LabelPos::L));
    assert_eq!(g.node(&path[0]).unwrap().width, 0.0);
}

#[test]
fn normalize_undo_turns_chains_into_points() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(3));
    g.set_edge(
        "a",
        "b",
        EdgeLabel {
            width: 10.0,
            height: 5.0,
            label_rank: Some(2),
            ..Default::default()
        },
    );
    normalize::run(&mut g);

    let path = chain(&g, "a");
    for (i, d) in path[..2].iter().enumerate() {
        let node = g.node_mut(d).unwrap();
        node.x = Some(5.0 * (i as f64 + 1.0));
        node.y = Some(10.0 * (i as f64 + 1.0));
    }

    normalize::undo(&mut g);

    assert_eq!(g.node_count(), 2);
    let edge = g.edge("a", "b", None).unwrap();
    assert_eq!(edge.points.len(), 2);
    assert_eq!((edge.points[0].x, edge.points[0].y), (5.0, 10.0));
    assert_eq!((edge.points[1].x, edge.points[1].y), (10.0, 20.0));
    assert_eq!((edge.x, edge.y), (Some(10.0), Some(20.0)));
    assert_eq!((edge.width, edge.height), (10.0, 5.0));
}

#[test]
fn normalize_keeps_the_full_label_of_flat_and_upward_edges() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node("b", ranked(0));
    g.set_node("c", ranked(2));
    let label = EdgeLabel {
        weight: 3.0,
        width: 12.0,
        height: 4.0,
        labelpos: LabelPos::L,
        reversed: true,
        ..Default::default()
    };
    g.set_edge("a", "b", label.clone());
    g.set_edge("c", "a", label.clone());

    normalize::run(&mut g);

    assert_eq!(g.node_count(), 3);
    assert!(g.graph().dummy_chains.is_empty());
    assert_eq!(g.edge("a", "b", None), Some(&label));
    assert_eq!(g.edge("c", "a", None), Some(&label));
}

#[test]
fn parent_dummy_chains_enter_subgraphs_by_rank() {
    let mut g = new_graph();
    g.set_node("a", ranked(0));
    g.set_node(
        "sg",
        NodeLabel {
            min_rank: Some(2),
            max_rank: Some(3),
            ..Default::default()
        },
    );
    g.set_node("b", ranked(3));
    g.set_parent("b", Some("sg")).unwrap();
    g.set_edge("a", "b", EdgeLabel::default());

    normalize::run(&mut g);
    parent_dummy_chains::run(&mut g).unwrap();

    let path = chain(&g, "a");
    assert_eq!(g.parent(&path[0]), None);
    assert_eq!(g.parent(&path[1]), Some("sg"));
}

#[test]
fn parent_dummy_chains_climb_out_of_subgraphs() {
    let mut g = new_graph();
    g.set_node(
        "sg",
        NodeLabel {
            min_rank: Some(0),
            max_rank: Some(1),
            ..Default::default()
        },
    );
    g.set_node("a", ranked(0));
    g.set_parent("a", Some("sg")).unwrap();
    g.set_node("b", ranked(3));
    g.set_edge("a", "b", EdgeLabel::default());

    normalize::run(&mut g);
    parent_dummy_chains::run(&mut g).unwrap();

    let path = chain(&g, "a");
    assert_eq!(g.parent(&path[0]), Some("sg"));
    assert_eq!(g.parent(&path[1]), None);
}

#[test]
fn parent_dummy_chains_follow_nested_subgraphs_out_and_in() {
    let mut g = new_graph();
    let span = |min: i32, max: i32| NodeLabel {
        min_rank: Some(min),
        max_rank: Some(max),
        ..Default::default()
    };
    g.set_node("sg1", span(0, 4));
    g.set_node("sg2", span(1, 3));
    g.set_parent("sg2", Some("sg1")).unwrap();
    g.set_node("sg3", span(6, 10));
    g.set_node("sg4", span(7, 9));
    g.set_parent("sg4", Some("sg3")).unwrap();
    g.set_node("a", ranked(2));
    g.set_parent("a", Some("sg2")).unwrap();
    g.set_node("b", ranked(8));
    g.set_parent("b", Some("sg4")).unwrap();

    let dummies = ["d1", "d2", "d3", "d4", "d5"];
    for (v, rank) in dummies.iter().zip(3..) {
        g.set_node(
            *v,
            NodeLabel {
                dummy: Some(Dummy::Edge),
                ..ranked(rank)
            },
        );
    }
    g.node_mut("d1").unwrap().edge_obj = Some(EdgeKey::new("a", "b"));
    g.graph_mut().dummy_chains = vec!["d1".to_string()];
    g.set_path(&["a", "d1", "d2", "d3", "d4", "d5", "b"]);

    parent_dummy_chains::run(&mut g).unwrap();

    let parents: Vec<Option<&str>> = dummies.iter().map(|v| g.parent(v)).collect();
    assert_eq!(
        parents,
        vec![Some("sg2"), Some("sg1"), None, Some("sg3"), Some("sg4")]
    );
}
