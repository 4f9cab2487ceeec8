use strata::graphlib::{EdgeKey, Graph, GraphOptions, alg};
use strata::greedy_fas::greedy_fas;
use strata::{Acyclicer, EdgeLabel, GraphLabel, LayoutGraph, acyclic};

fn new_graph(acyclicer: Acyclicer) -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        multigraph: true,
        compound: false,
    });
    g.set_graph(GraphLabel {
        acyclicer,
        ..Default::default()
    });
    g
}

fn is_acyclic(g: &LayoutGraph) -> bool {
    // Every node of a DAG is eventually a source once its predecessors are peeled away.
    let mut indegree: Vec<(String, usize)> = g
        .nodes()
        .map(|v| (v.to_string(), g.in_edges(v, None).len()))
        .collect();
    let mut removed = 0;
    loop {
        let Some(pos) = indegree.iter().position(|(_, d)| *d == 0) else {
            break;
        };
        let (v, _) = indegree.remove(pos);
        removed += 1;
        for e in g.out_edges(&v, None) {
            if let Some(entry) = indegree.iter_mut().find(|(w, _)| *w == e.w) {
                entry.1 -= 1;
            }
        }
    }
    removed == g.node_count()
}

#[test]
fn acyclic_breaks_cycles_and_undo_restores_edges() {
    for acyclicer in [Acyclicer::Greedy, Acyclicer::Dfs] {
        let mut g = new_graph(acyclicer);
        g.set_edge("a", "b", EdgeLabel::with_minlen(2));
        g.set_edge("b", "c", EdgeLabel::default());
        g.set_edge("c", "a", EdgeLabel::with_weight(3.0));
        g.set_edge("c", "d", EdgeLabel::default());

        acyclic::run(&mut g);
        assert!(is_acyclic(&g), "{acyclicer:?}");
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.edge_labels().filter(|(_, e)| e.reversed).count(), 1);

        acyclic::undo(&mut g);
        let mut keys: Vec<(String, String)> =
            g.edges().map(|e| (e.v.clone(), e.w.clone())).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                ("a".to_string(), "b".to_string()),
                ("b".to_string(), "c".to_string()),
                ("c".to_string(), "a".to_string()),
                ("c".to_string(), "d".to_string()),
            ]
        );
        assert_eq!(g.edge("a", "b", None).unwrap().minlen, 2);
        assert_eq!(g.edge("c", "a", None).unwrap().weight, 3.0);
        assert!(g.edge_labels().all(|(_, e)| !e.reversed));
    }
}

#[test]
fn acyclic_keeps_edge_names_through_reversal() {
    let mut g = new_graph(Acyclicer::Greedy);
    g.set_edge_named("a", "b", Some("x".to_string()), EdgeLabel::default());
    g.set_edge_named("b", "a", Some("y".to_string()), EdgeLabel::default());

    acyclic::run(&mut g);
    assert!(is_acyclic(&g));

    acyclic::undo(&mut g);
    assert!(g.has_edge("a", "b", Some("x")));
    assert!(g.has_edge("b", "a", Some("y")));
}

#[test]
fn acyclic_leaves_dags_alone() {
    let mut g = new_graph(Acyclicer::Greedy);
    g.set_edge("a", "b", EdgeLabel::default());
    g.set_edge("a", "c", EdgeLabel::default());
    g.set_edge("b", "c", EdgeLabel::default());

    acyclic::run(&mut g);

    assert!(g.edge_labels().all(|(_, e)| !e.reversed));
    assert_eq!(alg::preorder(&g, &["a"]), vec!["a", "b", "c"]);
}

#[test]
fn greedy_fas_is_empty_for_a_dag() {
    let mut g: Graph<(), i64, ()> = Graph::default();
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "c", 1);

    assert!(greedy_fas(&g, |w| *w).is_empty());
}

#[test]
fn greedy_fas_breaks_a_cycle_with_one_edge() {
    let mut g: Graph<(), i64, ()> = Graph::default();
    g.set_edge("a", "b", 1);
    g.set_edge("b", "c", 1);
    g.set_edge("c", "a", 1);

    assert_eq!(greedy_fas(&g, |w| *w).len(), 1);
}

#[test]
fn greedy_fas_prefers_the_lighter_edge() {
    let mut g: Graph<(), i64, ()> = Graph::default();
    g.set_edge("a", "b", 2);
    g.set_edge("b", "a", 1);

    assert_eq!(greedy_fas(&g, |w| *w), vec![EdgeKey::new("b", "a")]);
}
