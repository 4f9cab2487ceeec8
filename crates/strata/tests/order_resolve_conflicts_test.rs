use strata::graphlib::{Graph, GraphOptions};
use strata::order::{BarycenterEntry, ConstraintGraph, SortEntry, resolve_conflicts};

fn entry(v: &str, barycenter: Option<f64>, weight: f64) -> BarycenterEntry {
    BarycenterEntry {
        v: v.to_string(),
        barycenter,
        weight,
    }
}

fn constraints(edges: &[(&str, &str)]) -> ConstraintGraph {
    let mut cg: ConstraintGraph = Graph::new(GraphOptions::default());
    for (v, w) in edges {
        cg.set_edge(*v, *w, ());
    }
    cg
}

fn sorted_by_index(mut entries: Vec<SortEntry>) -> Vec<SortEntry> {
    entries.sort_by_key(|e| e.i);
    entries
}

#[test]
fn resolve_conflicts_passes_entries_through_without_constraints() {
    let entries = vec![entry("a", Some(2.0), 3.0), entry("b", Some(1.0), 2.0)];

    let resolved = sorted_by_index(resolve_conflicts(&entries, &constraints(&[])));

    assert_eq!(
        resolved,
        vec![
            SortEntry {
                vs: vec!["a".to_string()],
                i: 0,
                barycenter: Some(2.0),
                weight: 3.0,
                ..Default::default()
            },
            SortEntry {
                vs: vec!["b".to_string()],
                i: 1,
                barycenter: Some(1.0),
                weight: 2.0,
                ..Default::default()
            },
        ]
    );
}

#[test]
fn resolve_conflicts_leaves_satisfied_constraints_alone() {
    let entries = vec![entry("a", Some(1.0), 1.0), entry("b", Some(2.0), 1.0)];

    let resolved = sorted_by_index(resolve_conflicts(&entries, &constraints(&[("a", "b")])));

    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved[0].vs, vec!["a"]);
    assert_eq!(resolved[1].vs, vec!["b"]);
}

#[test]
fn resolve_conflicts_merges_violated_constraints_by_weighted_barycenter() {
    let entries = vec![entry("a", Some(3.0), 1.0), entry("b", Some(2.0), 2.0)];

    let resolved = resolve_conflicts(&entries, &constraints(&[("a", "b")]));

    assert_eq!(
        resolved,
        vec![SortEntry {
            vs: vec!["a".to_string(), "b".to_string()],
            i: 0,
            barycenter: Some(7.0 / 3.0),
            weight: 3.0,
            ..Default::default()
        }]
    );
}

#[test]
fn resolve_conflicts_merges_entries_lacking_a_barycenter() {
    let entries = vec![entry("a", None, 0.0), entry("b", Some(2.0), 1.0)];

    let resolved = resolve_conflicts(&entries, &constraints(&[("b", "a")]));

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].vs, vec!["b", "a"]);
    assert_eq!(resolved[0].barycenter, Some(2.0));
    assert_eq!(resolved[0].weight, 1.0);
    assert_eq!(resolved[0].i, 0);
}

#[test]
fn resolve_conflicts_merges_along_a_constraint_chain() {
    let entries = vec![
        entry("a", Some(4.0), 1.0),
        entry("b", Some(3.0), 1.0),
        entry("c", Some(2.0), 1.0),
    ];

    let resolved = resolve_conflicts(&entries, &constraints(&[("a", "b"), ("b", "c")]));

    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].vs, vec!["a", "b", "c"]);
    assert_eq!(resolved[0].barycenter, Some(3.0));
    assert_eq!(resolved[0].weight, 3.0);
}
