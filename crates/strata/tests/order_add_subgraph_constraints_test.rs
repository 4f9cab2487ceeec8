use strata::graphlib::{Graph, GraphOptions};
use strata::order::{ConstraintGraph, LayerGraph, LayerNode, add_subgraph_constraints};

fn layer_graph() -> LayerGraph {
    Graph::new(GraphOptions {
        multigraph: false,
        compound: true,
    })
}

fn nest(lg: &mut LayerGraph, child: &str, parent: &str) {
    lg.set_node(child, LayerNode::default());
    lg.set_node(parent, LayerNode::default());
    lg.set_parent(child, Some(parent)).unwrap();
}

fn vs(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|v| v.to_string()).collect()
}

#[test]
fn add_subgraph_constraints_does_nothing_for_flat_nodes() {
    let mut lg = layer_graph();
    let mut cg: ConstraintGraph = Graph::new(GraphOptions::default());
    for v in ["a", "b"] {
        lg.set_node(v, LayerNode::default());
    }

    add_subgraph_constraints(&lg, &mut cg, &vs(&["a", "b"]));

    assert_eq!(cg.edge_count(), 0);
}

#[test]
fn add_subgraph_constraints_does_nothing_within_one_subgraph() {
    let mut lg = layer_graph();
    let mut cg: ConstraintGraph = Graph::new(GraphOptions::default());
    nest(&mut lg, "a", "sg");
    nest(&mut lg, "b", "sg");

    add_subgraph_constraints(&lg, &mut cg, &vs(&["a", "b"]));

    assert_eq!(cg.edge_count(), 0);
}

#[test]
fn add_subgraph_constraints_orders_sibling_subgraphs() {
    let mut lg = layer_graph();
    let mut cg: ConstraintGraph = Graph::new(GraphOptions::default());
    nest(&mut lg, "a", "sg1");
    nest(&mut lg, "b", "sg2");
    nest(&mut lg, "c", "sg1");

    add_subgraph_constraints(&lg, &mut cg, &vs(&["a", "b", "c"]));

    assert!(cg.has_edge("sg1", "sg2", None));
    // sg2 -> sg1 follows from c coming after b
    assert!(cg.has_edge("sg2", "sg1", None));
}

#[test]
fn add_subgraph_constraints_links_nested_subgraphs_at_their_common_level() {
    let mut lg = layer_graph();
    let mut cg: ConstraintGraph = Graph::new(GraphOptions::default());
    nest(&mut lg, "a", "sg2");
    nest(&mut lg, "sg2", "sg1");
    nest(&mut lg, "b", "sg4");
    nest(&mut lg, "sg4", "sg3");

    add_subgraph_constraints(&lg, &mut cg, &vs(&["a", "b"]));

    assert!(cg.has_edge("sg1", "sg3", None));
    assert!(!cg.has_edge("sg2", "sg4", None));
    assert_eq!(cg.edge_count(), 1);
}
