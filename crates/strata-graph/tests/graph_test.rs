use strata_graph::{EdgeKey, Graph, GraphOptions};

fn directed() -> Graph<i32, String, ()> {
    Graph::new(GraphOptions::default())
}

fn compound() -> Graph<i32, String, ()> {
    Graph::new(GraphOptions {
        compound: true,
        ..Default::default()
    })
}

fn multigraph() -> Graph<i32, String, ()> {
    Graph::new(GraphOptions {
        multigraph: true,
        ..Default::default()
    })
}

#[test]
fn graph_starts_empty() {
    let g = directed();
    assert_eq!(g.node_count(), 0);
    assert_eq!(g.edge_count(), 0);
    assert!(g.is_directed());
    assert!(!g.is_multigraph());
    assert!(!g.is_compound());
}

#[test]
fn graph_set_node_keeps_insertion_order() {
    let mut g = directed();
    g.set_node("b", 1).set_node("a", 2).set_node("c", 3);
    g.set_node("b", 4);
    assert_eq!(g.node_ids(), vec!["b", "a", "c"]);
    assert_eq!(g.node("b"), Some(&4));
}

#[test]
fn graph_ensure_node_uses_default_label_and_keeps_existing() {
    let mut g = directed();
    g.set_default_node_label(|| 7);
    g.ensure_node("a");
    g.set_node("b", 1);
    g.ensure_node("b");
    assert_eq!(g.node("a"), Some(&7));
    assert_eq!(g.node("b"), Some(&1));
}

#[test]
fn graph_set_edge_creates_missing_endpoints() {
    let mut g = directed();
    g.set_edge_with_label("a", "b", "ab".to_string());
    assert!(g.has_node("a"));
    assert!(g.has_node("b"));
    assert_eq!(g.edge("a", "b", None), Some(&"ab".to_string()));
    assert!(!g.has_edge("b", "a", None));
}

#[test]
fn graph_set_edge_without_label_keeps_existing_label() {
    let mut g = directed();
    g.set_edge_with_label("a", "b", "first".to_string());
    g.set_edge("a", "b");
    assert_eq!(g.edge("a", "b", None), Some(&"first".to_string()));
    assert_eq!(g.edge_count(), 1);
}

#[test]
fn graph_ignores_edge_names_unless_multigraph() {
    let mut g = directed();
    g.set_edge_named("a", "b", Some("x"), Some("1".to_string()));
    g.set_edge_named("a", "b", Some("y"), Some("2".to_string()));
    assert_eq!(g.edge_count(), 1);
    assert_eq!(g.edge("a", "b", None), Some(&"2".to_string()));
}

#[test]
fn graph_multigraph_keeps_parallel_edges_apart() {
    let mut g = multigraph();
    g.set_edge_named("a", "b", Some("x"), Some("1".to_string()));
    g.set_edge_named("a", "b", Some("y"), Some("2".to_string()));
    g.set_edge_with_label("a", "b", "3".to_string());
    assert_eq!(g.edge_count(), 3);
    assert_eq!(g.edge("a", "b", Some("x")), Some(&"1".to_string()));
    assert_eq!(g.edge("a", "b", Some("y")), Some(&"2".to_string()));
    assert_eq!(g.edge("a", "b", None), Some(&"3".to_string()));
    assert_eq!(g.out_edges("a", None).len(), 3);
    // Parallel edges count once as a neighbour.
    assert_eq!(g.successors("a"), vec!["b"]);
}

#[test]
fn graph_undirected_canonicalizes_endpoints() {
    let mut g: Graph<i32, String, ()> = Graph::new(GraphOptions {
        directed: false,
        ..Default::default()
    });
    g.set_edge_with_label("b", "a", "ba".to_string());
    assert!(g.has_edge("a", "b", None));
    assert!(g.has_edge("b", "a", None));
    assert_eq!(g.edge_keys(), vec![EdgeKey::new("a", "b", None::<String>)]);
    assert_eq!(g.successors("a"), vec!["b"]);
    assert_eq!(g.predecessors("a"), vec!["b"]);
}

#[test]
fn graph_in_and_out_edges_filter_by_other_endpoint() {
    let mut g = directed();
    g.set_path(&["a", "b", "c"]);
    g.set_edge("a", "c");
    assert_eq!(
        g.in_edges("c", None),
        vec![
            EdgeKey::new("b", "c", None::<String>),
            EdgeKey::new("a", "c", None::<String>),
        ]
    );
    assert_eq!(
        g.in_edges("c", Some("a")),
        vec![EdgeKey::new("a", "c", None::<String>)]
    );
    assert_eq!(
        g.out_edges("a", Some("b")),
        vec![EdgeKey::new("a", "b", None::<String>)]
    );
    assert_eq!(g.node_edges("b", None).len(), 2);
    assert_eq!(g.node_edges("b", Some("c")).len(), 1);
}

#[test]
fn graph_neighbourhood_queries() {
    let mut g = directed();
    g.set_path(&["a", "b", "c"]);
    g.set_edge("d", "b");
    assert_eq!(g.predecessors("b"), vec!["a", "d"]);
    assert_eq!(g.successors("b"), vec!["c"]);
    assert_eq!(g.neighbors("b"), vec!["a", "d", "c"]);
    assert_eq!(g.sources(), vec!["a", "d"]);
    assert_eq!(g.sinks(), vec!["c"]);
    assert!(g.successors("missing").is_empty());
}

#[test]
fn graph_remove_edge_updates_adjacency() {
    let mut g = directed();
    g.set_edge_with_label("a", "b", "ab".to_string());
    assert_eq!(g.remove_edge("a", "b", None), Some("ab".to_string()));
    assert_eq!(g.edge_count(), 0);
    assert!(g.successors("a").is_empty());
    assert!(g.predecessors("b").is_empty());
    assert_eq!(g.remove_edge("a", "b", None), None);
}

#[test]
fn graph_remove_node_drops_incident_edges() {
    let mut g = directed();
    g.set_path(&["a", "b", "c"]);
    assert!(g.remove_node("b").is_some());
    assert!(!g.has_node("b"));
    assert_eq!(g.edge_count(), 0);
    assert!(g.successors("a").is_empty());
    assert!(g.remove_node("b").is_none());
}

#[test]
fn graph_set_parent_is_ignored_on_non_compound_graphs() {
    let mut g = directed();
    g.set_parent("a", "p");
    assert_eq!(g.parent("a"), None);
    assert!(!g.has_node("a"));
}

#[test]
fn graph_compound_hierarchy() {
    let mut g = compound();
    g.set_parent("a", "p");
    g.set_parent("b", "p");
    g.set_parent("p", "root");
    assert_eq!(g.parent("a"), Some("p"));
    assert_eq!(g.children("p"), vec!["a", "b"]);
    assert!(g.has_children("root"));
    assert!(!g.has_children("a"));
    assert_eq!(g.children_root(), vec!["root"]);

    g.set_parent("a", "root");
    assert_eq!(g.children("p"), vec!["b"]);
    assert_eq!(g.children("root"), vec!["p", "a"]);

    g.clear_parent("a");
    assert_eq!(g.parent("a"), None);
    assert_eq!(g.children_root(), vec!["a", "root"]);
}

#[test]
fn graph_remove_parent_promotes_children_to_roots() {
    let mut g = compound();
    g.set_parent("a", "p");
    g.remove_node("p");
    assert_eq!(g.parent("a"), None);
    assert_eq!(g.children_root(), vec!["a"]);
}

#[test]
fn graph_empty_like_keeps_options() {
    let g = multigraph();
    let h: Graph<(), (), u8> = g.empty_like(3);
    assert!(h.is_multigraph());
    assert_eq!(*h.graph(), 3);
    assert_eq!(h.node_count(), 0);
}

#[test]
fn graph_edge_key_other_and_display() {
    let e = EdgeKey::new("a", "b", Some("x"));
    assert_eq!(e.other("a"), "b");
    assert_eq!(e.other("b"), "a");
    assert_eq!(e.to_string(), "a -> b (x)");
    assert!(EdgeKey::new("a", "a", None::<String>).is_self_loop());
}
