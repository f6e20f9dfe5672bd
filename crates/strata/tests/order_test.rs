use strata::graph::{Graph, GraphOptions};
use strata::layout_graph::{LayoutEdge, LayoutGraph, LayoutNode};
use strata::order::{cross_count, init_order, order, transpose};
use strata::util::build_layer_matrix;

fn new_graph() -> LayoutGraph {
    Graph::new(GraphOptions {
        multigraph: true,
        compound: true,
        ..Default::default()
    })
}

fn at_rank(rank: i32) -> LayoutNode {
    LayoutNode {
        rank: Some(rank),
        ..Default::default()
    }
}

fn layering(layers: &[&[&str]]) -> Vec<Vec<String>> {
    layers
        .iter()
        .map(|layer| layer.iter().map(|v| v.to_string()).collect())
        .collect()
}

fn ranks(g: &mut LayoutGraph, nodes: &[(&str, i32)]) {
    for (v, rank) in nodes {
        g.set_node(*v, at_rank(*rank));
    }
}

#[test]
fn cross_count_of_an_empty_layering_is_zero() {
    let g = new_graph();
    assert_eq!(cross_count(&g, &[]), 0.0);
}

#[test]
fn cross_count_without_crossings() {
    let mut g = new_graph();
    g.set_edge("a1", "b1");
    g.set_edge("a2", "b2");
    assert_eq!(cross_count(&g, &layering(&[&["a1", "a2"], &["b1", "b2"]])), 0.0);
}

#[test]
fn cross_count_single_crossing() {
    let mut g = new_graph();
    g.set_edge("a1", "b1");
    g.set_edge("a2", "b2");
    assert_eq!(cross_count(&g, &layering(&[&["a1", "a2"], &["b2", "b1"]])), 1.0);
}

#[test]
fn cross_count_multiplies_weights() {
    let mut g = new_graph();
    g.set_edge_with_label("a1", "b1", LayoutEdge::weighted(2.0, 1));
    g.set_edge_with_label("a2", "b2", LayoutEdge::weighted(3.0, 1));
    assert_eq!(cross_count(&g, &layering(&[&["a1", "a2"], &["b2", "b1"]])), 6.0);
}

#[test]
fn cross_count_sums_over_layer_pairs() {
    let mut g = new_graph();
    g.set_path(&["a1", "b1", "c1"]);
    g.set_path(&["a2", "b2", "c2"]);
    assert_eq!(
        cross_count(&g, &layering(&[&["a1", "a2"], &["b2", "b1"], &["c1", "c2"]])),
        2.0
    );
}

#[test]
fn cross_count_of_a_small_graph() {
    let mut g = new_graph();
    g.set_path(&["a", "b", "c"]);
    g.set_path(&["d", "e", "c"]);
    g.set_path(&["a", "f", "i"]);
    g.set_edge("a", "e");
    assert_eq!(
        cross_count(&g, &layering(&[&["a", "d"], &["b", "e", "f"], &["c", "i"]])),
        1.0
    );
    assert_eq!(
        cross_count(&g, &layering(&[&["d", "a"], &["e", "b", "f"], &["c", "i"]])),
        0.0
    );
}

#[test]
fn cross_count_edges_sharing_an_endpoint_do_not_cross() {
    let mut g = new_graph();
    g.set_edge("a", "c");
    g.set_edge("a", "d");
    g.set_edge("b", "d");
    assert_eq!(cross_count(&g, &layering(&[&["a", "b"], &["c", "d"]])), 0.0);
}

#[test]
fn init_order_of_a_tree() {
    let mut g = new_graph();
    ranks(&mut g, &[("a", 0), ("b", 1), ("c", 2), ("d", 2), ("e", 1)]);
    g.set_path(&["a", "b", "c"]);
    g.set_edge("b", "d");
    g.set_edge("a", "e");
    assert_eq!(init_order(&g), layering(&[&["a"], &["b", "e"], &["c", "d"]]));
}

#[test]
fn init_order_of_a_dag() {
    let mut g = new_graph();
    ranks(&mut g, &[("a", 0), ("b", 1), ("c", 1), ("d", 2)]);
    g.set_path(&["a", "b", "d"]);
    g.set_path(&["a", "c", "d"]);
    assert_eq!(init_order(&g), layering(&[&["a"], &["b", "c"], &["d"]]));
}

#[test]
fn init_order_skips_subgraph_nodes() {
    let mut g = new_graph();
    g.set_node("sg1", LayoutNode::default());
    g.set_node("a", at_rank(0));
    g.set_parent("a", "sg1");
    assert_eq!(init_order(&g), layering(&[&["a"]]));
}

#[test]
fn transpose_swaps_a_crossing_pair() {
    let mut g = new_graph();
    ranks(&mut g, &[("a", 0), ("b", 0), ("c", 1), ("d", 1)]);
    g.set_edge("a", "c");
    g.set_edge("b", "d");
    let mut layers = layering(&[&["a", "b"], &["d", "c"]]);
    assert_eq!(cross_count(&g, &layers), 1.0);

    transpose(&g, &mut layers);
    assert_eq!(cross_count(&g, &layers), 0.0);
    assert_eq!(layers, layering(&[&["b", "a"], &["d", "c"]]));
}

#[test]
fn transpose_leaves_nodes_of_different_subgraphs_alone() {
    let mut g = new_graph();
    ranks(&mut g, &[("a", 0), ("b", 0), ("c", 1), ("d", 1)]);
    g.set_parent("a", "sg1");
    g.set_parent("b", "sg2");
    g.set_parent("c", "sg1");
    g.set_parent("d", "sg2");
    g.set_edge("a", "d");
    g.set_edge("b", "c");
    let mut layers = layering(&[&["a", "b"], &["c", "d"]]);
    transpose(&g, &mut layers);
    assert_eq!(layers, layering(&[&["a", "b"], &["c", "d"]]));
}

#[test]
fn transpose_keeps_a_crossing_free_layering() {
    let mut g = new_graph();
    ranks(&mut g, &[("a", 0), ("b", 0), ("c", 1), ("d", 1)]);
    g.set_edge("a", "c");
    g.set_edge("b", "d");
    let mut layers = layering(&[&["a", "b"], &["c", "d"]]);
    transpose(&g, &mut layers);
    assert_eq!(layers, layering(&[&["a", "b"], &["c", "d"]]));
}

#[test]
fn order_adds_no_crossings_to_a_tree() {
    let mut g = new_graph();
    ranks(
        &mut g,
        &[("a", 1), ("b", 2), ("e", 2), ("c", 3), ("d", 3), ("f", 3)],
    );
    g.set_path(&["a", "b", "c"]);
    g.set_edge("b", "d");
    g.set_path(&["a", "e", "f"]);
    order(&mut g);
    assert_eq!(cross_count(&g, &build_layer_matrix(&g)), 0.0);
}

#[test]
fn order_untangles_a_simple_graph() {
    let mut g = new_graph();
    ranks(
        &mut g,
        &[("a", 1), ("d", 1), ("b", 2), ("f", 2), ("e", 2), ("c", 3), ("g", 3)],
    );
    g.set_path(&["a", "b", "c"]);
    g.set_path(&["d", "e", "g"]);
    g.set_edge("a", "f");
    order(&mut g);
    assert_eq!(cross_count(&g, &build_layer_matrix(&g)), 0.0);
}

#[test]
fn order_resolves_crossings_the_initial_order_creates() {
    let mut g = new_graph();
    ranks(&mut g, &[("a", 0), ("b", 0), ("c", 1), ("d", 1)]);
    g.set_edge("a", "c");
    g.set_edge("a", "d");
    g.set_edge("b", "c");
    assert_eq!(cross_count(&g, &init_order(&g)), 1.0);

    order(&mut g);
    assert_eq!(cross_count(&g, &build_layer_matrix(&g)), 0.0);
}

#[test]
fn order_assigns_contiguous_positions_per_rank() {
    let mut g = new_graph();
    ranks(&mut g, &[("a", 0), ("b", 0), ("c", 0), ("d", 1), ("e", 1)]);
    g.set_edge("a", "e");
    g.set_edge("c", "d");
    order(&mut g);
    for layer in build_layer_matrix(&g) {
        for (i, v) in layer.iter().enumerate() {
            assert_eq!(g.node(v).unwrap().order, Some(i), "{v}");
        }
    }
}
