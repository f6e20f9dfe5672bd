use strata::graph::{EdgeKey, Graph, GraphOptions};
use strata::layout_graph::{BorderSide, LayoutGraph, LayoutNode, NodeRole};
use strata::model::{Align, LabelPos};
use strata::position::bk::{
    Alignment, Conflicts, Xs, add_conflict, align_coordinates, balance,
    find_smallest_width_alignment, find_type1_conflicts, find_type2_conflicts, has_conflict,
    horizontal_compaction, position_x, vertical_alignment,
};
use strata::position::{position, position_y};

fn new_graph() -> LayoutGraph {
    Graph::new(GraphOptions::default())
}

fn placed(rank: i32, order: usize, width: f64) -> LayoutNode {
    LayoutNode {
        rank: Some(rank),
        order: Some(order),
        width,
        ..Default::default()
    }
}

fn chain_role() -> NodeRole {
    NodeRole::VirtualChain {
        edge: EdgeKey::new("x", "y", None::<String>),
    }
}

fn border_role() -> NodeRole {
    NodeRole::Border {
        side: BorderSide::Left,
    }
}

fn layering(layers: &[&[&str]]) -> Vec<Vec<String>> {
    layers
        .iter()
        .map(|layer| layer.iter().map(|v| v.to_string()).collect())
        .collect()
}

fn xs(pairs: &[(&str, f64)]) -> Xs {
    pairs.iter().map(|(v, x)| (v.to_string(), *x)).collect()
}

fn map(pairs: &[(&str, &str)]) -> rustc_hash::FxHashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Two layers `a b` over `c d`, with the given dummy roles.
fn two_by_two(roles: [Option<NodeRole>; 4]) -> (LayoutGraph, Vec<Vec<String>>) {
    let mut g = new_graph();
    for ((v, (rank, order)), role) in ["a", "b", "c", "d"]
        .into_iter()
        .zip([(0, 0), (0, 1), (1, 0), (1, 1)])
        .zip(roles)
    {
        g.set_node(
            v,
            LayoutNode {
                role: role.unwrap_or_default(),
                ..placed(rank, order, 0.0)
            },
        );
    }
    (g, layering(&[&["a", "b"], &["c", "d"]]))
}

#[test]
fn bk_type1_no_conflict_for_parallel_edges() {
    let (mut g, layers) = two_by_two([None, None, None, None]);
    g.set_edge("a", "c");
    g.set_edge("b", "d");
    assert!(find_type1_conflicts(&g, &layers).is_empty());
}

#[test]
fn bk_type1_ignores_crossings_without_inner_segments() {
    for dummy in 0..4 {
        let mut roles = [None, None, None, None];
        roles[dummy] = Some(chain_role());
        let (mut g, layers) = two_by_two(roles);
        g.set_edge("a", "d");
        g.set_edge("b", "c");
        assert!(find_type1_conflicts(&g, &layers).is_empty(), "{dummy}");
    }
}

#[test]
fn bk_type1_marks_segments_crossing_an_inner_segment() {
    let (mut g, layers) = two_by_two([
        None,
        Some(chain_role()),
        Some(chain_role()),
        Some(chain_role()),
    ]);
    g.set_edge("a", "d");
    g.set_edge("b", "c");
    let conflicts = find_type1_conflicts(&g, &layers);
    assert!(has_conflict(&conflicts, "a", "d"));
    assert!(!has_conflict(&conflicts, "b", "c"));
}

#[test]
fn bk_type1_leaves_crossing_inner_segments_to_type2() {
    let (mut g, layers) = two_by_two([
        Some(chain_role()),
        Some(chain_role()),
        Some(chain_role()),
        Some(chain_role()),
    ]);
    g.set_edge("a", "d");
    g.set_edge("b", "c");
    assert!(find_type1_conflicts(&g, &layers).is_empty());
}

#[test]
fn bk_type2_favors_border_segments() {
    let (mut g, layers) = two_by_two([
        Some(chain_role()),
        Some(border_role()),
        Some(border_role()),
        Some(chain_role()),
    ]);
    g.set_edge("a", "d");
    g.set_edge("b", "c");
    let conflicts = find_type2_conflicts(&g, &layers);
    assert!(has_conflict(&conflicts, "a", "d"));
    assert!(!has_conflict(&conflicts, "b", "c"));

    let (mut g, layers) = two_by_two([
        Some(border_role()),
        Some(chain_role()),
        Some(chain_role()),
        Some(border_role()),
    ]);
    g.set_edge("a", "d");
    g.set_edge("b", "c");
    let conflicts = find_type2_conflicts(&g, &layers);
    assert!(has_conflict(&conflicts, "b", "c"));
    assert!(!has_conflict(&conflicts, "a", "d"));
}

#[test]
fn bk_conflicts_ignore_orientation() {
    let mut conflicts = Conflicts::new();
    add_conflict(&mut conflicts, "a", "b");
    add_conflict(&mut conflicts, "a", "c");
    assert!(has_conflict(&conflicts, "a", "b"));
    assert!(has_conflict(&conflicts, "b", "a"));
    assert!(has_conflict(&conflicts, "c", "a"));
    assert!(!has_conflict(&conflicts, "b", "c"));
    assert_eq!(conflicts.len(), 2);
}

#[test]
fn bk_vertical_alignment_without_neighbours() {
    let mut g = new_graph();
    g.ensure_node("a");
    g.ensure_node("b");
    let result = vertical_alignment(&layering(&[&["a"], &["b"]]), &Conflicts::new(), |v| {
        g.predecessors(v)
    });
    assert_eq!(result.root, map(&[("a", "a"), ("b", "b")]));
    assert_eq!(result.align, map(&[("a", "a"), ("b", "b")]));
}

#[test]
fn bk_vertical_alignment_with_a_sole_neighbour() {
    let mut g = new_graph();
    g.set_edge("a", "b");
    let result = vertical_alignment(&layering(&[&["a"], &["b"]]), &Conflicts::new(), |v| {
        g.predecessors(v)
    });
    assert_eq!(result.root, map(&[("a", "a"), ("b", "a")]));
    assert_eq!(result.align, map(&[("a", "b"), ("b", "a")]));
}

#[test]
fn bk_vertical_alignment_prefers_the_left_median() {
    let mut g = new_graph();
    g.set_edge("a", "c");
    g.set_edge("b", "c");
    let result = vertical_alignment(&layering(&[&["a", "b"], &["c"]]), &Conflicts::new(), |v| {
        g.predecessors(v)
    });
    assert_eq!(result.root, map(&[("a", "a"), ("b", "b"), ("c", "a")]));
    assert_eq!(result.align, map(&[("a", "c"), ("b", "b"), ("c", "a")]));
}

#[test]
fn bk_vertical_alignment_uses_layer_position_not_name() {
    let mut g = new_graph();
    g.set_edge("z", "c");
    g.set_edge("b", "c");
    let result = vertical_alignment(&layering(&[&["z", "b"], &["c"]]), &Conflicts::new(), |v| {
        g.predecessors(v)
    });
    assert_eq!(result.root["c"], "z");
}

#[test]
fn bk_vertical_alignment_falls_back_to_the_right_median() {
    let mut g = new_graph();
    g.set_edge("a", "c");
    g.set_edge("b", "c");
    let mut conflicts = Conflicts::new();
    add_conflict(&mut conflicts, "a", "c");
    let result = vertical_alignment(&layering(&[&["a", "b"], &["c"]]), &conflicts, |v| {
        g.predecessors(v)
    });
    assert_eq!(result.root, map(&[("a", "a"), ("b", "b"), ("c", "b")]));
    assert_eq!(result.align, map(&[("a", "a"), ("b", "c"), ("c", "b")]));
}

#[test]
fn bk_vertical_alignment_skips_medians_left_of_an_earlier_alignment() {
    let mut g = new_graph();
    g.set_edge("a", "d");
    g.set_edge("b", "c");
    g.set_edge("b", "d");
    let result = vertical_alignment(
        &layering(&[&["a", "b"], &["c", "d"]]),
        &Conflicts::new(),
        |v| g.predecessors(v),
    );
    assert_eq!(
        result.root,
        map(&[("a", "a"), ("b", "b"), ("c", "b"), ("d", "d")])
    );
    assert_eq!(
        result.align,
        map(&[("a", "a"), ("b", "c"), ("c", "b"), ("d", "d")])
    );
}

#[test]
fn bk_vertical_alignment_odd_neighbour_count_uses_the_single_median() {
    let mut g = new_graph();
    g.set_edge("a", "d");
    g.set_edge("b", "d");
    g.set_edge("c", "d");
    let result = vertical_alignment(
        &layering(&[&["a", "b", "c"], &["d"]]),
        &Conflicts::new(),
        |v| g.predecessors(v),
    );
    assert_eq!(result.root["d"], "b");
}

#[test]
fn bk_vertical_alignment_builds_blocks_across_layers() {
    let mut g = new_graph();
    g.set_edge("a", "b");
    g.set_edge("a", "c");
    g.set_edge("b", "d");
    g.set_edge("c", "d");
    let result = vertical_alignment(
        &layering(&[&["a"], &["b", "c"], &["d"]]),
        &Conflicts::new(),
        |v| g.predecessors(v),
    );
    assert_eq!(
        result.root,
        map(&[("a", "a"), ("b", "a"), ("c", "c"), ("d", "a")])
    );
    assert_eq!(
        result.align,
        map(&[("a", "b"), ("b", "d"), ("c", "c"), ("d", "a")])
    );
}

fn self_aligned(vs: &[&str]) -> Alignment {
    let pairs: Vec<(&str, &str)> = vs.iter().map(|v| (*v, *v)).collect();
    Alignment {
        root: map(&pairs),
        align: map(&pairs),
    }
}

#[test]
fn bk_compaction_puts_a_lone_node_at_the_origin() {
    let mut g = new_graph();
    g.set_node("a", placed(0, 0, 100.0));
    let result = horizontal_compaction(&g, &layering(&[&["a"]]), &self_aligned(&["a"]), false);
    assert_eq!(result, xs(&[("a", 0.0)]));
}

#[test]
fn bk_compaction_separates_nodes_by_nodesep() {
    let mut g = new_graph();
    g.graph_mut().nodesep = 100.0;
    g.set_node("a", placed(0, 0, 100.0));
    g.set_node("b", placed(0, 1, 200.0));
    let result = horizontal_compaction(
        &g,
        &layering(&[&["a", "b"]]),
        &self_aligned(&["a", "b"]),
        false,
    );
    assert_eq!(result, xs(&[("a", 0.0), ("b", 50.0 + 100.0 + 100.0)]));
}

#[test]
fn bk_compaction_separates_edges_by_edgesep() {
    let mut g = new_graph();
    g.graph_mut().edgesep = 20.0;
    for (v, order, width) in [("a", 0, 100.0), ("b", 1, 200.0)] {
        g.set_node(
            v,
            LayoutNode {
                role: chain_role(),
                ..placed(0, order, width)
            },
        );
    }
    let result = horizontal_compaction(
        &g,
        &layering(&[&["a", "b"]]),
        &self_aligned(&["a", "b"]),
        false,
    );
    assert_eq!(result["b"], 50.0 + 20.0 + 100.0);
}

#[test]
fn bk_compaction_centers_a_block() {
    let mut g = new_graph();
    g.set_node("a", placed(0, 0, 100.0));
    g.set_node("b", placed(1, 0, 200.0));
    let alignment = Alignment {
        root: map(&[("a", "a"), ("b", "a")]),
        align: map(&[("a", "b"), ("b", "a")]),
    };
    let result = horizontal_compaction(&g, &layering(&[&["a"], &["b"]]), &alignment, false);
    assert_eq!(result, xs(&[("a", 0.0), ("b", 0.0)]));
}

#[test]
fn bk_compaction_separates_blocks() {
    let mut g = new_graph();
    g.graph_mut().nodesep = 75.0;
    g.set_node("a", placed(0, 0, 100.0));
    g.set_node("b", placed(1, 0, 200.0));
    g.set_node("c", placed(1, 1, 50.0));
    let alignment = Alignment {
        root: map(&[("a", "a"), ("b", "a"), ("c", "c")]),
        align: map(&[("a", "b"), ("b", "a"), ("c", "c")]),
    };
    let result = horizontal_compaction(&g, &layering(&[&["a"], &["b", "c"]]), &alignment, false);
    assert_eq!(
        result,
        xs(&[("a", 0.0), ("b", 0.0), ("c", 100.0 + 75.0 + 25.0)])
    );
}

fn labelled_row(labelpos: LabelPos) -> LayoutGraph {
    let mut g = new_graph();
    g.graph_mut().edgesep = 50.0;
    g.set_node(
        "a",
        LayoutNode {
            role: chain_role(),
            ..placed(0, 0, 100.0)
        },
    );
    g.set_node(
        "b",
        LayoutNode {
            role: NodeRole::VirtualLabel {
                edge: EdgeKey::new("x", "y", None::<String>),
                labelpos,
            },
            ..placed(0, 1, 200.0)
        },
    );
    g.set_node(
        "c",
        LayoutNode {
            role: chain_role(),
            ..placed(0, 2, 300.0)
        },
    );
    g
}

#[test]
fn bk_compaction_shifts_left_labels() {
    let g = labelled_row(LabelPos::L);
    let result = horizontal_compaction(
        &g,
        &layering(&[&["a", "b", "c"]]),
        &self_aligned(&["a", "b", "c"]),
        false,
    );
    assert_eq!(result["a"], 0.0);
    assert_eq!(result["b"], 50.0 + 50.0 + 200.0);
    assert_eq!(result["c"], result["b"] + 50.0 + 150.0);
}

#[test]
fn bk_compaction_shifts_right_labels() {
    let g = labelled_row(LabelPos::R);
    let result = horizontal_compaction(
        &g,
        &layering(&[&["a", "b", "c"]]),
        &self_aligned(&["a", "b", "c"]),
        false,
    );
    assert_eq!(result["a"], 0.0);
    assert_eq!(result["b"], 50.0 + 50.0);
    assert_eq!(result["c"], result["b"] + 200.0 + 50.0 + 150.0);
}

#[test]
fn bk_align_coordinates_single_node() {
    let mut xss = vec![
        xs(&[("a", 50.0)]),
        xs(&[("a", 100.0)]),
        xs(&[("a", 50.0)]),
        xs(&[("a", 200.0)]),
    ];
    align_coordinates(&mut xss, 0);
    for candidate in &xss {
        assert_eq!(candidate["a"], 50.0);
    }
}

#[test]
fn bk_align_coordinates_left_to_min_right_to_max() {
    let mut xss = vec![
        xs(&[("a", 50.0), ("b", 1000.0)]),
        xs(&[("a", 100.0), ("b", 900.0)]),
        xs(&[("a", 150.0), ("b", 800.0)]),
        xs(&[("a", 200.0), ("b", 700.0)]),
    ];
    align_coordinates(&mut xss, 0);
    assert_eq!(xss[0], xs(&[("a", 50.0), ("b", 1000.0)]));
    assert_eq!(xss[1], xs(&[("a", 200.0), ("b", 1000.0)]));
    assert_eq!(xss[2], xs(&[("a", 50.0), ("b", 700.0)]));
    assert_eq!(xss[3], xs(&[("a", 500.0), ("b", 1000.0)]));
}

#[test]
fn bk_smallest_width_alignment() {
    let mut g = new_graph();
    g.set_node("a", placed(0, 0, 50.0));
    g.set_node("b", placed(0, 1, 50.0));
    let xss = vec![
        xs(&[("a", 0.0), ("b", 1000.0)]),
        xs(&[("a", -5.0), ("b", 1000.0)]),
        xs(&[("a", 5.0), ("b", 2000.0)]),
        xs(&[("a", 0.0), ("b", 200.0)]),
    ];
    assert_eq!(find_smallest_width_alignment(&g, &xss), 3);
}

#[test]
fn bk_smallest_width_alignment_counts_node_widths() {
    let mut g = new_graph();
    g.set_node("a", placed(0, 0, 0.0));
    g.set_node("b", placed(0, 1, 0.0));
    g.set_node("wide", placed(1, 0, 200.0));
    // Narrower centers, but the wide node sticks out further.
    let xss = vec![
        xs(&[("a", 0.0), ("b", 150.0), ("wide", 150.0)]),
        xs(&[("a", 0.0), ("b", 160.0), ("wide", 80.0)]),
    ];
    assert_eq!(find_smallest_width_alignment(&g, &xss), 1);
}

#[test]
fn bk_smallest_width_alignment_prefers_the_first_on_ties() {
    let mut g = new_graph();
    g.set_node("a", placed(0, 0, 10.0));
    let xss = vec![xs(&[("a", 0.0)]), xs(&[("a", 10.0)])];
    assert_eq!(find_smallest_width_alignment(&g, &xss), 0);
}

#[test]
fn bk_balance_takes_the_mean_of_the_middle_candidates() {
    let xss = vec![
        xs(&[("a", 0.0), ("b", 50.0)]),
        xs(&[("a", 75.0), ("b", 0.0)]),
        xs(&[("a", 125.0), ("b", 60.0)]),
        xs(&[("a", 200.0), ("b", 75.0)]),
    ];
    assert_eq!(balance(&xss, None), xs(&[("a", 100.0), ("b", 55.0)]));
}

#[test]
fn bk_balance_honors_a_pinned_alignment() {
    let xss = vec![
        xs(&[("a", 0.0)]),
        xs(&[("a", 75.0)]),
        xs(&[("a", 125.0)]),
        xs(&[("a", 200.0)]),
    ];
    assert_eq!(balance(&xss, Some(Align::UR)), xs(&[("a", 75.0)]));
    assert_eq!(balance(&xss, Some(Align::DR)), xs(&[("a", 200.0)]));
}

#[test]
fn bk_position_x_lone_node_at_origin() {
    let mut g = new_graph();
    g.set_node("a", placed(0, 0, 100.0));
    assert_eq!(position_x(&g), xs(&[("a", 0.0)]));
}

#[test]
fn bk_position_x_aligns_a_chain_of_different_widths() {
    let mut g = new_graph();
    g.set_node("a", placed(0, 0, 40.0));
    g.set_node("b", placed(1, 0, 500.0));
    g.set_node("c", placed(2, 0, 20.0));
    g.set_path(&["a", "b", "c"]);
    assert_eq!(
        position_x(&g),
        xs(&[("a", 0.0), ("b", 0.0), ("c", 0.0)])
    );
}

#[test]
fn bk_position_x_centers_a_parent_over_two_children() {
    let mut g = new_graph();
    g.graph_mut().nodesep = 10.0;
    g.set_node("a", placed(0, 0, 20.0));
    g.set_node("b", placed(1, 0, 50.0));
    g.set_node("c", placed(1, 1, 50.0));
    g.set_edge("a", "b");
    g.set_edge("a", "c");
    let result = position_x(&g);
    let a = result["a"];
    assert_eq!(result["b"], a - 30.0);
    assert_eq!(result["c"], a + 30.0);
}

#[test]
fn position_y_stacks_ranks_by_tallest_node() {
    let mut g = new_graph();
    g.graph_mut().ranksep = 1000.0;
    for (v, rank, order, height) in [("a", 0, 0, 100.0), ("b", 0, 1, 80.0), ("c", 1, 0, 90.0)] {
        g.set_node(
            v,
            LayoutNode {
                height,
                ..placed(rank, order, 10.0)
            },
        );
    }
    position_y(&mut g);
    let y = |v: &str| g.node(v).unwrap().y;
    assert_eq!(y("a"), 50.0);
    assert_eq!(y("b"), 50.0);
    assert_eq!(y("c"), 100.0 + 1000.0 + 45.0);
}

#[test]
fn position_sets_both_coordinates() {
    let mut g = new_graph();
    g.graph_mut().ranksep = 20.0;
    g.set_node(
        "a",
        LayoutNode {
            height: 10.0,
            ..placed(0, 0, 40.0)
        },
    );
    g.set_node(
        "b",
        LayoutNode {
            height: 30.0,
            ..placed(1, 0, 60.0)
        },
    );
    g.set_edge("a", "b");
    position(&mut g);
    let a = g.node("a").unwrap();
    let b = g.node("b").unwrap();
    assert_eq!((a.x, a.y), (0.0, 5.0));
    assert_eq!((b.x, b.y), (0.0, 10.0 + 20.0 + 15.0));
}
