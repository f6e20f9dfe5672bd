//! Left and right borders for subgraphs.
//!
//! Each subgraph gets one left and one right border node on every rank it spans, chained
//! top to bottom. Ordering pins them to the ends of the subgraph's block and positioning
//! derives the subgraph's width from them.

use crate::layout_graph::{BorderSide, LayoutEdge, LayoutGraph, LayoutNode, NodeRole};
use crate::util;

pub fn add_border_segments(g: &mut LayoutGraph) {
    let roots: Vec<String> = g.children_root().into_iter().map(str::to_string).collect();
    for v in roots {
        visit(g, &v);
    }
}

fn visit(g: &mut LayoutGraph, v: &str) {
    let children: Vec<String> = g.children(v).into_iter().map(str::to_string).collect();
    for child in &children {
        visit(g, child);
    }

    let Some((min_rank, max_rank)) = g.node(v).and_then(|n| Some((n.min_rank?, n.max_rank?)))
    else {
        return;
    };
    if min_rank < 0 || max_rank < min_rank {
        return;
    }

    let len = max_rank as usize + 1;
    let mut left: Vec<Option<String>> = vec![None; len];
    let mut right: Vec<Option<String>> = vec![None; len];
    for rank in min_rank..=max_rank {
        let idx = rank as usize;
        let l = add_border_node(g, BorderSide::Left, "_bl", v, rank, &left);
        left[idx] = Some(l);
        let r = add_border_node(g, BorderSide::Right, "_br", v, rank, &right);
        right[idx] = Some(r);
    }

    if let Some(node) = g.node_mut(v) {
        node.border_left = left;
        node.border_right = right;
    }
}

fn add_border_node(
    g: &mut LayoutGraph,
    side: BorderSide,
    prefix: &str,
    sg: &str,
    rank: i32,
    segments: &[Option<String>],
) -> String {
    let curr = util::add_dummy_node(
        g,
        prefix,
        LayoutNode::dummy(NodeRole::Border { side }, Some(rank)),
    );
    g.set_parent(curr.clone(), sg);

    let prev = (rank as usize)
        .checked_sub(1)
        .and_then(|i| segments.get(i).cloned().flatten());
    if let Some(prev) = prev {
        g.set_edge_with_label(prev, curr.clone(), LayoutEdge::weighted(1.0, 1));
    }
    curr
}
