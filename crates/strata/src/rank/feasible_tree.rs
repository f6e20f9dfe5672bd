//! Tight spanning tree construction.
//!
//! Grows a tree of tight edges (slack 0) from the first node. When it cannot grow further, the
//! whole tree is shifted by the slack of the cheapest edge leaving it, which makes that edge
//! tight. Ranks stay feasible throughout. A disconnected graph yields a forest: each further
//! component is started from its first node once the previous tree is complete.

use super::tree::{Tree, TreeEdge, TreeNode, empty_tree};
use super::util::slack;
use crate::layout_graph::LayoutGraph;
use strata_graph::EdgeKey;

/// Expects `g` to carry a feasible ranking (see [`super::longest_path`]); adjusts ranks in
/// place and returns the tree.
pub fn feasible_tree(g: &mut LayoutGraph) -> Tree {
    let mut t = empty_tree();
    let size = g.node_count();
    let Some(start) = g.nodes().next().map(str::to_string) else {
        return t;
    };
    t.set_node(start, TreeNode::default());

    while tight_tree(&mut t, g) < size {
        match find_min_slack_edge(&t, g) {
            Some(e) => {
                let delta = if t.has_node(&e.v) {
                    slack(g, &e)
                } else {
                    -slack(g, &e)
                };
                shift_ranks(&t, g, delta);
            }
            None => {
                let Some(next) = g.nodes().find(|v| !t.has_node(v)).map(str::to_string) else {
                    break;
                };
                t.set_node(next, TreeNode::default());
            }
        }
    }
    t
}

/// Extends `t` depth-first along tight edges and returns its size.
fn tight_tree(t: &mut Tree, g: &LayoutGraph) -> usize {
    for root in t.node_ids() {
        let mut stack: Vec<(String, Vec<EdgeKey>, usize)> =
            vec![(root.clone(), g.node_edges(&root, None), 0)];
        while let Some((v, edges, next)) = stack.last_mut() {
            let Some(e) = edges.get(*next).cloned() else {
                stack.pop();
                continue;
            };
            *next += 1;
            let w = e.other(v).to_string();
            if !t.has_node(&w) && slack(g, &e) == 0 {
                t.set_node(w.clone(), TreeNode::default());
                t.set_edge_with_label(v.clone(), w.clone(), TreeEdge::default());
                let edges = g.node_edges(&w, None);
                stack.push((w, edges, 0));
            }
        }
    }
    t.node_count()
}

/// The edge with exactly one endpoint in `t` and the smallest slack; the first one wins ties.
fn find_min_slack_edge(t: &Tree, g: &LayoutGraph) -> Option<EdgeKey> {
    let mut best: Option<(i32, &EdgeKey)> = None;
    for e in g.edges() {
        if t.has_node(&e.v) == t.has_node(&e.w) {
            continue;
        }
        let s = slack(g, e);
        if best.is_none_or(|(b, _)| s < b) {
            best = Some((s, e));
        }
    }
    best.map(|(_, e)| e.clone())
}

fn shift_ranks(t: &Tree, g: &mut LayoutGraph, delta: i32) {
    for v in t.nodes() {
        if let Some(rank) = g.node_mut(v).and_then(|n| n.rank.as_mut()) {
            *rank += delta;
        }
    }
}
