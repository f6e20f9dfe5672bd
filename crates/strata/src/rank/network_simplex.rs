//! Network simplex ranking (Gansner et al., "A Technique for Drawing Directed Graphs").
//!
//! Starting from a feasible tight tree, repeatedly swaps a tree edge with a negative cut value
//! for the non-tree edge of minimum slack that reconnects the two halves, until every cut value
//! is non-negative. The result minimises `sum(weight * length)` over all edges.

use super::feasible_tree::feasible_tree;
use super::tree::{Tree, TreeEdge};
use super::util::{longest_path, slack};
use crate::layout_graph::LayoutGraph;
use crate::util::simplify;
use rustc_hash::FxHashSet as HashSet;
use strata_graph::EdgeKey;

pub fn network_simplex(g: &mut LayoutGraph) {
    let mut sg = simplify(g);
    longest_path(&mut sg);
    let mut t = feasible_tree(&mut sg);
    init_low_lim_values(&mut t, None);
    init_cut_values(&mut t, &sg);

    while let Some(e) = leave_edge(&t) {
        let Some(f) = enter_edge(&t, &sg, &e) else {
            break;
        };
        exchange_edges(&mut t, &mut sg, &e, &f);
    }

    for (v, node) in sg.node_labels() {
        if let Some(target) = g.node_mut(v) {
            target.rank = node.rank;
        }
    }
}

/// Numbers the tree in postorder: `lim` is a node's own number, `low` the smallest number in
/// its subtree. Also records each node's tree parent. The walk starts at `root` (or the first
/// node) and then at every node not reached yet, so forests are numbered too.
pub fn init_low_lim_values(t: &mut Tree, root: Option<&str>) {
    let roots: Vec<String> = root
        .map(str::to_string)
        .into_iter()
        .chain(t.node_ids())
        .collect();
    let mut visited: HashSet<String> = HashSet::default();
    let mut next_lim = 1;
    for root in roots {
        if visited.contains(&root) {
            continue;
        }
        next_lim = dfs_assign_low_lim(t, &mut visited, next_lim, root);
    }
}

fn dfs_assign_low_lim(
    t: &mut Tree,
    visited: &mut HashSet<String>,
    mut next_lim: i32,
    root: String,
) -> i32 {
    struct Frame {
        v: String,
        parent: Option<String>,
        low: i32,
        neighbors: Vec<String>,
        next: usize,
    }

    let neighbors = |t: &Tree, v: &str| -> Vec<String> {
        t.neighbors(v).into_iter().map(str::to_string).collect()
    };

    visited.insert(root.clone());
    let mut stack = vec![Frame {
        neighbors: neighbors(t, &root),
        v: root,
        parent: None,
        low: next_lim,
        next: 0,
    }];

    while let Some(frame) = stack.last_mut() {
        if let Some(w) = frame.neighbors.get(frame.next).cloned() {
            frame.next += 1;
            if visited.insert(w.clone()) {
                let parent = Some(frame.v.clone());
                stack.push(Frame {
                    neighbors: neighbors(t, &w),
                    v: w,
                    parent,
                    low: next_lim,
                    next: 0,
                });
            }
            continue;
        }
        let Some(frame) = stack.pop() else {
            break;
        };
        if let Some(label) = t.node_mut(&frame.v) {
            label.low = frame.low;
            label.lim = next_lim;
            label.parent = frame.parent;
        }
        next_lim += 1;
    }
    next_lim
}

/// Cut value of every tree edge. Children are handled before their parents (ascending `lim`)
/// because a node's cut value is derived from those of its child edges.
pub fn init_cut_values(t: &mut Tree, g: &LayoutGraph) {
    let mut children: Vec<(i32, String)> = t
        .node_labels()
        .filter(|(_, n)| n.parent.is_some())
        .map(|(v, n)| (n.lim, v.to_string()))
        .collect();
    children.sort();

    for (_, child) in children {
        let Some(parent) = t.node(&child).and_then(|n| n.parent.clone()) else {
            continue;
        };
        let cutvalue = calc_cut_value(t, g, &child);
        if let Some(edge) = t.edge_mut(&child, &parent, None) {
            edge.cutvalue = cutvalue;
        }
    }
}

/// Cut value of the tree edge between `child` and its parent: the summed weight of graph edges
/// crossing the cut in the same direction as that edge, minus those crossing the other way.
pub fn calc_cut_value(t: &Tree, g: &LayoutGraph, child: &str) -> f64 {
    let Some(parent) = t.node(child).and_then(|n| n.parent.as_deref()) else {
        return 0.0;
    };

    let (child_is_tail, graph_edge) = match g.edge(child, parent, None) {
        Some(e) => (true, e),
        None => match g.edge(parent, child, None) {
            Some(e) => (false, e),
            None => return 0.0,
        },
    };

    let mut cutvalue = graph_edge.weight;
    for e in g.node_edges(child, None) {
        let is_out_edge = e.v == child;
        let other = if is_out_edge { e.w.as_str() } else { e.v.as_str() };
        if other == parent {
            continue;
        }

        let points_to_head = is_out_edge == child_is_tail;
        let other_weight = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
        cutvalue += if points_to_head {
            other_weight
        } else {
            -other_weight
        };

        if let Some(tree_edge) = t.edge(child, other, None) {
            let other_cutvalue = tree_edge.cutvalue;
            cutvalue += if points_to_head {
                -other_cutvalue
            } else {
                other_cutvalue
            };
        }
    }
    cutvalue
}

/// First tree edge with a negative cut value.
pub fn leave_edge(t: &Tree) -> Option<EdgeKey> {
    t.edge_labels()
        .find(|(_, label)| label.cutvalue < 0.0)
        .map(|(e, _)| e.clone())
}

/// The non-tree edge that replaces `edge`: among the graph edges crossing the cut that
/// removing `edge` creates, in the opposite direction, the one with minimum slack.
pub fn enter_edge(t: &Tree, g: &LayoutGraph, edge: &EdgeKey) -> Option<EdgeKey> {
    let (v, w) = if g.has_edge(&edge.v, &edge.w, None) {
        (edge.v.as_str(), edge.w.as_str())
    } else {
        (edge.w.as_str(), edge.v.as_str())
    };

    let v_label = t.node(v)?;
    let w_label = t.node(w)?;
    let (tail_label, flip) = if v_label.lim > w_label.lim {
        (w_label, true)
    } else {
        (v_label, false)
    };

    let is_descendant = |x: &str| {
        t.node(x)
            .is_some_and(|n| tail_label.low <= n.lim && n.lim <= tail_label.lim)
    };

    let mut best: Option<(i32, &EdgeKey)> = None;
    for e in g.edges() {
        if flip != is_descendant(&e.v) || flip == is_descendant(&e.w) {
            continue;
        }
        let s = slack(g, e);
        if best.is_none_or(|(b, _)| s < b) {
            best = Some((s, e));
        }
    }
    best.map(|(_, e)| e.clone())
}

/// Replaces tree edge `e` by `f` and recomputes numbering, cut values and ranks.
pub fn exchange_edges(t: &mut Tree, g: &mut LayoutGraph, e: &EdgeKey, f: &EdgeKey) {
    t.remove_edge(&e.v, &e.w, None);
    t.set_edge_with_label(f.v.clone(), f.w.clone(), TreeEdge::default());
    init_low_lim_values(t, None);
    init_cut_values(t, g);
    update_ranks(t, g);
}

/// Re-derives ranks top-down from each tree root so that every tree edge is tight.
fn update_ranks(t: &Tree, g: &mut LayoutGraph) {
    let roots: Vec<&str> = t
        .node_labels()
        .filter(|(_, n)| n.parent.is_none())
        .map(|(v, _)| v)
        .collect();

    for v in strata_graph::alg::preorder(t, &roots) {
        let Some(parent) = t.node(&v).and_then(|n| n.parent.as_deref()) else {
            continue;
        };
        let (minlen, flipped) = match g.edge(&v, parent, None) {
            Some(e) => (e.minlen, false),
            None => match g.edge(parent, &v, None) {
                Some(e) => (e.minlen, true),
                None => continue,
            },
        };
        let parent_rank = g.node(parent).and_then(|n| n.rank).unwrap_or(0);
        if let Some(node) = g.node_mut(&v) {
            node.rank = Some(if flipped {
                parent_rank + minlen
            } else {
                parent_rank - minlen
            });
        }
    }
}
