//! Cycle removal.
//!
//! Ranking needs a DAG, so a feedback arc set is reversed up front and restored after the
//! edges have been routed.

use crate::greedy_fas::greedy_fas;
use crate::layout_graph::LayoutGraph;
use crate::model::Acyclicer;
use crate::util;
use rustc_hash::FxHashSet as HashSet;
use strata_graph::EdgeKey;

/// Edges reversed by [`run`]: the key each now has in the layout graph, and the key it had
/// before.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reversed {
    edges: Vec<(EdgeKey, EdgeKey)>,
}

impl Reversed {
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Original keys of the reversed edges.
    pub fn originals(&self) -> impl Iterator<Item = &EdgeKey> + '_ {
        self.edges.iter().map(|(_, original)| original)
    }

    pub fn contains(&self, layout_key: &EdgeKey) -> bool {
        self.edges.iter().any(|(key, _)| key == layout_key)
    }
}

/// Reverses a feedback arc set of `g`, chosen by the configured [`Acyclicer`]. Reversed edges
/// keep their labels and get a fresh name so they never collide with an existing edge.
pub fn run(g: &mut LayoutGraph) -> Reversed {
    let fas = match g.graph().acyclicer {
        Acyclicer::Greedy => greedy_fas(g, |e| e.weight),
        Acyclicer::Dfs => dfs_fas(g),
    };

    let mut reversed = Reversed::default();
    for e in fas {
        let Some(label) = g.remove_edge_key(&e) else {
            continue;
        };
        let key = EdgeKey::new(e.w.clone(), e.v.clone(), Some(util::unique_id("rev")));
        g.set_edge_key(key.clone(), label);
        reversed.edges.push((key, e));
    }
    reversed
}

/// Puts every reversed edge back under its original key, flipping its polyline.
pub fn undo(g: &mut LayoutGraph, reversed: Reversed) {
    for (key, original) in reversed.edges {
        let Some(mut label) = g.remove_edge_key(&key) else {
            continue;
        };
        label.points.reverse();
        g.set_edge_key(original, label);
    }
}

/// Back edges of a depth-first search started from every node in insertion order.
pub fn dfs_fas(g: &LayoutGraph) -> Vec<EdgeKey> {
    let mut fas: Vec<EdgeKey> = Vec::new();
    let mut visited: HashSet<String> = HashSet::default();
    let mut on_stack: HashSet<String> = HashSet::default();

    for start in g.nodes() {
        if !visited.insert(start.to_string()) {
            continue;
        }
        on_stack.insert(start.to_string());
        let mut stack: Vec<(String, Vec<EdgeKey>, usize)> =
            vec![(start.to_string(), g.out_edges(start, None), 0)];

        while let Some((v, out, next)) = stack.last_mut() {
            let Some(e) = out.get(*next).cloned() else {
                on_stack.remove(v.as_str());
                stack.pop();
                continue;
            };
            *next += 1;
            if on_stack.contains(&e.w) {
                fas.push(e);
            } else if visited.insert(e.w.clone()) {
                on_stack.insert(e.w.clone());
                stack.push((e.w.clone(), g.out_edges(&e.w, None), 0));
            }
        }
    }
    fas
}
