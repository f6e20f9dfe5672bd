//! Subgraph nesting for the ranker.
//!
//! Before ranking, every subgraph gets a top and a bottom border node and is tied to its
//! children with heavy "nesting" edges, so the ranker keeps the subgraph vertically compact and
//! its children strictly between its borders. A synthetic root connects everything, which also
//! makes the graph connected. To leave room for the borders, every `minlen` is multiplied by
//! `node_rank_factor = 2 * height + 1`, where `height` is the nesting depth of the deepest
//! subgraph; the ranks in between are dropped again if they end up empty.

use crate::layout_graph::{BorderSide, LayoutEdge, LayoutGraph, LayoutNode, NodeRole};
use crate::util;
use rustc_hash::FxHashMap as HashMap;

pub fn run(g: &mut LayoutGraph) {
    let root = util::add_dummy_node(g, "_root", LayoutNode::dummy(NodeRole::NestingRoot, None));
    let depths = tree_depths(g);
    let height = depths.values().copied().max().unwrap_or(1) - 1;
    let node_sep = 2 * height + 1;

    g.graph_mut().nesting_root = Some(root.clone());

    for (_, edge) in g.edge_labels_mut() {
        edge.minlen *= node_sep;
    }

    let weight = g.edge_labels().map(|(_, e)| e.weight).sum::<f64>() + 1.0;
    let ctx = Context {
        root: &root,
        node_sep,
        weight,
        height,
        depths: &depths,
    };

    let top_level: Vec<String> = g.children_root().into_iter().map(str::to_string).collect();
    for child in top_level {
        ctx.visit(g, &child);
    }

    g.graph_mut().node_rank_factor = node_sep;
}

/// Removes the synthetic root and the nesting edges added by [`run`].
pub fn cleanup(g: &mut LayoutGraph) {
    if let Some(root) = g.graph_mut().nesting_root.take() {
        g.remove_node(&root);
    }
    let nesting: Vec<_> = g
        .edge_labels()
        .filter(|(_, e)| e.nesting)
        .map(|(k, _)| k.clone())
        .collect();
    for e in nesting {
        g.remove_edge_key(&e);
    }
}

struct Context<'a> {
    root: &'a str,
    node_sep: i32,
    weight: f64,
    height: i32,
    depths: &'a HashMap<String, i32>,
}

impl Context<'_> {
    fn visit(&self, g: &mut LayoutGraph, v: &str) {
        let children: Vec<String> = g.children(v).into_iter().map(str::to_string).collect();
        if children.is_empty() {
            if v != self.root {
                g.set_edge_with_label(self.root, v, LayoutEdge::weighted(0.0, self.node_sep));
            }
            return;
        }

        let top = util::add_dummy_node(
            g,
            "_bt",
            LayoutNode::dummy(NodeRole::Border { side: BorderSide::Top }, None),
        );
        let bottom = util::add_dummy_node(
            g,
            "_bb",
            LayoutNode::dummy(NodeRole::Border { side: BorderSide::Bottom }, None),
        );
        g.set_parent(top.clone(), v);
        g.set_parent(bottom.clone(), v);
        if let Some(label) = g.node_mut(v) {
            label.border_top = Some(top.clone());
            label.border_bottom = Some(bottom.clone());
        }

        let depth = self.depths.get(v).copied().unwrap_or(1);
        for child in children {
            self.visit(g, &child);

            let Some(child_node) = g.node(&child) else {
                continue;
            };
            let child_top = child_node.border_top.clone().unwrap_or_else(|| child.clone());
            let child_bottom = child_node
                .border_bottom
                .clone()
                .unwrap_or_else(|| child.clone());
            let this_weight = if child_node.border_top.is_some() {
                self.weight
            } else {
                2.0 * self.weight
            };
            let minlen = if child_top != child_bottom {
                1
            } else {
                self.height - depth + 1
            };

            let nesting_edge = LayoutEdge {
                nesting: true,
                ..LayoutEdge::weighted(this_weight, minlen)
            };
            g.set_edge_with_label(top.clone(), child_top, nesting_edge.clone());
            g.set_edge_with_label(child_bottom, bottom.clone(), nesting_edge);
        }

        if g.parent(v).is_none() {
            g.set_edge_with_label(
                self.root,
                top,
                LayoutEdge::weighted(0.0, self.height + depth),
            );
        }
    }
}

/// Depth of every node in the hierarchy; top-level nodes have depth 1.
fn tree_depths(g: &LayoutGraph) -> HashMap<String, i32> {
    let mut depths: HashMap<String, i32> = HashMap::default();
    let mut stack: Vec<(&str, i32)> = g.children_root().into_iter().map(|v| (v, 1)).collect();
    while let Some((v, depth)) = stack.pop() {
        depths.insert(v.to_string(), depth);
        stack.extend(g.children(v).into_iter().map(|c| (c, depth + 1)));
    }
    depths
}
