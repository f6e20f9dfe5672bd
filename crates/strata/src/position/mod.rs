//! Coordinate assignment.
//!
//! `y` comes from the ranks: every rank is as tall as its tallest node and ranks are `ranksep`
//! apart. `x` comes from [`bk::position_x`].

pub mod bk;

use crate::layout_graph::LayoutGraph;
use crate::util;

pub fn position(g: &mut LayoutGraph) {
    position_y(g);
    let xs = bk::position_x(g);
    for (v, x) in xs {
        if let Some(node) = g.node_mut(&v) {
            node.x = x;
        }
    }
}

pub fn position_y(g: &mut LayoutGraph) {
    let layering = util::build_layer_matrix(g);
    let ranksep = g.graph().ranksep;
    let mut prev_y = 0.0;
    for layer in &layering {
        let max_height = layer
            .iter()
            .filter_map(|v| g.node(v))
            .fold(0.0_f64, |acc, n| acc.max(n.height));
        for v in layer {
            if let Some(node) = g.node_mut(v) {
                node.y = prev_y + max_height / 2.0;
            }
        }
        prev_y += max_height + ranksep;
    }
}
