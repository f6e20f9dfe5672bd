//! Rank direction.
//!
//! Every stage between [`adjust`] and [`undo`] works top-to-bottom. For horizontal layouts the
//! node and label boxes are turned sideways first; afterwards bottom-up layouts are mirrored
//! and horizontal ones transposed back.

use crate::layout_graph::LayoutGraph;
use crate::model::RankDir;

pub fn adjust(g: &mut LayoutGraph) {
    if g.graph().rankdir.is_horizontal() {
        swap_width_height(g);
    }
}

pub fn undo(g: &mut LayoutGraph) {
    let rankdir = g.graph().rankdir;
    if matches!(rankdir, RankDir::BT | RankDir::RL) {
        reverse_y(g);
    }
    if rankdir.is_horizontal() {
        swap_xy(g);
        swap_width_height(g);
    }
}

fn swap_width_height(g: &mut LayoutGraph) {
    for (_, node) in g.node_labels_mut() {
        std::mem::swap(&mut node.width, &mut node.height);
    }
    for (_, edge) in g.edge_labels_mut() {
        std::mem::swap(&mut edge.width, &mut edge.height);
    }
}

fn reverse_y(g: &mut LayoutGraph) {
    for (_, node) in g.node_labels_mut() {
        node.y = -node.y;
    }
    for (_, edge) in g.edge_labels_mut() {
        for p in &mut edge.points {
            p.y = -p.y;
        }
        edge.y = edge.y.map(|y| -y);
    }
}

fn swap_xy(g: &mut LayoutGraph) {
    for (_, node) in g.node_labels_mut() {
        std::mem::swap(&mut node.x, &mut node.y);
    }
    for (_, edge) in g.edge_labels_mut() {
        for p in &mut edge.points {
            std::mem::swap(&mut p.x, &mut p.y);
        }
        std::mem::swap(&mut edge.x, &mut edge.y);
    }
}
