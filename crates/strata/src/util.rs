//! Helpers shared by several pipeline stages.

use crate::error::{Error, Result};
use crate::layout_graph::{LayoutEdge, LayoutGraph, LayoutNode};
use crate::model::Point;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use strata_graph::{Graph, GraphOptions};

/// Axis-aligned rectangle given by its center and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<&LayoutNode> for Rect {
    fn from(node: &LayoutNode) -> Self {
        Self {
            x: node.x,
            y: node.y,
            width: node.width,
            height: node.height,
        }
    }
}

/// Runs `f` inside a debug span and reports how long it took.
pub fn time<T>(name: &str, f: impl FnOnce() -> T) -> T {
    let _span = tracing::debug_span!("stage", stage = name).entered();
    let start = Instant::now();
    let out = f();
    tracing::debug!("{name} time: {:?}", start.elapsed());
    out
}

static UNIQUE_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn unique_id(prefix: &str) -> String {
    let id = UNIQUE_ID_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    format!("{prefix}{id}")
}

/// Inserts `label` under a fresh id starting with `prefix` and returns the id.
pub fn add_dummy_node(g: &mut LayoutGraph, prefix: &str, label: LayoutNode) -> String {
    let mut v = unique_id(prefix);
    while g.has_node(&v) {
        v = unique_id(prefix);
    }
    g.set_node(v.clone(), label);
    v
}

/// Collapses parallel edges into one: weights are summed, the largest `minlen` wins.
pub fn simplify(g: &LayoutGraph) -> LayoutGraph {
    let mut simplified: LayoutGraph = Graph::new(GraphOptions::default());
    simplified.set_graph(g.graph().clone());
    for (v, label) in g.node_labels() {
        simplified.set_node(v, label.clone());
    }
    for (e, label) in g.edge_labels() {
        let merged = match simplified.edge(&e.v, &e.w, None) {
            Some(prev) => LayoutEdge::weighted(
                prev.weight + label.weight,
                prev.minlen.max(label.minlen),
            ),
            None => LayoutEdge::weighted(label.weight, label.minlen),
        };
        simplified.set_edge_with_label(e.v.clone(), e.w.clone(), merged);
    }
    simplified
}

/// Copy of `g` without the nodes that have children, and without the hierarchy.
pub fn as_non_compound_graph<N, E, G>(g: &Graph<N, E, G>) -> Graph<N, E, G>
where
    N: Clone + Default + 'static,
    E: Clone + Default + 'static,
    G: Clone + Default,
{
    let mut simplified: Graph<N, E, G> = Graph::new(GraphOptions {
        compound: false,
        ..g.options()
    });
    simplified.set_graph(g.graph().clone());
    for (v, label) in g.node_labels() {
        if !g.has_children(v) {
            simplified.set_node(v, label.clone());
        }
    }
    for (e, label) in g.edge_labels() {
        simplified.set_edge_key(e.clone(), label.clone());
    }
    simplified
}

/// The point where the segment from the center of `rect` towards `point` leaves the rectangle.
pub fn intersect_rect(rect: Rect, point: Point) -> Result<Point> {
    let dx = point.x - rect.x;
    let dy = point.y - rect.y;
    let mut w = rect.width / 2.0;
    let mut h = rect.height / 2.0;

    if dx == 0.0 && dy == 0.0 {
        return Err(Error::PointAtRectCenter {
            x: point.x,
            y: point.y,
        });
    }

    let (sx, sy) = if dy.abs() * w > dx.abs() * h {
        // Leaves through the top or bottom side.
        if dy < 0.0 {
            h = -h;
        }
        (h * dx / dy, h)
    } else {
        if dx < 0.0 {
            w = -w;
        }
        (w, w * dy / dx)
    };

    Ok(Point::new(rect.x + sx, rect.y + sy))
}

pub fn max_rank(g: &LayoutGraph) -> Option<i32> {
    g.node_labels().filter_map(|(_, n)| n.rank).max()
}

/// Ranked nodes grouped by rank, each layer sorted by `order`.
pub fn build_layer_matrix(g: &LayoutGraph) -> Vec<Vec<String>> {
    let Some(max_rank) = max_rank(g) else {
        return Vec::new();
    };
    let mut layers: Vec<Vec<(usize, &str)>> = vec![Vec::new(); (max_rank.max(0) + 1) as usize];
    for (v, node) in g.node_labels() {
        let Some(rank) = node.rank else {
            continue;
        };
        if rank < 0 {
            continue;
        }
        layers[rank as usize].push((node.order.unwrap_or(0), v));
    }
    layers
        .into_iter()
        .map(|mut layer| {
            layer.sort_by_key(|(order, _)| *order);
            layer.into_iter().map(|(_, v)| v.to_string()).collect()
        })
        .collect()
}

/// Shifts ranks so that the smallest one is 0.
pub fn normalize_ranks(g: &mut LayoutGraph) {
    let Some(min) = g.node_labels().filter_map(|(_, n)| n.rank).min() else {
        return;
    };
    for (_, node) in g.node_labels_mut() {
        if let Some(rank) = node.rank.as_mut() {
            *rank -= min;
        }
    }
}

/// Closes up ranks that hold no node. Ranks that are a multiple of the nesting rank factor
/// are kept, subgraph borders sit on them.
pub fn remove_empty_ranks(g: &mut LayoutGraph) {
    let Some(offset) = g.node_labels().filter_map(|(_, n)| n.rank).min() else {
        return;
    };
    let factor = g.graph().node_rank_factor.max(1);

    let mut layers: Vec<Vec<String>> = Vec::new();
    for (v, node) in g.node_labels() {
        let Some(rank) = node.rank else {
            continue;
        };
        let idx = (rank - offset) as usize;
        if layers.len() <= idx {
            layers.resize(idx + 1, Vec::new());
        }
        layers[idx].push(v.to_string());
    }

    let mut delta = 0;
    for (i, vs) in layers.iter().enumerate() {
        if vs.is_empty() && i as i32 % factor != 0 {
            delta -= 1;
        } else if delta != 0 {
            for v in vs {
                if let Some(rank) = g.node_mut(v).and_then(|n| n.rank.as_mut()) {
                    *rank += delta;
                }
            }
        }
    }
}
