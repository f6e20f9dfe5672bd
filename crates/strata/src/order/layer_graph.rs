//! Per-rank views used by the ordering sweeps.
//!
//! A layer graph holds the nodes of one rank (subgraphs that span the rank included, with the
//! border nodes of that rank) under a fresh root, plus their neighbours on the adjacent rank
//! the sweep is coming from. Parallel edges are merged by summing weights.

use crate::layout_graph::LayoutGraph;
use crate::util;
use strata_graph::{Graph, GraphOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relationship {
    /// Look at predecessors (downward sweep).
    InEdges,
    /// Look at successors (upward sweep).
    OutEdges,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerNode {
    pub order: Option<usize>,
    pub border_left: Option<String>,
    pub border_right: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerEdge {
    pub weight: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerConfig {
    pub root: String,
}

pub type LayerGraph = Graph<LayerNode, LayerEdge, LayerConfig>;

/// Left-to-right precedence between sibling subgraphs learned in earlier ranks.
pub type ConstraintGraph = Graph<(), (), ()>;

pub fn build_layer_graph(
    g: &LayoutGraph,
    rank: i32,
    relationship: Relationship,
    nodes: &[String],
) -> LayerGraph {
    let mut root = util::unique_id("_root");
    while g.has_node(&root) {
        root = util::unique_id("_root");
    }

    let mut lg: LayerGraph = Graph::new(GraphOptions {
        compound: true,
        ..Default::default()
    });
    lg.set_graph(LayerConfig { root: root.clone() });

    let layer_node = |v: &str| LayerNode {
        order: g.node(v).and_then(|n| n.order),
        ..Default::default()
    };

    for v in nodes {
        let Some(node) = g.node(v) else {
            continue;
        };
        let spans = node.min_rank.is_some_and(|min| min <= rank)
            && node.max_rank.is_some_and(|max| rank <= max);
        if node.rank != Some(rank) && !spans {
            continue;
        }

        let label = if node.min_rank.is_some() {
            let border = |side: &[Option<String>]| {
                usize::try_from(rank)
                    .ok()
                    .and_then(|r| side.get(r).cloned().flatten())
            };
            LayerNode {
                order: node.order,
                border_left: border(&node.border_left),
                border_right: border(&node.border_right),
            }
        } else {
            layer_node(v)
        };
        lg.set_node(v.clone(), label);
        lg.set_parent(v.clone(), g.parent(v).unwrap_or(&root));

        let edges = match relationship {
            Relationship::InEdges => g.in_edges(v, None),
            Relationship::OutEdges => g.out_edges(v, None),
        };
        for e in edges {
            let u = e.other(v);
            if !lg.has_node(u) {
                lg.set_node(u, layer_node(u));
            }
            let prev = lg.edge(u, v, None).map_or(0.0, |l| l.weight);
            let weight = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
            lg.set_edge_with_label(
                u,
                v.clone(),
                LayerEdge {
                    weight: weight + prev,
                },
            );
        }
    }
    lg
}
