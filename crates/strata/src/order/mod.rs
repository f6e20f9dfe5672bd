//! Crossing minimization.
//!
//! Assigns every ranked node an `order` within its rank. Starts from a depth-first initial
//! order, then alternates downward and upward barycenter sweeps over per-rank layer graphs,
//! each followed by adjacent-pair transposition. The layering with the fewest weighted
//! crossings seen is kept.

pub mod barycenter;
pub mod constraints;
pub mod cross_count;
pub mod init_order;
pub mod layer_graph;
pub mod resolve_conflicts;
pub mod sort;
pub mod sort_subgraph;
pub mod transpose;

pub use barycenter::barycenter;
pub use constraints::add_subgraph_constraints;
pub use cross_count::cross_count;
pub use init_order::init_order;
pub use layer_graph::{build_layer_graph, ConstraintGraph, LayerGraph, Relationship};
pub use resolve_conflicts::resolve_conflicts;
pub use sort::sort;
pub use sort_subgraph::sort_subgraph;
pub use transpose::transpose;

use crate::layout_graph::LayoutGraph;
use crate::util;
use strata_graph::{Graph, GraphOptions};

/// Sweeps without improvement after which ordering stops.
pub const MAX_STALE_SWEEPS: usize = 4;
/// Upper bound on transposition passes over the whole layering per sweep.
pub const MAX_TRANSPOSE_PASSES: usize = 8;

pub fn order(g: &mut LayoutGraph) {
    let Some(max_rank) = util::max_rank(g) else {
        return;
    };
    let nodes_by_rank = nodes_by_rank(g, max_rank);

    let layering = init_order(g);
    assign_order(g, &layering);

    let mut best_cc = f64::INFINITY;
    let mut best = layering;
    let mut sweep_idx = 0usize;
    let mut stale = 0usize;
    while stale < MAX_STALE_SWEEPS {
        let relationship = if sweep_idx % 2 == 1 {
            Relationship::InEdges
        } else {
            Relationship::OutEdges
        };
        let bias_right = sweep_idx % 4 >= 2;
        sweep(g, &nodes_by_rank, max_rank, relationship, bias_right);

        let mut layering = util::build_layer_matrix(g);
        transpose(g, &mut layering);
        assign_order(g, &layering);

        let cc = cross_count(g, &layering);
        if cc < best_cc {
            stale = 0;
            best_cc = cc;
            best = layering;
        }
        sweep_idx += 1;
        stale += 1;
    }

    tracing::trace!(crossings = best_cc, sweeps = sweep_idx, "order");
    assign_order(g, &best);
}

/// Ranks each node takes part in: its own, or every rank a subgraph spans.
fn nodes_by_rank(g: &LayoutGraph, max_rank: i32) -> Vec<Vec<String>> {
    let mut out: Vec<Vec<String>> = vec![Vec::new(); (max_rank.max(0) + 1) as usize];
    for (v, node) in g.node_labels() {
        if let Some(rank) = node.rank {
            if let Some(layer) = out.get_mut(rank.max(0) as usize) {
                layer.push(v.to_string());
            }
        }
        if let (Some(min), Some(max)) = (node.min_rank, node.max_rank) {
            for rank in min.max(0)..=max.min(max_rank) {
                if node.rank != Some(rank) {
                    out[rank as usize].push(v.to_string());
                }
            }
        }
    }
    out
}

/// One sweep: downward (`InEdges`, ranks 1..=max) or upward (`OutEdges`, ranks max-1..=0).
fn sweep(
    g: &mut LayoutGraph,
    nodes_by_rank: &[Vec<String>],
    max_rank: i32,
    relationship: Relationship,
    bias_right: bool,
) {
    let ranks: Vec<i32> = match relationship {
        Relationship::InEdges => (1..=max_rank).collect(),
        Relationship::OutEdges => (0..max_rank).rev().collect(),
    };

    let mut cg: ConstraintGraph = Graph::new(GraphOptions::default());
    for rank in ranks {
        let nodes = &nodes_by_rank[rank as usize];
        let lg = build_layer_graph(g, rank, relationship, nodes);
        let root = lg.graph().root.clone();
        let sorted = sort_subgraph(&lg, &root, &cg, bias_right);
        for (i, v) in sorted.vs.iter().enumerate() {
            if let Some(node) = g.node_mut(v) {
                node.order = Some(i);
            }
        }
        add_subgraph_constraints(&lg, &mut cg, &sorted.vs);
    }
}

pub fn assign_order(g: &mut LayoutGraph, layering: &[Vec<String>]) {
    for layer in layering {
        for (i, v) in layer.iter().enumerate() {
            if let Some(node) = g.node_mut(v) {
                node.order = Some(i);
            }
        }
    }
}
