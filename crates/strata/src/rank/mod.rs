//! Rank assignment.
//!
//! Every node gets an integer rank such that each edge `v -> w` satisfies
//! `rank(w) - rank(v) >= minlen`. The input must be acyclic and must not be compound; the
//! pipeline hands in a non-compound view of the layout graph.

pub mod feasible_tree;
pub mod network_simplex;
pub mod tree;
pub mod util;

pub use feasible_tree::feasible_tree;
pub use network_simplex::network_simplex;
pub use util::{longest_path, slack};

use crate::layout_graph::LayoutGraph;
use crate::model::Ranker;

pub fn rank(g: &mut LayoutGraph) {
    debug_assert!(
        strata_graph::alg::is_acyclic(g),
        "ranking requires an acyclic graph"
    );
    match g.graph().ranker {
        Ranker::NetworkSimplex => network_simplex(g),
        Ranker::TightTree => {
            longest_path(g);
            feasible_tree(g);
        }
        Ranker::LongestPath => longest_path(g),
    }
}
