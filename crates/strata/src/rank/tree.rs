//! Spanning tree used by the tight-tree and network-simplex rankers.

use strata_graph::{Graph, GraphOptions};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeNode {
    /// Smallest postorder number in the subtree.
    pub low: i32,
    /// Postorder number of the node itself.
    pub lim: i32,
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeEdge {
    pub cutvalue: f64,
}

/// Undirected; tree edges are looked up regardless of the direction of the graph edge they
/// mirror.
pub type Tree = Graph<TreeNode, TreeEdge, ()>;

pub fn empty_tree() -> Tree {
    Graph::new(GraphOptions {
        directed: false,
        ..Default::default()
    })
}
