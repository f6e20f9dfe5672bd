#![forbid(unsafe_code)]

//! Layered layout for directed graphs.
//!
//! `strata` assigns every node of a [`graph::Graph`] a center point, routes every edge as a
//! polyline and places edge labels, following the classic Sugiyama pipeline: cycle removal,
//! ranking, normalization of long edges, crossing minimization, coordinate assignment and edge
//! routing. Compound graphs (nodes nested in subgraph nodes) are supported.
//!
//! ```no_run
//! use strata::graph::{Graph, GraphOptions};
//! use strata::{EdgeLabel, GraphLabel, NodeLabel};
//!
//! let mut g: Graph<NodeLabel, EdgeLabel, GraphLabel> = Graph::new(GraphOptions {
//!     multigraph: true,
//!     compound: true,
//!     ..Default::default()
//! });
//! g.set_node("a", NodeLabel { width: 50.0, height: 100.0, ..Default::default() });
//! g.set_node("b", NodeLabel { width: 75.0, height: 200.0, ..Default::default() });
//! g.set_edge("a", "b");
//! strata::layout(&mut g)?;
//! # Ok::<(), strata::Error>(())
//! ```

pub use strata_graph as graph;

pub mod acyclic;
pub mod add_border_segments;
pub mod config;
pub mod coordinate_system;
pub mod error;
pub mod greedy_fas;
pub mod layout_graph;
pub mod model;
pub mod nesting_graph;
pub mod normalize;
pub mod order;
pub mod parent_dummy_chains;
pub mod position;
pub mod rank;
pub mod util;

mod pipeline;

pub use config::Attrs;
pub use error::{Error, Result};
pub use model::{
    Acyclicer, Align, EdgeLabel, GraphLabel, LabelPos, NodeLabel, Point, RankDir, Ranker,
};
pub use pipeline::{layout, layout_with};
