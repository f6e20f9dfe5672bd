#![forbid(unsafe_code)]

//! Graph container used by `strata`.
//!
//! A directed graph with string node ids and user supplied node, edge and graph labels.
//! Optionally a multigraph (parallel edges keyed by name) and/or a compound graph (nodes nested
//! under a parent node). Iteration follows insertion order everywhere so that layout results
//! are deterministic.

mod graph;

pub mod alg;

pub use graph::{EdgeKey, Graph, GraphOptions};
