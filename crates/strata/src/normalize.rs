//! Long-edge normalization.
//!
//! After ranking, an edge may span several ranks. [`run`] replaces each such edge with a chain
//! of zero-size virtual nodes, one per intermediate rank, so every edge of the layout graph
//! joins adjacent ranks. The chain node on the edge's label rank takes the label's size. [`undo`]
//! turns the positioned chains back into polylines on the original edges.

use crate::layout_graph::{LayoutEdge, LayoutGraph, LayoutNode, NodeRole};
use crate::model::Point;
use crate::util;
use strata_graph::EdgeKey;

/// A normalized edge: its key, its label (held here while the edge is out of the graph), and
/// the first virtual node of its chain.
#[derive(Debug, Clone, PartialEq)]
pub struct DummyChain {
    pub edge: EdgeKey,
    pub label: LayoutEdge,
    pub start: String,
}

pub fn run(g: &mut LayoutGraph) -> Vec<DummyChain> {
    let mut chains = Vec::new();
    for e in g.edge_keys() {
        if let Some(chain) = normalize_edge(g, e) {
            chains.push(chain);
        }
    }
    chains
}

fn normalize_edge(g: &mut LayoutGraph, e: EdgeKey) -> Option<DummyChain> {
    let v_rank = g.node(&e.v)?.rank?;
    let w_rank = g.node(&e.w)?.rank?;
    if w_rank <= v_rank + 1 {
        return None;
    }

    let mut label = g.remove_edge_key(&e)?;
    label.points.clear();
    let segment = LayoutEdge::weighted(label.weight, 1);

    let mut start: Option<String> = None;
    let mut v = e.v.clone();
    for rank in v_rank + 1..w_rank {
        let node = if Some(rank) == label.label_rank {
            LayoutNode {
                width: label.width,
                height: label.height,
                ..LayoutNode::dummy(
                    NodeRole::VirtualLabel {
                        edge: e.clone(),
                        labelpos: label.labelpos,
                    },
                    Some(rank),
                )
            }
        } else {
            LayoutNode::dummy(NodeRole::VirtualChain { edge: e.clone() }, Some(rank))
        };
        let dummy = util::add_dummy_node(g, "_d", node);
        g.set_edge_named(v, dummy.clone(), e.name.clone(), Some(segment.clone()));
        start.get_or_insert_with(|| dummy.clone());
        v = dummy;
    }
    g.set_edge_named(v, e.w.clone(), e.name.clone(), Some(segment));

    Some(DummyChain {
        start: start?,
        edge: e,
        label,
    })
}

/// Removes every chain, recording its node centers as the edge's `points` and, for the label
/// node, the label center and size. The original edge is restored with its label.
pub fn undo(g: &mut LayoutGraph, chains: Vec<DummyChain>) {
    for chain in chains {
        let DummyChain {
            edge,
            mut label,
            start,
        } = chain;

        let mut v = start;
        loop {
            let Some(node) = g.node(&v) else {
                break;
            };
            if !node.role.is_chain() {
                break;
            }
            label.points.push(Point::new(node.x, node.y));
            if matches!(node.role, NodeRole::VirtualLabel { .. }) {
                label.x = Some(node.x);
                label.y = Some(node.y);
                label.width = node.width;
                label.height = node.height;
            }
            let next = g.successors(&v).first().map(|w| w.to_string());
            g.remove_node(&v);
            let Some(next) = next else {
                break;
            };
            v = next;
        }

        g.set_edge_key(edge, label);
    }
}
