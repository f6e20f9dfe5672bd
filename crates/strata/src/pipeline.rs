//! The layout entry points and the stages that only make sense as glue between the algorithm
//! modules.

use crate::config::Attrs;
use crate::error::{Error, Result};
use crate::layout_graph::{LayoutEdge, LayoutGraph, LayoutNode, NodeRole};
use crate::model::{EdgeLabel, GraphLabel, LabelPos, NodeLabel};
use crate::util::{self, Rect, time};
use crate::{
    acyclic, add_border_segments, coordinate_system, nesting_graph, normalize, order,
    parent_dummy_chains, position, rank,
};
use rustc_hash::FxHashMap;
use strata_graph::{EdgeKey, Graph, GraphOptions};

/// Lays out `g` in place: writes node centers (and subgraph sizes), edge polylines, label
/// centers and the graph's bounding box.
///
/// Self loops and edges attached to a subgraph node are left out of the layout; their `points`
/// come back empty. On error the graph is left untouched.
pub fn layout(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>) -> Result<()> {
    layout_with(g, &Attrs::new())
}

/// Like [`layout`], with graph options from `overrides` (matched case-insensitively) taking
/// precedence over the graph's own label for this call.
pub fn layout_with(g: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>, overrides: &Attrs) -> Result<()> {
    let mut options = g.graph().clone();
    options.apply_attrs(overrides);
    tracing::debug!(
        nodes = g.node_count(),
        edges = g.edge_count(),
        rankdir = ?options.rankdir,
        ranker = ?options.ranker,
        "layout"
    );

    time("layout", || {
        let mut lg = time("build_layout_graph", || build_layout_graph(g, &options));
        time("run_layout", || run_layout(&mut lg))?;
        time("update_input_graph", || update_input_graph(g, &lg))
    })
}

fn run_layout(g: &mut LayoutGraph) -> Result<()> {
    time("make_space_for_edge_labels", || make_space_for_edge_labels(g));
    let reversed = time("acyclic", || acyclic::run(g));
    time("nesting_graph::run", || nesting_graph::run(g));
    time("rank", || rank_non_compound(g));
    time("inject_edge_label_proxies", || inject_edge_label_proxies(g));
    time("remove_empty_ranks", || util::remove_empty_ranks(g));
    time("nesting_graph::cleanup", || nesting_graph::cleanup(g));
    time("normalize_ranks", || util::normalize_ranks(g));
    time("assign_rank_min_max", || assign_rank_min_max(g));
    time("remove_edge_label_proxies", || remove_edge_label_proxies(g));
    let chains = time("normalize::run", || normalize::run(g));
    time("parent_dummy_chains", || {
        parent_dummy_chains::parent_dummy_chains(g, &chains)
    });
    time("add_border_segments", || add_border_segments::add_border_segments(g));
    time("order", || order::order(g));
    time("coordinate_system::adjust", || coordinate_system::adjust(g));
    time("position", || position::position(g));
    time("remove_border_nodes", || remove_border_nodes(g));
    time("normalize::undo", || normalize::undo(g, chains));
    time("fixup_edge_label_coords", || fixup_edge_label_coords(g));
    time("coordinate_system::undo", || coordinate_system::undo(g));
    time("translate_graph", || translate_graph(g));
    time("assign_node_intersects", || assign_node_intersects(g))?;
    time("acyclic::undo", || acyclic::undo(g, reversed));
    Ok(())
}

/// Copies the attributes the engine consumes into a fresh compound multigraph. Self loops and
/// edges touching a subgraph node are not copied.
fn build_layout_graph(
    input: &Graph<NodeLabel, EdgeLabel, GraphLabel>,
    options: &GraphLabel,
) -> LayoutGraph {
    let mut g: LayoutGraph = Graph::new(GraphOptions {
        multigraph: true,
        compound: true,
        directed: true,
    });
    g.set_graph(options.into());

    for (v, label) in input.node_labels() {
        g.set_node(v, LayoutNode::sized(label.width, label.height));
    }
    for v in input.nodes() {
        if let Some(parent) = input.parent(v) {
            g.set_parent(v, parent);
        }
    }

    for (e, label) in input.edge_labels() {
        if e.is_self_loop() || input.has_children(&e.v) || input.has_children(&e.w) {
            continue;
        }
        let edge = LayoutEdge {
            weight: label.weight,
            minlen: i32::try_from(label.minlen.max(1)).unwrap_or(i32::MAX),
            width: label.width,
            height: label.height,
            labelpos: label.labelpos,
            labeloffset: label.labeloffset,
            ..Default::default()
        };
        g.set_edge_key(e.clone(), edge);
    }
    g
}

/// Doubles every `minlen` so each edge gets a middle rank its label can sit on, and halves
/// `ranksep` to compensate. Side labels grow by their offset.
fn make_space_for_edge_labels(g: &mut LayoutGraph) {
    let horizontal = g.graph().rankdir.is_horizontal();
    g.graph_mut().ranksep /= 2.0;
    for (_, edge) in g.edge_labels_mut() {
        edge.minlen = edge.minlen.saturating_mul(2);
        if edge.labelpos != LabelPos::C {
            if horizontal {
                edge.height += edge.labeloffset;
            } else {
                edge.width += edge.labeloffset;
            }
        }
    }
}

/// Ranks a copy without subgraph nodes and copies the ranks back.
fn rank_non_compound(g: &mut LayoutGraph) {
    let mut flat = util::as_non_compound_graph(&*g);
    rank::rank(&mut flat);
    for (v, node) in flat.node_labels() {
        if let Some(target) = g.node_mut(v) {
            target.rank = node.rank;
        }
    }
}

fn inject_edge_label_proxies(g: &mut LayoutGraph) {
    let mut proxies: Vec<(EdgeKey, i32)> = Vec::new();
    for (e, edge) in g.edge_labels() {
        if !edge.has_label() {
            continue;
        }
        let (Some(v_rank), Some(w_rank)) = (
            g.node(&e.v).and_then(|n| n.rank),
            g.node(&e.w).and_then(|n| n.rank),
        ) else {
            continue;
        };
        proxies.push((e.clone(), (w_rank - v_rank).div_euclid(2) + v_rank));
    }
    for (edge, rank) in proxies {
        util::add_dummy_node(
            g,
            "_ep",
            LayoutNode::dummy(NodeRole::EdgeProxy { edge }, Some(rank)),
        );
    }
}

fn remove_edge_label_proxies(g: &mut LayoutGraph) {
    let proxies: Vec<(String, EdgeKey, Option<i32>)> = g
        .node_labels()
        .filter_map(|(v, node)| match &node.role {
            NodeRole::EdgeProxy { edge } => Some((v.to_string(), edge.clone(), node.rank)),
            _ => None,
        })
        .collect();
    for (v, edge, rank) in proxies {
        if let Some(label) = g.edge_mut_by_key(&edge) {
            label.label_rank = rank;
        }
        g.remove_node(&v);
    }
}

/// Copies the ranks of each subgraph's top and bottom borders onto the subgraph.
fn assign_rank_min_max(g: &mut LayoutGraph) {
    let spans: Vec<(String, Option<i32>, Option<i32>)> = g
        .node_labels()
        .filter_map(|(v, node)| {
            let top = node.border_top.as_deref()?;
            let bottom = node.border_bottom.as_deref()?;
            Some((
                v.to_string(),
                g.node(top).and_then(|n| n.rank),
                g.node(bottom).and_then(|n| n.rank),
            ))
        })
        .collect();

    let mut max_rank = 0;
    for (v, min, max) in spans {
        if let Some(node) = g.node_mut(&v) {
            node.min_rank = min;
            node.max_rank = max;
        }
        max_rank = max_rank.max(max.unwrap_or(0));
    }
    g.graph_mut().max_rank = max_rank;
}

/// Sizes every subgraph from its border nodes, then drops all border nodes.
fn remove_border_nodes(g: &mut LayoutGraph) {
    let subgraphs: Vec<String> = g
        .nodes()
        .filter(|v| g.has_children(v))
        .map(str::to_string)
        .collect();

    for v in subgraphs {
        let Some(node) = g.node(&v) else {
            continue;
        };
        let last = |side: &[Option<String>]| side.iter().rev().find_map(|b| b.clone());
        let corner = |id: Option<String>| id.and_then(|id| g.node(&id)).map(Rect::from);
        let (Some(t), Some(b), Some(l), Some(r)) = (
            corner(node.border_top.clone()),
            corner(node.border_bottom.clone()),
            corner(last(&node.border_left)),
            corner(last(&node.border_right)),
        ) else {
            continue;
        };

        let width = (r.x - l.x).abs();
        let height = (b.y - t.y).abs();
        if let Some(node) = g.node_mut(&v) {
            node.width = width;
            node.height = height;
            node.x = l.x + width / 2.0;
            node.y = t.y + height / 2.0;
        }
    }

    let borders: Vec<String> = g
        .node_labels()
        .filter(|(_, n)| n.role.is_border())
        .map(|(v, _)| v.to_string())
        .collect();
    for v in borders {
        g.remove_node(&v);
    }
}

/// Removes the `labeloffset` growth and moves side labels off the edge.
fn fixup_edge_label_coords(g: &mut LayoutGraph) {
    for (_, edge) in g.edge_labels_mut() {
        let Some(x) = edge.x else {
            continue;
        };
        match edge.labelpos {
            LabelPos::L => {
                edge.width -= edge.labeloffset;
                edge.x = Some(x - edge.width / 2.0 - edge.labeloffset);
            }
            LabelPos::R => {
                edge.width -= edge.labeloffset;
                edge.x = Some(x + edge.width / 2.0 + edge.labeloffset);
            }
            LabelPos::C => {}
        }
    }
}

/// Moves the drawing so its top-left corner sits at the margins and records the bounding box.
fn translate_graph(g: &mut LayoutGraph) {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    let mut extend = |x: f64, y: f64, w: f64, h: f64| {
        min_x = min_x.min(x - w / 2.0);
        max_x = max_x.max(x + w / 2.0);
        min_y = min_y.min(y - h / 2.0);
        max_y = max_y.max(y + h / 2.0);
    };

    for (_, node) in g.node_labels() {
        extend(node.x, node.y, node.width, node.height);
    }
    for (_, edge) in g.edge_labels() {
        if let (Some(x), Some(y)) = (edge.x, edge.y) {
            extend(x, y, edge.width, edge.height);
        }
    }
    // Nothing to measure: an empty drawing at the origin.
    if !min_x.is_finite() {
        (min_x, max_x, min_y, max_y) = (0.0, 0.0, 0.0, 0.0);
    }

    let (marginx, marginy) = (g.graph().marginx, g.graph().marginy);
    let dx = min_x - marginx;
    let dy = min_y - marginy;

    for (_, node) in g.node_labels_mut() {
        node.x -= dx;
        node.y -= dy;
    }
    for (_, edge) in g.edge_labels_mut() {
        for p in &mut edge.points {
            p.x -= dx;
            p.y -= dy;
        }
        edge.x = edge.x.map(|x| x - dx);
        edge.y = edge.y.map(|y| y - dy);
    }

    let config = g.graph_mut();
    config.width = max_x - dx + marginx;
    config.height = max_y - dy + marginy;
}

/// Clips every edge at its endpoints' boundaries. Edges without interior points aim straight
/// at the other endpoint's center.
fn assign_node_intersects(g: &mut LayoutGraph) -> Result<()> {
    for e in g.edge_keys() {
        let v = node_rect(g, &e.v)?;
        let w = node_rect(g, &e.w)?;
        let Some(edge) = g.edge_mut_by_key(&e) else {
            continue;
        };
        let (toward_v, toward_w) = match (edge.points.first(), edge.points.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => (w.center(), v.center()),
        };
        let start = util::intersect_rect(v, toward_v)?;
        let end = util::intersect_rect(w, toward_w)?;
        edge.points.insert(0, start);
        edge.points.push(end);
    }
    Ok(())
}

fn node_rect(g: &LayoutGraph, v: &str) -> Result<Rect> {
    g.node(v)
        .map(Rect::from)
        .ok_or_else(|| Error::MissingNode { id: v.to_string() })
}

/// Dense `(rank, order)` per caller node. The layout graph's ranks are doubled to make room for
/// label slots and its orders count dummies, so both are renumbered over `ids` alone. Subgraph
/// nodes have no order and get no placement.
fn caller_placement(ids: &[String], lg: &LayoutGraph) -> FxHashMap<String, (i32, usize)> {
    let mut placed: Vec<(i32, usize, &str)> = ids
        .iter()
        .filter_map(|v| {
            let node = lg.node(v)?;
            Some((node.rank?, node.order?, v.as_str()))
        })
        .collect();
    placed.sort_unstable();

    let mut out = FxHashMap::default();
    let mut last_rank = None;
    let mut rank = -1;
    let mut order = 0;
    for (r, _, v) in placed {
        if last_rank != Some(r) {
            last_rank = Some(r);
            rank += 1;
            order = 0;
        }
        out.insert(v.to_string(), (rank, order));
        order += 1;
    }
    out
}

fn update_input_graph(
    input: &mut Graph<NodeLabel, EdgeLabel, GraphLabel>,
    lg: &LayoutGraph,
) -> Result<()> {
    let placement = caller_placement(&input.node_ids(), lg);
    for v in input.node_ids() {
        let layout = lg
            .node(&v)
            .ok_or_else(|| Error::MissingNode { id: v.clone() })?;
        let subgraph = input.has_children(&v);
        if let Some(label) = input.node_mut(&v) {
            label.x = Some(layout.x);
            label.y = Some(layout.y);
            let placed = placement.get(&v).copied();
            label.rank = placed.map(|(rank, _)| rank);
            label.order = placed.map(|(_, order)| order);
            if subgraph {
                label.width = layout.width;
                label.height = layout.height;
            }
        }
    }

    for (e, label) in input.edge_labels_mut() {
        match lg.edge_by_key(e) {
            Some(layout) => {
                label.points = layout.points.clone();
                label.x = layout.x;
                label.y = layout.y;
            }
            None => {
                label.points.clear();
                label.x = None;
                label.y = None;
            }
        }
    }

    let config = lg.graph();
    let graph = input.graph_mut();
    graph.width = Some(config.width);
    graph.height = Some(config.height);
    Ok(())
}
