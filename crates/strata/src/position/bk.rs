//! Horizontal coordinate assignment after Brandes and Köpf, "Fast and Simple Horizontal
//! Coordinate Assignment", with the corrections from Brandes, Walter and Zink, "Erratum: Fast
//! and Simple Horizontal Coordinate Assignment".
//!
//! Four alignments are computed: up-left, up-right, down-left and down-right. Each one groups
//! nodes into vertical blocks along median neighbours, then packs the blocks as tightly as the
//! separation rules allow. The narrowest alignment becomes the reference the others are shifted
//! onto, and the final x of each node is the mean of its two middle candidates, unless the graph
//! pins a single alignment.

use crate::layout_graph::{BorderSide, LayoutGraph, NodeRole};
use crate::model::{Align, LabelPos};
use crate::util;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use strata_graph::{Graph, GraphOptions};

/// Node id to x coordinate.
pub type Xs = HashMap<String, f64>;

/// Edges, stored as unordered pairs of endpoints, that must not be used for alignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conflicts {
    pairs: HashSet<(String, String)>,
}

impl Conflicts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn extend(&mut self, other: Conflicts) {
        self.pairs.extend(other.pairs);
    }
}

fn pair(v: &str, w: &str) -> (String, String) {
    if v <= w {
        (v.to_string(), w.to_string())
    } else {
        (w.to_string(), v.to_string())
    }
}

pub fn add_conflict(conflicts: &mut Conflicts, v: &str, w: &str) {
    conflicts.pairs.insert(pair(v, w));
}

pub fn has_conflict(conflicts: &Conflicts, v: &str, w: &str) -> bool {
    conflicts.pairs.contains(&pair(v, w))
}

fn is_dummy(g: &LayoutGraph, v: &str) -> bool {
    g.node(v).is_some_and(|n| n.role.is_dummy())
}

fn order_of(g: &LayoutGraph, v: &str) -> usize {
    g.node(v).and_then(|n| n.order).unwrap_or(0)
}

/// The upper end of an inner segment (an edge between two dummies) ending at `v`.
fn inner_segment_source<'a>(g: &'a LayoutGraph, v: &str) -> Option<&'a str> {
    if !is_dummy(g, v) {
        return None;
    }
    g.predecessors(v).into_iter().find(|u| is_dummy(g, u))
}

/// Type-1 conflicts: non-inner segments crossing an inner segment. Inner segments win, which
/// keeps long edges straight.
pub fn find_type1_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts = Conflicts::new();

    for layers in layering.windows(2) {
        let (north, south) = (&layers[0], &layers[1]);
        let mut k0 = 0usize;
        let mut scan_pos = 0usize;

        for (i, v) in south.iter().enumerate() {
            let inner = inner_segment_source(g, v);
            let last = i + 1 == south.len();
            if inner.is_none() && !last {
                continue;
            }
            let k1 = inner.map_or(north.len(), |w| order_of(g, w));

            for scan_node in &south[scan_pos..=i] {
                let scan_dummy = is_dummy(g, scan_node);
                for u in g.predecessors(scan_node) {
                    let u_pos = order_of(g, u);
                    if (u_pos < k0 || k1 < u_pos) && !(scan_dummy && is_dummy(g, u)) {
                        add_conflict(&mut conflicts, u, scan_node);
                    }
                }
            }
            scan_pos = i + 1;
            k0 = k1;
        }
    }

    conflicts
}

/// Type-2 conflicts: inner segments crossing each other. Segments entering a subgraph border
/// column take precedence over those around them.
pub fn find_type2_conflicts(g: &LayoutGraph, layering: &[Vec<String>]) -> Conflicts {
    let mut conflicts = Conflicts::new();

    let mut scan = |south: &[String], range: std::ops::Range<usize>, lo: usize, hi: usize| {
        for v in &south[range] {
            if !is_dummy(g, v) {
                continue;
            }
            for u in g.predecessors(v) {
                if !is_dummy(g, u) {
                    continue;
                }
                let order = order_of(g, u);
                if order < lo || order > hi {
                    add_conflict(&mut conflicts, u, v);
                }
            }
        }
    };

    for layers in layering.windows(2) {
        let (north, south) = (&layers[0], &layers[1]);
        let mut prev_north: Option<usize> = None;
        let mut next_north: Option<usize> = None;
        let mut south_pos = 0usize;

        for (lookahead, v) in south.iter().enumerate() {
            if !g.node(v).is_some_and(|n| n.role.is_border()) {
                continue;
            }
            let Some(&first) = g.predecessors(v).first() else {
                continue;
            };
            let next = order_of(g, first);
            // With no border to the left yet only the upper bound can be violated.
            scan(south, south_pos..lookahead, prev_north.unwrap_or(0), next);
            south_pos = lookahead;
            prev_north = Some(next);
            next_north = Some(next);
        }

        if let Some(next) = next_north {
            scan(south, south_pos..south.len(), next, north.len());
        }
    }

    conflicts
}

/// Block structure of one alignment. `root[v]` is the topmost node of `v`'s block and
/// `align[v]` the next node down the block (cyclic, the last one points back to the root).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alignment {
    pub root: HashMap<String, String>,
    pub align: HashMap<String, String>,
}

/// Aligns each node with the median of its `neighbors` in the previous layer, left to right,
/// never crossing an earlier alignment of the same layer or a conflicting edge.
pub fn vertical_alignment<'a, F>(
    layering: &[Vec<String>],
    conflicts: &Conflicts,
    neighbors: F,
) -> Alignment
where
    F: Fn(&str) -> Vec<&'a str>,
{
    let mut root: HashMap<String, String> = HashMap::default();
    let mut align: HashMap<String, String> = HashMap::default();
    let mut pos: HashMap<&str, usize> = HashMap::default();

    for layer in layering {
        for (order, v) in layer.iter().enumerate() {
            root.insert(v.clone(), v.clone());
            align.insert(v.clone(), v.clone());
            pos.insert(v.as_str(), order);
        }
    }

    for layer in layering {
        let mut prev_idx: Option<usize> = None;
        for v in layer {
            let mut ws: Vec<&str> = neighbors(v.as_str())
                .into_iter()
                .filter(|w| pos.contains_key(*w))
                .collect();
            if ws.is_empty() {
                continue;
            }
            ws.sort_by_key(|w| pos[*w]);

            let lo = (ws.len() - 1) / 2;
            let hi = ws.len() / 2;
            for w in &ws[lo..=hi] {
                let w_pos = pos[*w];
                let free = align.get(v.as_str()) == Some(v);
                if free
                    && prev_idx.is_none_or(|p| p < w_pos)
                    && !has_conflict(conflicts, v, w)
                {
                    let w_root = root.get(*w).cloned().unwrap_or_else(|| w.to_string());
                    align.insert(w.to_string(), v.clone());
                    align.insert(v.clone(), w_root.clone());
                    root.insert(v.clone(), w_root);
                    prev_idx = Some(w_pos);
                }
            }
        }
    }

    Alignment { root, align }
}

type BlockGraph = Graph<(), f64, ()>;

/// Packs the blocks of `alignment` as far left as separation allows, then pulls each block
/// right towards its successors where that leaves no gap.
pub fn horizontal_compaction(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    alignment: &Alignment,
    reverse_sep: bool,
) -> Xs {
    let block = build_block_graph(g, layering, &alignment.root, reverse_sep);
    let pinned_side = if reverse_sep {
        BorderSide::Left
    } else {
        BorderSide::Right
    };

    let mut xs: Xs = HashMap::default();

    visit_blocks(
        &block,
        |elem| {
            let x = block.in_edges(elem, None).iter().fold(0.0_f64, |acc, e| {
                let sep = block.edge_by_key(e).copied().unwrap_or(0.0);
                acc.max(xs.get(&e.v).copied().unwrap_or(0.0) + sep)
            });
            xs.insert(elem.to_string(), x);
        },
        |elem| block.predecessors(elem),
    );

    visit_blocks(
        &block,
        |elem| {
            let min = block.out_edges(elem, None).iter().fold(f64::INFINITY, |acc, e| {
                let sep = block.edge_by_key(e).copied().unwrap_or(0.0);
                acc.min(xs.get(&e.w).copied().unwrap_or(0.0) - sep)
            });
            let pinned = matches!(
                g.node(elem).map(|n| &n.role),
                Some(NodeRole::Border { side }) if *side == pinned_side
            );
            if min.is_finite() && !pinned {
                let x = xs.entry(elem.to_string()).or_insert(0.0);
                *x = x.max(min);
            }
        },
        |elem| block.successors(elem),
    );

    alignment
        .align
        .keys()
        .map(|v| {
            let root = alignment.root.get(v).unwrap_or(v);
            (v.clone(), xs.get(root).copied().unwrap_or(0.0))
        })
        .collect()
}

/// Depth-first walk of the block graph that calls `set_xs` on a block once everything `next`
/// returns for it has been handled.
fn visit_blocks<'a>(
    block: &'a BlockGraph,
    mut set_xs: impl FnMut(&str),
    next: impl Fn(&'a str) -> Vec<&'a str>,
) {
    let mut stack: Vec<&str> = block.nodes().collect();
    let mut visited: HashSet<&str> = HashSet::default();
    while let Some(elem) = stack.pop() {
        if visited.contains(elem) {
            set_xs(elem);
        } else {
            visited.insert(elem);
            stack.push(elem);
            stack.extend(next(elem));
        }
    }
}

fn build_block_graph(
    g: &LayoutGraph,
    layering: &[Vec<String>],
    root: &HashMap<String, String>,
    reverse_sep: bool,
) -> BlockGraph {
    let mut block: BlockGraph = Graph::new(GraphOptions::default());
    let config = g.graph();
    let root_of = |v: &String| root.get(v).cloned().unwrap_or_else(|| v.clone());

    for layer in layering {
        let mut prev: Option<&String> = None;
        for v in layer {
            let v_root = root_of(v);
            block.ensure_node(v_root.clone());
            if let Some(u) = prev {
                let u_root = root_of(u);
                let sep = separation(g, v, u, config.nodesep, config.edgesep, reverse_sep);
                let prev_max = block.edge(&u_root, &v_root, None).copied().unwrap_or(0.0);
                block.set_edge_with_label(u_root, v_root, sep.max(prev_max));
            }
            prev = Some(v);
        }
    }
    block
}

/// Minimum distance between the centers of `v` and its left neighbour `w`.
fn separation(
    g: &LayoutGraph,
    v: &str,
    w: &str,
    nodesep: f64,
    edgesep: f64,
    reverse_sep: bool,
) -> f64 {
    let (Some(vl), Some(wl)) = (g.node(v), g.node(w)) else {
        return 0.0;
    };
    let signed = |delta: f64| if reverse_sep { delta } else { -delta };
    let gap = |dummy: bool| if dummy { edgesep } else { nodesep };

    let mut sum = vl.width / 2.0;
    sum += match vl.role.labelpos() {
        LabelPos::L => signed(-vl.width / 2.0),
        LabelPos::R => signed(vl.width / 2.0),
        LabelPos::C => 0.0,
    };
    sum += gap(vl.role.is_dummy()) / 2.0;
    sum += gap(wl.role.is_dummy()) / 2.0;
    sum += wl.width / 2.0;
    sum += match wl.role.labelpos() {
        LabelPos::L => signed(wl.width / 2.0),
        LabelPos::R => signed(-wl.width / 2.0),
        LabelPos::C => 0.0,
    };
    sum
}

fn width(g: &LayoutGraph, v: &str) -> f64 {
    g.node(v).map_or(0.0, |n| n.width)
}

/// Index into `xss` of the alignment with the narrowest extent, the first one on ties.
pub fn find_smallest_width_alignment(g: &LayoutGraph, xss: &[Xs]) -> usize {
    let mut best = 0;
    let mut best_width = f64::INFINITY;
    for (i, xs) in xss.iter().enumerate() {
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for (v, &x) in xs {
            let half = width(g, v) / 2.0;
            max = max.max(x + half);
            min = min.min(x - half);
        }
        let extent = max - min;
        if extent < best_width {
            best_width = extent;
            best = i;
        }
    }
    best
}

fn min_max(xs: &Xs) -> (f64, f64) {
    xs.values().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
        (lo.min(x), hi.max(x))
    })
}

/// Shifts every alignment onto `xss[align_to]`: left alignments share its minimum, right
/// alignments its maximum. `xss` is ordered like [`Align::ALL`].
pub fn align_coordinates(xss: &mut [Xs], align_to: usize) {
    let Some(target) = xss.get(align_to) else {
        return;
    };
    let (target_min, target_max) = min_max(target);

    for (i, xs) in xss.iter_mut().enumerate() {
        if i == align_to || xs.is_empty() {
            continue;
        }
        let (min, max) = min_max(xs);
        let leftward = matches!(Align::ALL.get(i), Some(Align::UL | Align::DL));
        let delta = if leftward {
            target_min - min
        } else {
            target_max - max
        };
        if delta != 0.0 {
            for x in xs.values_mut() {
                *x += delta;
            }
        }
    }
}

/// Final coordinates: the pinned alignment if any, otherwise the mean of the two middle
/// candidates of each node.
pub fn balance(xss: &[Xs], align: Option<Align>) -> Xs {
    let Some(first) = xss.first() else {
        return Xs::default();
    };
    first
        .keys()
        .map(|v| {
            let x = match align.and_then(|a| xss.get(a.index())) {
                Some(pinned) => pinned.get(v).copied().unwrap_or(0.0),
                None => {
                    let mut candidates: Vec<f64> =
                        xss.iter().filter_map(|xs| xs.get(v).copied()).collect();
                    candidates.sort_by(f64::total_cmp);
                    match candidates.len() {
                        0 => 0.0,
                        1 => candidates[0],
                        n => (candidates[(n - 1) / 2] + candidates[n / 2]) / 2.0,
                    }
                }
            };
            (v.clone(), x)
        })
        .collect()
}

/// x coordinate of every ranked node.
pub fn position_x(g: &LayoutGraph) -> Xs {
    let layering = util::build_layer_matrix(g);
    let mut conflicts = find_type1_conflicts(g, &layering);
    conflicts.extend(find_type2_conflicts(g, &layering));

    let mut xss: Vec<Xs> = Vec::with_capacity(Align::ALL.len());
    for align in Align::ALL {
        let downward = matches!(align, Align::UL | Align::UR);
        let rightward = matches!(align, Align::UR | Align::DR);

        let mut adjusted: Vec<Vec<String>> = if downward {
            layering.clone()
        } else {
            layering.iter().rev().cloned().collect()
        };
        if rightward {
            for layer in &mut adjusted {
                layer.reverse();
            }
        }

        let alignment = if downward {
            vertical_alignment(&adjusted, &conflicts, |v| g.predecessors(v))
        } else {
            vertical_alignment(&adjusted, &conflicts, |v| g.successors(v))
        };
        let mut xs = horizontal_compaction(g, &adjusted, &alignment, rightward);
        if rightward {
            for x in xs.values_mut() {
                *x = -*x;
            }
        }
        xss.push(xs);
    }

    let smallest = find_smallest_width_alignment(g, &xss);
    align_coordinates(&mut xss, smallest);
    balance(&xss, g.graph().align)
}
