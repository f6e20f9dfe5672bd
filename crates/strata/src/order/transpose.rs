//! Adjacent-pair transposition.
//!
//! Swaps neighbouring nodes of a layer whenever that strictly lowers the weighted crossings
//! between their edges, looking at both adjacent layers. Only siblings are swapped, and border
//! nodes never move, so subgraphs stay contiguous.

use super::MAX_TRANSPOSE_PASSES;
use crate::layout_graph::LayoutGraph;
use rustc_hash::FxHashMap as HashMap;

pub fn transpose(g: &LayoutGraph, layering: &mut [Vec<String>]) {
    let mut pos: HashMap<String, usize> = HashMap::default();
    for layer in layering.iter() {
        for (i, v) in layer.iter().enumerate() {
            pos.insert(v.clone(), i);
        }
    }

    for _ in 0..MAX_TRANSPOSE_PASSES {
        let mut improved = false;
        for layer in layering.iter_mut() {
            for i in 1..layer.len() {
                let (u, v) = (&layer[i - 1], &layer[i]);
                if !swappable(g, u, v) {
                    continue;
                }
                let kept = pair_crossings(g, &pos, u, v);
                let swapped = pair_crossings(g, &pos, v, u);
                if swapped < kept {
                    pos.insert(v.clone(), i - 1);
                    pos.insert(u.clone(), i);
                    layer.swap(i - 1, i);
                    improved = true;
                }
            }
        }
        if !improved {
            break;
        }
    }
}

fn swappable(g: &LayoutGraph, u: &str, v: &str) -> bool {
    let is_border = |x: &str| g.node(x).is_some_and(|n| n.role.is_border());
    g.parent(u) == g.parent(v) && !is_border(u) && !is_border(v)
}

/// Weighted crossings between the edges of `left` and `right` when `left` sits first.
fn pair_crossings(g: &LayoutGraph, pos: &HashMap<String, usize>, left: &str, right: &str) -> f64 {
    let ends = |v: &str, incoming: bool| -> Vec<(usize, f64)> {
        let edges = if incoming {
            g.in_edges(v, None)
        } else {
            g.out_edges(v, None)
        };
        edges
            .iter()
            .filter_map(|e| {
                let other = e.other(v);
                let p = *pos.get(other)?;
                let weight = g.edge_by_key(e).map_or(0.0, |l| l.weight);
                Some((p, weight))
            })
            .collect()
    };

    let mut crossings = 0.0;
    for incoming in [true, false] {
        let left_ends = ends(left, incoming);
        let right_ends = ends(right, incoming);
        for &(lp, lw) in &left_ends {
            for &(rp, rw) in &right_ends {
                if lp > rp {
                    crossings += lw * rw;
                }
            }
        }
    }
    crossings
}
