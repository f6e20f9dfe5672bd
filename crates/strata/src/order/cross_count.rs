//! Weighted edge crossings of a layering.
//!
//! For each pair of adjacent layers, the edges are visited sorted by their north endpoint's
//! position (ties by south position). Every edge crosses exactly the already-visited edges whose
//! south endpoint lies further right, so a Fenwick tree over south positions answers each query
//! in `O(log n)` (Barth, Jünger, Mutzel, "Simple and Efficient Bilayer Cross Counting").

use crate::layout_graph::LayoutGraph;
use rustc_hash::FxHashMap as HashMap;

/// Sum over crossing edge pairs of the product of their weights.
pub fn cross_count(g: &LayoutGraph, layering: &[Vec<String>]) -> f64 {
    layering
        .windows(2)
        .map(|pair| two_layer_cross_count(g, &pair[0], &pair[1]))
        .sum()
}

fn two_layer_cross_count(g: &LayoutGraph, north: &[String], south: &[String]) -> f64 {
    let south_pos: HashMap<&str, usize> = south
        .iter()
        .enumerate()
        .map(|(i, v)| (v.as_str(), i))
        .collect();

    let mut entries: Vec<(usize, usize, f64)> = Vec::new();
    for (north_idx, v) in north.iter().enumerate() {
        let mut row: Vec<(usize, usize, f64)> = g
            .out_edges(v, None)
            .into_iter()
            .filter_map(|e| {
                let pos = *south_pos.get(e.w.as_str())?;
                let weight = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
                Some((north_idx, pos, weight))
            })
            .collect();
        row.sort_by_key(|&(_, pos, _)| pos);
        entries.extend(row);
    }

    let mut tree = Fenwick::new(south.len());
    let mut crossings = 0.0;
    for (_, pos, weight) in entries {
        let right_of = tree.total() - tree.prefix(pos + 1);
        crossings += weight * right_of;
        tree.add(pos, weight);
    }
    crossings
}

struct Fenwick {
    sums: Vec<f64>,
    total: f64,
}

impl Fenwick {
    fn new(len: usize) -> Self {
        Self {
            sums: vec![0.0; len + 1],
            total: 0.0,
        }
    }

    fn add(&mut self, idx: usize, value: f64) {
        self.total += value;
        let mut i = idx + 1;
        while i < self.sums.len() {
            self.sums[i] += value;
            i += i & i.wrapping_neg();
        }
    }

    /// Sum of the first `len` positions.
    fn prefix(&self, len: usize) -> f64 {
        let mut i = len.min(self.sums.len() - 1);
        let mut sum = 0.0;
        while i > 0 {
            sum += self.sums[i];
            i -= i & i.wrapping_neg();
        }
        sum
    }

    fn total(&self) -> f64 {
        self.total
    }
}
