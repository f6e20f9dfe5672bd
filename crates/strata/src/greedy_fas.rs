//! Greedy feedback arc set (Eades, Lin and Smyth).
//!
//! Repeatedly strips sinks and sources; when neither is left, removes the node with the
//! largest `out - in` weight and puts its remaining in-edges into the arc set. Parallel edges
//! are aggregated first and every edge of a selected pair is reported.

use rustc_hash::FxHashMap as HashMap;
use std::collections::VecDeque;
use strata_graph::{EdgeKey, Graph};

struct Entry {
    in_w: i64,
    out_w: i64,
    // Live neighbours; zero-weight edges still count here.
    in_deg: usize,
    out_deg: usize,
    alive: bool,
    // Bumped on every re-bucketing; queue slots with an older stamp are stale.
    stamp: u32,
}

struct State {
    entries: Vec<Entry>,
    ins: Vec<Vec<(usize, i64)>>,
    outs: Vec<Vec<(usize, i64)>>,
    buckets: Vec<VecDeque<(usize, u32)>>,
    zero_idx: i64,
    alive: usize,
}

impl State {
    fn assign_bucket(&mut self, v: usize) {
        let last = self.buckets.len() - 1;
        let entry = &mut self.entries[v];
        entry.stamp += 1;
        let idx = if entry.out_deg == 0 {
            0
        } else if entry.in_deg == 0 {
            last
        } else {
            (entry.out_w - entry.in_w + self.zero_idx).clamp(1, last as i64 - 1) as usize
        };
        self.buckets[idx].push_back((v, entry.stamp));
    }

    fn dequeue(&mut self, idx: usize) -> Option<usize> {
        while let Some((v, stamp)) = self.buckets[idx].pop_front() {
            let entry = &self.entries[v];
            if entry.alive && entry.stamp == stamp {
                return Some(v);
            }
        }
        None
    }

    fn remove_node(&mut self, v: usize, fas: Option<&mut Vec<(usize, usize)>>) {
        self.entries[v].alive = false;
        self.alive -= 1;
        let ins = std::mem::take(&mut self.ins[v]);
        let outs = std::mem::take(&mut self.outs[v]);

        let mut fas = fas;
        for &(u, weight) in &ins {
            if !self.entries[u].alive {
                continue;
            }
            if let Some(fas) = fas.as_deref_mut() {
                fas.push((u, v));
            }
            self.entries[u].out_w -= weight;
            self.entries[u].out_deg -= 1;
            self.assign_bucket(u);
        }
        for &(w, weight) in &outs {
            if !self.entries[w].alive {
                continue;
            }
            self.entries[w].in_w -= weight;
            self.entries[w].in_deg -= 1;
            self.assign_bucket(w);
        }
    }
}

/// Edges whose reversal makes `g` acyclic. `weight` maps an edge label to its (integral)
/// weight; fractional weights are rounded.
pub fn greedy_fas<N, E, G>(g: &Graph<N, E, G>, weight: impl Fn(&E) -> f64) -> Vec<EdgeKey> {
    if g.node_count() <= 1 {
        return Vec::new();
    }

    let ids: Vec<&str> = g.nodes().collect();
    let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, v)| (*v, i)).collect();

    let mut entries: Vec<Entry> = ids
        .iter()
        .map(|_| Entry {
            in_w: 0,
            out_w: 0,
            in_deg: 0,
            out_deg: 0,
            alive: true,
            stamp: 0,
        })
        .collect();

    let mut pair_weight: HashMap<(usize, usize), i64> = HashMap::default();
    let mut pairs: Vec<(usize, usize)> = Vec::new();
    let (mut max_in, mut max_out) = (0i64, 0i64);
    for (e, label) in g.edge_labels() {
        let (Some(&v), Some(&w)) = (index.get(e.v.as_str()), index.get(e.w.as_str())) else {
            continue;
        };
        let wt = weight(label).round().max(0.0) as i64;
        let slot = pair_weight.entry((v, w)).or_insert_with(|| {
            pairs.push((v, w));
            0
        });
        *slot += wt;
        entries[v].out_w += wt;
        entries[w].in_w += wt;
        max_out = max_out.max(entries[v].out_w);
        max_in = max_in.max(entries[w].in_w);
    }

    let mut ins: Vec<Vec<(usize, i64)>> = vec![Vec::new(); ids.len()];
    let mut outs: Vec<Vec<(usize, i64)>> = vec![Vec::new(); ids.len()];
    for &(v, w) in &pairs {
        let wt = pair_weight[&(v, w)];
        outs[v].push((w, wt));
        ins[w].push((v, wt));
        entries[v].out_deg += 1;
        entries[w].in_deg += 1;
    }

    let bucket_count = (max_out + max_in + 3) as usize;
    let mut state = State {
        entries,
        ins,
        outs,
        buckets: (0..bucket_count).map(|_| VecDeque::new()).collect(),
        zero_idx: max_in + 1,
        alive: ids.len(),
    };
    for v in 0..ids.len() {
        state.assign_bucket(v);
    }

    let sources = bucket_count - 1;
    let mut fas: Vec<(usize, usize)> = Vec::new();
    while state.alive > 0 {
        while let Some(v) = state.dequeue(0) {
            state.remove_node(v, None);
        }
        while let Some(v) = state.dequeue(sources) {
            state.remove_node(v, None);
        }
        for idx in (1..sources).rev() {
            if let Some(v) = state.dequeue(idx) {
                state.remove_node(v, Some(&mut fas));
                break;
            }
        }
    }

    fas.into_iter()
        .flat_map(|(u, v)| g.out_edges(ids[u], Some(ids[v])))
        .collect()
}
