//! Reconciles barycenter order with the constraint graph.
//!
//! Entries are visited in topological order of the constraints. When an entry's barycenter
//! would put it left of an entry that must precede it, the two are merged into one entry
//! (its node list concatenated, barycenters averaged by weight), so the constraint can no
//! longer be violated. Based on Forster, "A Fast and Simple Heuristic for Constrained
//! Two-Level Crossing Reduction".

use super::barycenter::BarycenterEntry;
use super::layer_graph::ConstraintGraph;
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct ConflictEntry {
    pub vs: Vec<String>,
    /// Smallest original index among the merged entries.
    pub i: usize,
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

struct Slot {
    entry: ConflictEntry,
    indegree: usize,
    ins: Vec<usize>,
    outs: Vec<usize>,
    merged: bool,
}

pub fn resolve_conflicts(entries: &[BarycenterEntry], cg: &ConstraintGraph) -> Vec<ConflictEntry> {
    let mut slots: Vec<Slot> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| Slot {
            entry: ConflictEntry {
                vs: vec![e.v.clone()],
                i,
                barycenter: e.barycenter,
                weight: e.weight,
            },
            indegree: 0,
            ins: Vec::new(),
            outs: Vec::new(),
            merged: false,
        })
        .collect();
    let index: HashMap<&str, usize> = entries
        .iter()
        .enumerate()
        .map(|(i, e)| (e.v.as_str(), i))
        .collect();

    for e in cg.edges() {
        let (Some(&v), Some(&w)) = (index.get(e.v.as_str()), index.get(e.w.as_str())) else {
            continue;
        };
        slots[w].indegree += 1;
        slots[v].outs.push(w);
    }

    let mut sources: Vec<usize> = (0..slots.len())
        .filter(|&i| slots[i].indegree == 0)
        .collect();
    let mut visited: Vec<usize> = Vec::new();

    while let Some(v) = sources.pop() {
        visited.push(v);

        let ins: Vec<usize> = slots[v].ins.iter().rev().copied().collect();
        for u in ins {
            if slots[u].merged {
                continue;
            }
            let (ub, vb) = (slots[u].entry.barycenter, slots[v].entry.barycenter);
            let violates = match (ub, vb) {
                (Some(ub), Some(vb)) => ub >= vb,
                _ => true,
            };
            if violates {
                merge_entries(&mut slots, v, u);
            }
        }

        let outs = slots[v].outs.clone();
        for w in outs {
            slots[w].ins.push(v);
            slots[w].indegree -= 1;
            if slots[w].indegree == 0 {
                sources.push(w);
            }
        }
    }

    visited
        .into_iter()
        .filter(|&i| !slots[i].merged)
        .map(|i| slots[i].entry.clone())
        .collect()
}

/// Folds `source` into `target`; `source`'s nodes go first.
fn merge_entries(slots: &mut [Slot], target: usize, source: usize) {
    let mut sum = 0.0;
    let mut weight = 0.0;
    for e in [&slots[target].entry, &slots[source].entry] {
        if let (Some(b), Some(w)) = (e.barycenter, e.weight) {
            if w != 0.0 {
                sum += b * w;
                weight += w;
            }
        }
    }

    let mut vs = slots[source].entry.vs.clone();
    vs.append(&mut slots[target].entry.vs);
    let source_i = slots[source].entry.i;

    let t = &mut slots[target].entry;
    t.vs = vs;
    t.i = t.i.min(source_i);
    if weight > 0.0 {
        t.barycenter = Some(sum / weight);
        t.weight = Some(weight);
    } else {
        t.barycenter = None;
        t.weight = None;
    }
    slots[source].merged = true;
}
