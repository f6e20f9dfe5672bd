use crate::layout_graph::LayoutGraph;
use rustc_hash::FxHashMap as HashMap;
use strata_graph::EdgeKey;

/// Initial feasible ranking: sinks get rank 0 and every other node sits as low as its
/// out-edges allow, `min(rank(w) - minlen)`. Ranks come out non-positive; callers normalize.
pub fn longest_path(g: &mut LayoutGraph) {
    let mut ranks: HashMap<String, i32> = HashMap::default();

    let starts: Vec<String> = g
        .sources()
        .into_iter()
        .chain(g.nodes())
        .map(str::to_string)
        .collect();

    for start in starts {
        if ranks.contains_key(&start) {
            continue;
        }
        // (node, successors already pushed)
        let mut stack: Vec<(String, bool)> = vec![(start, false)];
        while let Some((v, expanded)) = stack.pop() {
            if expanded {
                let rank = g
                    .out_edges(&v, None)
                    .iter()
                    .map(|e| {
                        let minlen = g.edge_by_key(e).map_or(1, |l| l.minlen);
                        ranks.get(&e.w).copied().unwrap_or(0) - minlen
                    })
                    .min()
                    .unwrap_or(0);
                ranks.insert(v, rank);
                continue;
            }
            if ranks.contains_key(&v) {
                continue;
            }
            let pending: Vec<String> = g
                .successors(&v)
                .into_iter()
                .filter(|w| !ranks.contains_key(*w))
                .map(str::to_string)
                .collect();
            stack.push((v, true));
            stack.extend(pending.into_iter().rev().map(|w| (w, false)));
        }
    }

    for (v, rank) in ranks {
        if let Some(node) = g.node_mut(&v) {
            node.rank = Some(rank);
        }
    }
}

/// How much longer than its `minlen` the edge currently is.
pub fn slack(g: &LayoutGraph, e: &EdgeKey) -> i32 {
    let rank = |v: &str| g.node(v).and_then(|n| n.rank).unwrap_or(0);
    let minlen = g.edge_by_key(e).map_or(1, |l| l.minlen);
    rank(&e.w) - rank(&e.v) - minlen
}
