use crate::layout_graph::LayoutGraph;
use rustc_hash::FxHashSet as HashSet;

/// Initial layering: leaf nodes visited depth-first along successors, starting from the
/// lowest ranks, each appended to its rank's layer when first reached.
pub fn init_order(g: &LayoutGraph) -> Vec<Vec<String>> {
    let mut simple: Vec<(&str, i32)> = g
        .node_labels()
        .filter(|(v, _)| !g.has_children(v))
        .filter_map(|(v, n)| n.rank.map(|r| (v, r)))
        .collect();
    let Some(max_rank) = simple.iter().map(|&(_, r)| r).max() else {
        return Vec::new();
    };
    simple.sort_by_key(|&(_, r)| r);

    let mut layers: Vec<Vec<String>> = vec![Vec::new(); (max_rank.max(0) + 1) as usize];
    let mut visited: HashSet<&str> = HashSet::default();
    for (start, _) in simple {
        let mut stack = vec![start];
        while let Some(v) = stack.pop() {
            if !visited.insert(v) {
                continue;
            }
            if let Some(rank) = g.node(v).and_then(|n| n.rank) {
                if let Some(layer) = layers.get_mut(rank.max(0) as usize) {
                    layer.push(v.to_string());
                }
            }
            stack.extend(g.successors(v).into_iter().rev());
        }
    }
    layers
}
