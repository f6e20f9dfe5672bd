//! Subgraph membership for the virtual nodes of long edges.
//!
//! A chain created by normalization starts out at the top level. Walking it rank by rank, each
//! virtual node is moved into the deepest subgraph on the path between the edge's endpoints
//! (up to their lowest common ancestor and back down) whose rank span covers it. This keeps
//! subgraphs contiguous when the ordering stage sees their members.

use crate::layout_graph::LayoutGraph;
use crate::normalize::DummyChain;
use rustc_hash::FxHashMap as HashMap;

#[derive(Debug, Clone, Copy)]
struct PostorderNum {
    low: usize,
    lim: usize,
}

pub fn parent_dummy_chains(g: &mut LayoutGraph, chains: &[DummyChain]) {
    let nums = postorder(g);

    for chain in chains {
        let edge = &chain.edge;
        let (path, lca) = find_path(g, &nums, &edge.v, &edge.w);
        let mut path_idx = 0;
        let mut ascending = true;
        let mut v = chain.start.clone();

        while v != edge.w {
            let Some(rank) = g.node(&v).and_then(|n| n.rank) else {
                break;
            };

            let mut path_v = path.get(path_idx).cloned().flatten();
            if ascending {
                while path_v != lca && max_rank(g, path_v.as_deref()).is_some_and(|m| m < rank) {
                    path_idx += 1;
                    path_v = path.get(path_idx).cloned().flatten();
                }
                if path_v == lca {
                    ascending = false;
                }
            }

            if !ascending {
                while path_idx + 1 < path.len() {
                    if !min_rank(g, path[path_idx + 1].as_deref()).is_some_and(|m| m <= rank) {
                        break;
                    }
                    path_idx += 1;
                }
                path_v = path.get(path_idx).cloned().flatten();
            }

            if let Some(parent) = path_v {
                g.set_parent(v.clone(), parent);
            }

            let Some(next) = g.successors(&v).first().map(|w| w.to_string()) else {
                break;
            };
            v = next;
        }
    }
}

fn max_rank(g: &LayoutGraph, v: Option<&str>) -> Option<i32> {
    v.and_then(|v| g.node(v)).and_then(|n| n.max_rank)
}

fn min_rank(g: &LayoutGraph, v: Option<&str>) -> Option<i32> {
    v.and_then(|v| g.node(v)).and_then(|n| n.min_rank)
}

/// Subgraph path from `v` up to the lowest common ancestor of `v` and `w`, then down to `w`.
/// `None` stands for the graph root.
fn find_path(
    g: &LayoutGraph,
    nums: &HashMap<String, PostorderNum>,
    v: &str,
    w: &str,
) -> (Vec<Option<String>>, Option<String>) {
    let num = |x: &str| nums.get(x).copied();
    let (Some(v_num), Some(w_num)) = (num(v), num(w)) else {
        return (vec![None], None);
    };
    let low = v_num.low.min(w_num.low);
    let lim = v_num.lim.max(w_num.lim);

    let mut v_path: Vec<Option<String>> = Vec::new();
    let mut parent = Some(v.to_string());
    loop {
        parent = parent.as_deref().and_then(|p| g.parent(p)).map(str::to_string);
        v_path.push(parent.clone());
        let Some(p) = parent.as_deref() else {
            break;
        };
        let covers = num(p).is_some_and(|n| n.low <= low && lim <= n.lim);
        if covers {
            break;
        }
    }
    let lca = parent;

    let mut w_path: Vec<Option<String>> = Vec::new();
    let mut parent = g.parent(w).map(str::to_string);
    while parent != lca {
        let Some(p) = parent else {
            break;
        };
        parent = g.parent(&p).map(str::to_string);
        w_path.push(Some(p));
    }

    v_path.extend(w_path.into_iter().rev());
    (v_path, lca)
}

/// Postorder numbering of the subgraph hierarchy.
fn postorder(g: &LayoutGraph) -> HashMap<String, PostorderNum> {
    let mut out: HashMap<String, PostorderNum> = HashMap::default();
    let mut lim = 0;

    fn visit<'a>(
        g: &'a LayoutGraph,
        v: &'a str,
        lim: &mut usize,
        out: &mut HashMap<String, PostorderNum>,
    ) {
        let low = *lim;
        for child in g.children(v) {
            visit(g, child, lim, out);
        }
        out.insert(v.to_string(), PostorderNum { low, lim: *lim });
        *lim += 1;
    }

    for v in g.children_root() {
        visit(g, v, &mut lim, &mut out);
    }
    out
}
