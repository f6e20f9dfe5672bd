use super::barycenter::{BarycenterEntry, barycenter};
use super::layer_graph::{ConstraintGraph, LayerGraph};
use super::resolve_conflicts::{ConflictEntry, resolve_conflicts};
use super::sort::{SortResult, sort};
use rustc_hash::FxHashMap as HashMap;

/// Orders the children of `v` in the layer graph, recursing into nested subgraphs so each
/// subgraph stays a contiguous block framed by its left and right border nodes.
pub fn sort_subgraph(
    g: &LayerGraph,
    v: &str,
    cg: &ConstraintGraph,
    bias_right: bool,
) -> SortResult {
    let node = g.node(v);
    let bl = node.and_then(|n| n.border_left.clone());
    let br = node.and_then(|n| n.border_right.clone());

    let movable: Vec<String> = g
        .children(v)
        .into_iter()
        .filter(|w| Some(*w) != bl.as_deref() && Some(*w) != br.as_deref())
        .map(str::to_string)
        .collect();

    let mut barycenters = barycenter(g, &movable);
    let mut subgraphs: HashMap<String, SortResult> = HashMap::default();
    for entry in &mut barycenters {
        if !g.has_children(&entry.v) {
            continue;
        }
        let result = sort_subgraph(g, &entry.v, cg, bias_right);
        if result.barycenter.is_some() {
            merge_barycenters(entry, &result);
        }
        subgraphs.insert(entry.v.clone(), result);
    }

    let mut entries = resolve_conflicts(&barycenters, cg);
    expand_subgraphs(&mut entries, &subgraphs);

    let mut result = sort(entries, bias_right);

    if let (Some(bl), Some(br)) = (bl, br) {
        let mut vs = Vec::with_capacity(result.vs.len() + 2);
        vs.push(bl.clone());
        vs.append(&mut result.vs);
        vs.push(br.clone());
        result.vs = vs;

        let pred_order = |border: &str| {
            g.predecessors(border)
                .first()
                .and_then(|p| g.node(p))
                .and_then(|n| n.order)
        };
        if let (Some(bl_pred), Some(br_pred)) = (pred_order(&bl), pred_order(&br)) {
            let barycenter = result.barycenter.unwrap_or(0.0);
            let weight = result.weight.unwrap_or(0.0);
            result.barycenter =
                Some((barycenter * weight + bl_pred as f64 + br_pred as f64) / (weight + 2.0));
            result.weight = Some(weight + 2.0);
        }
    }

    result
}

fn expand_subgraphs(entries: &mut [ConflictEntry], subgraphs: &HashMap<String, SortResult>) {
    for entry in entries {
        entry.vs = entry
            .vs
            .iter()
            .flat_map(|v| match subgraphs.get(v) {
                Some(sub) => sub.vs.clone(),
                None => vec![v.clone()],
            })
            .collect();
    }
}

fn merge_barycenters(target: &mut BarycenterEntry, other: &SortResult) {
    let (Some(ob), Some(ow)) = (other.barycenter, other.weight) else {
        return;
    };
    match (target.barycenter, target.weight) {
        (Some(tb), Some(tw)) => {
            target.barycenter = Some((tb * tw + ob * ow) / (tw + ow));
            target.weight = Some(tw + ow);
        }
        _ => {
            target.barycenter = Some(ob);
            target.weight = Some(ow);
        }
    }
}
