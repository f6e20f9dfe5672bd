use super::layer_graph::{ConstraintGraph, LayerGraph};
use rustc_hash::FxHashMap as HashMap;

/// Records, for every pair of sibling subgraphs that ended up next to each other in `vs`, that
/// the left one must stay left of the right one on later ranks.
pub fn add_subgraph_constraints(g: &LayerGraph, cg: &mut ConstraintGraph, vs: &[String]) {
    let mut prev: HashMap<String, String> = HashMap::default();
    let mut root_prev: Option<String> = None;

    for v in vs {
        let mut child = g.parent(v).map(str::to_string);
        while let Some(c) = child {
            let parent = g.parent(&c).map(str::to_string);
            let prev_child = match &parent {
                Some(p) => prev.insert(p.clone(), c.clone()),
                None => root_prev.replace(c.clone()),
            };
            if let Some(pc) = prev_child {
                if pc != c {
                    cg.set_edge(pc, c);
                    break;
                }
            }
            child = parent;
        }
    }
}
