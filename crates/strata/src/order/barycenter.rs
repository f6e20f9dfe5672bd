use super::layer_graph::LayerGraph;

#[derive(Debug, Clone, PartialEq)]
pub struct BarycenterEntry {
    pub v: String,
    /// Weighted mean order of the node's in-neighbours; `None` when it has none.
    pub barycenter: Option<f64>,
    pub weight: Option<f64>,
}

pub fn barycenter(g: &LayerGraph, movable: &[String]) -> Vec<BarycenterEntry> {
    movable
        .iter()
        .map(|v| {
            let mut sum = 0.0;
            let mut weight = 0.0;
            for e in g.in_edges(v, None) {
                let w = g.edge_by_key(&e).map_or(0.0, |l| l.weight);
                let order = g.node(&e.v).and_then(|n| n.order).unwrap_or(0);
                sum += w * order as f64;
                weight += w;
            }
            if weight > 0.0 {
                BarycenterEntry {
                    v: v.clone(),
                    barycenter: Some(sum / weight),
                    weight: Some(weight),
                }
            } else {
                BarycenterEntry {
                    v: v.clone(),
                    barycenter: None,
                    weight: None,
                }
            }
        })
        .collect()
}
