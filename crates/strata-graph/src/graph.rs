//! The [`Graph`] container.
//!
//! Nodes and edges live in insertion-ordered maps; every node keeps its incident edge keys so
//! neighbourhood queries cost O(degree) instead of a scan over all edges.

mod edge_key;
mod options;

pub use edge_key::EdgeKey;
pub use options::GraphOptions;

use indexmap::{Equivalent, IndexMap, IndexSet};
use rustc_hash::{FxBuildHasher, FxHashMap};
use std::fmt;
use std::sync::Arc;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// Borrowed lookup key. Hashes exactly like [`EdgeKey`] so maps can be probed without
/// allocating owned strings.
#[derive(Clone, Copy, Hash)]
struct EdgeKeyRef<'a> {
    v: &'a str,
    w: &'a str,
    name: Option<&'a str>,
}

impl Equivalent<EdgeKey> for EdgeKeyRef<'_> {
    fn equivalent(&self, key: &EdgeKey) -> bool {
        key.v == self.v && key.w == self.w && key.name.as_deref() == self.name
    }
}

#[derive(Debug, Clone)]
struct NodeEntry<N> {
    label: N,
    in_edges: Vec<EdgeKey>,
    out_edges: Vec<EdgeKey>,
}

impl<N> NodeEntry<N> {
    fn new(label: N) -> Self {
        Self {
            label,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        }
    }
}

pub struct Graph<N, E, G> {
    options: GraphOptions,
    label: G,
    default_node_label: Arc<dyn Fn() -> N + Send + Sync>,
    default_edge_label: Arc<dyn Fn() -> E + Send + Sync>,

    nodes: FxIndexMap<String, NodeEntry<N>>,
    edges: FxIndexMap<EdgeKey, E>,

    parent: FxHashMap<String, String>,
    children: FxHashMap<String, FxIndexSet<String>>,
}

impl<N: Clone, E: Clone, G: Clone> Clone for Graph<N, E, G> {
    fn clone(&self) -> Self {
        Self {
            options: self.options,
            label: self.label.clone(),
            default_node_label: Arc::clone(&self.default_node_label),
            default_edge_label: Arc::clone(&self.default_edge_label),
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            parent: self.parent.clone(),
            children: self.children.clone(),
        }
    }
}

impl<N: fmt::Debug, E: fmt::Debug, G: fmt::Debug> fmt::Debug for Graph<N, E, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("options", &self.options)
            .field("label", &self.label)
            .field(
                "nodes",
                &self
                    .nodes
                    .iter()
                    .map(|(id, n)| (id, &n.label))
                    .collect::<Vec<_>>(),
            )
            .field("edges", &self.edges)
            .field("parent", &self.parent)
            .finish()
    }
}

impl<N, E, G> Graph<N, E, G>
where
    N: Default + 'static,
    E: Default + 'static,
    G: Default,
{
    pub fn new(options: GraphOptions) -> Self {
        Self {
            options,
            label: G::default(),
            default_node_label: Arc::new(N::default),
            default_edge_label: Arc::new(E::default),
            nodes: FxIndexMap::default(),
            edges: FxIndexMap::default(),
            parent: FxHashMap::default(),
            children: FxHashMap::default(),
        }
    }
}

impl<N, E, G> Graph<N, E, G> {
    pub fn options(&self) -> GraphOptions {
        self.options
    }

    pub fn is_multigraph(&self) -> bool {
        self.options.multigraph
    }

    pub fn is_compound(&self) -> bool {
        self.options.compound
    }

    pub fn is_directed(&self) -> bool {
        self.options.directed
    }

    pub fn set_graph(&mut self, label: G) -> &mut Self {
        self.label = label;
        self
    }

    pub fn graph(&self) -> &G {
        &self.label
    }

    pub fn graph_mut(&mut self) -> &mut G {
        &mut self.label
    }

    pub fn set_default_node_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> N + Send + Sync + 'static,
    {
        self.default_node_label = Arc::new(f);
        self
    }

    pub fn set_default_edge_label<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn() -> E + Send + Sync + 'static,
    {
        self.default_edge_label = Arc::new(f);
        self
    }

    /// A new empty graph with the same options and default label factories.
    pub fn empty_like<N2, E2, G2>(&self, label: G2) -> Graph<N2, E2, G2>
    where
        N2: Default + 'static,
        E2: Default + 'static,
    {
        Graph {
            options: self.options,
            label,
            default_node_label: Arc::new(N2::default),
            default_edge_label: Arc::new(E2::default),
            nodes: FxIndexMap::default(),
            edges: FxIndexMap::default(),
            parent: FxHashMap::default(),
            children: FxHashMap::default(),
        }
    }

    // Nodes

    pub fn has_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Inserts `id` or replaces its label, keeping its position in the iteration order.
    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        match self.nodes.get_mut(&id) {
            Some(entry) => entry.label = label,
            None => {
                self.nodes.insert(id, NodeEntry::new(label));
            }
        }
        self
    }

    /// Inserts `id` with the default node label unless it already exists.
    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if !self.nodes.contains_key(&id) {
            let label = (self.default_node_label)();
            self.nodes.insert(id, NodeEntry::new(label));
        }
        self
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.nodes.get(id).map(|n| &n.label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.nodes.get_mut(id).map(|n| &mut n.label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.keys().map(String::as_str)
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.keys().cloned().collect()
    }

    pub fn node_labels(&self) -> impl Iterator<Item = (&str, &N)> + '_ {
        self.nodes.iter().map(|(id, n)| (id.as_str(), &n.label))
    }

    pub fn node_labels_mut(&mut self) -> impl Iterator<Item = (&str, &mut N)> + '_ {
        self.nodes
            .iter_mut()
            .map(|(id, n)| (id.as_str(), &mut n.label))
    }

    /// Removes `id`, its incident edges and its parent link. Children of `id` become roots.
    pub fn remove_node(&mut self, id: &str) -> Option<N> {
        let incident: Vec<EdgeKey> = {
            let entry = self.nodes.get(id)?;
            entry
                .in_edges
                .iter()
                .chain(entry.out_edges.iter())
                .cloned()
                .collect()
        };
        for key in &incident {
            self.remove_edge_key(key);
        }

        if self.options.compound {
            self.clear_parent(id);
            if let Some(children) = self.children.remove(id) {
                for child in children {
                    self.parent.remove(&child);
                }
            }
        }

        self.nodes.shift_remove(id).map(|n| n.label)
    }

    // Edges

    fn key_ref<'a>(&self, v: &'a str, w: &'a str, name: Option<&'a str>) -> EdgeKeyRef<'a> {
        let (v, w) = if self.options.directed || v <= w {
            (v, w)
        } else {
            (w, v)
        };
        let name = if self.options.multigraph { name } else { None };
        EdgeKeyRef { v, w, name }
    }

    fn canonical_key(&self, v: String, w: String, name: Option<String>) -> EdgeKey {
        let (v, w) = if self.options.directed || v <= w {
            (v, w)
        } else {
            (w, v)
        };
        let name = if self.options.multigraph { name } else { None };
        EdgeKey { v, w, name }
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> + '_ {
        self.edges.keys()
    }

    pub fn edge_keys(&self) -> Vec<EdgeKey> {
        self.edges.keys().cloned().collect()
    }

    pub fn edge_labels(&self) -> impl Iterator<Item = (&EdgeKey, &E)> + '_ {
        self.edges.iter()
    }

    pub fn edge_labels_mut(&mut self) -> impl Iterator<Item = (&EdgeKey, &mut E)> + '_ {
        self.edges.iter_mut()
    }

    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, None)
    }

    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        self.set_edge_named(v, w, None::<String>, Some(label))
    }

    /// Inserts or updates the edge `(v, w, name)`. Missing endpoints are created with the
    /// default node label. A `None` label keeps an existing label or uses the default one.
    pub fn set_edge_named(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        name: Option<impl Into<String>>,
        label: Option<E>,
    ) -> &mut Self {
        let key = self.canonical_key(v.into(), w.into(), name.map(Into::into));

        if let Some(existing) = self.edges.get_mut(&key) {
            if let Some(label) = label {
                *existing = label;
            }
            return self;
        }

        let label = label.unwrap_or_else(|| (self.default_edge_label)());
        for id in [&key.v, &key.w] {
            if !self.nodes.contains_key(id.as_str()) {
                let label = (self.default_node_label)();
                self.nodes.insert(id.clone(), NodeEntry::new(label));
            }
        }
        if let Some(entry) = self.nodes.get_mut(key.v.as_str()) {
            entry.out_edges.push(key.clone());
        }
        if let Some(entry) = self.nodes.get_mut(key.w.as_str()) {
            entry.in_edges.push(key.clone());
        }
        self.edges.insert(key, label);
        self
    }

    pub fn set_edge_key(&mut self, key: EdgeKey, label: E) -> &mut Self {
        self.set_edge_named(key.v, key.w, key.name, Some(label))
    }

    pub fn set_path(&mut self, nodes: &[&str]) -> &mut Self {
        for pair in nodes.windows(2) {
            self.set_edge(pair[0], pair[1]);
        }
        self
    }

    pub fn has_edge(&self, v: &str, w: &str, name: Option<&str>) -> bool {
        self.edges.contains_key(&self.key_ref(v, w, name))
    }

    pub fn edge(&self, v: &str, w: &str, name: Option<&str>) -> Option<&E> {
        self.edges.get(&self.key_ref(v, w, name))
    }

    pub fn edge_mut(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<&mut E> {
        let key = self.key_ref(v, w, name);
        self.edges.get_mut(&key)
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&E> {
        self.edge(&key.v, &key.w, key.name.as_deref())
    }

    pub fn edge_mut_by_key(&mut self, key: &EdgeKey) -> Option<&mut E> {
        let lookup = self.key_ref(&key.v, &key.w, key.name.as_deref());
        self.edges.get_mut(&lookup)
    }

    pub fn remove_edge(&mut self, v: &str, w: &str, name: Option<&str>) -> Option<E> {
        let lookup = self.key_ref(v, w, name);
        let (key, label) = self.edges.shift_remove_entry(&lookup)?;
        if let Some(entry) = self.nodes.get_mut(key.v.as_str()) {
            entry.out_edges.retain(|e| e != &key);
        }
        if let Some(entry) = self.nodes.get_mut(key.w.as_str()) {
            entry.in_edges.retain(|e| e != &key);
        }
        Some(label)
    }

    pub fn remove_edge_key(&mut self, key: &EdgeKey) -> Option<E> {
        self.remove_edge(&key.v, &key.w, key.name.as_deref())
    }

    /// Edges entering `v`, optionally restricted to those leaving `u`. Undirected graphs
    /// report every incident edge.
    pub fn in_edges(&self, v: &str, u: Option<&str>) -> Vec<EdgeKey> {
        if !self.options.directed {
            return self.node_edges(v, u);
        }
        let Some(entry) = self.nodes.get(v) else {
            return Vec::new();
        };
        entry
            .in_edges
            .iter()
            .filter(|e| u.is_none_or(|u| e.v == u))
            .cloned()
            .collect()
    }

    /// Edges leaving `v`, optionally restricted to those entering `w`. Undirected graphs
    /// report every incident edge.
    pub fn out_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        if !self.options.directed {
            return self.node_edges(v, w);
        }
        let Some(entry) = self.nodes.get(v) else {
            return Vec::new();
        };
        entry
            .out_edges
            .iter()
            .filter(|e| w.is_none_or(|w| e.w == w))
            .cloned()
            .collect()
    }

    /// Every edge incident on `v` (optionally only those shared with `w`), in-edges first.
    pub fn node_edges(&self, v: &str, w: Option<&str>) -> Vec<EdgeKey> {
        let Some(entry) = self.nodes.get(v) else {
            return Vec::new();
        };
        let ins = entry.in_edges.iter();
        let outs = entry.out_edges.iter().filter(|e| !e.is_self_loop());
        ins.chain(outs)
            .filter(|e| w.is_none_or(|w| e.other(v) == w))
            .cloned()
            .collect()
    }

    pub fn successors(&self, v: &str) -> Vec<&str> {
        if !self.options.directed {
            return self.neighbors(v);
        }
        let Some(entry) = self.nodes.get(v) else {
            return Vec::new();
        };
        let out: FxIndexSet<&str> = entry.out_edges.iter().map(|e| e.w.as_str()).collect();
        out.into_iter().collect()
    }

    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        if !self.options.directed {
            return self.neighbors(v);
        }
        let Some(entry) = self.nodes.get(v) else {
            return Vec::new();
        };
        let out: FxIndexSet<&str> = entry.in_edges.iter().map(|e| e.v.as_str()).collect();
        out.into_iter().collect()
    }

    /// Predecessors followed by successors, each node reported once.
    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        let Some(entry) = self.nodes.get(v) else {
            return Vec::new();
        };
        let out: FxIndexSet<&str> = entry
            .in_edges
            .iter()
            .chain(entry.out_edges.iter())
            .map(|e| e.other(v))
            .collect();
        out.into_iter().collect()
    }

    /// Nodes without in-edges.
    pub fn sources(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.in_edges.is_empty())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Nodes without out-edges.
    pub fn sinks(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.out_edges.is_empty())
            .map(|(id, _)| id.as_str())
            .collect()
    }

    // Compound

    /// Moves `child` under `parent`, creating both nodes if needed. No-op on non-compound
    /// graphs.
    pub fn set_parent(&mut self, child: impl Into<String>, parent: impl Into<String>) -> &mut Self {
        if !self.options.compound {
            return self;
        }
        let child = child.into();
        let parent = parent.into();
        self.ensure_node(child.clone());
        self.ensure_node(parent.clone());
        self.clear_parent(&child);
        self.children
            .entry(parent.clone())
            .or_default()
            .insert(child.clone());
        self.parent.insert(child, parent);
        self
    }

    pub fn clear_parent(&mut self, child: &str) -> &mut Self {
        if let Some(prev) = self.parent.remove(child) {
            if let Some(siblings) = self.children.get_mut(&prev) {
                siblings.shift_remove(child);
            }
        }
        self
    }

    pub fn parent(&self, child: &str) -> Option<&str> {
        self.parent.get(child).map(String::as_str)
    }

    pub fn children(&self, parent: &str) -> Vec<&str> {
        self.children
            .get(parent)
            .map(|c| c.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn has_children(&self, v: &str) -> bool {
        self.children.get(v).is_some_and(|c| !c.is_empty())
    }

    /// Top-level nodes (no parent), in insertion order.
    pub fn children_root(&self) -> Vec<&str> {
        self.nodes
            .keys()
            .filter(|id| !self.parent.contains_key(id.as_str()))
            .map(String::as_str)
            .collect()
    }
}
