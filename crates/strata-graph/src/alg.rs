//! Traversal helpers over [`Graph`].

use crate::Graph;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Depth-first preorder from each root in turn, following successors (neighbours on undirected
/// graphs).
pub fn preorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Vec<String> {
    dfs(g, roots, false)
}

/// Depth-first postorder from each root in turn.
pub fn postorder<N, E, G>(g: &Graph<N, E, G>, roots: &[&str]) -> Vec<String> {
    dfs(g, roots, true)
}

fn dfs<N, E, G>(g: &Graph<N, E, G>, roots: &[&str], post: bool) -> Vec<String> {
    let mut visited: FxHashSet<&str> = FxHashSet::default();
    let mut out: Vec<String> = Vec::new();

    for &root in roots {
        if !g.has_node(root) || !visited.insert(root) {
            continue;
        }
        // (node, successors, next successor index)
        let mut stack: Vec<(&str, Vec<&str>, usize)> = vec![(root, g.successors(root), 0)];
        if !post {
            out.push(root.to_string());
        }
        while let Some((v, succs, next)) = stack.last_mut() {
            let v: &str = v;
            if let Some(&w) = succs.get(*next) {
                *next += 1;
                if visited.insert(w) {
                    if !post {
                        out.push(w.to_string());
                    }
                    stack.push((w, g.successors(w), 0));
                }
                continue;
            }
            if post {
                out.push(v.to_string());
            }
            stack.pop();
        }
    }
    out
}

/// Weakly connected components, each listed in discovery order.
pub fn components<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut out: Vec<Vec<String>> = Vec::new();

    for start in g.nodes() {
        if !seen.insert(start) {
            continue;
        }
        let mut component: Vec<String> = Vec::new();
        let mut queue: VecDeque<&str> = VecDeque::from([start]);
        while let Some(v) = queue.pop_front() {
            component.push(v.to_string());
            for w in g.neighbors(v) {
                if seen.insert(w) {
                    queue.push_back(w);
                }
            }
        }
        out.push(component);
    }
    out
}

/// Strongly connected components with more than one node, or with a self loop (Tarjan).
pub fn find_cycles<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>> {
    tarjan(g)
        .into_iter()
        .filter(|cmpt| cmpt.len() > 1 || !g.out_edges(&cmpt[0], Some(&cmpt[0])).is_empty())
        .collect()
}

pub fn is_acyclic<N, E, G>(g: &Graph<N, E, G>) -> bool {
    find_cycles(g).is_empty()
}

fn tarjan<N, E, G>(g: &Graph<N, E, G>) -> Vec<Vec<String>> {
    #[derive(Clone, Copy)]
    struct Entry {
        index: usize,
        low: usize,
        on_stack: bool,
    }

    fn visit<'a, N, E, G>(
        g: &'a Graph<N, E, G>,
        v: &'a str,
        next_index: &mut usize,
        visited: &mut FxHashMap<&'a str, Entry>,
        stack: &mut Vec<&'a str>,
        out: &mut Vec<Vec<String>>,
    ) {
        visited.insert(
            v,
            Entry {
                index: *next_index,
                low: *next_index,
                on_stack: true,
            },
        );
        *next_index += 1;
        stack.push(v);

        for w in g.successors(v) {
            match visited.get(w).copied() {
                None => {
                    visit(g, w, next_index, visited, stack, out);
                    let w_low = visited[w].low;
                    if let Some(entry) = visited.get_mut(v) {
                        entry.low = entry.low.min(w_low);
                    }
                }
                Some(w_entry) if w_entry.on_stack => {
                    if let Some(entry) = visited.get_mut(v) {
                        entry.low = entry.low.min(w_entry.index);
                    }
                }
                Some(_) => {}
            }
        }

        let entry = visited[v];
        if entry.low == entry.index {
            let mut cmpt: Vec<String> = Vec::new();
            while let Some(w) = stack.pop() {
                if let Some(e) = visited.get_mut(w) {
                    e.on_stack = false;
                }
                cmpt.push(w.to_string());
                if w == v {
                    break;
                }
            }
            out.push(cmpt);
        }
    }

    let mut next_index = 0usize;
    let mut visited: FxHashMap<&str, Entry> = FxHashMap::default();
    let mut stack: Vec<&str> = Vec::new();
    let mut out: Vec<Vec<String>> = Vec::new();
    for v in g.nodes() {
        if !visited.contains_key(v) {
            visit(g, v, &mut next_index, &mut visited, &mut stack, &mut out);
        }
    }
    out
}
