//! File-level dependency graph.

use std::collections::BTreeMap;

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};

/// One resolved import edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub from: String,
    pub to: String,

    /// Line of the import statement (1-indexed).
    pub line: usize,
}

/// Directed graph of file → file import relationships.
///
/// Unresolved external-package imports are recorded per file but never
/// become edges.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, usize>,
    nodes: BTreeMap<String, NodeIndex>,
    external: BTreeMap<String, Vec<String>>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, file: &str) -> NodeIndex {
        if let Some(&index) = self.nodes.get(file) {
            return index;
        }
        let index = self.graph.add_node(file.to_string());
        self.nodes.insert(file.to_string(), index);
        index
    }

    pub fn add_file(&mut self, file: &str) {
        self.node(file);
    }

    /// Record `from` importing `to` at `line`.
    pub fn add_edge(&mut self, from: &str, to: &str, line: usize) {
        let from_node = self.node(from);
        let to_node = self.node(to);
        if !self.graph.contains_edge(from_node, to_node) {
            self.graph.add_edge(from_node, to_node, line);
        }
    }

    /// Record an import that resolved to no project file.
    pub fn add_external(&mut self, from: &str, module: &str) {
        self.external
            .entry(from.to_string())
            .or_default()
            .push(module.to_string());
    }

    /// Files that `file` imports, sorted.
    pub fn dependencies_of(&self, file: &str) -> Vec<String> {
        let Some(&node) = self.nodes.get(file) else {
            return Vec::new();
        };
        let mut out: Vec<String> = self
            .graph
            .neighbors_directed(node, petgraph::Direction::Outgoing)
            .map(|n| self.graph[n].clone())
            .collect();
        out.sort();
        out
    }

    /// Files that import `file`, sorted.
    pub fn dependents_of(&self, file: &str) -> Vec<String> {
        let Some(&node) = self.nodes.get(file) else {
            return Vec::new();
        };
        let mut out: Vec<String> = self
            .graph
            .neighbors_directed(node, petgraph::Direction::Incoming)
            .map(|n| self.graph[n].clone())
            .collect();
        out.sort();
        out
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.nodes.get(from), self.nodes.get(to)) {
            (Some(&f), Some(&t)) => self.graph.contains_edge(f, t),
            _ => false,
        }
    }

    /// External (unresolved) imports of a file, in record order.
    pub fn external_imports(&self, file: &str) -> &[String] {
        self.external.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn file_count(&self) -> usize {
        self.graph.node_count()
    }

    /// All edges as serializable records, sorted for stable output.
    pub fn edges(&self) -> Vec<DependencyEdge> {
        let mut edges: Vec<DependencyEdge> = self
            .graph
            .edge_indices()
            .filter_map(|e| {
                let (from, to) = self.graph.edge_endpoints(e)?;
                Some(DependencyEdge {
                    from: self.graph[from].clone(),
                    to: self.graph[to].clone(),
                    line: self.graph[e],
                })
            })
            .collect();
        edges.sort_by(|a, b| (&a.from, &a.to).cmp(&(&b.from, &b.to)));
        edges
    }

    /// Strongly connected components with more than one file (or a file
    /// importing itself), each sorted internally; cycles sorted by their
    /// first member.
    pub fn find_cycles(&self) -> Vec<Vec<String>> {
        let mut cycles: Vec<Vec<String>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1
                    || scc
                        .first()
                        .map(|&n| self.graph.contains_edge(n, n))
                        .unwrap_or(false)
            })
            .map(|scc| {
                let mut files: Vec<String> =
                    scc.into_iter().map(|n| self.graph[n].clone()).collect();
                files.sort();
                files
            })
            .collect();
        cycles.sort();
        cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependents_query() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("b.ts", "a.ts", 1);
        graph.add_edge("c.ts", "a.ts", 2);

        assert_eq!(graph.dependents_of("a.ts"), vec!["b.ts", "c.ts"]);
        assert_eq!(graph.dependencies_of("b.ts"), vec!["a.ts"]);
        assert!(graph.has_edge("b.ts", "a.ts"));
        assert!(!graph.has_edge("a.ts", "b.ts"));
    }

    #[test]
    fn duplicate_edges_collapse() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("a.ts", "b.ts", 1);
        graph.add_edge("a.ts", "b.ts", 7);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn cycle_detection() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("a.ts", "b.ts", 1);
        graph.add_edge("b.ts", "c.ts", 1);
        graph.add_edge("c.ts", "a.ts", 1);
        graph.add_edge("d.ts", "a.ts", 1);

        let cycles = graph.find_cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0], vec!["a.ts", "b.ts", "c.ts"]);
    }

    #[test]
    fn acyclic_graph_has_no_cycles() {
        let mut graph = DependencyGraph::new();
        graph.add_edge("a.ts", "b.ts", 1);
        graph.add_edge("b.ts", "c.ts", 1);
        assert!(graph.find_cycles().is_empty());
    }

    #[test]
    fn external_imports_recorded() {
        let mut graph = DependencyGraph::new();
        graph.add_file("a.ts");
        graph.add_external("a.ts", "express");
        assert_eq!(graph.external_imports("a.ts"), ["express"]);
        assert_eq!(graph.edge_count(), 0);
    }
}
