//! Core network data structure.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// A directed edge as seen from outside the network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeView<'a> {
    pub source: &'a str,
    pub target: &'a str,
    pub weight: f64,
}

/// An immutable directed weighted network.
///
/// Nodes are labelled and kept in insertion order. There is at most one edge
/// per ordered `(source, target)` pair; its weight is tracked but centrality
/// treats the topology as unweighted.
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub(crate) graph: DiGraph<String, f64>,
    pub(crate) index: HashMap<String, NodeIndex>,
}

impl Network {
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Node labels in insertion order.
    pub fn node_names(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(String::as_str)
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> {
        self.graph.edge_references().map(|e| EdgeView {
            source: self.graph[e.source()].as_str(),
            target: self.graph[e.target()].as_str(),
            weight: *e.weight(),
        })
    }

    /// Weight of the edge `source -> target`, if present.
    pub fn edge_weight(&self, source: &str, target: &str) -> Option<f64> {
        let a = *self.index.get(source)?;
        let b = *self.index.get(target)?;
        let edge = self.graph.find_edge(a, b)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Number of outgoing edges (not weights).
    pub fn out_degree(&self, name: &str) -> Option<usize> {
        self.degree(name, Direction::Outgoing)
    }

    /// Number of incoming edges (not weights).
    pub fn in_degree(&self, name: &str) -> Option<usize> {
        self.degree(name, Direction::Incoming)
    }

    fn degree(&self, name: &str, dir: Direction) -> Option<usize> {
        let idx = *self.index.get(name)?;
        Some(self.graph.edges_directed(idx, dir).count())
    }
}
