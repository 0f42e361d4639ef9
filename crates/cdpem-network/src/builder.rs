//! Incremental network builder.

use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

use crate::graph::Network;

/// Builder for constructing a network incrementally.
///
/// Use `add_node`, `add_edge` and `add_pair` to build up the network, then
/// call `build()` to freeze it into an immutable `Network`.
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    graph: DiGraph<String, f64>,
    index: HashMap<String, NodeIndex>,
}

impl NetworkBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node if it is not already present; returns its index.
    pub fn add_node(&mut self, name: impl Into<String>) -> NodeIndex {
        let name = name.into();
        if let Some(&idx) = self.index.get(&name) {
            return idx;
        }
        let idx = self.graph.add_node(name.clone());
        self.index.insert(name, idx);
        idx
    }

    /// Add `weight` to the edge `source -> target`, creating nodes and the
    /// edge as needed. Repeated pairs never create parallel edges.
    pub fn add_edge(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        weight: f64,
    ) -> &mut Self {
        let a = self.add_node(source);
        let b = self.add_node(target);
        match self.graph.find_edge(a, b) {
            Some(edge) => self.graph[edge] += weight,
            None => {
                self.graph.add_edge(a, b, weight);
            }
        }
        self
    }

    /// Record one observation of the pair; weights count observations.
    pub fn add_pair(&mut self, source: impl Into<String>, target: impl Into<String>) -> &mut Self {
        self.add_edge(source, target, 1.0)
    }

    /// Freeze into an immutable `Network`.
    pub fn build(self) -> Network {
        Network {
            graph: self.graph,
            index: self.index,
        }
    }
}

/// Illustrative four-link supply chain.
///
/// ```text
/// Farm -> Processor -> Distributor -> Retail -> Consumer
/// ```
pub fn synthetic_supply_chain() -> Network {
    let mut builder = NetworkBuilder::new();
    builder
        .add_edge("Farm", "Processor", 0.9)
        .add_edge("Processor", "Distributor", 0.8)
        .add_edge("Distributor", "Retail", 0.85)
        .add_edge("Retail", "Consumer", 0.95);
    builder.build()
}

/// Build from observed `(source, target)` pairs, or the synthetic supply
/// chain when no pairs are supplied.
pub fn build_network<S: AsRef<str>>(edges: Option<&[(S, S)]>) -> Network {
    match edges {
        None => synthetic_supply_chain(),
        Some(pairs) => {
            let mut builder = NetworkBuilder::new();
            for (source, target) in pairs {
                builder.add_pair(source.as_ref(), target.as_ref());
            }
            builder.build()
        }
    }
}
