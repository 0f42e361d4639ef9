//! Degree and betweenness centrality on the unweighted topology.

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

use crate::graph::Network;

/// Per-node centrality scores keyed by node label.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Centrality {
    pub degree: BTreeMap<String, f64>,
    pub betweenness: BTreeMap<String, f64>,
}

impl Centrality {
    /// Node with the highest betweenness; ties go to the smallest label.
    pub fn most_between(&self) -> Option<(&str, f64)> {
        top(&self.betweenness)
    }

    /// Node with the highest degree centrality; ties go to the smallest label.
    pub fn most_connected(&self) -> Option<(&str, f64)> {
        top(&self.degree)
    }
}

fn top(scores: &BTreeMap<String, f64>) -> Option<(&str, f64)> {
    scores.iter().fold(None, |best, (name, &score)| match best {
        Some((_, b)) if b >= score => best,
        _ => Some((name.as_str(), score)),
    })
}

/// Compute degree and betweenness centrality.
///
/// Degree centrality is `(in + out) / (n - 1)` with a self-loop counted on
/// both sides; a single node scores `1.0`. Betweenness uses shortest paths
/// counted by hops and is normalized by `(n - 1)(n - 2)` for `n > 2`.
/// Edge weights are ignored.
pub fn compute_centrality(network: &Network) -> Centrality {
    let degree = degree_centrality(network);
    let betweenness = betweenness_centrality(network);

    let mut out = Centrality::default();
    for idx in network.graph.node_indices() {
        let name = network.graph[idx].clone();
        out.degree.insert(name.clone(), degree[idx.index()]);
        out.betweenness.insert(name, betweenness[idx.index()]);
    }
    out
}

fn degree_centrality(network: &Network) -> Vec<f64> {
    let g = &network.graph;
    let n = g.node_count();
    if n == 1 {
        return vec![1.0];
    }
    let scale = if n > 1 { 1.0 / (n - 1) as f64 } else { 0.0 };
    g.node_indices()
        .map(|idx| {
            let d = g.edges_directed(idx, Direction::Incoming).count()
                + g.edges_directed(idx, Direction::Outgoing).count();
            d as f64 * scale
        })
        .collect()
}

/// Brandes' algorithm with breadth-first search from every source.
fn betweenness_centrality(network: &Network) -> Vec<f64> {
    let g = &network.graph;
    let n = g.node_count();
    let mut scores = vec![0.0; n];

    let mut stack: Vec<usize> = Vec::with_capacity(n);
    let mut queue: VecDeque<usize> = VecDeque::with_capacity(n);
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0_f64; n];
    let mut dist: Vec<Option<usize>> = vec![None; n];
    let mut delta = vec![0.0_f64; n];

    for s in 0..n {
        stack.clear();
        queue.clear();
        preds.iter_mut().for_each(Vec::clear);
        sigma.fill(0.0);
        dist.fill(None);
        delta.fill(0.0);

        sigma[s] = 1.0;
        dist[s] = Some(0);
        queue.push_back(s);

        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let dv = dist[v].unwrap_or(0);
            for w in g.neighbors_directed(NodeIndex::new(v), Direction::Outgoing) {
                let w = w.index();
                if dist[w].is_none() {
                    dist[w] = Some(dv + 1);
                    queue.push_back(w);
                }
                if dist[w] == Some(dv + 1) {
                    sigma[w] += sigma[v];
                    preds[w].push(v);
                }
            }
        }

        while let Some(w) = stack.pop() {
            for &v in &preds[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != s {
                scores[w] += delta[w];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        scores.iter_mut().for_each(|c| *c *= scale);
    }
    scores
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::builder::NetworkBuilder;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn scores_are_bounded(pairs in prop::collection::vec((0u8..6, 0u8..6), 0..30)) {
            let mut builder = NetworkBuilder::new();
            for (a, b) in &pairs {
                builder.add_pair(format!("n{a}"), format!("n{b}"));
            }
            let network = builder.build();
            let c = compute_centrality(&network);

            prop_assert_eq!(c.degree.len(), network.node_count());
            prop_assert_eq!(c.betweenness.len(), network.node_count());
            for &b in c.betweenness.values() {
                prop_assert!((0.0..=1.0 + 1e-12).contains(&b));
            }
            for &d in c.degree.values() {
                prop_assert!(d >= 0.0 && d.is_finite());
            }
        }
    }
}
