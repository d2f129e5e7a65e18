//! Sentence-similarity graph and weighted centrality ranking.
//!
//! Nodes are sentence indices; an undirected edge joins two sentences that
//! share at least one content word, weighted by the overlap normalised by the
//! log of both sentence lengths. Ranking is a personalised random walk: at
//! each step a node keeps `damping` of the mass flowing in along weighted
//! edges and receives the rest from the bias vector.

use std::collections::HashSet;

use crate::error::SummaryError;

pub const DAMPING: f64 = 0.85;
pub const MAX_ITERATIONS: usize = 100;
pub const TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub a: usize,
    pub b: usize,
    pub weight: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SentenceGraph {
    node_count: usize,
    edges: Vec<Edge>,
}

impl SentenceGraph {
    /// Build the graph from each sentence's set of content words.
    pub fn from_token_sets(sets: &[HashSet<String>]) -> Self {
        let mut edges = Vec::new();
        for a in 0..sets.len() {
            for b in (a + 1)..sets.len() {
                let weight = similarity(&sets[a], &sets[b]);
                if weight > 0.0 {
                    edges.push(Edge { a, b, weight });
                }
            }
        }
        SentenceGraph {
            node_count: sets.len(),
            edges,
        }
    }

    pub fn node_count(&self) -> usize {
        self.node_count
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Total edge weight incident to each node.
    fn strengths(&self) -> Vec<f64> {
        let mut out = vec![0.0; self.node_count];
        for e in &self.edges {
            out[e.a] += e.weight;
            out[e.b] += e.weight;
        }
        out
    }
}

/// Shared words over `ln(|a|) + ln(|b|)`, with lengths offset by one so
/// single-word sentences still get a positive denominator.
pub fn similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let shared = a.intersection(b).count();
    if shared == 0 {
        return 0.0;
    }
    let denom = ((a.len() + 1) as f64).ln() + ((b.len() + 1) as f64).ln();
    shared as f64 / denom
}

/// Iterate score propagation until the L1 change drops below [`TOLERANCE`]
/// or [`MAX_ITERATIONS`] is reached. `bias` is normalised internally; an
/// all-zero bias falls back to uniform. Nodes without edges hand their mass
/// to the bias vector.
pub fn rank(graph: &SentenceGraph, bias: &[f64]) -> Result<Vec<f64>, SummaryError> {
    let n = graph.node_count();
    if n == 0 {
        return Err(SummaryError::NoSentences);
    }

    let bias_total: f64 = bias.iter().take(n).sum();
    let teleport: Vec<f64> = if bias.len() >= n && bias_total > 0.0 {
        bias[..n].iter().map(|b| b / bias_total).collect()
    } else {
        vec![1.0 / n as f64; n]
    };

    let strength = graph.strengths();
    let mut scores = teleport.clone();

    for _ in 0..MAX_ITERATIONS {
        let dangling: f64 = (0..n)
            .filter(|&i| strength[i] == 0.0)
            .map(|i| scores[i])
            .sum();

        let mut next: Vec<f64> = teleport
            .iter()
            .map(|t| (1.0 - DAMPING) * t + DAMPING * dangling * t)
            .collect();
        for e in graph.edges() {
            next[e.b] += DAMPING * scores[e.a] * e.weight / strength[e.a];
            next[e.a] += DAMPING * scores[e.b] * e.weight / strength[e.b];
        }

        let delta: f64 = next.iter().zip(&scores).map(|(x, y)| (x - y).abs()).sum();
        scores = next;
        if delta < TOLERANCE {
            break;
        }
    }

    if scores.iter().all(|s| s.is_finite()) {
        Ok(scores)
    } else {
        Err(SummaryError::NonFiniteScores)
    }
}

/// Indices of the `k` best-scoring nodes, returned in ascending index order.
/// Equal scores prefer the earlier node.
pub fn top_k_in_order(scores: &[f64], k: usize) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]).then(a.cmp(&b)));
    order.truncate(k);
    order.sort_unstable();
    order
}
