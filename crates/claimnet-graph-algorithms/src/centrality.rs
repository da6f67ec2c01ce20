//! Centrality algorithms
//!
//! Degree, weighted betweenness (Brandes over Dijkstra) and weighted
//! eigenvector centrality for undirected graphs.

use super::common::{GraphView, NodeId};
use super::community::component_indices;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use tracing::warn;

/// Degree Centrality
///
/// Fraction of the other nodes each node is adjacent to (`deg / (n - 1)`).
/// Edge weights are ignored. A single-node graph scores 0.
pub fn degree_centrality(view: &GraphView) -> HashMap<NodeId, f64> {
    let n = view.node_count;
    let normalizer = if n > 1 { (n - 1) as f64 } else { 0.0 };

    (0..n)
        .map(|i| {
            let score = if normalizer > 0.0 {
                view.degree(i) as f64 / normalizer
            } else {
                0.0
            };
            (view.index_to_node[i], score)
        })
        .collect()
}

/// State for the Dijkstra priority queue
#[derive(Copy, Clone, PartialEq)]
struct State {
    cost: f64,
    node_idx: usize,
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare costs reversed for min-heap; break ties on index for a stable pop order
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node_idx.cmp(&self.node_idx))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Betweenness Centrality (Brandes, weighted)
///
/// Edge weights are treated as distances. Dependencies are accumulated from
/// every source over the symmetric adjacency, so each unordered pair is seen
/// twice; with `normalized` the totals are scaled by `1 / ((n-1)(n-2))`,
/// otherwise halved. Graphs with fewer than three nodes score 0 when normalized.
pub fn betweenness_centrality(view: &GraphView, normalized: bool) -> HashMap<NodeId, f64> {
    let n = view.node_count;
    let mut centrality = vec![0.0f64; n];

    for s in 0..n {
        let mut stack: Vec<usize> = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut sigma = vec![0.0f64; n];
        let mut dist = vec![f64::INFINITY; n];
        let mut settled = vec![false; n];
        let mut heap = BinaryHeap::new();

        sigma[s] = 1.0;
        dist[s] = 0.0;
        heap.push(State { cost: 0.0, node_idx: s });

        // Forward pass: single-source shortest paths, counting path multiplicity
        while let Some(State { cost, node_idx: v }) = heap.pop() {
            if settled[v] || cost > dist[v] {
                continue;
            }
            settled[v] = true;
            stack.push(v);

            for (w, weight) in view.weighted_neighbors(v) {
                if weight < 0.0 || settled[w] {
                    continue;
                }
                let next_cost = cost + weight;
                if next_cost < dist[w] {
                    dist[w] = next_cost;
                    sigma[w] = sigma[v];
                    predecessors[w].clear();
                    predecessors[w].push(v);
                    heap.push(State { cost: next_cost, node_idx: w });
                } else if next_cost == dist[w] {
                    sigma[w] += sigma[v];
                    predecessors[w].push(v);
                }
            }
        }

        // Backward pass - accumulate dependencies
        let mut delta = vec![0.0f64; n];
        while let Some(w) = stack.pop() {
            for &v in &predecessors[w] {
                delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
            }
            if w != s {
                centrality[w] += delta[w];
            }
        }
    }

    let scale = if normalized {
        if n > 2 {
            1.0 / ((n - 1) * (n - 2)) as f64
        } else {
            0.0
        }
    } else {
        0.5
    };

    centrality
        .into_iter()
        .enumerate()
        .map(|(i, c)| (view.index_to_node[i], c * scale))
        .collect()
}

/// Eigenvector centrality configuration
#[derive(Debug, Clone)]
pub struct EigenvectorConfig {
    /// Iteration cap per connected component
    pub max_iterations: usize,
    /// Per-node tolerance; a component of size m converges when the L1 change is below m * tolerance
    pub tolerance: f64,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1.0e-6,
        }
    }
}

/// Result of eigenvector centrality
#[derive(Debug, Clone)]
pub struct EigenvectorResult {
    pub scores: HashMap<NodeId, f64>,
    /// Whether every component converged within the iteration cap
    pub converged: bool,
    /// Largest iteration count used by any component
    pub iterations: usize,
}

/// Eigenvector Centrality (weighted power iteration)
///
/// Power iteration is undefined across disconnected pieces, so each connected
/// component is solved on its own with `x <- (A + I) x` and L2 normalization.
/// A component of size m is then scaled by `sqrt(m / n)`, which keeps the
/// global vector at unit norm. Single-node components score 0. A component
/// that does not converge keeps its last iterate and is reported through
/// `converged`.
pub fn eigenvector_centrality(view: &GraphView, config: &EigenvectorConfig) -> EigenvectorResult {
    let n = view.node_count;
    let mut scores = HashMap::with_capacity(n);
    let mut converged = true;
    let mut iterations = 0;

    for component in component_indices(view) {
        if component.len() == 1 {
            scores.insert(view.index_to_node[component[0]], 0.0);
            continue;
        }

        let m = component.len();
        let local: HashMap<usize, usize> =
            component.iter().enumerate().map(|(li, &gi)| (gi, li)).collect();

        let mut x = vec![1.0 / m as f64; m];
        let mut component_converged = false;
        let mut used = 0;

        for iter in 0..config.max_iterations {
            used = iter + 1;
            let last = x.clone();

            for (li, &gi) in component.iter().enumerate() {
                for (nbr, weight) in view.weighted_neighbors(gi) {
                    x[local[&nbr]] += last[li] * weight;
                }
            }

            let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for v in &mut x {
                    *v /= norm;
                }
            }

            let diff: f64 = x.iter().zip(last.iter()).map(|(a, b)| (a - b).abs()).sum();
            if diff < m as f64 * config.tolerance {
                component_converged = true;
                break;
            }
        }

        if !component_converged {
            warn!(
                component_size = m,
                iterations = used,
                "eigenvector centrality did not converge; using last iterate"
            );
            converged = false;
        }
        iterations = iterations.max(used);

        let scale = (m as f64 / n as f64).sqrt();
        for (li, &gi) in component.iter().enumerate() {
            scores.insert(view.index_to_node[gi], x[li] * scale);
        }
    }

    EigenvectorResult {
        scores,
        converged,
        iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::test_support::unit_view;

    fn star() -> GraphView {
        // 0 is the hub of 4 leaves
        unit_view(5, &[(0, 1), (0, 2), (0, 3), (0, 4)])
    }

    #[test]
    fn test_degree_centrality_star() {
        let scores = degree_centrality(&star());
        assert!((scores[&0] - 1.0).abs() < 1e-12);
        assert!((scores[&1] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_degree_centrality_single_node() {
        let scores = degree_centrality(&unit_view(1, &[]));
        assert_eq!(scores[&0], 0.0);
    }

    #[test]
    fn test_betweenness_star_hub() {
        let scores = betweenness_centrality(&star(), true);
        // Hub lies on all C(4,2)=6 leaf pairs: 2*6 / (4*3) = 1.0
        assert!((scores[&0] - 1.0).abs() < 1e-12);
        assert_eq!(scores[&1], 0.0);
    }

    #[test]
    fn test_betweenness_path_middle() {
        let view = unit_view(3, &[(0, 1), (1, 2)]);
        let normalized = betweenness_centrality(&view, true);
        let raw = betweenness_centrality(&view, false);

        assert!((normalized[&1] - 1.0).abs() < 1e-12);
        assert!((raw[&1] - 1.0).abs() < 1e-12);
        assert_eq!(normalized[&0], 0.0);
    }

    #[test]
    fn test_betweenness_uses_weights_as_distance() {
        // 0-1 heavy (5), 0-2-1 light (1 + 1): shortest 0..1 path goes through 2
        let view = GraphView::from_edges(&[0, 1, 2], &[(0, 1, 5.0), (0, 2, 1.0), (2, 1, 1.0)]);
        let scores = betweenness_centrality(&view, true);

        assert!((scores[&2] - 1.0).abs() < 1e-12);
        assert_eq!(scores[&0], 0.0);
    }

    #[test]
    fn test_betweenness_splits_equal_paths() {
        // Square 0-1-3, 0-2-3: two shortest paths between 0 and 3
        let view = unit_view(4, &[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let scores = betweenness_centrality(&view, false);

        assert!((scores[&1] - 0.5).abs() < 1e-12);
        assert!((scores[&2] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_eigenvector_star_hub_highest() {
        let result = eigenvector_centrality(&star(), &EigenvectorConfig::default());

        assert!(result.converged);
        assert!(result.scores[&0] > result.scores[&1]);
        assert!((result.scores[&1] - result.scores[&4]).abs() < 1e-9);
    }

    #[test]
    fn test_eigenvector_disconnected_graph() {
        // Triangle 0-1-2, pair 3-4, isolated 5
        let view = unit_view(6, &[(0, 1), (0, 2), (1, 2), (3, 4)]);
        let result = eigenvector_centrality(&view, &EigenvectorConfig::default());

        assert_eq!(result.scores.len(), 6);
        assert_eq!(result.scores[&5], 0.0);
        assert!(result.scores.values().all(|s| s.is_finite() && *s >= 0.0));
        assert!((result.scores[&0] - result.scores[&1]).abs() < 1e-9);
        assert!((result.scores[&3] - result.scores[&4]).abs() < 1e-9);

        let norm: f64 = result.scores.values().map(|s| s * s).sum::<f64>().sqrt();
        // The isolated node carries its share of the norm as zero
        assert!((norm - (5.0f64 / 6.0).sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_eigenvector_edgeless_graph() {
        let result = eigenvector_centrality(&unit_view(3, &[]), &EigenvectorConfig::default());
        assert!(result.scores.values().all(|&s| s == 0.0));
        assert!(result.converged);
    }

    #[test]
    fn test_eigenvector_empty_graph() {
        let result = eigenvector_centrality(&unit_view(0, &[]), &EigenvectorConfig::default());
        assert!(result.scores.is_empty());
    }
}
