//! Centrality-based importance scoring
//!
//! Degree, weighted betweenness and weighted eigenvector centrality are
//! combined with fixed weights and min-max scaled to a 0..=100 social
//! network score. A graph whose nodes all tie scores every node 50.

use crate::config::CentralityWeights;
use crate::model::EntityId;
use crate::network::CoOccurrenceGraph;
use claimnet_graph_algorithms::{
    betweenness_centrality, degree_centrality, eigenvector_centrality, EigenvectorConfig,
};
use indexmap::IndexMap;
use tracing::{info, warn};

/// Raw and scaled centrality of one node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentralityScores {
    pub degree: f64,
    pub betweenness: f64,
    pub eigenvector: f64,
    /// Weighted combination of the three measures
    pub combined: f64,
    /// `combined` min-max scaled to 0..=100
    pub social_score: f64,
}

/// Importance of every graph node, in catalog order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Importance {
    pub scores: IndexMap<EntityId, CentralityScores>,
    pub eigenvector_converged: bool,
}

impl Importance {
    /// Social network score; entities outside the graph score 0
    pub fn social_score(&self, entity: &EntityId) -> f64 {
        self.scores.get(entity).map_or(0.0, |s| s.social_score)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CentralityScorer {
    weights: CentralityWeights,
    eigenvector: EigenvectorConfig,
}

impl CentralityScorer {
    pub fn new(weights: CentralityWeights) -> Self {
        Self {
            weights,
            eigenvector: EigenvectorConfig::default(),
        }
    }

    pub fn with_eigenvector_config(mut self, config: EigenvectorConfig) -> Self {
        self.eigenvector = config;
        self
    }

    pub fn score(&self, graph: &CoOccurrenceGraph) -> Importance {
        info!(nodes = graph.node_count(), "Calculating node importance");

        if graph.is_empty() {
            return Importance {
                scores: IndexMap::new(),
                eigenvector_converged: true,
            };
        }

        let view = graph.to_view();
        let degree = degree_centrality(&view);
        let betweenness = betweenness_centrality(&view, true);
        let eigen = eigenvector_centrality(&view, &self.eigenvector);
        if !eigen.converged {
            warn!(
                iterations = eigen.iterations,
                "Eigenvector centrality hit the iteration cap"
            );
        }

        let w = &self.weights;
        let mut scores: IndexMap<EntityId, CentralityScores> = IndexMap::with_capacity(graph.node_count());
        for (idx, node) in graph.nodes().enumerate() {
            let id = idx as u64;
            let d = degree.get(&id).copied().unwrap_or(0.0);
            let b = betweenness.get(&id).copied().unwrap_or(0.0);
            let e = eigen.scores.get(&id).copied().unwrap_or(0.0);
            scores.insert(
                node.id.clone(),
                CentralityScores {
                    degree: d,
                    betweenness: b,
                    eigenvector: e,
                    combined: w.degree * d + w.betweenness * b + w.eigenvector * e,
                    social_score: 0.0,
                },
            );
        }

        let max = scores.values().map(|s| s.combined).fold(f64::NEG_INFINITY, f64::max);
        let min = scores.values().map(|s| s.combined).fold(f64::INFINITY, f64::min);
        for s in scores.values_mut() {
            s.social_score = if max > min {
                (s.combined - min) / (max - min) * 100.0
            } else {
                50.0
            };
        }

        info!(nodes = scores.len(), "Node importance calculated");
        Importance {
            scores,
            eigenvector_converged: eigen.converged,
        }
    }
}
