//! Shared utilities for graph algorithms
//!
//! Provides a read-only, optimized view of an undirected weighted graph for algorithm execution.

use std::collections::HashMap;

/// Node Identifier type (u64)
pub type NodeId = u64;

/// A dense, integer-indexed view of an undirected graph using Compressed Sparse Row (CSR) format.
///
/// Every undirected edge is stored twice (once per endpoint), so `neighbors(i)`
/// is the full adjacency of `i`.
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Offsets into `targets`. Size = node_count + 1
    pub offsets: Vec<usize>,
    /// Contiguous array of neighbor node indices
    pub targets: Vec<usize>,

    /// Edge weights: aligned with `targets`
    pub weights: Option<Vec<f64>>,
}

impl GraphView {
    /// Get the degree of a node (by index)
    pub fn degree(&self, idx: usize) -> usize {
        self.offsets[idx + 1] - self.offsets[idx]
    }

    /// Get the neighbors of a node
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        let start = self.offsets[idx];
        let end = self.offsets[idx + 1];
        &self.targets[start..end]
    }

    /// Get weights for the edges of a node
    pub fn weights(&self, idx: usize) -> Option<&[f64]> {
        self.weights.as_ref().map(|w| {
            let start = self.offsets[idx];
            let end = self.offsets[idx + 1];
            &w[start..end]
        })
    }

    /// Iterate `(neighbor, weight)` pairs; unweighted views report 1.0
    pub fn weighted_neighbors(&self, idx: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let weights = self.weights(idx);
        self.neighbors(idx)
            .iter()
            .enumerate()
            .map(move |(i, &n)| (n, weights.map_or(1.0, |w| w[i])))
    }

    /// Whether `a` and `b` are adjacent
    pub fn has_edge(&self, a: usize, b: usize) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.targets.len() / 2
    }

    /// Build a view from a node list and undirected weighted edges.
    ///
    /// Edges referring to unknown nodes and self-loops are ignored. Neighbor
    /// lists are kept in ascending index order.
    pub fn from_edges(nodes: &[NodeId], edges: &[(NodeId, NodeId, f64)]) -> Self {
        let node_count = nodes.len();
        let index_to_node = nodes.to_vec();
        let node_to_index: HashMap<NodeId, usize> =
            nodes.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); node_count];
        for &(u, v, w) in edges {
            let (Some(&ui), Some(&vi)) = (node_to_index.get(&u), node_to_index.get(&v)) else {
                continue;
            };
            if ui == vi {
                continue;
            }
            adjacency[ui].push((vi, w));
            adjacency[vi].push((ui, w));
        }
        for row in &mut adjacency {
            row.sort_by_key(|&(n, _)| n);
        }

        Self::from_adjacency_list(index_to_node, node_to_index, adjacency)
    }

    /// Helper to create GraphView from weighted adjacency lists
    pub fn from_adjacency_list(
        index_to_node: Vec<NodeId>,
        node_to_index: HashMap<NodeId, usize>,
        adjacency: Vec<Vec<(usize, f64)>>,
    ) -> Self {
        let node_count = index_to_node.len();
        let mut offsets = Vec::with_capacity(node_count + 1);
        let mut targets = Vec::new();
        let mut weights = Vec::new();

        offsets.push(0);
        for row in adjacency {
            for (n, w) in row {
                targets.push(n);
                weights.push(w);
            }
            offsets.push(targets.len());
        }

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            offsets,
            targets,
            weights: Some(weights),
        }
    }
}
