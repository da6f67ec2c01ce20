//! Weighted co-occurrence graph construction

use crate::model::{DocumentId, Entity, EntityCategory, EntityId, EntityMention};
use claimnet_graph_algorithms::{GraphView, NodeId};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tracing::debug;

/// Node attributes carried from the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: EntityId,
    pub category: EntityCategory,
    pub is_fraud: bool,
}

/// Undirected, simple, weighted graph of mentioned entities.
///
/// Nodes are kept in catalog order. Edge keys are ordered pairs `(a, b)` with
/// `a < b`, so each unordered pair is stored once and never as a self-loop.
#[derive(Debug, Clone, Default)]
pub struct CoOccurrenceGraph {
    nodes: IndexMap<EntityId, GraphNode>,
    edges: BTreeMap<(EntityId, EntityId), u32>,
    /// node index -> (neighbor index, weight), ascending by neighbor index
    adjacency: Vec<Vec<(usize, u32)>>,
}

impl CoOccurrenceGraph {
    /// Build the graph from the catalog and the extracted mentions.
    ///
    /// Mentions of entities missing from the catalog are ignored.
    pub fn build(entities: &[Entity], mentions: &[EntityMention]) -> Self {
        let catalog: FxHashMap<&EntityId, &Entity> = entities.iter().map(|e| (&e.id, e)).collect();

        // Distinct entities per document, first-seen order
        let mut by_document: IndexMap<&DocumentId, IndexSet<&EntityId>> = IndexMap::new();
        for mention in mentions {
            if catalog.contains_key(&mention.entity) {
                by_document.entry(&mention.document).or_default().insert(&mention.entity);
            }
        }

        let mut edges: BTreeMap<(EntityId, EntityId), u32> = BTreeMap::new();
        for members in by_document.values() {
            if members.len() < 2 {
                continue;
            }
            let members: Vec<&EntityId> = members.iter().copied().collect();
            for (i, a) in members.iter().enumerate() {
                for b in &members[i + 1..] {
                    if a == b {
                        continue;
                    }
                    *edges.entry(Self::pair_key(a, b)).or_insert(0) += 1;
                }
            }
        }

        let mentioned: IndexSet<&EntityId> = by_document.values().flatten().copied().collect();
        let nodes: IndexMap<EntityId, GraphNode> = entities
            .iter()
            .filter(|e| mentioned.contains(&e.id))
            .map(|e| {
                (
                    e.id.clone(),
                    GraphNode {
                        id: e.id.clone(),
                        category: e.category,
                        is_fraud: e.is_fraud,
                    },
                )
            })
            .collect();

        let mut adjacency: Vec<Vec<(usize, u32)>> = vec![Vec::new(); nodes.len()];
        for ((a, b), &weight) in &edges {
            let (Some(ai), Some(bi)) = (nodes.get_index_of(a), nodes.get_index_of(b)) else {
                continue;
            };
            adjacency[ai].push((bi, weight));
            adjacency[bi].push((ai, weight));
        }
        for row in &mut adjacency {
            row.sort_unstable_by_key(|&(n, _)| n);
        }

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            documents = by_document.len(),
            "Built co-occurrence graph"
        );

        Self {
            nodes,
            edges,
            adjacency,
        }
    }

    fn pair_key(a: &EntityId, b: &EntityId) -> (EntityId, EntityId) {
        if a <= b {
            (a.clone(), b.clone())
        } else {
            (b.clone(), a.clone())
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in catalog order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    pub fn node(&self, id: &EntityId) -> Option<&GraphNode> {
        self.nodes.get(id)
    }

    /// Dense index of a node, matching its `GraphView` index
    pub fn index_of(&self, id: &EntityId) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    pub fn node_at(&self, index: usize) -> Option<&GraphNode> {
        self.nodes.get_index(index).map(|(_, node)| node)
    }

    /// Edges as `((a, b), weight)` with `a < b`
    pub fn edges(&self) -> impl Iterator<Item = (&(EntityId, EntityId), &u32)> {
        self.edges.iter()
    }

    /// Number of shared documents between two entities; 0 when not adjacent
    pub fn edge_weight(&self, a: &EntityId, b: &EntityId) -> u32 {
        if a == b {
            return 0;
        }
        self.edges.get(&Self::pair_key(a, b)).copied().unwrap_or(0)
    }

    /// Neighbors of `id` with edge weights, in catalog order
    pub fn neighbors(&self, id: &EntityId) -> Vec<(&GraphNode, u32)> {
        let Some(idx) = self.index_of(id) else {
            return Vec::new();
        };
        self.adjacency[idx]
            .iter()
            .filter_map(|&(n, w)| self.node_at(n).map(|node| (node, w)))
            .collect()
    }

    /// Symmetric CSR view for the graph algorithms; `NodeId` is the catalog-order index
    pub fn to_view(&self) -> GraphView {
        let index_to_node: Vec<NodeId> = (0..self.nodes.len() as NodeId).collect();
        let node_to_index = index_to_node.iter().map(|&id| (id, id as usize)).collect();
        let adjacency = self
            .adjacency
            .iter()
            .map(|row| row.iter().map(|&(n, w)| (n, w as f64)).collect())
            .collect();

        GraphView::from_adjacency_list(index_to_node, node_to_index, adjacency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClaimId;

    fn mention(doc: &str, claim: &str, entity: &str) -> EntityMention {
        EntityMention {
            document: DocumentId::from(doc),
            claim: ClaimId::from(claim),
            entity: EntityId::from(entity),
        }
    }

    fn catalog() -> Vec<Entity> {
        ["A", "B", "C", "D"]
            .iter()
            .map(|n| Entity::new(*n, EntityCategory::RegularPerson, *n == "B"))
            .collect()
    }

    #[test]
    fn test_shared_documents_accumulate_weight() {
        let mentions = vec![
            mention("N1", "C1", "A"),
            mention("N1", "C1", "B"),
            mention("N2", "C2", "B"),
            mention("N2", "C2", "A"),
            mention("N3", "C3", "A"),
        ];
        let graph = CoOccurrenceGraph::build(&catalog(), &mentions);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_weight(&"A".into(), &"B".into()), 2);
        assert_eq!(graph.edge_weight(&"B".into(), &"A".into()), 2);
        assert!(graph.node(&"B".into()).unwrap().is_fraud);
    }

    #[test]
    fn test_unmentioned_entities_are_absent() {
        let mentions = vec![mention("N1", "C1", "C"), mention("N1", "C1", "A")];
        let graph = CoOccurrenceGraph::build(&catalog(), &mentions);

        let ids: Vec<&str> = graph.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C"]);
        assert!(!graph.contains(&"D".into()));
    }

    #[test]
    fn test_no_self_loops_from_duplicate_mentions() {
        let mentions = vec![mention("N1", "C1", "A"), mention("N1", "C1", "A")];
        let graph = CoOccurrenceGraph::build(&catalog(), &mentions);

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.edge_weight(&"A".into(), &"A".into()), 0);
    }

    #[test]
    fn test_unknown_entities_are_ignored() {
        let mentions = vec![mention("N1", "C1", "A"), mention("N1", "C1", "Ghost")];
        let graph = CoOccurrenceGraph::build(&catalog(), &mentions);

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_neighbors_in_catalog_order() {
        let mentions = vec![
            mention("N1", "C1", "D"),
            mention("N1", "C1", "B"),
            mention("N1", "C1", "A"),
        ];
        let graph = CoOccurrenceGraph::build(&catalog(), &mentions);

        let ids: Vec<&str> = graph.neighbors(&"D".into()).iter().map(|(n, _)| n.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
    }

    #[test]
    fn test_view_is_symmetric_with_weights() {
        let mentions = vec![
            mention("N1", "C1", "A"),
            mention("N1", "C1", "B"),
            mention("N1", "C1", "C"),
            mention("N2", "C1", "B"),
            mention("N2", "C1", "C"),
        ];
        let graph = CoOccurrenceGraph::build(&catalog(), &mentions);
        let view = graph.to_view();

        assert_eq!(view.node_count, 3);
        assert_eq!(view.edge_count(), 3);
        let b = graph.index_of(&"B".into()).unwrap();
        let c = graph.index_of(&"C".into()).unwrap();
        let bc: Vec<(usize, f64)> = view.weighted_neighbors(b).filter(|&(n, _)| n == c).collect();
        assert_eq!(bc, vec![(c, 2.0)]);
    }

    #[test]
    fn test_empty_input() {
        let graph = CoOccurrenceGraph::build(&catalog(), &[]);
        assert!(graph.is_empty());
        assert_eq!(graph.to_view().node_count, 0);
    }
}
