//! Overlapping fraud-ring detection with k-clique percolation

use crate::config::{ConfigError, ConfigResult};
use crate::model::{CommunityMemberRow, CommunitySummary, EntityId, RiskLevel};
use crate::network::CoOccurrenceGraph;
use claimnet_graph_algorithms::k_clique_communities;
use indexmap::IndexMap;
use tracing::{debug, info};

/// Communities of one run.
///
/// Community ids are positions in `members`; they are only meaningful
/// within the run that produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommunitySet {
    pub k: usize,
    /// community id -> members in catalog order
    pub members: Vec<Vec<EntityId>>,
    /// entity -> ascending community ids; entities in no community are absent
    pub memberships: IndexMap<EntityId, Vec<usize>>,
}

impl CommunitySet {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn communities_of(&self, entity: &EntityId) -> &[usize] {
        self.memberships.get(entity).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CommunityDetector {
    k: usize,
}

impl CommunityDetector {
    pub fn new(k: usize) -> ConfigResult<Self> {
        if k < 2 {
            return Err(ConfigError::Invalid(format!("k_clique must be at least 2, got {}", k)));
        }
        Ok(Self { k })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn detect(&self, graph: &CoOccurrenceGraph) -> CommunitySet {
        info!(k = self.k, "Detecting overlapping communities");

        let view = graph.to_view();
        let result = k_clique_communities(&view, self.k);

        let members: Vec<Vec<EntityId>> = result
            .communities
            .iter()
            .map(|community| {
                community
                    .iter()
                    .filter_map(|&node| graph.node_at(node as usize).map(|n| n.id.clone()))
                    .collect()
            })
            .collect();

        let mut memberships: IndexMap<EntityId, Vec<usize>> = IndexMap::new();
        for node in graph.nodes() {
            if let Some(idx) = graph.index_of(&node.id) {
                if let Some(ids) = result.node_communities.get(&(idx as u64)) {
                    memberships.insert(node.id.clone(), ids.clone());
                }
            }
        }

        for (id, community) in members.iter().enumerate() {
            let fraud = community
                .iter()
                .filter(|m| graph.node(m).map_or(false, |n| n.is_fraud))
                .count();
            debug!(
                community = id,
                members = community.len(),
                fraud_ratio = fraud as f64 / community.len() as f64,
                "Community"
            );
        }
        info!(communities = members.len(), "Found overlapping communities");

        CommunitySet {
            k: self.k,
            members,
            memberships,
        }
    }
}

/// Member rows in community order
pub fn member_rows(communities: &CommunitySet, graph: &CoOccurrenceGraph) -> Vec<CommunityMemberRow> {
    communities
        .members
        .iter()
        .enumerate()
        .flat_map(|(community_id, members)| {
            members.iter().map(move |entity| CommunityMemberRow {
                community_id,
                entity: entity.clone(),
                is_fraud: graph.node(entity).map_or(false, |n| n.is_fraud),
            })
        })
        .collect()
}

/// Size and fraud share of each community
pub fn summarize(members: &[CommunityMemberRow]) -> Vec<CommunitySummary> {
    let mut grouped: IndexMap<usize, (usize, usize)> = IndexMap::new();
    for row in members {
        let entry = grouped.entry(row.community_id).or_insert((0, 0));
        entry.0 += 1;
        if row.is_fraud {
            entry.1 += 1;
        }
    }

    let mut summaries: Vec<CommunitySummary> = grouped
        .into_iter()
        .map(|(community_id, (total, fraud))| {
            let fraud_ratio = if total > 0 { fraud as f64 / total as f64 } else { 0.0 };
            CommunitySummary {
                community_id,
                total_members: total,
                fraud_count: fraud,
                fraud_ratio,
                risk_level: RiskLevel::from_fraud_ratio(fraud_ratio),
            }
        })
        .collect();
    summaries.sort_by_key(|s| s.community_id);
    summaries
}
