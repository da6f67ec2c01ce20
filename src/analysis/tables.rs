//! Denormalized join tables for the serving layer

use super::communities::{member_rows, CommunitySet};
use super::risk::EntityClaims;
use crate::external::{ExternalSignals, FraudRule};
use crate::model::{
    ClaimId, CommunityMemberRow, Entity, EntityClaimRow, EntityCommunityRow, EntityConnectionRow, EntityId,
    EntityRuleRow,
};
use crate::network::CoOccurrenceGraph;
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::debug;

/// Relationship tables derived from one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinTables {
    pub entity_communities: Vec<EntityCommunityRow>,
    pub community_members: Vec<CommunityMemberRow>,
    pub connections: Vec<EntityConnectionRow>,
    pub claims: Vec<EntityClaimRow>,
    pub rules: Vec<EntityRuleRow>,
}

impl JoinTables {
    pub fn build(
        entities: &[Entity],
        graph: &CoOccurrenceGraph,
        communities: &CommunitySet,
        claims: &EntityClaims,
        signals: &ExternalSignals,
    ) -> Self {
        let tables = Self {
            entity_communities: entity_community_rows(communities, graph),
            community_members: member_rows(communities, graph),
            connections: connection_rows(entities, graph, claims, signals),
            claims: claim_rows(entities, claims, signals),
            rules: rule_rows(entities, claims, signals),
        };

        debug!(
            entity_communities = tables.entity_communities.len(),
            community_members = tables.community_members.len(),
            connections = tables.connections.len(),
            claims = tables.claims.len(),
            rules = tables.rules.len(),
            "Built join tables"
        );
        tables
    }
}

fn entity_community_rows(communities: &CommunitySet, graph: &CoOccurrenceGraph) -> Vec<EntityCommunityRow> {
    communities
        .memberships
        .iter()
        .flat_map(|(entity, ids)| {
            let is_fraud = graph.node(entity).map_or(false, |n| n.is_fraud);
            ids.iter().map(move |&community_id| EntityCommunityRow {
                entity: entity.clone(),
                community_id,
                is_fraud,
            })
        })
        .collect()
}

/// One row per unordered adjacent pair, first seen from the earlier catalog entity
fn connection_rows(
    entities: &[Entity],
    graph: &CoOccurrenceGraph,
    claims: &EntityClaims,
    signals: &ExternalSignals,
) -> Vec<EntityConnectionRow> {
    let mut seen: HashSet<(&EntityId, &EntityId)> = HashSet::new();
    let mut rows = Vec::new();

    for entity in entities {
        for (neighbor, weight) in graph.neighbors(&entity.id) {
            if neighbor.id == entity.id {
                continue;
            }
            let pair = if entity.id <= neighbor.id {
                (&entity.id, &neighbor.id)
            } else {
                (&neighbor.id, &entity.id)
            };
            if !seen.insert(pair) {
                continue;
            }

            let mut shared: Vec<ClaimId> = claims
                .claims_of(&entity.id)
                .filter(|c| claims.has_claim(&neighbor.id, c))
                .cloned()
                .collect();
            shared.sort();

            let max_shared_claim_score = shared
                .iter()
                .filter_map(|c| signals.score(c))
                .fold(0.0, f64::max);

            rows.push(EntityConnectionRow {
                source: entity.id.clone(),
                target: neighbor.id.clone(),
                connection_strength: weight,
                shared_claims: shared,
                target_is_fraud: neighbor.is_fraud,
                max_shared_claim_score,
            });
        }
    }

    rows
}

fn claim_rows(entities: &[Entity], claims: &EntityClaims, signals: &ExternalSignals) -> Vec<EntityClaimRow> {
    let mut rows = Vec::new();
    for entity in entities {
        for claim in claims.claims_of(&entity.id) {
            rows.push(EntityClaimRow {
                entity: entity.id.clone(),
                claim: claim.clone(),
                external_score: signals.score(claim).unwrap_or(0.0),
                incurred: signals.financials_for(claim).map_or(0.0, |f| f.incurred),
                other_entities: claims
                    .entities_on(claim)
                    .filter(|other| **other != entity.id)
                    .cloned()
                    .collect(),
            });
        }
    }
    rows
}

/// Rules grouped by number in first-seen order; the first occurrence supplies
/// the description, priority and value
fn rule_rows(entities: &[Entity], claims: &EntityClaims, signals: &ExternalSignals) -> Vec<EntityRuleRow> {
    let mut rows = Vec::new();
    for entity in entities {
        let mut grouped: IndexMap<u32, (&FraudRule, Vec<ClaimId>)> = IndexMap::new();
        for claim in claims.claims_of(&entity.id) {
            for rule in signals.rules_for(claim) {
                let (_, rule_claims) = grouped.entry(rule.rule_no).or_insert_with(|| (rule, Vec::new()));
                if !rule_claims.contains(claim) {
                    rule_claims.push(claim.clone());
                }
            }
        }

        rows.extend(grouped.into_iter().map(|(rule_no, (rule, rule_claims))| EntityRuleRow {
            entity: entity.id.clone(),
            rule_no,
            description: rule.description.clone(),
            priority: rule.priority,
            value: rule.value,
            claims: rule_claims,
        }));
    }
    rows
}
