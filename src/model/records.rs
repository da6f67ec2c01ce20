//! Output records published by the analysis pipeline
//!
//! Field names on the wire follow the dashboard API (`entity_name`,
//! `community_id`, ...); internally every field is strongly typed.

use super::types::{ClaimId, EntityCategory, EntityFamily, EntityId};
use crate::external::RulePriority;
use serde::Serialize;

/// Final per-entity risk record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityScoreRecord {
    #[serde(rename = "entity_name")]
    pub entity: EntityId,
    #[serde(rename = "entity_type")]
    pub category: EntityCategory,
    #[serde(rename = "entity_family")]
    pub family: EntityFamily,
    /// Network importance, 0..=100
    pub social_network_score: f64,
    pub max_external_fraud_score: f64,
    pub avg_external_fraud_score: f64,
    /// `avg * ln(1 + connected_claims_count)`
    pub composite_external_score: f64,
    pub ensemble_score: f64,
    pub connected_claims_count: usize,
    pub total_exposure: f64,
    pub is_fraud: bool,
    /// 1 = highest ensemble score; unique across the table
    pub priority_rank: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityCommunityRow {
    #[serde(rename = "entity_name")]
    pub entity: EntityId,
    pub community_id: usize,
    pub is_fraud: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommunityMemberRow {
    pub community_id: usize,
    #[serde(rename = "entity_name")]
    pub entity: EntityId,
    pub is_fraud: bool,
}

/// One unordered entity pair that shares at least one document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityConnectionRow {
    #[serde(rename = "source_entity")]
    pub source: EntityId,
    #[serde(rename = "target_entity")]
    pub target: EntityId,
    /// Number of shared documents (edge weight)
    pub connection_strength: u32,
    #[serde(rename = "shared_claim_numbers")]
    pub shared_claims: Vec<ClaimId>,
    #[serde(rename = "target_is_confirmed_fraud")]
    pub target_is_fraud: bool,
    #[serde(rename = "max_shared_claim_fraud_score")]
    pub max_shared_claim_score: f64,
}

impl EntityConnectionRow {
    pub fn involves(&self, entity: &EntityId) -> bool {
        &self.source == entity || &self.target == entity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityClaimRow {
    #[serde(rename = "entity_name")]
    pub entity: EntityId,
    #[serde(rename = "claim_number")]
    pub claim: ClaimId,
    #[serde(rename = "external_fraud_score")]
    pub external_score: f64,
    #[serde(rename = "total_incurred")]
    pub incurred: f64,
    #[serde(rename = "other_entities_on_claim")]
    pub other_entities: Vec<EntityId>,
}

/// A fraud rule rolled up over every claim of one entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRuleRow {
    #[serde(rename = "entity_name")]
    pub entity: EntityId,
    pub rule_no: u32,
    #[serde(rename = "rule_desc")]
    pub description: String,
    pub priority: RulePriority,
    pub value: f64,
    #[serde(rename = "claim_numbers")]
    pub claims: Vec<ClaimId>,
}

/// Composite lookup result for a single entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityDetail {
    pub entity: EntityScoreRecord,
    pub communities: Vec<EntityCommunityRow>,
    pub connections: Vec<EntityConnectionRow>,
    pub claims: Vec<EntityClaimRow>,
    pub fraud_rules: Vec<EntityRuleRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    /// Bucket a community by the share of confirmed-fraud members
    pub fn from_fraud_ratio(ratio: f64) -> Self {
        if ratio > 0.4 {
            RiskLevel::High
        } else if ratio > 0.2 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunitySummary {
    pub community_id: usize,
    pub total_members: usize,
    pub fraud_count: usize,
    pub fraud_ratio: f64,
    pub risk_level: RiskLevel,
}
