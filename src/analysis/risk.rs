//! Ensemble risk scoring
//!
//! Fuses the social network score with the external fraud scores of each
//! entity's claims:
//!
//! ```text
//! composite = mean(claim scores) * ln(1 + claims)
//! ensemble  = w_network * social + w_external * composite * 100
//! ```
//!
//! Entities are then ranked by ensemble score, highest first; ties keep
//! catalog order.

use super::importance::Importance;
use crate::config::EnsembleWeights;
use crate::external::ExternalSignals;
use crate::model::{ClaimId, Entity, EntityId, EntityMention, EntityScoreRecord};
use indexmap::{IndexMap, IndexSet};
use tracing::info;

/// Claim links derived from mentions, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct EntityClaims {
    by_entity: IndexMap<EntityId, IndexSet<ClaimId>>,
    by_claim: IndexMap<ClaimId, IndexSet<EntityId>>,
}

impl EntityClaims {
    pub fn from_mentions(mentions: &[EntityMention]) -> Self {
        let mut links = Self::default();
        for m in mentions {
            links
                .by_entity
                .entry(m.entity.clone())
                .or_default()
                .insert(m.claim.clone());
            links
                .by_claim
                .entry(m.claim.clone())
                .or_default()
                .insert(m.entity.clone());
        }
        links
    }

    /// Distinct claims an entity is mentioned on
    pub fn claims_of(&self, entity: &EntityId) -> impl Iterator<Item = &ClaimId> {
        self.by_entity.get(entity).into_iter().flatten()
    }

    pub fn claim_count(&self, entity: &EntityId) -> usize {
        self.by_entity.get(entity).map_or(0, IndexSet::len)
    }

    pub fn has_claim(&self, entity: &EntityId, claim: &ClaimId) -> bool {
        self.by_entity.get(entity).map_or(false, |c| c.contains(claim))
    }

    /// Distinct entities mentioned on a claim
    pub fn entities_on(&self, claim: &ClaimId) -> impl Iterator<Item = &EntityId> {
        self.by_claim.get(claim).into_iter().flatten()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RiskAggregator {
    weights: EnsembleWeights,
}

impl RiskAggregator {
    pub fn new(weights: EnsembleWeights) -> Self {
        Self { weights }
    }

    pub fn ensemble_score(&self, social_score: f64, composite_external: f64) -> f64 {
        self.weights.network * social_score + self.weights.external * (composite_external * 100.0)
    }

    /// One ranked record per catalog entity
    pub fn aggregate(
        &self,
        entities: &[Entity],
        claims: &EntityClaims,
        importance: &Importance,
        signals: &ExternalSignals,
    ) -> Vec<EntityScoreRecord> {
        info!(entities = entities.len(), "Aggregating entity-level metrics");

        let mut records: Vec<EntityScoreRecord> = entities
            .iter()
            .map(|entity| self.score_entity(entity, claims, importance, signals))
            .collect();

        records.sort_by(|a, b| b.ensemble_score.total_cmp(&a.ensemble_score));
        for (i, record) in records.iter_mut().enumerate() {
            record.priority_rank = i + 1;
        }

        records
    }

    fn score_entity(
        &self,
        entity: &Entity,
        claims: &EntityClaims,
        importance: &Importance,
        signals: &ExternalSignals,
    ) -> EntityScoreRecord {
        let claim_count = claims.claim_count(&entity.id);

        // Claims without a score count toward the dampening but not the mean
        let scores: Vec<f64> = claims.claims_of(&entity.id).filter_map(|c| signals.score(c)).collect();
        let (max_score, avg_score) = if scores.is_empty() {
            (0.0, 0.0)
        } else {
            (
                scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                scores.iter().sum::<f64>() / scores.len() as f64,
            )
        };
        let composite = avg_score * (1.0 + claim_count as f64).ln();

        let total_exposure: f64 = claims
            .claims_of(&entity.id)
            .filter_map(|c| signals.financials_for(c))
            .map(|f| f.exposure())
            .sum();

        let social = importance.social_score(&entity.id);

        EntityScoreRecord {
            entity: entity.id.clone(),
            category: entity.category,
            family: entity.category.family(),
            social_network_score: social,
            max_external_fraud_score: max_score,
            avg_external_fraud_score: avg_score,
            composite_external_score: composite,
            ensemble_score: self.ensemble_score(social, composite),
            connected_claims_count: claim_count,
            total_exposure,
            is_fraud: entity.is_fraud,
            priority_rank: 0,
        }
    }
}
