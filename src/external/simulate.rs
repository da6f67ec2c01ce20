//! Simulated external signals
//!
//! Claims that mention a ground-truth fraud entity draw high scores, several
//! rules and large amounts; the rest draw low scores and small amounts.

use super::signals::{ClaimFinancials, ExternalSignals, FraudRule, RulePriority, SignalResult, SignalSource};
use crate::dataset::Dataset;
use crate::model::{ClaimId, EntityId, EntityMention};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::debug;

/// Rules that can be triggered on a claim: (number, description, priority, value)
pub const RULE_CATALOG: &[(u32, &str, RulePriority, f64)] = &[
    (
        5,
        "Any law enforcement inquiry regarding the validity of any part of the claim",
        RulePriority::High,
        9.0,
    ),
    (
        7,
        "A surveillance or tip reveals the totally disabled worker is currently employed elsewhere",
        RulePriority::High,
        10.0,
    ),
    (
        10,
        "Any false statement, willfully made with the intent to deceive",
        RulePriority::High,
        8.0,
    ),
    (
        26,
        "Multiple providers billing for same service on same date",
        RulePriority::Medium,
        6.0,
    ),
    (
        37,
        "Claimant history shows pattern of similar claims across multiple employers",
        RulePriority::Medium,
        7.0,
    ),
    (
        75,
        "Medical treatment inconsistent with documented injury severity",
        RulePriority::Low,
        4.0,
    ),
];

/// Seeded simulator of the three external tables
#[derive(Debug, Clone)]
pub struct SimulatedSignalSource {
    seed: u64,
}

impl SimulatedSignalSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Claims in document order, each flagged when a fraud entity is mentioned on it
    fn flagged_claims(dataset: &Dataset, mentions: &[EntityMention]) -> Vec<(ClaimId, bool)> {
        let fraud: HashSet<&EntityId> = dataset
            .entities
            .iter()
            .filter(|e| e.is_fraud)
            .map(|e| &e.id)
            .collect();
        let fraud_claims: HashSet<&ClaimId> = mentions
            .iter()
            .filter(|m| fraud.contains(&m.entity))
            .map(|m| &m.claim)
            .collect();

        dataset
            .claims()
            .into_iter()
            .map(|claim| {
                let has_fraud = fraud_claims.contains(&claim);
                (claim, has_fraud)
            })
            .collect()
    }

    pub fn simulate(&self, dataset: &Dataset, mentions: &[EntityMention]) -> ExternalSignals {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let claims = Self::flagged_claims(dataset, mentions);
        let mut signals = ExternalSignals::default();

        for (claim, has_fraud) in &claims {
            let score = if *has_fraud {
                rng.gen_range(0.7..0.95)
            } else {
                rng.gen_range(0.1..0.5)
            };
            signals.fraud_scores.insert(claim.clone(), score);
        }

        for (claim, has_fraud) in &claims {
            let count = if *has_fraud {
                rng.gen_range(2..5)
            } else {
                rng.gen_range(0..2)
            };
            let rules: Vec<FraudRule> = RULE_CATALOG
                .choose_multiple(&mut rng, count.min(RULE_CATALOG.len()))
                .map(|&(rule_no, description, priority, value)| FraudRule {
                    rule_no,
                    description: description.to_string(),
                    priority,
                    value,
                })
                .collect();
            if !rules.is_empty() {
                signals.rules.insert(claim.clone(), rules);
            }
        }

        for (claim, has_fraud) in &claims {
            let (incurred, reserve) = if *has_fraud {
                (rng.gen_range(25_000..75_000), rng.gen_range(15_000..45_000))
            } else {
                (rng.gen_range(2_000..18_000), rng.gen_range(1_000..12_000))
            };
            signals.financials.insert(
                claim.clone(),
                ClaimFinancials {
                    incurred: incurred as f64,
                    reserve: reserve as f64,
                },
            );
        }

        debug!(
            claims = claims.len(),
            flagged = claims.iter().filter(|(_, f)| *f).count(),
            seed = self.seed,
            "Simulated external signals"
        );
        signals
    }
}

impl SignalSource for SimulatedSignalSource {
    fn load(&self, dataset: &Dataset, mentions: &[EntityMention]) -> SignalResult<ExternalSignals> {
        Ok(self.simulate(dataset, mentions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::workers_comp_fixture;
    use crate::extract::EntityMatcher;

    fn fixture_run() -> (Dataset, Vec<EntityMention>) {
        let dataset = workers_comp_fixture();
        let mentions = EntityMatcher::new(&dataset.entities).extract(&dataset.documents);
        (dataset, mentions)
    }

    #[test]
    fn test_every_claim_gets_score_and_financials() {
        let (dataset, mentions) = fixture_run();
        let signals = SimulatedSignalSource::new(42).simulate(&dataset, &mentions);

        for claim in dataset.claims() {
            let score = signals.score(&claim).unwrap();
            assert!((0.1..0.95).contains(&score));
            assert!(signals.financials_for(&claim).is_some());
        }
    }

    #[test]
    fn test_fraud_claims_score_high() {
        let (dataset, mentions) = fixture_run();
        let signals = SimulatedSignalSource::new(7).simulate(&dataset, &mentions);

        for (claim, has_fraud) in SimulatedSignalSource::flagged_claims(&dataset, &mentions) {
            let score = signals.score(&claim).unwrap();
            let rules = signals.rules_for(&claim).len();
            let amounts = signals.financials_for(&claim).unwrap();
            if has_fraud {
                assert!(score >= 0.7);
                assert!((2..=4).contains(&rules));
                assert!(amounts.incurred >= 25_000.0);
            } else {
                assert!(score < 0.5);
                assert!(rules <= 1);
                assert!(amounts.incurred < 18_000.0);
            }
        }
    }

    #[test]
    fn test_rules_on_one_claim_are_distinct() {
        let (dataset, mentions) = fixture_run();
        let signals = SimulatedSignalSource::new(3).simulate(&dataset, &mentions);

        for rules in signals.rules.values() {
            let numbers: HashSet<u32> = rules.iter().map(|r| r.rule_no).collect();
            assert_eq!(numbers.len(), rules.len());
        }
    }

    #[test]
    fn test_same_seed_same_tables() {
        let (dataset, mentions) = fixture_run();
        let a = SimulatedSignalSource::new(11).simulate(&dataset, &mentions);
        let b = SimulatedSignalSource::new(11).simulate(&dataset, &mentions);
        assert_eq!(a, b);
    }
}
