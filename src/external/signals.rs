//! External signal tables and the source trait

use crate::dataset::Dataset;
use crate::model::{ClaimId, EntityMention};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::io;
use thiserror::Error;
use tracing::warn;

/// External signal errors
#[derive(Error, Debug)]
pub enum SignalError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Malformed JSON table
    #[error("JSON error in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// Malformed CSV table
    #[error("CSV error in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid fraud score {score} for claim {claim}")]
    InvalidScore { claim: ClaimId, score: f64 },
}

pub type SignalResult<T> = Result<T, SignalError>;

/// Rule priority tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RulePriority {
    High,
    Medium,
    Low,
}

impl fmt::Display for RulePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RulePriority::High => "High",
            RulePriority::Medium => "Medium",
            RulePriority::Low => "Low",
        };
        f.write_str(s)
    }
}

/// A fraud rule triggered on a claim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudRule {
    pub rule_no: u32,
    #[serde(rename = "rule_desc")]
    pub description: String,
    pub priority: RulePriority,
    pub value: f64,
}

/// Incurred and reserve amounts of one claim
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClaimFinancials {
    #[serde(rename = "total_incurred")]
    pub incurred: f64,
    #[serde(rename = "reserve_amount")]
    pub reserve: f64,
}

impl ClaimFinancials {
    pub fn exposure(&self) -> f64 {
        self.incurred + self.reserve
    }
}

/// Per-claim external tables joined by the risk aggregator
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalSignals {
    pub fraud_scores: HashMap<ClaimId, f64>,
    pub rules: HashMap<ClaimId, Vec<FraudRule>>,
    pub financials: HashMap<ClaimId, ClaimFinancials>,
}

impl ExternalSignals {
    pub fn score(&self, claim: &ClaimId) -> Option<f64> {
        self.fraud_scores.get(claim).copied()
    }

    pub fn rules_for(&self, claim: &ClaimId) -> &[FraudRule] {
        self.rules.get(claim).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn financials_for(&self, claim: &ClaimId) -> Option<&ClaimFinancials> {
        self.financials.get(claim)
    }

    /// Clamp scores into [0, 1]; non-finite scores are rejected
    pub fn sanitize(&mut self) -> SignalResult<()> {
        for (claim, score) in self.fraud_scores.iter_mut() {
            if !score.is_finite() {
                return Err(SignalError::InvalidScore {
                    claim: claim.clone(),
                    score: *score,
                });
            }
            if !(0.0..=1.0).contains(&*score) {
                let clamped = score.clamp(0.0, 1.0);
                warn!(claim = %claim, score = *score, clamped, "External fraud score out of range; clamping");
                *score = clamped;
            }
        }
        Ok(())
    }
}

/// Supplier of external signals for one pipeline run
pub trait SignalSource: Send + Sync {
    fn load(&self, dataset: &Dataset, mentions: &[EntityMention]) -> SignalResult<ExternalSignals>;
}

impl<S: SignalSource + ?Sized> SignalSource for std::sync::Arc<S> {
    fn load(&self, dataset: &Dataset, mentions: &[EntityMention]) -> SignalResult<ExternalSignals> {
        (**self).load(dataset, mentions)
    }
}

/// Fixed tables, mostly for tests and embedding
impl SignalSource for ExternalSignals {
    fn load(&self, _dataset: &Dataset, _mentions: &[EntityMention]) -> SignalResult<ExternalSignals> {
        let mut signals = self.clone();
        signals.sanitize()?;
        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_clamps_out_of_range() {
        let mut signals = ExternalSignals::default();
        signals.fraud_scores.insert("C1".into(), 1.4);
        signals.fraud_scores.insert("C2".into(), -0.2);
        signals.fraud_scores.insert("C3".into(), 0.5);
        signals.sanitize().unwrap();

        assert_eq!(signals.score(&"C1".into()), Some(1.0));
        assert_eq!(signals.score(&"C2".into()), Some(0.0));
        assert_eq!(signals.score(&"C3".into()), Some(0.5));
    }

    #[test]
    fn test_sanitize_rejects_nan() {
        let mut signals = ExternalSignals::default();
        signals.fraud_scores.insert("C1".into(), f64::NAN);
        assert!(matches!(signals.sanitize(), Err(SignalError::InvalidScore { .. })));
    }

    #[test]
    fn test_missing_claim_defaults() {
        let signals = ExternalSignals::default();
        let claim = ClaimId::from("WC-404");

        assert_eq!(signals.score(&claim), None);
        assert!(signals.rules_for(&claim).is_empty());
        assert!(signals.financials_for(&claim).is_none());
    }

    #[test]
    fn test_rule_wire_format() {
        let rule: FraudRule = serde_json::from_str(
            r#"{"rule_no": 26, "rule_desc": "Duplicate billing", "priority": "Medium", "value": 6}"#,
        )
        .unwrap();
        assert_eq!(rule.priority, RulePriority::Medium);
        assert_eq!(rule.value, 6.0);
    }
}
