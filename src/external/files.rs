//! File-backed signal tables
//!
//! Reads `external_fraud_scores`, `claim_fraud_rules` and `claim_financials`
//! from an input directory. Each table is looked up as `<name>.csv` first and
//! `<name>.json` second; both hold flat rows keyed by `claim_number`. A table
//! with neither file is replaced by the simulated table for that part only.

use super::signals::{
    ClaimFinancials, ExternalSignals, FraudRule, RulePriority, SignalError, SignalResult, SignalSource,
};
use super::simulate::SimulatedSignalSource;
use crate::dataset::Dataset;
use crate::model::{ClaimId, EntityMention};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const FRAUD_SCORES_TABLE: &str = "external_fraud_scores";
pub const FRAUD_RULES_TABLE: &str = "claim_fraud_rules";
pub const FINANCIALS_TABLE: &str = "claim_financials";

#[derive(Debug, Deserialize)]
struct ScoreRow {
    claim_number: ClaimId,
    external_fraud_score: f64,
}

#[derive(Debug, Deserialize)]
struct RuleRow {
    claim_number: ClaimId,
    rule_no: u32,
    rule_desc: String,
    priority: RulePriority,
    value: f64,
}

impl RuleRow {
    fn into_rule(self) -> (ClaimId, FraudRule) {
        let rule = FraudRule {
            rule_no: self.rule_no,
            description: self.rule_desc,
            priority: self.priority,
            value: self.value,
        };
        (self.claim_number, rule)
    }
}

#[derive(Debug, Deserialize)]
struct FinancialRow {
    claim_number: ClaimId,
    total_incurred: f64,
    reserve_amount: f64,
}

/// On-disk encoding of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableFormat {
    Csv,
    Json,
}

impl TableFormat {
    fn extension(&self) -> &'static str {
        match self {
            TableFormat::Csv => "csv",
            TableFormat::Json => "json",
        }
    }
}

/// Signal tables read from an input directory
#[derive(Debug, Clone)]
pub struct FileSignalSource {
    dir: PathBuf,
    fallback: SimulatedSignalSource,
}

impl FileSignalSource {
    pub fn new(dir: impl Into<PathBuf>, fallback_seed: u64) -> Self {
        Self {
            dir: dir.into(),
            fallback: SimulatedSignalSource::new(fallback_seed),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Rows of one table, or `None` when neither file exists
    fn read_rows<T: DeserializeOwned>(&self, table: &str) -> SignalResult<Option<Vec<T>>> {
        for format in [TableFormat::Csv, TableFormat::Json] {
            let file = format!("{}.{}", table, format.extension());
            let path = self.dir.join(&file);
            if !path.exists() {
                continue;
            }

            let reader = BufReader::new(File::open(&path)?);
            let rows: Vec<T> = match format {
                TableFormat::Csv => csv::Reader::from_reader(reader)
                    .deserialize()
                    .collect::<Result<Vec<T>, csv::Error>>()
                    .map_err(|source| SignalError::Csv { file, source })?,
                TableFormat::Json => {
                    serde_json::from_reader(reader).map_err(|source| SignalError::Json { file, source })?
                }
            };
            info!(file = %path.display(), rows = rows.len(), "Loaded signal table");
            return Ok(Some(rows));
        }

        warn!(dir = %self.dir.display(), table, "Signal table not found, using simulated data");
        Ok(None)
    }
}

impl SignalSource for FileSignalSource {
    fn load(&self, dataset: &Dataset, mentions: &[EntityMention]) -> SignalResult<ExternalSignals> {
        let scores = self.read_rows::<ScoreRow>(FRAUD_SCORES_TABLE)?;
        let rules = self.read_rows::<RuleRow>(FRAUD_RULES_TABLE)?;
        let financials = self.read_rows::<FinancialRow>(FINANCIALS_TABLE)?;

        let mut signals = if scores.is_none() || rules.is_none() || financials.is_none() {
            self.fallback.simulate(dataset, mentions)
        } else {
            ExternalSignals::default()
        };

        if let Some(rows) = scores {
            // Later rows for the same claim overwrite earlier ones
            signals.fraud_scores = rows
                .into_iter()
                .map(|r| (r.claim_number, r.external_fraud_score))
                .collect();
        }

        if let Some(rows) = rules {
            let mut by_claim: HashMap<ClaimId, Vec<FraudRule>> = HashMap::new();
            for (claim, rule) in rows.into_iter().map(RuleRow::into_rule) {
                by_claim.entry(claim).or_default().push(rule);
            }
            signals.rules = by_claim;
        }

        if let Some(rows) = financials {
            signals.financials = rows
                .into_iter()
                .map(|r| {
                    let amounts = ClaimFinancials {
                        incurred: r.total_incurred,
                        reserve: r.reserve_amount,
                    };
                    (r.claim_number, amounts)
                })
                .collect();
        }

        signals.sanitize()?;
        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn empty_dataset() -> Dataset {
        Dataset::default()
    }

    fn write_table(dir: &TempDir, table: &str, ext: &str, contents: &str) {
        fs::write(dir.path().join(format!("{}.{}", table, ext)), contents).unwrap();
    }

    #[test]
    fn test_reads_csv_tables() {
        let dir = TempDir::new().unwrap();
        write_table(
            &dir,
            FRAUD_SCORES_TABLE,
            "csv",
            "claim_number,external_fraud_score\nWC-1,0.8\nWC-2,1.7\n",
        );
        write_table(
            &dir,
            FRAUD_RULES_TABLE,
            "csv",
            "claim_number,rule_no,rule_desc,priority,value\n\
             WC-1,7,\"Employed elsewhere, per surveillance\",High,10\n\
             WC-1,75,Treatment mismatch,Low,4\n",
        );
        write_table(
            &dir,
            FINANCIALS_TABLE,
            "csv",
            "claim_number,total_incurred,reserve_amount\nWC-1,1200.5,300\n",
        );

        let signals = FileSignalSource::new(dir.path(), 1).load(&empty_dataset(), &[]).unwrap();

        assert_eq!(signals.score(&"WC-1".into()), Some(0.8));
        assert_eq!(signals.score(&"WC-2".into()), Some(1.0));
        let rules = signals.rules_for(&"WC-1".into());
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].description, "Employed elsewhere, per surveillance");
        assert_eq!(rules[1].priority, RulePriority::Low);
        assert_eq!(signals.financials_for(&"WC-1".into()).unwrap().exposure(), 1500.5);
    }

    #[test]
    fn test_reads_json_tables() {
        let dir = TempDir::new().unwrap();
        write_table(
            &dir,
            FRAUD_SCORES_TABLE,
            "json",
            r#"[{"claim_number": "WC-1", "external_fraud_score": 0.8}]"#,
        );
        write_table(
            &dir,
            FRAUD_RULES_TABLE,
            "json",
            r#"[{"claim_number": "WC-1", "rule_no": 7, "rule_desc": "Employed elsewhere", "priority": "High", "value": 10}]"#,
        );
        write_table(
            &dir,
            FINANCIALS_TABLE,
            "json",
            r#"[{"claim_number": "WC-1", "total_incurred": 1200.5, "reserve_amount": 300}]"#,
        );

        let signals = FileSignalSource::new(dir.path(), 1).load(&empty_dataset(), &[]).unwrap();

        assert_eq!(signals.score(&"WC-1".into()), Some(0.8));
        assert_eq!(signals.rules_for(&"WC-1".into())[0].rule_no, 7);
        assert_eq!(signals.financials_for(&"WC-1".into()).unwrap().exposure(), 1500.5);
    }

    #[test]
    fn test_csv_takes_precedence_over_json() {
        let dir = TempDir::new().unwrap();
        write_table(&dir, FRAUD_SCORES_TABLE, "csv", "claim_number,external_fraud_score\nWC-1,0.3\n");
        write_table(
            &dir,
            FRAUD_SCORES_TABLE,
            "json",
            r#"[{"claim_number": "WC-1", "external_fraud_score": 0.9}]"#,
        );

        let signals = FileSignalSource::new(dir.path(), 1).load(&empty_dataset(), &[]).unwrap();
        assert_eq!(signals.score(&"WC-1".into()), Some(0.3));
    }

    #[test]
    fn test_missing_tables_fall_back_to_simulation() {
        let dir = TempDir::new().unwrap();
        write_table(&dir, FRAUD_SCORES_TABLE, "csv", "claim_number,external_fraud_score\nN-1,0.25\n");

        let dataset = crate::dataset::workers_comp_fixture();
        let mentions = crate::extract::EntityMatcher::new(&dataset.entities).extract(&dataset.documents);
        let signals = FileSignalSource::new(dir.path(), 5).load(&dataset, &mentions).unwrap();

        assert_eq!(signals.fraud_scores.len(), 1);
        assert_eq!(signals.financials.len(), dataset.claims().len());
    }

    #[test]
    fn test_malformed_tables_are_errors() {
        let dir = TempDir::new().unwrap();
        write_table(&dir, FRAUD_SCORES_TABLE, "json", "{not json");
        let result = FileSignalSource::new(dir.path(), 1).load(&empty_dataset(), &[]);
        assert!(matches!(result, Err(SignalError::Json { .. })));

        write_table(&dir, FRAUD_SCORES_TABLE, "csv", "claim_number,external_fraud_score\nWC-1,high\n");
        let result = FileSignalSource::new(dir.path(), 1).load(&empty_dataset(), &[]);
        assert!(matches!(result, Err(SignalError::Csv { .. })));
    }
}
