//! ClaimNet
//!
//! Fraud-ring analysis over workers' compensation claim notes. Entities
//! (doctors, lawyers, businesses, claimants) named in the same note are
//! linked in a weighted co-occurrence network; the network is mined for
//! overlapping k-clique communities and centrality, and the result is
//! blended with per-claim fraud scores into a ranked investigation list.
//!
//! # Pipeline
//!
//! 1. [`extract`]: exact phrase matching of catalog names in note text
//! 2. [`network`]: weighted undirected co-occurrence graph
//! 3. [`analysis`]: k-clique communities, centrality, risk aggregation
//! 4. [`external`]: per-claim fraud scores, triggered rules, financials
//! 5. [`pipeline`]: orchestration and atomic publication of results
//!
//! The [`http`] module serves the published results together with the
//! append-only investigation status log from [`status`].

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod dataset;
pub mod error;
pub mod external;
pub mod extract;
pub mod http;
pub mod model;
pub mod network;
pub mod pipeline;
pub mod status;

// Re-export main types for convenience
pub use model::{
    ClaimId, CommunityMemberRow, CommunitySummary, Document, DocumentId, Entity, EntityCategory, EntityClaimRow,
    EntityCommunityRow, EntityConnectionRow, EntityDetail, EntityFamily, EntityId, EntityMention, EntityRuleRow,
    EntityScoreRecord, RiskLevel,
};

pub use dataset::{Dataset, DatasetError, DatasetResult, DatasetSource, Preset, SyntheticGenerator};

pub use extract::EntityMatcher;

pub use network::{CoOccurrenceGraph, GraphNode};

pub use analysis::{
    CentralityScorer, CentralityScores, CommunityDetector, CommunitySet, EntityClaims, Importance, JoinTables,
    RiskAggregator,
};

pub use external::{
    ExternalSignals, FraudRule, FileSignalSource, SignalError, SignalResult, SignalSource, SimulatedSignalSource,
};

pub use pipeline::{AnalysisPipeline, AnalysisResults, AnalysisSnapshot, PipelineError, PipelineResult, ResultStore};

pub use status::{InvestigationStatus, StatusEntry, StatusError, StatusLog, StatusResult};

pub use config::{AnalysisConfig, ClaimNetConfig, ConfigError, ConfigResult};

pub use error::{ClaimNetError, ClaimNetResult};

pub use http::{router, AppState, HttpServer};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(!ver.is_empty());
        assert_eq!(ver, "0.4.0");
    }
}
