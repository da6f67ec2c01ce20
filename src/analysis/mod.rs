//! Network analysis stages
//!
//! Community detection and centrality scoring over the co-occurrence graph,
//! then risk aggregation with the external signals and the join tables
//! served to investigators.

pub mod communities;
pub mod importance;
pub mod risk;
pub mod tables;

pub use communities::{CommunityDetector, CommunitySet};
pub use importance::{CentralityScorer, CentralityScores, Importance};
pub use risk::{EntityClaims, RiskAggregator};
pub use tables::JoinTables;
