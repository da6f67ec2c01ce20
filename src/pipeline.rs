//! Analysis pipeline
//!
//! One run goes: match entities in every note, build the co-occurrence
//! graph, detect communities, score centrality, load external signals,
//! aggregate risk and build the join tables. Runs always start from scratch.
//!
//! Finished runs are published through [`ResultStore`] as immutable
//! snapshots, so readers never see a partially rebuilt result set.

use crate::analysis::{
    communities::summarize, CentralityScorer, CommunityDetector, CommunitySet, EntityClaims, JoinTables,
    RiskAggregator,
};
use crate::config::{AnalysisConfig, ConfigError};
use crate::dataset::{Dataset, DatasetError, DatasetSource};
use crate::external::{SignalError, SignalSource};
use crate::extract::EntityMatcher;
use crate::model::{CommunityMemberRow, CommunitySummary, EntityDetail, EntityId, EntityScoreRecord};
use crate::network::CoOccurrenceGraph;
use chrono::{DateTime, Utc};
use claimnet_graph_algorithms::{connected_components, count_triangles, EigenvectorConfig};
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};

/// Pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("External signal error: {0}")]
    Signal(#[from] SignalError),

    /// The run could not be scheduled or panicked
    #[error("Pipeline task failed: {0}")]
    Task(String),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

/// Counts describing one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct RunStats {
    pub entities: usize,
    pub documents: usize,
    pub claims: usize,
    pub mentions: usize,
    pub graph_nodes: usize,
    pub graph_edges: usize,
    /// Connected components of the co-occurrence graph
    pub components: usize,
    pub triangles: usize,
    pub communities: usize,
}

/// Every table produced by one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisResults {
    /// Ranked entity table, best rank first
    pub entities: Vec<EntityScoreRecord>,
    pub tables: JoinTables,
    pub communities: CommunitySet,
    pub stats: RunStats,
}

impl AnalysisResults {
    pub fn entity(&self, id: &EntityId) -> Option<&EntityScoreRecord> {
        self.entities.iter().find(|r| &r.entity == id)
    }

    /// Full composite record of one entity, or `None` when it is not ranked
    pub fn entity_detail(&self, id: &EntityId) -> Option<EntityDetail> {
        let entity = self.entity(id)?.clone();

        Some(EntityDetail {
            entity,
            communities: self
                .tables
                .entity_communities
                .iter()
                .filter(|r| &r.entity == id)
                .cloned()
                .collect(),
            connections: self
                .tables
                .connections
                .iter()
                .filter(|r| r.involves(id) && r.source != r.target)
                .cloned()
                .collect(),
            claims: self.tables.claims.iter().filter(|r| &r.entity == id).cloned().collect(),
            fraud_rules: self.tables.rules.iter().filter(|r| &r.entity == id).cloned().collect(),
        })
    }

    pub fn community_summaries(&self) -> Vec<CommunitySummary> {
        summarize(&self.tables.community_members)
    }

    /// Members of the given communities, in community order
    pub fn community_members(&self, ids: &[usize]) -> Vec<CommunityMemberRow> {
        self.tables
            .community_members
            .iter()
            .filter(|r| ids.contains(&r.community_id))
            .cloned()
            .collect()
    }
}

/// Orchestrates one analysis run
#[derive(Debug, Clone)]
pub struct AnalysisPipeline {
    config: AnalysisConfig,
}

impl AnalysisPipeline {
    pub fn new(config: AnalysisConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Load the dataset from `source`, then run
    pub fn run_source(&self, source: &DatasetSource, signals: &dyn SignalSource) -> PipelineResult<AnalysisResults> {
        let dataset = source.load()?;
        self.run(&dataset, signals)
    }

    pub fn run(&self, dataset: &Dataset, signals: &dyn SignalSource) -> PipelineResult<AnalysisResults> {
        let start = Instant::now();
        info!(
            entities = dataset.entities.len(),
            documents = dataset.documents.len(),
            "Starting fraud network analysis"
        );
        dataset.validate()?;

        let matcher = EntityMatcher::new(&dataset.entities);
        let mentions = matcher.extract(&dataset.documents);
        info!(mentions = mentions.len(), "Extracted entity mentions");

        let graph = CoOccurrenceGraph::build(&dataset.entities, &mentions);
        let view = graph.to_view();
        let components = connected_components(&view).components.len();
        let triangles = count_triangles(&view);
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            components,
            triangles,
            "Built co-occurrence network"
        );

        let communities = CommunityDetector::new(self.config.k_clique)?.detect(&graph);

        let importance = CentralityScorer::new(self.config.centrality)
            .with_eigenvector_config(EigenvectorConfig {
                max_iterations: self.config.eigenvector_max_iterations,
                tolerance: self.config.eigenvector_tolerance,
            })
            .score(&graph);

        let external = signals.load(dataset, &mentions)?;
        info!(
            scores = external.fraud_scores.len(),
            rule_claims = external.rules.len(),
            financials = external.financials.len(),
            "Loaded external signals"
        );

        let claims = EntityClaims::from_mentions(&mentions);
        let entities =
            RiskAggregator::new(self.config.ensemble).aggregate(&dataset.entities, &claims, &importance, &external);
        let tables = JoinTables::build(&dataset.entities, &graph, &communities, &claims, &external);

        let stats = RunStats {
            entities: dataset.entities.len(),
            documents: dataset.documents.len(),
            claims: dataset.claims().len(),
            mentions: mentions.len(),
            graph_nodes: graph.node_count(),
            graph_edges: graph.edge_count(),
            components,
            triangles,
            communities: communities.len(),
        };

        info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            entities = stats.entities,
            communities = stats.communities,
            "Analysis complete"
        );

        Ok(AnalysisResults {
            entities,
            tables,
            communities,
            stats,
        })
    }
}

/// A published, immutable result set
#[derive(Debug)]
pub struct AnalysisSnapshot {
    pub version: u64,
    pub generated_at: DateTime<Utc>,
    pub results: AnalysisResults,
}

/// Holder of the latest completed run.
///
/// Readers clone the current `Arc`; a new run replaces it in one swap.
/// Runs are serialized and a failed run keeps the previous snapshot.
#[derive(Debug, Default)]
pub struct ResultStore {
    current: RwLock<Option<Arc<AnalysisSnapshot>>>,
    run_lock: Mutex<()>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Arc<AnalysisSnapshot>> {
        self.current.read().clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.read().is_some()
    }

    pub fn publish(&self, results: AnalysisResults) -> Arc<AnalysisSnapshot> {
        let _guard = self.run_lock.lock();
        self.swap(results)
    }

    /// Execute `run` while holding the run lock and publish its output
    pub fn refresh<F>(&self, run: F) -> PipelineResult<Arc<AnalysisSnapshot>>
    where
        F: FnOnce() -> PipelineResult<AnalysisResults>,
    {
        let _guard = self.run_lock.lock();
        match run() {
            Ok(results) => Ok(self.swap(results)),
            Err(e) => {
                warn!(error = %e, "Analysis run failed; keeping previous results");
                Err(e)
            }
        }
    }

    fn swap(&self, results: AnalysisResults) -> Arc<AnalysisSnapshot> {
        let version = self.current.read().as_ref().map_or(1, |s| s.version + 1);
        let snapshot = Arc::new(AnalysisSnapshot {
            version,
            generated_at: Utc::now(),
            results,
        });
        *self.current.write() = Some(snapshot.clone());
        info!(version, "Published analysis snapshot");
        snapshot
    }
}
