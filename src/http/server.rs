//! HTTP server and shared application state

use super::handler::{
    communities_handler, entities_handler, entity_handler, health_handler, not_found_handler, reload_handler,
    status_history_handler, update_status_handler,
};
use crate::config::ClaimNetConfig;
use crate::dataset::DatasetSource;
use crate::error::ClaimNetResult;
use crate::external::SignalSource;
use crate::pipeline::{AnalysisPipeline, AnalysisSnapshot, PipelineError, ResultStore};
use crate::model::EntityId;
use crate::status::{InvestigationStatus, StatusEntry, StatusLog};
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

struct Inner {
    pipeline: AnalysisPipeline,
    source: DatasetSource,
    signals: Arc<dyn SignalSource>,
    results: ResultStore,
    statuses: StatusLog,
}

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    pub fn new(
        pipeline: AnalysisPipeline,
        source: DatasetSource,
        signals: Arc<dyn SignalSource>,
        statuses: StatusLog,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                pipeline,
                source,
                signals,
                results: ResultStore::new(),
                statuses,
            }),
        }
    }

    pub fn from_config(config: &ClaimNetConfig) -> ClaimNetResult<Self> {
        let pipeline = AnalysisPipeline::new(config.analysis.clone())?;
        let statuses = match &config.status.log_path {
            Some(path) => StatusLog::open(path)?,
            None => StatusLog::in_memory(),
        };
        Ok(Self::new(
            pipeline,
            config.dataset_source()?,
            config.signal_source(),
            statuses,
        ))
    }

    pub fn results(&self) -> &ResultStore {
        &self.inner.results
    }

    pub fn statuses(&self) -> &StatusLog {
        &self.inner.statuses
    }

    /// Run the pipeline, publish the snapshot and seed default statuses
    pub fn reload(&self) -> ClaimNetResult<Arc<AnalysisSnapshot>> {
        let inner = &self.inner;
        let snapshot = inner
            .results
            .refresh(|| inner.pipeline.run_source(&inner.source, inner.signals.as_ref()))?;
        // Snapshot is already published; seeding failures are only logged
        if let Err(e) = inner
            .statuses
            .initialize_defaults(snapshot.results.entities.iter().map(|r| &r.entity))
        {
            warn!(version = snapshot.version, "Could not seed default investigation statuses: {}", e);
        }
        Ok(snapshot)
    }

    /// `reload` on the blocking thread pool
    pub async fn reload_in_background(&self) -> ClaimNetResult<Arc<AnalysisSnapshot>> {
        let state = self.clone();
        tokio::task::spawn_blocking(move || state.reload())
            .await
            .map_err(|e| PipelineError::Task(e.to_string()))?
    }

    /// Append a status change on the blocking thread pool
    pub async fn update_status(&self, entity: EntityId, status: InvestigationStatus) -> ClaimNetResult<StatusEntry> {
        let state = self.clone();
        let entry = tokio::task::spawn_blocking(move || state.statuses().append(&entity, status))
            .await
            .map_err(|e| PipelineError::Task(e.to_string()))??;
        Ok(entry)
    }
}

/// API routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/entities", get(entities_handler))
        .route("/api/entity/:name", get(entity_handler))
        .route("/api/entity/:name/status", put(update_status_handler))
        .route("/api/entity/:name/status-history", get(status_history_handler))
        .route("/api/communities", get(communities_handler))
        .route("/api/reload", post(reload_handler))
        .fallback(not_found_handler)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// HTTP server for the investigation API
pub struct HttpServer {
    state: AppState,
    addr: String,
}

impl HttpServer {
    pub fn new(state: AppState, addr: impl Into<String>) -> Self {
        Self {
            state,
            addr: addr.into(),
        }
    }

    /// Serve until the process is stopped
    pub async fn start(&self) -> std::io::Result<()> {
        let app = router(self.state.clone());
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;

        info!("ClaimNet API listening on http://{}", self.addr);

        axum::serve(listener, app).await
    }
}
