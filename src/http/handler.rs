//! HTTP handlers for the investigation API

use super::server::AppState;
use crate::error::ClaimNetError;
use crate::model::{
    CommunityMemberRow, EntityClaimRow, EntityCommunityRow, EntityConnectionRow, EntityId, EntityRuleRow,
    EntityScoreRecord,
};
use crate::pipeline::AnalysisSnapshot;
use crate::status::{InvestigationStatus, StatusError};
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

/// Handler errors, rendered as `{"success": false, "error": ...}`
#[derive(Debug)]
pub enum ApiError {
    NotLoaded,
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotLoaded => (StatusCode::SERVICE_UNAVAILABLE, "Data not initialized".to_string()),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::Internal(m) => (StatusCode::INTERNAL_SERVER_ERROR, m),
        };
        (status, Json(json!({ "success": false, "error": message }))).into_response()
    }
}

impl From<ClaimNetError> for ApiError {
    fn from(e: ClaimNetError) -> Self {
        error!("Request failed: {}", e);
        ApiError::Internal(e.to_string())
    }
}

impl From<StatusError> for ApiError {
    fn from(e: StatusError) -> Self {
        match e {
            StatusError::InvalidStatus(_) => ApiError::BadRequest(invalid_status_message()),
            other => ClaimNetError::from(other).into(),
        }
    }
}

fn invalid_status_message() -> String {
    let valid: Vec<&str> = InvestigationStatus::ALL.iter().map(|s| s.as_str()).collect();
    format!("Invalid status. Must be one of: {}", valid.join(", "))
}

fn snapshot(state: &AppState) -> Result<Arc<AnalysisSnapshot>, ApiError> {
    state.results().current().ok_or(ApiError::NotLoaded)
}

/// Ranked record joined with the current investigation status
#[derive(Debug, Serialize)]
pub struct EntityRow {
    #[serde(flatten)]
    pub record: EntityScoreRecord,
    pub investigation_status: InvestigationStatus,
}

#[derive(Debug, Serialize)]
pub struct EntityDetailView {
    pub entity: EntityRow,
    pub communities: Vec<EntityCommunityRow>,
    pub connections: Vec<EntityConnectionRow>,
    pub claims: Vec<EntityClaimRow>,
    pub fraud_rules: Vec<EntityRuleRow>,
    pub community_members: Vec<CommunityMemberRow>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EntityQuery {
    pub sort_by: Option<String>,
    pub filter_status: Option<String>,
    pub min_risk_score: Option<f64>,
    pub entity_type: Option<String>,
    pub entity_family: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: Option<String>,
}

const SORT_FIELDS: [&str; 3] = ["ensemble_score", "total_exposure", "connected_claims_count"];

fn sort_value(record: &EntityScoreRecord, field: &str) -> f64 {
    match field {
        "total_exposure" => record.total_exposure,
        "connected_claims_count" => record.connected_claims_count as f64,
        _ => record.ensemble_score,
    }
}

/// Handler for service health
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "API is running",
        "data_loaded": state.results().is_loaded(),
        "version": crate::VERSION,
    }))
}

/// Handler for the ranked entity list
pub async fn entities_handler(
    State(state): State<AppState>,
    Query(query): Query<EntityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = snapshot(&state)?;
    let statuses = state.statuses().all_latest();

    let mut rows: Vec<EntityRow> = snapshot
        .results
        .entities
        .iter()
        .map(|record| EntityRow {
            record: record.clone(),
            investigation_status: statuses.get(&record.entity).map(|e| e.status).unwrap_or_default(),
        })
        .collect();

    if let Some(filter) = query.filter_status.as_deref().filter(|f| *f != "all") {
        rows.retain(|r| r.investigation_status.as_str() == filter);
    }
    if let Some(min) = query.min_risk_score {
        rows.retain(|r| r.record.ensemble_score >= min);
    }
    if let Some(kind) = query.entity_type.as_deref().filter(|t| *t != "All Types") {
        rows.retain(|r| r.record.category.as_str() == kind);
    }
    if let Some(family) = query.entity_family.as_deref() {
        rows.retain(|r| r.record.family.as_str() == family);
    }

    let sort_by = query.sort_by.as_deref().unwrap_or("ensemble_score");
    if SORT_FIELDS.contains(&sort_by) {
        rows.sort_by(|a, b| sort_value(&b.record, sort_by).total_cmp(&sort_value(&a.record, sort_by)));
        for (i, row) in rows.iter_mut().enumerate() {
            row.record.priority_rank = i + 1;
        }
    }

    let count = rows.len();
    Ok(Json(json!({ "success": true, "data": rows, "count": count })))
}

/// Handler for one entity's composite record
pub async fn entity_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = snapshot(&state)?;
    let id = EntityId::from(name);

    let detail = snapshot
        .results
        .entity_detail(&id)
        .ok_or_else(|| ApiError::NotFound("Entity not found".to_string()))?;

    let community_ids: Vec<usize> = detail.communities.iter().map(|c| c.community_id).collect();
    let view = EntityDetailView {
        entity: EntityRow {
            record: detail.entity,
            investigation_status: state.statuses().current_status(&id),
        },
        community_members: snapshot.results.community_members(&community_ids),
        communities: detail.communities,
        connections: detail.connections,
        claims: detail.claims,
        fraud_rules: detail.fraud_rules,
    };

    Ok(Json(json!({ "success": true, "data": view })))
}

/// Handler for investigation status changes
pub async fn update_status_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Result<Json<StatusUpdate>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let status = body
        .ok()
        .and_then(|Json(update)| update.status)
        .ok_or_else(|| ApiError::BadRequest("Missing status field".to_string()))?;
    let status: InvestigationStatus = status.parse()?;

    let id = EntityId::from(name);
    if let Some(snapshot) = state.results().current() {
        if snapshot.results.entity(&id).is_none() {
            return Err(ApiError::NotFound("Entity not found".to_string()));
        }
    }

    let entry = state.update_status(id.clone(), status).await?;
    info!(entity = %id, status = %status, "Investigation status updated");

    Ok(Json(json!({
        "success": true,
        "message": format!("Status updated to {}", status),
        "data": entry,
    })))
}

/// Handler for an entity's status trail
pub async fn status_history_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let history = state.statuses().history(&EntityId::from(name));
    let count = history.len();
    Json(json!({ "success": true, "data": history, "count": count }))
}

/// Handler for community statistics
pub async fn communities_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = snapshot(&state)?;
    let summaries = snapshot.results.community_summaries();
    let count = summaries.len();
    Ok(Json(json!({ "success": true, "data": summaries, "count": count })))
}

/// Handler that re-runs the analysis and swaps in the new snapshot
pub async fn reload_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.reload_in_background().await?;
    Ok(Json(json!({
        "success": true,
        "message": "Data reloaded successfully",
        "version": snapshot.version,
        "stats": snapshot.results.stats,
    })))
}

pub async fn not_found_handler() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}
