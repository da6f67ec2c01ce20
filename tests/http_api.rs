//! Investigation API tests driven through the router with `oneshot`.

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use claimnet::dataset::DatasetSource;
use claimnet::external::SimulatedSignalSource;
use claimnet::{router, AnalysisConfig, AnalysisPipeline, AppState, StatusLog};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt; // for oneshot()

fn state() -> AppState {
    AppState::new(
        AnalysisPipeline::new(AnalysisConfig::default()).unwrap(),
        DatasetSource::Fixture,
        Arc::new(SimulatedSignalSource::new(42)),
        StatusLog::in_memory(),
    )
}

fn loaded_state() -> AppState {
    let state = state();
    state.reload().unwrap();
    state
}

async fn send(state: &AppState, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn get(state: &AppState, uri: &str) -> (StatusCode, Value) {
    send(state, Method::GET, uri, None).await
}

#[tokio::test]
async fn test_health_reports_load_state() {
    let state = state();
    let (status, body) = get(&state, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data_loaded"], false);

    state.reload().unwrap();
    let (_, body) = get(&state, "/api/health").await;
    assert_eq!(body["data_loaded"], true);
    assert_eq!(body["version"], claimnet::VERSION);
}

#[tokio::test]
async fn test_unloaded_data_is_service_unavailable() {
    let state = state();
    for uri in ["/api/entities", "/api/communities", "/api/entity/Tony%20Ricci"] {
        let (status, body) = get(&state, uri).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{}", uri);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Data not initialized");
    }
}

#[tokio::test]
async fn test_entities_are_ranked_with_default_status() {
    let state = loaded_state();
    let (status, body) = get(&state, "/api/entities").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body["data"].as_array().unwrap();
    assert_eq!(body["count"], rows.len());
    assert_eq!(rows.len(), 40);
    assert_eq!(rows[0]["priority_rank"], 1);
    assert!(rows.iter().all(|r| r["investigation_status"] == "Not Reviewed"));
    assert!(rows[0]["entity_name"].is_string());
}

#[tokio::test]
async fn test_entities_filter_and_sort() {
    let state = loaded_state();

    let (_, body) = get(&state, "/api/entities?entity_type=Doctor").await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 8);
    assert!(rows.iter().all(|r| r["entity_type"] == "Doctor"));

    let (_, body) = get(&state, "/api/entities?entity_family=medical_provider").await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 8);
    assert!(rows.iter().all(|r| r["entity_family"] == "medical_provider"));

    let (_, body) = get(&state, "/api/entities?sort_by=total_exposure").await;
    let rows = body["data"].as_array().unwrap();
    let exposures: Vec<f64> = rows.iter().map(|r| r["total_exposure"].as_f64().unwrap()).collect();
    assert!(exposures.windows(2).all(|w| w[0] >= w[1]));
    let ranks: Vec<u64> = rows.iter().map(|r| r["priority_rank"].as_u64().unwrap()).collect();
    assert_eq!(ranks, (1..=rows.len() as u64).collect::<Vec<_>>());

    let (_, body) = get(&state, "/api/entities?min_risk_score=1000").await;
    assert_eq!(body["count"], 0);

    let (_, body) = get(&state, "/api/entities?filter_status=Bad%20Actor").await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_entity_detail_and_not_found() {
    let state = loaded_state();

    let (status, body) = get(&state, "/api/entity/Tony%20Ricci").await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["entity"]["entity_name"], "Tony Ricci");
    assert_eq!(data["entity"]["investigation_status"], "Not Reviewed");
    assert!(!data["claims"].as_array().unwrap().is_empty());
    for connection in data["connections"].as_array().unwrap() {
        assert_ne!(connection["source_entity"], connection["target_entity"]);
    }

    let (status, body) = get(&state, "/api/entity/Nobody%20Here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Entity not found");
}

#[tokio::test]
async fn test_status_update_and_history() {
    let state = loaded_state();
    let uri = "/api/entity/Tony%20Ricci/status";

    let (status, body) = send(&state, Method::PUT, uri, Some(serde_json::json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing status field");

    let (status, body) = send(&state, Method::PUT, uri, Some(serde_json::json!({ "status": "Guilty" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid status"));

    let (status, body) = send(
        &state,
        Method::PUT,
        uri,
        Some(serde_json::json!({ "status": "Under Investigation" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Status updated to Under Investigation");

    let (_, body) = get(&state, "/api/entity/Tony%20Ricci/status-history").await;
    let history = body["data"].as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["status"], "Under Investigation");
    assert_eq!(history[1]["status"], "Not Reviewed");

    let (_, body) = get(&state, "/api/entities?filter_status=Under%20Investigation").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["entity_name"], "Tony Ricci");
}

#[tokio::test]
async fn test_status_update_for_unknown_entity() {
    let state = loaded_state();
    let (status, _) = send(
        &state,
        Method::PUT,
        "/api/entity/Nobody%20Here/status",
        Some(serde_json::json!({ "status": "Cleared" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_communities_summary() {
    let state = loaded_state();
    let (status, body) = get(&state, "/api/communities").await;
    assert_eq!(status, StatusCode::OK);

    let communities = body["data"].as_array().unwrap();
    assert_eq!(body["count"], communities.len());
    for c in communities {
        assert!(c["total_members"].as_u64().unwrap() >= 3);
        let ratio = c["fraud_ratio"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&ratio));
        assert!(["HIGH", "MEDIUM", "LOW"].contains(&c["risk_level"].as_str().unwrap()));
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reload_publishes_new_version() {
    let state = state();
    let (status, body) = send(&state, Method::POST, "/api/reload", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], 1);

    let (_, body) = send(&state, Method::POST, "/api/reload", None).await;
    assert_eq!(body["version"], 2);
    // Defaults are only seeded once per entity
    assert_eq!(state.statuses().len(), 40);
}

#[tokio::test]
async fn test_unknown_endpoint() {
    let state = state();
    let (status, body) = get(&state, "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Endpoint not found");
}
