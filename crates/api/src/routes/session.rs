//! Session control routes

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::AppState;
use session_log::SessionSummary;

/// Start request. The token is issued by the outer auth service and only
/// carried here; this service does not validate it.
#[derive(Debug, Deserialize)]
pub struct StartRequest {
    pub token: Option<String>,
    pub session_id: String,
}

pub async fn start_detection(
    State(state): State<AppState>,
    Json(req): Json<StartRequest>,
) -> Json<Value> {
    state.monitor.sessions().start(req.session_id).await;
    Json(json!({ "status": "detection started" }))
}

#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub status: &'static str,
    pub summary: Option<SessionSummary>,
}

pub async fn stop(State(state): State<AppState>) -> Json<StopResponse> {
    let summary = state.monitor.sessions().stop().await;
    Json(StopResponse {
        status: "stopped",
        summary,
    })
}

pub async fn reset_counters(State(state): State<AppState>) -> Json<Value> {
    state.monitor.sessions().reset_counters().await;
    Json(json!({ "status": "counters reset" }))
}
