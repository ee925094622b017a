//! Live status and health routes

use axum::{extract::State, Json};
use monitor::Snapshot;
use serde::Serialize;

use crate::AppState;

/// Latest snapshot plus the current GPS fix. A zero-valued snapshot is
/// served until the first capture tick publishes.
pub async fn get_status(State(state): State<AppState>) -> Json<Snapshot> {
    let shared = state.monitor.shared();
    let mut snapshot = shared.latest_snapshot().await.unwrap_or_default();
    snapshot.gps = shared.gps().await;
    Json(snapshot)
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub capture_running: bool,
    pub session_active: bool,
    pub history_len: usize,
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.started.elapsed().as_secs(),
        capture_running: state.monitor.capture_running(),
        session_active: state.monitor.sessions().current_session().await.is_some(),
        history_len: state.monitor.history().len(),
    })
}
