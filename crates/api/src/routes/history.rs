//! History route

use axum::{extract::State, Json};
use serde::Serialize;
use session_log::HistoryEntry;
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub history: Vec<HistoryEntry>,
}

/// Full current log contents, oldest first
pub async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let history = state.monitor.history().entries().unwrap_or_else(|e| {
        warn!(error = %e, "history read failed");
        Vec::new()
    });
    Json(HistoryResponse { history })
}
