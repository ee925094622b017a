//! GPS update route

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct GpsUpdate {
    pub lat: f64,
    pub lng: f64,
    /// Client-side fix time; carried by some clients, unused here
    #[serde(default)]
    pub timestamp: Option<f64>,
}

pub async fn update_gps(State(state): State<AppState>, Json(req): Json<GpsUpdate>) -> Json<Value> {
    state.monitor.shared().update_gps(req.lat, req.lng).await;
    Json(json!({ "status": "success" }))
}
