//! Drowsiness Detection API Server
//!
//! REST and MJPEG surface over the monitoring core. Route paths match the
//! service this replaces, so existing frontends keep working.

pub mod routes;
pub mod settings;

use std::sync::Arc;
use std::time::Instant;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use monitor::Monitor;
use settings::Settings;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use vision_capture::OverlayRenderer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<Monitor>,
    pub overlay: Arc<OverlayRenderer>,
    pub version: String,
    pub started: Instant,
}

impl AppState {
    pub fn new(monitor: Arc<Monitor>, overlay: OverlayRenderer) -> Self {
        Self {
            monitor,
            overlay: Arc::new(overlay),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started: Instant::now(),
        }
    }
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        Some(Err(_)) => {
            warn!("invalid CORS origin, allowing any");
            CorsLayer::permissive()
        }
        None => CorsLayer::permissive(),
    }
}

/// Create the application router
pub fn create_router(state: AppState, settings: &Settings) -> Router {
    Router::new()
        .route("/start_detection", post(routes::session::start_detection))
        .route("/stop", post(routes::session::stop))
        .route("/reset_counters", post(routes::session::reset_counters))
        .route("/update_gps", post(routes::gps::update_gps))
        .route("/status", get(routes::status::get_status))
        .route("/api/history", get(routes::history::get_history))
        .route("/video_feed", get(routes::stream::video_feed))
        .route("/api/v1/health", get(routes::status::health))
        .nest_service("/snapshots", ServeDir::new(&settings.snapshot_dir))
        .layer(cors_layer(settings.cors_origin.as_deref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    // Tests and embedders may have installed a subscriber already.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Run the server until the listener fails or the process is stopped
pub async fn run_server(settings: Settings, state: AppState) -> anyhow::Result<()> {
    let app = create_router(state, &settings);

    info!(addr = %settings.bind_addr, "starting API server");
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alert_output::AlertOutput;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use monitor::{DiskFrameStore, MonitorConfig};
    use serde_json::Value;
    use tower::util::ServiceExt;
    use vision_capture::{CameraConfig, NullLandmarkProvider, SyntheticCamera};

    fn test_settings(dir: &std::path::Path) -> Settings {
        Settings {
            bind_addr: "127.0.0.1:0".to_string(),
            snapshot_dir: dir.join("snapshots").to_string_lossy().into_owned(),
            cors_origin: None,
            overlay_font: dir.join("missing.ttf").to_string_lossy().into_owned(),
        }
    }

    fn test_app() -> (Router, Arc<Monitor>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let settings = test_settings(dir.path());
        let store = Arc::new(DiskFrameStore::new(&settings.snapshot_dir).unwrap());
        let monitor = Monitor::new(
            MonitorConfig::default(),
            Arc::new(SyntheticCamera::new(CameraConfig {
                width: 32,
                height: 24,
                fps: 100,
                ..Default::default()
            })),
            Arc::new(NullLandmarkProvider::new()),
            AlertOutput::disabled(),
            store,
        );
        let state = AppState::new(Arc::clone(&monitor), OverlayRenderer::bannered());
        (create_router(state, &settings), monitor, dir)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn status_serves_zero_snapshot_before_first_tick() {
        let (app, monitor, _dir) = test_app();

        let response = app
            .oneshot(Request::get("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["ear"], 0.0);
        assert_eq!(json["isDrowsy"], false);
        assert_eq!(json["score"], 0);

        monitor.shutdown().await;
    }

    #[tokio::test]
    async fn gps_update_shows_in_status() {
        let (app, monitor, _dir) = test_app();

        let response = app
            .clone()
            .oneshot(
                Request::post("/update_gps")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"lat": 28.6139, "lng": 77.2090}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(response).await["status"], "success");

        let response = app
            .oneshot(Request::get("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["gps"]["lat"], 28.6139);

        monitor.shutdown().await;
    }

    #[tokio::test]
    async fn start_then_stop_with_no_samples_returns_null_summary() {
        let (app, monitor, _dir) = test_app();

        let response = app
            .clone()
            .oneshot(
                Request::post("/start_detection")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"token": "t", "session_id": "s1"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body_json(response).await["status"], "detection started");

        let response = app
            .oneshot(Request::post("/stop").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["status"], "stopped");
        assert!(json["summary"].is_null());

        monitor.shutdown().await;
    }

    #[tokio::test]
    async fn history_starts_empty() {
        let (app, monitor, _dir) = test_app();

        let response = app
            .oneshot(Request::get("/api/history").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["history"].as_array().map(Vec::len), Some(0));

        monitor.shutdown().await;
    }

    #[tokio::test]
    async fn health_reports_components() {
        let (app, monitor, _dir) = test_app();

        let response = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["capture_running"], false);
        assert_eq!(json["session_active"], false);

        monitor.shutdown().await;
    }

    #[tokio::test]
    async fn reset_counters_responds() {
        let (app, monitor, _dir) = test_app();

        let response = app
            .oneshot(Request::post("/reset_counters").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_json(response).await["status"], "counters reset");

        monitor.shutdown().await;
    }
}
