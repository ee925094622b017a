//! Drowsiness monitor entry point

use std::path::Path;
use std::sync::Arc;

use alert_output::{AlertOutput, LoggingAlertSink};
use api::settings::Settings;
use api::{init_logging, run_server, AppState};
use monitor::{DiskFrameStore, Monitor, MonitorConfig};
use tracing::info;
use vision_capture::{CameraConfig, NullLandmarkProvider, OverlayRenderer, SyntheticCamera};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let settings = Settings::load()?;
    info!(version = env!("CARGO_PKG_VERSION"), "starting drowsiness monitor");

    // Stand-in camera and landmark backends; real ones are wired in by the
    // deployment, not this workspace.
    let source = Arc::new(SyntheticCamera::new(CameraConfig::default()));
    let provider = Arc::new(NullLandmarkProvider::new());
    let alert = AlertOutput::new(Some(Box::new(LoggingAlertSink)));
    let store = Arc::new(DiskFrameStore::new(settings.snapshot_dir.clone())?);

    let monitor = Monitor::new(MonitorConfig::default(), source, provider, alert, store);

    // The camera warms up with the server.
    monitor.start_capture().await;

    let overlay = OverlayRenderer::new(Path::new(&settings.overlay_font));
    let state = AppState::new(Arc::clone(&monitor), overlay);

    let result = run_server(settings, state).await;
    monitor.shutdown().await;
    result
}
