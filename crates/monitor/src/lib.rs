//! Drowsiness Monitor Core
//!
//! Owns the capture loop, the shared live state, the per-second history
//! sampler, and the session lifecycle. Everything request handlers touch is
//! reachable from the `Monitor` handle; there is no free-floating process
//! state. Background work is cancellable: `shutdown` halts both the capture
//! loop and the sampler deterministically.

pub mod capture;
pub mod persist;
pub mod sampler;
pub mod session;
pub mod shared;

pub use capture::{CaptureConfig, CaptureLoop};
pub use persist::{DiskFrameStore, FrameStore};
pub use session::{Session, SessionManager};
pub use shared::{GpsFix, SharedState, Snapshot};

use std::sync::Arc;
use std::time::Duration;

use alert_output::AlertOutput;
use drowsiness_engine::{DebounceEngine, EngineConfig};
use session_log::HistoryLog;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::info;
use vision_capture::{FrameSource, LandmarkProvider};

/// Monitor assembly configuration
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub engine: EngineConfig,
    pub capture: CaptureConfig,
    pub history_capacity: usize,
    /// Bound on the stop-time frame persistence call
    pub persist_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            capture: CaptureConfig::default(),
            history_capacity: session_log::DEFAULT_CAPACITY,
            persist_timeout: Duration::from_secs(5),
        }
    }
}

/// Handle to the assembled monitoring core
pub struct Monitor {
    shared: Arc<SharedState>,
    history: Arc<HistoryLog>,
    capture: CaptureLoop,
    sessions: SessionManager,
    sampler_shutdown: watch::Sender<bool>,
    sampler: Mutex<Option<JoinHandle<()>>>,
}

impl Monitor {
    /// Assemble the core and spawn the history sampler
    pub fn new(
        config: MonitorConfig,
        source: Arc<dyn FrameSource>,
        provider: Arc<dyn LandmarkProvider>,
        alert: AlertOutput,
        store: Arc<dyn FrameStore>,
    ) -> Arc<Self> {
        let shared = Arc::new(SharedState::new());
        let history = Arc::new(HistoryLog::new(config.history_capacity));
        let engine = Arc::new(Mutex::new(DebounceEngine::new(config.engine)));
        let alert = Arc::new(alert);

        let capture = CaptureLoop::new(
            Arc::clone(&shared),
            Arc::clone(&engine),
            source,
            provider,
            alert,
            config.capture,
        );
        let sessions = SessionManager::new(
            engine,
            capture.clone(),
            Arc::clone(&history),
            Arc::clone(&shared),
            store,
            config.persist_timeout,
        );

        let (sampler_shutdown, shutdown_rx) = watch::channel(false);
        let sampler = sampler::spawn(Arc::clone(&shared), Arc::clone(&history), shutdown_rx);

        Arc::new(Self {
            shared,
            history,
            capture,
            sessions,
            sampler_shutdown,
            sampler: Mutex::new(Some(sampler)),
        })
    }

    pub fn shared(&self) -> &SharedState {
        &self.shared
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Start the capture loop outside a session (server warm-up)
    pub async fn start_capture(&self) {
        self.capture.start().await;
    }

    pub fn capture_running(&self) -> bool {
        self.capture.is_running()
    }

    /// Stop all background work; used on process shutdown
    pub async fn shutdown(&self) {
        self.capture.stop().await;
        let _ = self.sampler_shutdown.send(true);
        if let Some(handle) = self.sampler.lock().await.take() {
            let _ = handle.await;
        }
        info!("monitor shut down");
    }
}
