//! Session lifecycle

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use drowsiness_engine::DebounceEngine;
use session_log::{HistoryLog, SessionSummary};

use crate::capture::CaptureLoop;
use crate::persist::FrameStore;
use crate::shared::SharedState;

/// Identity of the active monitoring session
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    pub started_at: Instant,
}

/// Owns session identity and the start/stop/reset transitions.
///
/// Transitions serialize on the session lock, so a concurrent start and
/// stop cannot interleave partially: stop reads the identity and counters
/// that start replaces.
pub struct SessionManager {
    current: Mutex<Option<Session>>,
    engine: Arc<Mutex<DebounceEngine>>,
    capture: CaptureLoop,
    history: Arc<HistoryLog>,
    shared: Arc<SharedState>,
    store: Arc<dyn FrameStore>,
    persist_timeout: Duration,
}

impl SessionManager {
    pub fn new(
        engine: Arc<Mutex<DebounceEngine>>,
        capture: CaptureLoop,
        history: Arc<HistoryLog>,
        shared: Arc<SharedState>,
        store: Arc<dyn FrameStore>,
        persist_timeout: Duration,
    ) -> Self {
        Self {
            current: Mutex::new(None),
            engine,
            capture,
            history,
            shared,
            store,
            persist_timeout,
        }
    }

    /// Begin a session: clear history, zero the engine, record identity,
    /// ensure the capture loop is running. The previous session, if any, is
    /// replaced here and not at stop time.
    pub async fn start(&self, session_id: impl Into<String>) {
        let mut current = self.current.lock().await;

        if let Err(e) = self.history.clear() {
            warn!(error = %e, "history clear failed");
        }
        self.engine.lock().await.reset();

        let session_id = session_id.into();
        info!(session = %session_id, "session started");
        *current = Some(Session {
            id: session_id,
            started_at: Instant::now(),
        });

        self.capture.start().await;
    }

    /// Stop the session: persist the final frame, halt capture, fold the
    /// history into a summary. `None` when no entries were recorded.
    pub async fn stop(&self) -> Option<SessionSummary> {
        let current = self.current.lock().await;
        info!("stop requested");

        if let (Some(frame), Some(session)) =
            (self.shared.latest_frame().await, current.as_ref())
        {
            let name = format!("{}.jpg", session.id);
            let store = Arc::clone(&self.store);
            let save = tokio::task::spawn_blocking(move || store.save(&frame, &name));
            match tokio::time::timeout(self.persist_timeout, save).await {
                Ok(Ok(Ok(path))) => info!(path = %path.display(), "final frame persisted"),
                Ok(Ok(Err(e))) => error!(error = %e, "final frame persistence failed"),
                Ok(Err(e)) => error!(error = %e, "persistence task failed"),
                Err(_) => error!("final frame persistence timed out"),
            }
        }

        self.capture.stop().await;

        let duration = current
            .as_ref()
            .map(|s| s.started_at.elapsed().as_secs())
            .unwrap_or(0);
        match self.history.summary(duration) {
            Ok(summary) => summary,
            Err(e) => {
                error!(error = %e, "summary fold failed");
                None
            }
        }
    }

    /// Zero the engine counters without touching session identity or history
    pub async fn reset_counters(&self) {
        self.engine.lock().await.reset();
    }

    /// Active session identity, if a session has been started
    pub async fn current_session(&self) -> Option<Session> {
        self.current.lock().await.clone()
    }
}
