//! Capture loop: the single writer
//!
//! Pulls frames from the source, runs landmark detection under a bounded
//! timeout, drives the engine and the alert output, and publishes the
//! result. A failed frame read skips the tick; nothing here terminates the
//! loop except a stop request.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use alert_output::AlertOutput;
use drowsiness_engine::{AlertAction, DebounceEngine};
use face_metrics::MetricTriple;
use vision_capture::{FrameSource, LandmarkProvider};

use crate::shared::{SharedState, Snapshot};

/// Capture loop tuning
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Bound on one landmark-provider call
    pub detect_timeout: Duration,
    /// Backoff after a failed frame read
    pub read_backoff: Duration,
    /// How long `stop` waits for the in-flight tick before aborting
    pub stop_grace: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            detect_timeout: Duration::from_secs(2),
            read_backoff: Duration::from_millis(20),
            stop_grace: Duration::from_secs(5),
        }
    }
}

struct Inner {
    shared: Arc<SharedState>,
    engine: Arc<Mutex<DebounceEngine>>,
    source: Arc<dyn FrameSource>,
    provider: Arc<dyn LandmarkProvider>,
    alert: Arc<AlertOutput>,
    config: CaptureConfig,
    running: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
}

/// Handle to the single writer task
#[derive(Clone)]
pub struct CaptureLoop {
    inner: Arc<Inner>,
}

impl CaptureLoop {
    pub fn new(
        shared: Arc<SharedState>,
        engine: Arc<Mutex<DebounceEngine>>,
        source: Arc<dyn FrameSource>,
        provider: Arc<dyn LandmarkProvider>,
        alert: Arc<AlertOutput>,
        config: CaptureConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                shared,
                engine,
                source,
                provider,
                alert,
                config,
                running: AtomicBool::new(false),
                task: Mutex::new(None),
            }),
        }
    }

    /// Start the loop. A no-op when already running.
    pub async fn start(&self) {
        if self.inner.running.swap(true, Ordering::SeqCst) {
            debug!("capture loop already running");
            return;
        }
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move { inner.run().await });
        *self.inner.task.lock().await = Some(handle);
        info!("capture loop started");
    }

    /// Request a cooperative stop, wait for the in-flight tick, release the
    /// source, and clear the published state. A no-op when not running.
    pub async fn stop(&self) {
        if !self.inner.running.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Some(mut handle) = self.inner.task.lock().await.take() {
            if tokio::time::timeout(self.inner.config.stop_grace, &mut handle)
                .await
                .is_err()
            {
                warn!("capture task did not stop within grace period, aborting");
                handle.abort();
            }
        }
        self.inner.source.release();
        self.inner.shared.clear().await;
        self.inner.alert.disengage();
        info!("capture loop stopped");
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }
}

impl Inner {
    async fn run(self: Arc<Self>) {
        while self.running.load(Ordering::SeqCst) {
            let frame = {
                let source = Arc::clone(&self.source);
                match tokio::task::spawn_blocking(move || source.acquire()).await {
                    Ok(Ok(frame)) => Arc::new(frame),
                    Ok(Err(e)) => {
                        debug!(error = %e, "frame read failed, retrying");
                        tokio::time::sleep(self.config.read_backoff).await;
                        continue;
                    }
                    Err(e) => {
                        warn!(error = %e, "frame acquisition task failed");
                        tokio::time::sleep(self.config.read_backoff).await;
                        continue;
                    }
                }
            };

            // A stuck provider call is abandoned at the timeout, not joined.
            let landmarks = {
                let provider = Arc::clone(&self.provider);
                let frame = Arc::clone(&frame);
                match tokio::time::timeout(
                    self.config.detect_timeout,
                    tokio::task::spawn_blocking(move || provider.detect(&frame)),
                )
                .await
                {
                    Ok(Ok(landmarks)) => landmarks,
                    Ok(Err(e)) => {
                        warn!(error = %e, "landmark task failed");
                        None
                    }
                    Err(_) => {
                        warn!("landmark detection timed out");
                        None
                    }
                }
            };

            let (metrics, face_detected) = match &landmarks {
                Some(set) => (face_metrics::compute(set), true),
                None => (MetricTriple::default(), false),
            };

            let (verdict, action) = self.engine.lock().await.tick(&metrics, face_detected);
            match action {
                AlertAction::Engage => self.alert.engage(),
                AlertAction::Disengage => self.alert.disengage(),
                AlertAction::Hold => {}
            }

            let gps = self.shared.gps().await;
            self.shared
                .publish(Snapshot::from_verdict(&verdict, gps), frame)
                .await;
        }
    }
}
