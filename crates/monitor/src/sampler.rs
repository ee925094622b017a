//! Once-per-second history sampler

use crate::shared::SharedState;
use session_log::{HistoryEntry, HistoryLog};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Spawn the sampling task.
///
/// Appends one entry per second while a snapshot is published; ticks with no
/// snapshot are skipped, not recorded as zeros. Exits when `shutdown` fires.
pub fn spawn(
    shared: Arc<SharedState>,
    history: Arc<HistoryLog>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let Some(snapshot) = shared.latest_snapshot().await else {
                        continue;
                    };
                    let entry = HistoryEntry::sample(
                        snapshot.score,
                        snapshot.ear,
                        snapshot.mar,
                        snapshot.is_drowsy,
                    );
                    if let Err(e) = history.append(entry) {
                        warn!(error = %e, "history append failed");
                    }
                }
                _ = shutdown.changed() => {
                    debug!("history sampler shutting down");
                    break;
                }
            }
        }
    })
}
