//! Shared live state
//!
//! Single-slot, last-write-wins storage for the latest snapshot and frame:
//! one writer (the capture loop), any number of readers. Values are swapped
//! whole behind `RwLock`s, so readers never observe a torn snapshot and
//! never block the writer beyond the swap itself.

use drowsiness_engine::TickVerdict;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use vision_capture::VideoFrame;

/// Last known location, overwritten by GPS updates
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GpsFix {
    pub lat: f64,
    pub lng: f64,
}

/// Externally visible result of one capture tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub ear: f32,
    pub mar: f32,
    pub tilt: f32,
    pub score: u32,
    pub is_drowsy: bool,
    pub yawning: bool,
    pub gps: GpsFix,
}

impl Snapshot {
    pub fn from_verdict(verdict: &TickVerdict, gps: GpsFix) -> Self {
        Self {
            ear: verdict.ear,
            mar: verdict.mar,
            tilt: verdict.tilt,
            score: verdict.score,
            is_drowsy: verdict.is_drowsy,
            yawning: verdict.yawning,
            gps,
        }
    }
}

/// Single-slot store for the latest snapshot and frame
#[derive(Default)]
pub struct SharedState {
    snapshot: RwLock<Option<Snapshot>>,
    frame: RwLock<Option<Arc<VideoFrame>>>,
    gps: RwLock<GpsFix>,
}

impl SharedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish one tick's results, replacing whatever readers saw before
    pub async fn publish(&self, snapshot: Snapshot, frame: Arc<VideoFrame>) {
        *self.snapshot.write().await = Some(snapshot);
        *self.frame.write().await = Some(frame);
    }

    /// Latest snapshot, `None` until the first tick publishes
    pub async fn latest_snapshot(&self) -> Option<Snapshot> {
        self.snapshot.read().await.clone()
    }

    /// Latest frame, `None` until the first tick publishes
    pub async fn latest_frame(&self) -> Option<Arc<VideoFrame>> {
        self.frame.read().await.clone()
    }

    /// Drop the published snapshot and frame (capture stopped)
    pub async fn clear(&self) {
        *self.snapshot.write().await = None;
        *self.frame.write().await = None;
    }

    pub async fn update_gps(&self, lat: f64, lng: f64) {
        *self.gps.write().await = GpsFix { lat, lng };
    }

    pub async fn gps(&self) -> GpsFix {
        *self.gps.read().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_replaces_previous_values() {
        let shared = SharedState::new();
        assert!(shared.latest_snapshot().await.is_none());

        let frame = Arc::new(VideoFrame::filled(8, 8, [0, 0, 0], 0, 0));
        shared
            .publish(
                Snapshot {
                    score: 1,
                    ..Default::default()
                },
                Arc::clone(&frame),
            )
            .await;
        shared
            .publish(
                Snapshot {
                    score: 2,
                    ..Default::default()
                },
                frame,
            )
            .await;

        assert_eq!(shared.latest_snapshot().await.map(|s| s.score), Some(2));
    }

    #[tokio::test]
    async fn clear_drops_published_state() {
        let shared = SharedState::new();
        let frame = Arc::new(VideoFrame::filled(8, 8, [0, 0, 0], 0, 0));
        shared.publish(Snapshot::default(), frame).await;

        shared.clear().await;
        assert!(shared.latest_snapshot().await.is_none());
        assert!(shared.latest_frame().await.is_none());
    }

    #[tokio::test]
    async fn gps_updates_are_visible() {
        let shared = SharedState::new();
        shared.update_gps(28.6139, 77.209).await;

        let fix = shared.gps().await;
        assert_eq!(fix.lat, 28.6139);
        assert_eq!(fix.lng, 77.209);
    }
}
