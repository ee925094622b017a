//! Vision Capture Boundary
//!
//! Contracts between the monitoring core and its vision collaborators:
//! - `FrameSource` produces raw RGB frames from a camera
//! - `LandmarkProvider` locates facial landmark points on a frame
//! - `OverlayRenderer` draws the status banner for the streamed feed
//!
//! Real camera and landmark backends live outside this workspace.
//! `SyntheticCamera` and `NullLandmarkProvider` stand in so the pipeline
//! runs end to end without them.

pub mod frame;
pub mod landmarks;
pub mod overlay;

pub use frame::VideoFrame;
pub use landmarks::{LandmarkSet, Point2};
pub use overlay::OverlayRenderer;

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::{debug, warn};

/// Capture error types
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to open camera: {0}")]
    Open(String),

    #[error("Frame read failed: {0}")]
    Read(String),

    #[error("Frame encoding failed: {0}")]
    Encode(String),

    #[error("Frame buffer does not match its dimensions")]
    BadBuffer,

    #[error("Camera not initialized")]
    NotInitialized,
}

/// Camera configuration
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Device path (e.g., "/dev/video0")
    pub device: String,
    /// Capture width
    pub width: u32,
    /// Capture height
    pub height: u32,
    /// Target FPS
    pub fps: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: "/dev/video0".to_string(),
            width: 640,
            height: 480,
            fps: 15,
        }
    }
}

/// Produces one frame per call. Acquisition may fail transiently; callers
/// retry on the next tick rather than treating a failure as fatal.
pub trait FrameSource: Send + Sync {
    fn acquire(&self) -> Result<VideoFrame, CaptureError>;

    /// Release the underlying device. A later `acquire` reopens it.
    fn release(&self);
}

/// Locates facial landmarks on a frame. `None` means no face was found,
/// which is a legitimate state, not an error.
pub trait LandmarkProvider: Send + Sync {
    fn detect(&self, frame: &VideoFrame) -> Option<LandmarkSet>;
}

/// Stand-in frame source used when no camera backend is wired in.
///
/// Serves flat dark frames at the configured rate so the capture loop,
/// stream, and persistence paths stay exercisable.
pub struct SyntheticCamera {
    config: CameraConfig,
    sequence: AtomicU32,
}

impl SyntheticCamera {
    pub fn new(config: CameraConfig) -> Self {
        warn!(
            device = %config.device,
            "no camera backend configured, serving synthetic frames"
        );
        Self {
            config,
            sequence: AtomicU32::new(0),
        }
    }

    fn now_ns() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }
}

impl FrameSource for SyntheticCamera {
    fn acquire(&self) -> Result<VideoFrame, CaptureError> {
        // Pace like a real camera so the capture loop ticks at ~fps.
        std::thread::sleep(Duration::from_millis(
            1000 / u64::from(self.config.fps.max(1)),
        ));
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        Ok(VideoFrame::filled(
            self.config.width,
            self.config.height,
            [24, 24, 28],
            Self::now_ns(),
            sequence,
        ))
    }

    fn release(&self) {
        debug!("synthetic camera released");
    }
}

/// Stand-in provider that never finds a face.
pub struct NullLandmarkProvider;

impl NullLandmarkProvider {
    pub fn new() -> Self {
        warn!("no landmark backend configured, face detection disabled");
        Self
    }
}

impl Default for NullLandmarkProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LandmarkProvider for NullLandmarkProvider {
    fn detect(&self, _frame: &VideoFrame) -> Option<LandmarkSet> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_camera_serves_frames() {
        let camera = SyntheticCamera::new(CameraConfig {
            width: 32,
            height: 16,
            fps: 1000,
            ..Default::default()
        });

        let a = camera.acquire().unwrap();
        let b = camera.acquire().unwrap();

        assert_eq!(a.width, 32);
        assert_eq!(a.data.len(), 32 * 16 * 3);
        assert_eq!(b.sequence, a.sequence + 1);
    }

    #[test]
    fn null_provider_finds_no_face() {
        let provider = NullLandmarkProvider::new();
        let frame = VideoFrame::filled(8, 8, [0, 0, 0], 0, 0);
        assert!(provider.detect(&frame).is_none());
    }
}
