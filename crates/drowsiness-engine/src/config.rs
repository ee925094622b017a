//! Engine thresholds

use serde::{Deserialize, Serialize};

/// Debounce engine configuration. Immutable once the engine is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// EAR below this means the eyes are assessed closed
    pub ear_threshold: f32,

    /// MAR above this means a yawn
    pub mar_threshold: f32,

    /// Absolute head tilt above this (degrees) raises the tilt flag
    pub tilt_threshold_degrees: f32,

    /// Closed-eye ticks required before the drowsy verdict
    pub consecutive_closed_frames: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.21,
            mar_threshold: 0.65,
            tilt_threshold_degrees: 16.0,
            consecutive_closed_frames: 15,
        }
    }
}

impl EngineConfig {
    /// Create strict config (alerts earlier)
    pub fn strict() -> Self {
        Self {
            ear_threshold: 0.23,
            mar_threshold: 0.55,
            tilt_threshold_degrees: 12.0,
            consecutive_closed_frames: 10,
        }
    }

    /// Create lenient config (tolerates longer closures)
    pub fn lenient() -> Self {
        Self {
            ear_threshold: 0.19,
            mar_threshold: 0.75,
            tilt_threshold_degrees: 20.0,
            consecutive_closed_frames: 20,
        }
    }
}
