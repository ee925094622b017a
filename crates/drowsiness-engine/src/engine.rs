//! Debounce state machine

use crate::EngineConfig;
use face_metrics::MetricTriple;
use serde::{Deserialize, Serialize};
use tracing::info;

/// What the alert actuator should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    /// Start, or keep, the audible alert
    Engage,
    /// Silence the alert
    Disengage,
    /// Leave the alert as it is (no face assessed this tick)
    Hold,
}

/// Externally visible result of one tick
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickVerdict {
    pub ear: f32,
    pub mar: f32,
    pub tilt: f32,
    pub score: u32,
    pub is_drowsy: bool,
    pub yawning: bool,
}

/// Debounce state machine.
///
/// Tracks the consecutive closed-eye streak and the monotonic severity
/// score. The drowsy verdict requires the streak to reach the configured
/// length; a single open-eye tick resets it. The score only moves up,
/// except through an explicit `reset`.
pub struct DebounceEngine {
    config: EngineConfig,
    closed_frames: u32,
    score: u32,
}

impl DebounceEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            closed_frames: 0,
            score: 0,
        }
    }

    /// Advance one tick.
    ///
    /// A tick with no detected face holds the counters rather than resetting
    /// them: a dropped detection is not evidence the eyes opened. The
    /// published verdict carries zeroed metrics and the alert is left as it
    /// was.
    pub fn tick(&mut self, metrics: &MetricTriple, face_detected: bool) -> (TickVerdict, AlertAction) {
        if !face_detected {
            let verdict = TickVerdict {
                score: self.score,
                ..TickVerdict::default()
            };
            return (verdict, AlertAction::Hold);
        }

        let eye_closed = metrics.ear < self.config.ear_threshold;
        if eye_closed {
            self.closed_frames = self.closed_frames.saturating_add(1);
        } else {
            self.closed_frames = 0;
        }

        let yawning = metrics.mar > self.config.mar_threshold;
        let tilted = metrics.tilt_degrees.abs() > self.config.tilt_threshold_degrees;
        let is_drowsy = eye_closed && self.closed_frames >= self.config.consecutive_closed_frames;

        let action = if is_drowsy || yawning || tilted {
            self.score = self.score.saturating_add(1);
            AlertAction::Engage
        } else {
            AlertAction::Disengage
        };

        let verdict = TickVerdict {
            ear: metrics.ear,
            mar: metrics.mar,
            tilt: metrics.tilt_degrees,
            score: self.score,
            is_drowsy,
            yawning,
        };
        (verdict, action)
    }

    /// Zero the severity score and the closed-eye streak
    pub fn reset(&mut self) {
        self.closed_frames = 0;
        self.score = 0;
        info!("engine counters reset");
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn closed_frames(&self) -> u32 {
        self.closed_frames
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn closed() -> MetricTriple {
        MetricTriple {
            ear: 0.1,
            ..Default::default()
        }
    }

    fn open() -> MetricTriple {
        MetricTriple {
            ear: 0.3,
            ..Default::default()
        }
    }

    #[test]
    fn drowsy_only_after_consecutive_threshold() {
        let mut engine = DebounceEngine::new(EngineConfig::default());

        for _ in 0..14 {
            let (verdict, action) = engine.tick(&closed(), true);
            assert!(!verdict.is_drowsy);
            assert_eq!(action, AlertAction::Disengage);
        }

        let (verdict, action) = engine.tick(&closed(), true);
        assert!(verdict.is_drowsy);
        assert_eq!(action, AlertAction::Engage);
        assert_eq!(verdict.score, 1);
    }

    #[test]
    fn blink_resets_streak() {
        let mut engine = DebounceEngine::new(EngineConfig::default());

        for _ in 0..14 {
            engine.tick(&closed(), true);
        }
        engine.tick(&open(), true);
        assert_eq!(engine.closed_frames(), 0);

        let (verdict, _) = engine.tick(&closed(), true);
        assert!(!verdict.is_drowsy);
        assert_eq!(engine.closed_frames(), 1);
    }

    #[test]
    fn yawn_and_tilt_raise_score_without_drowsiness() {
        let mut engine = DebounceEngine::new(EngineConfig::default());

        let yawn = MetricTriple {
            ear: 0.3,
            mar: 0.8,
            ..Default::default()
        };
        let (verdict, action) = engine.tick(&yawn, true);
        assert!(verdict.yawning);
        assert!(!verdict.is_drowsy);
        assert_eq!(action, AlertAction::Engage);
        assert_eq!(verdict.score, 1);

        let tilted = MetricTriple {
            ear: 0.3,
            tilt_degrees: -20.0,
            ..Default::default()
        };
        let (verdict, action) = engine.tick(&tilted, true);
        assert_eq!(action, AlertAction::Engage);
        assert_eq!(verdict.score, 2);
    }

    #[test]
    fn missed_detection_holds_counters() {
        let mut engine = DebounceEngine::new(EngineConfig::default());

        for _ in 0..10 {
            engine.tick(&closed(), true);
        }
        assert_eq!(engine.closed_frames(), 10);

        let (verdict, action) = engine.tick(&MetricTriple::default(), false);
        assert_eq!(action, AlertAction::Hold);
        assert_eq!(verdict.ear, 0.0);
        assert!(!verdict.is_drowsy);
        assert_eq!(engine.closed_frames(), 10);

        // The streak continues where it left off.
        for _ in 0..5 {
            engine.tick(&closed(), true);
        }
        assert!(engine.closed_frames() >= 15);
    }

    #[test]
    fn reset_zeroes_both_counters() {
        let mut engine = DebounceEngine::new(EngineConfig::default());
        for _ in 0..20 {
            engine.tick(&closed(), true);
        }
        assert!(engine.score() > 0);

        engine.reset();
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.closed_frames(), 0);
    }

    proptest! {
        #[test]
        fn score_never_decreases(ears in proptest::collection::vec(0.0f32..0.5, 1..200)) {
            let mut engine = DebounceEngine::new(EngineConfig::default());
            let mut last_score = 0;
            for ear in ears {
                let metrics = MetricTriple { ear, ..Default::default() };
                let (verdict, _) = engine.tick(&metrics, true);
                prop_assert!(verdict.score >= last_score);
                last_score = verdict.score;
            }
        }

        #[test]
        fn streak_zeroed_exactly_on_open_eyes(ears in proptest::collection::vec(0.0f32..0.5, 1..200)) {
            let config = EngineConfig::default();
            let mut engine = DebounceEngine::new(config.clone());
            let mut expected = 0u32;
            for ear in ears {
                let metrics = MetricTriple { ear, ..Default::default() };
                engine.tick(&metrics, true);
                expected = if ear < config.ear_threshold { expected + 1 } else { 0 };
                prop_assert_eq!(engine.closed_frames(), expected);
            }
        }
    }
}
