//! Facial geometry metrics
//!
//! Converts located landmark points into the three scalar fatigue signals:
//! eye aspect ratio, mouth aspect ratio, and head tilt. Every function here
//! is total — malformed or degenerate input yields 0, never NaN and never
//! a panic, so a momentarily occluded face cannot fail a capture tick.

use serde::{Deserialize, Serialize};
use vision_capture::landmarks::{mesh, LandmarkSet, Point2};

/// Denominators below this are treated as degenerate
const DEGENERATE_EPS: f32 = 1e-6;

/// Per-tick scalar signals derived from one landmark set
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MetricTriple {
    pub ear: f32,
    pub mar: f32,
    pub tilt_degrees: f32,
}

/// Eye aspect ratio over six points in anatomical order: outer corner, two
/// upper lids, inner corner, two lower lids.
///
/// `(|p2-p6| + |p3-p5|) / (2 * |p1-p4|)`; 0.0 when the corner-to-corner
/// distance is degenerate.
pub fn eye_aspect_ratio(p: &[Point2; 6]) -> f32 {
    let horizontal = p[0].distance(&p[3]);
    if horizontal < DEGENERATE_EPS {
        return 0.0;
    }
    (p[1].distance(&p[5]) + p[2].distance(&p[4])) / (2.0 * horizontal)
}

/// Mouth aspect ratio: two vertical aperture pairs over the corner width,
/// same degenerate-denominator guard as the eye ratio.
pub fn mouth_aspect_ratio(p: &[Point2; 6]) -> f32 {
    let width = p[2].distance(&p[3]);
    if width < DEGENERATE_EPS {
        return 0.0;
    }
    (p[0].distance(&p[1]) + p[4].distance(&p[5])) / (2.0 * width)
}

/// Angle of the line between the outer eye corners, in degrees from
/// horizontal.
pub fn head_tilt_degrees(left_outer: Point2, right_outer: Point2) -> f32 {
    (right_outer.y - left_outer.y)
        .atan2(right_outer.x - left_outer.x)
        .to_degrees()
}

/// Compute all three signals from a landmark set.
///
/// The overall eye metric is the mean of the per-eye ratios. Missing points
/// zero the affected signal rather than failing the tick.
pub fn compute(landmarks: &LandmarkSet) -> MetricTriple {
    let left = landmarks
        .gather(&mesh::LEFT_EYE)
        .map(|p| eye_aspect_ratio(&p))
        .unwrap_or(0.0);
    let right = landmarks
        .gather(&mesh::RIGHT_EYE)
        .map(|p| eye_aspect_ratio(&p))
        .unwrap_or(0.0);
    let mar = landmarks
        .gather(&mesh::MOUTH)
        .map(|p| mouth_aspect_ratio(&p))
        .unwrap_or(0.0);
    let tilt_degrees = match (
        landmarks.point(mesh::LEFT_EYE_OUTER),
        landmarks.point(mesh::RIGHT_EYE_OUTER),
    ) {
        (Some(left), Some(right)) => head_tilt_degrees(left, right),
        _ => 0.0,
    };

    MetricTriple {
        ear: (left + right) / 2.0,
        mar,
        tilt_degrees,
    }
}
