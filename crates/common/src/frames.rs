//! Frame-grid time utilities.
//!
//! All planning arithmetic is anchored to the output frame grid: budgets
//! are quantized to whole frames so that per-group rounding error can be
//! collected and assigned deterministically, and timeline invariants are
//! checked against one frame interval of tolerance.

use serde::{Deserialize, Serialize};

/// The sampling grid of a render job, defined by its output frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRate {
    fps: u32,
}

impl FrameRate {
    /// Create a frame rate. Zero is clamped to 1 fps.
    pub fn new(fps: u32) -> Self {
        Self { fps: fps.max(1) }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Duration of a single frame in seconds.
    pub fn interval_secs(&self) -> f64 {
        1.0 / self.fps as f64
    }

    /// Round a duration to the nearest whole frame.
    pub fn quantize_secs(&self, secs: f64) -> f64 {
        (secs * self.fps as f64).round() / self.fps as f64
    }

    /// Number of whole frames covering `secs`, rounded to nearest.
    pub fn frames_for(&self, secs: f64) -> u64 {
        (secs * self.fps as f64).round().max(0.0) as u64
    }

    /// Convert a whole-frame count back to seconds.
    pub fn secs_for(&self, frames: u64) -> f64 {
        frames as f64 / self.fps as f64
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::new(30)
    }
}

/// Whether two durations agree within one frame interval.
pub fn within_one_frame(a_secs: f64, b_secs: f64, rate: FrameRate) -> bool {
    (a_secs - b_secs).abs() <= rate.interval_secs() + 1e-9
}
