//! Timeline compilation.
//!
//! Concatenates per-group slice lists into one flat, time-ordered,
//! gap-free segment sequence, annotating each segment with the transform
//! the external renderer must apply to reach the job's target resolution.
//! The compiler never touches pixels.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use autoclip_material::mix::{Resolution, ScalePolicy};

use crate::sample::SampledSlice;

/// Normalization directive for a segment whose source resolution differs
/// from the job's target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "transform")]
pub enum ScalingDirective {
    /// Source already matches the target; pass through untouched.
    None,
    /// Scale to fill the target frame, then center-crop the overflow.
    ScaleCrop { width: u32, height: u32 },
    /// Scale to fit inside the target frame, padding with black bars.
    Letterbox { width: u32, height: u32 },
}

/// One concrete clip excerpt placed at a specific position on the final
/// timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSegment {
    /// Source clip file.
    pub source_path: PathBuf,

    /// Cut-in point within the source, seconds.
    pub in_secs: f64,

    /// Cut-out point within the source, seconds.
    pub out_secs: f64,

    /// Placement start on the output timeline, seconds.
    pub timeline_start_secs: f64,

    /// Placement end on the output timeline, seconds.
    pub timeline_end_secs: f64,

    /// Required normalization transform.
    pub scaling: ScalingDirective,
}

impl TimelineSegment {
    /// Excerpt length in source time; equals the timeline span by
    /// construction.
    pub fn duration_secs(&self) -> f64 {
        self.out_secs - self.in_secs
    }
}

/// Concatenate per-group slices (in allocator order) into the final
/// segment sequence with cumulative timeline positions.
pub fn compile_timeline(
    per_group: &[Vec<SampledSlice>],
    resolution: Resolution,
    policy: ScalePolicy,
) -> Vec<TimelineSegment> {
    let target_w = resolution.width();
    let target_h = resolution.height();

    let mut segments = Vec::with_capacity(per_group.iter().map(Vec::len).sum());
    let mut cursor = 0.0_f64;

    for slices in per_group {
        for slice in slices {
            let duration = slice.duration_secs();
            let scaling = if slice.clip.matches_resolution(target_w, target_h) {
                ScalingDirective::None
            } else {
                match policy {
                    ScalePolicy::ScaleCrop => ScalingDirective::ScaleCrop {
                        width: target_w,
                        height: target_h,
                    },
                    ScalePolicy::Letterbox => ScalingDirective::Letterbox {
                        width: target_w,
                        height: target_h,
                    },
                }
            };

            segments.push(TimelineSegment {
                source_path: slice.clip.source_path.clone(),
                in_secs: slice.in_secs,
                out_secs: slice.out_secs,
                timeline_start_secs: cursor,
                timeline_end_secs: cursor + duration,
                scaling,
            });
            cursor += duration;
        }
    }

    segments
}

/// Total span of a compiled timeline in seconds.
pub fn timeline_span_secs(segments: &[TimelineSegment]) -> f64 {
    segments
        .last()
        .map(|s| s.timeline_end_secs)
        .unwrap_or(0.0)
}
