//! Seeded clip sampling.
//!
//! Fills one group's time budget with concrete clip selections and trim
//! points. Every call receives an explicit seeded source, so runs are
//! reproducible and safely parallelizable; there is no global random
//! state anywhere in the engine.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use autoclip_common::error::{AutoclipError, AutoclipResult};
use autoclip_material::clip::{Clip, MaterialGroup};

/// Tolerance for duration comparisons; well below one frame at any
/// realistic rate.
const EPS: f64 = 1e-6;

/// Guard against a pool that somehow stops making progress.
const MAX_PASSES: usize = 10_000;

/// Sampler parameters.
#[derive(Debug, Clone, Copy)]
pub struct SamplerConfig {
    /// Clips shorter than this are excluded from sampling entirely, not
    /// just from trimming; they cannot be meaningfully placed.
    pub min_clip_secs: f64,

    /// Whether the pool may be re-drawn once exhausted.
    pub allow_repetition: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            min_clip_secs: 0.2,
            allow_repetition: true,
        }
    }
}

/// One selected clip excerpt, before timeline placement.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledSlice {
    pub clip: Clip,

    /// Cut-in point within the source, in seconds. Trims always cut from
    /// the clip's start.
    pub in_secs: f64,

    /// Cut-out point within the source, in seconds.
    pub out_secs: f64,
}

impl SampledSlice {
    pub fn duration_secs(&self) -> f64 {
        self.out_secs - self.in_secs
    }
}

/// Fill `budget_secs` from the group's pool.
///
/// Clips are drawn in seeded-shuffle order, whole clips first, with the
/// final clip trimmed so the slice durations sum to the budget exactly.
/// An exhausted pool is reshuffled and re-drawn with repetition (when
/// permitted), never placing the same clip in two adjacent slices while
/// the pool offers an alternative.
pub fn sample_group(
    group: &MaterialGroup,
    budget_secs: f64,
    rng: &mut StdRng,
    config: &SamplerConfig,
) -> AutoclipResult<Vec<SampledSlice>> {
    if budget_secs <= EPS {
        return Ok(vec![]);
    }

    let eligible: Vec<&Clip> = group.eligible_clips(config.min_clip_secs);
    if eligible.is_empty() {
        return Err(AutoclipError::insufficient_material(
            &group.name,
            budget_secs,
            0.0,
        ));
    }

    let pool_total: f64 = eligible.iter().map(|c| c.duration_secs).sum();
    if !config.allow_repetition && pool_total + EPS < budget_secs {
        return Err(AutoclipError::insufficient_material(
            &group.name,
            budget_secs,
            pool_total,
        ));
    }

    let mut slices: Vec<SampledSlice> = Vec::new();
    let mut remaining = budget_secs;
    let mut passes = 0;

    while remaining > EPS {
        passes += 1;
        if passes > MAX_PASSES {
            return Err(AutoclipError::insufficient_material(
                &group.name,
                budget_secs,
                budget_secs - remaining,
            ));
        }

        let mut order: Vec<usize> = (0..eligible.len()).collect();
        order.shuffle(rng);

        // Avoid repeating the previous slice's clip across the reshuffle
        // boundary when the pool has an alternative.
        if eligible.len() > 1 {
            if let Some(last) = slices.last() {
                if eligible[order[0]].source_path == last.clip.source_path {
                    order.swap(0, 1);
                }
            }
        }

        for idx in order {
            let clip = eligible[idx];
            if clip.duration_secs <= remaining + EPS {
                slices.push(SampledSlice {
                    clip: clip.clone(),
                    in_secs: 0.0,
                    out_secs: clip.duration_secs,
                });
                remaining -= clip.duration_secs;
            } else {
                slices.push(SampledSlice {
                    clip: clip.clone(),
                    in_secs: 0.0,
                    out_secs: remaining,
                });
                remaining = 0.0;
            }
            if remaining <= EPS {
                break;
            }
        }

        if remaining > EPS && !config.allow_repetition {
            // Unreachable given the pre-check, but keep the invariant
            // explicit rather than spinning.
            return Err(AutoclipError::insufficient_material(
                &group.name,
                budget_secs,
                budget_secs - remaining,
            ));
        }
    }

    tracing::trace!(
        group = %group.name,
        budget_secs,
        slices = slices.len(),
        "Sampled group"
    );
    Ok(slices)
}
