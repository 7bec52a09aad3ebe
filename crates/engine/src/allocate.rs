//! Weighted time allocation across material groups.

use serde::{Deserialize, Serialize};

use autoclip_common::error::{AutoclipError, AutoclipResult};
use autoclip_common::frames::FrameRate;
use autoclip_material::clip::MaterialGroup;

/// One group's share of the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub group: String,
    pub budget_secs: f64,
}

/// The ordered assignment of time budgets to material groups. Entries
/// preserve declared group order (order controls clip appearance sequence,
/// not just proportion) and budgets sum to the target duration exactly on
/// the frame grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationPlan {
    pub entries: Vec<AllocationEntry>,
}

impl AllocationPlan {
    pub fn total_secs(&self) -> f64 {
        self.entries.iter().map(|e| e.budget_secs).sum()
    }
}

/// Split `total_secs` across `groups` proportionally to their weights.
///
/// Budgets are quantized to whole frames; the rounding remainder is
/// assigned entirely to the last group in declared order. That is a
/// deliberate deterministic tie-break, so repeated runs produce identical
/// plans.
pub fn allocate(
    groups: &[MaterialGroup],
    total_secs: f64,
    grid: FrameRate,
) -> AutoclipResult<AllocationPlan> {
    if groups.is_empty() {
        return Err(AutoclipError::configuration(
            "cannot allocate over zero material groups",
        ));
    }
    if total_secs <= 0.0 {
        return Err(AutoclipError::configuration(format!(
            "target duration must be positive, got {total_secs:.3}s"
        )));
    }

    let weight_sum: u64 = groups.iter().map(|g| g.weight as u64).sum();
    if groups.iter().any(|g| g.weight == 0) || weight_sum == 0 {
        return Err(AutoclipError::configuration(
            "all participating groups need a positive weight",
        ));
    }

    let total_frames = grid.frames_for(total_secs).max(1);
    let mut frames: Vec<u64> = groups
        .iter()
        .map(|g| {
            let share = g.weight as f64 / weight_sum as f64;
            (total_frames as f64 * share).round() as u64
        })
        .collect();

    // Hand the whole rounding remainder to the final group.
    let allocated: u64 = frames.iter().take(frames.len() - 1).sum();
    let last = frames.len() - 1;
    if allocated > total_frames {
        return Err(AutoclipError::configuration(format!(
            "rounding remainder exceeds the last group's budget \
             ({allocated} frames allocated of {total_frames})"
        )));
    }
    frames[last] = total_frames - allocated;

    let entries = groups
        .iter()
        .zip(&frames)
        .map(|(group, &f)| AllocationEntry {
            group: group.name.clone(),
            budget_secs: grid.secs_for(f),
        })
        .collect();

    let plan = AllocationPlan { entries };
    tracing::debug!(
        groups = groups.len(),
        total_secs,
        plan_total = plan.total_secs(),
        "Allocation plan built"
    );
    Ok(plan)
}
