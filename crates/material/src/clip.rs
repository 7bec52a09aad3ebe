//! Clips, material groups, and the discovered library snapshot.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use autoclip_common::error::{AutoclipError, AutoclipResult};

use crate::mix::GroupSpec;

/// One source video file. Immutable once discovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Absolute path to the source file.
    pub source_path: PathBuf,

    /// Probed duration in seconds.
    pub duration_secs: f64,

    /// Probed frame width in pixels.
    pub width: u32,

    /// Probed frame height in pixels.
    pub height: u32,
}

impl Clip {
    /// Whether this clip matches the given output dimensions exactly.
    pub fn matches_resolution(&self, width: u32, height: u32) -> bool {
        self.width == width && self.height == height
    }
}

/// A named, weighted pool of interchangeable clips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialGroup {
    /// Display label; defaults to the source folder name.
    pub name: String,

    /// Relative weight in `1..=100`. Weights across participating groups
    /// need not sum to 100; the allocator normalizes.
    pub weight: u32,

    /// Position in the declared playback order. Unique within a plan.
    pub order_index: usize,

    /// The clip pool.
    pub clips: Vec<Clip>,
}

impl MaterialGroup {
    /// Clips no shorter than `min_secs`. Shorter clips cannot be
    /// meaningfully placed and are excluded from sampling entirely.
    pub fn eligible_clips(&self, min_secs: f64) -> Vec<&Clip> {
        self.clips
            .iter()
            .filter(|c| c.duration_secs >= min_secs)
            .collect()
    }

    /// Total duration of eligible clips, without repetition.
    pub fn eligible_duration_secs(&self, min_secs: f64) -> f64 {
        self.eligible_clips(min_secs)
            .iter()
            .map(|c| c.duration_secs)
            .sum()
    }
}

/// The read-only material snapshot taken once per generation request and
/// shared across all batch jobs. No job may mutate it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialLibrary {
    /// The scanned root directory.
    pub root: PathBuf,

    /// Discovered groups, sorted by folder name.
    pub groups: Vec<MaterialGroup>,
}

impl MaterialLibrary {
    /// Look up a discovered group by name.
    pub fn group(&self, name: &str) -> Option<&MaterialGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Resolve the participating groups for a plan: apply the declared
    /// weights and order from the configuration to the discovered pools.
    ///
    /// Fails with a configuration error when no groups participate, a
    /// declared group is missing from the library, a weight is zero, or an
    /// order index repeats.
    pub fn select(&self, specs: &[GroupSpec]) -> AutoclipResult<Vec<MaterialGroup>> {
        if specs.is_empty() {
            return Err(AutoclipError::configuration(
                "no material groups declared for this plan",
            ));
        }

        let mut ordered: Vec<&GroupSpec> = specs.iter().collect();
        ordered.sort_by_key(|s| s.order);

        let mut seen_orders = std::collections::HashSet::new();
        let mut selected = Vec::with_capacity(ordered.len());
        for spec in ordered {
            if spec.weight == 0 || spec.weight > 100 {
                return Err(AutoclipError::configuration(format!(
                    "group '{}' has weight {} (expected 1..=100)",
                    spec.name, spec.weight
                )));
            }
            if !seen_orders.insert(spec.order) {
                return Err(AutoclipError::configuration(format!(
                    "duplicate order index {} (group '{}')",
                    spec.order, spec.name
                )));
            }

            let discovered = self.group(&spec.name).ok_or_else(|| {
                AutoclipError::configuration(format!(
                    "group '{}' not found under {}",
                    spec.name,
                    self.root.display()
                ))
            })?;

            selected.push(MaterialGroup {
                name: spec.name.clone(),
                weight: spec.weight,
                order_index: spec.order,
                clips: discovered.clips.clone(),
            });
        }

        Ok(selected)
    }
}
