//! AutoClip Timeline Assembly Engine
//!
//! The deterministic planning core:
//! - **Duration resolution:** Audio probe or subtitle-track fallback
//! - **Weighted allocation:** Frame-exact time budgets per material group
//! - **Clip sampling:** Seeded shuffle, greedy draw, final-clip trim
//! - **Timeline compilation:** Flat, gap-free, resolution-annotated segments
//! - **Batch planning:** N independently seeded variants, per-job status
//!
//! This crate is pure computation — no I/O, no shared mutable state beyond
//! the read-only material snapshot handed in by the caller. Given a seed,
//! all outputs are exactly reproducible.

pub mod allocate;
pub mod batch;
pub mod duration;
pub mod observe;
pub mod sample;
pub mod timeline;

pub use allocate::{allocate, AllocationEntry, AllocationPlan};
pub use batch::{plan_batch, plan_job, BatchPlan, BatchRequest, JobFailure, JobOutcome, RenderJob};
pub use duration::resolve_total_duration;
pub use observe::{CancellationToken, NoopObserver, PlanObserver};
pub use sample::{sample_group, SampledSlice, SamplerConfig};
pub use timeline::{compile_timeline, timeline_span_secs, ScalingDirective, TimelineSegment};
