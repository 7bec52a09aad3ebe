//! Batch planning.
//!
//! Produces N independent render jobs from one shared configuration. Each
//! variant derives its own seed from the base seed, so jobs diverge in
//! clip selection whenever a pool offers more than one eligible clip,
//! while any single job remains exactly reproducible. Planning is pure
//! and CPU-light; the resource-heavy encode stage lives behind the render
//! boundary and is throttled separately.

use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use autoclip_common::error::{AutoclipError, AutoclipResult};
use autoclip_common::frames::{within_one_frame, FrameRate};
use autoclip_material::clip::{MaterialGroup, MaterialLibrary};
use autoclip_material::mix::{MixConfig, Resolution, SubtitleStyle};
use autoclip_subtitles::cue::SubtitleCue;
use autoclip_subtitles::sync::{synchronize_generated, synchronize_provided, SynchronizerConfig};

use crate::allocate::allocate;
use crate::observe::{CancellationToken, PlanObserver};
use crate::sample::{sample_group, SamplerConfig};
use crate::timeline::{compile_timeline, timeline_span_secs, TimelineSegment};

/// A fully-specified plan for one output file, ready for the external
/// renderer. Constructed fresh per job and discarded after hand-off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderJob {
    /// Zero-based variant number within the batch.
    pub variant_index: usize,

    /// The seed this variant was planned with.
    pub seed: u64,

    /// Flat, time-ordered, gap-free segment sequence.
    pub timeline: Vec<TimelineSegment>,

    /// Synchronized subtitle cues.
    pub cues: Vec<SubtitleCue>,

    /// Output resolution.
    pub resolution: Resolution,

    /// Output frame rate.
    pub fps: u32,

    /// Total output duration in seconds.
    pub total_secs: f64,

    /// Narration audio track, if any.
    pub audio_path: Option<PathBuf>,

    /// Optional background music reference.
    pub bgm_ref: Option<PathBuf>,

    /// Subtitle burn-in styling.
    pub subtitle_style: SubtitleStyle,

    /// Where the renderer writes the finished file.
    pub output_path: PathBuf,
}

/// Structured record of a variant that could not be planned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFailure {
    pub variant_index: usize,
    pub kind: String,
    pub message: String,
    /// The offending group, when the error names one.
    pub group: Option<String>,
}

/// Per-variant planning result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum JobOutcome {
    Planned(RenderJob),
    Failed(JobFailure),
}

/// The complete batch plan with per-job status. One job's failure never
/// invalidates the others.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchPlan {
    pub jobs: Vec<JobOutcome>,

    /// True when planning stopped early at a cancellation boundary.
    pub cancelled: bool,
}

impl BatchPlan {
    pub fn planned_jobs(&self) -> impl Iterator<Item = &RenderJob> {
        self.jobs.iter().filter_map(|outcome| match outcome {
            JobOutcome::Planned(job) => Some(job),
            JobOutcome::Failed(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobFailure> {
        self.jobs.iter().filter_map(|outcome| match outcome {
            JobOutcome::Failed(failure) => Some(failure),
            JobOutcome::Planned(_) => None,
        })
    }
}

/// Everything planning needs, assembled by the caller. The library is the
/// read-only snapshot taken at discovery time; raw cues come from the SRT
/// parser or the recognition collaborator.
#[derive(Debug)]
pub struct BatchRequest<'a> {
    pub library: &'a MaterialLibrary,
    pub config: &'a MixConfig,

    /// Resolved total target duration in seconds.
    pub total_secs: f64,

    /// Unsynchronized cues.
    pub raw_cues: Vec<SubtitleCue>,

    /// Whether `raw_cues` came from the recognizer (enables fragment
    /// merging) rather than a provided file.
    pub cues_generated: bool,

    /// Directory output files are placed in.
    pub output_dir: PathBuf,
}

/// Plan one variant: allocate, sample every group, compile the timeline.
pub fn plan_job(
    variant_index: usize,
    seed: u64,
    groups: &[MaterialGroup],
    cues: &[SubtitleCue],
    request: &BatchRequest<'_>,
    observer: &dyn PlanObserver,
) -> AutoclipResult<RenderJob> {
    let config = request.config;
    let grid = FrameRate::new(config.fps);

    let plan = allocate(groups, request.total_secs, grid)?;
    observer.on_allocation(variant_index, &plan);

    let sampler = SamplerConfig {
        min_clip_secs: config.min_clip_secs,
        allow_repetition: config.allow_repetition,
    };
    let mut rng = StdRng::seed_from_u64(seed);

    let mut per_group = Vec::with_capacity(groups.len());
    for (group, entry) in groups.iter().zip(&plan.entries) {
        per_group.push(sample_group(group, entry.budget_secs, &mut rng, &sampler)?);
    }

    let timeline = compile_timeline(&per_group, config.resolution, config.scale_policy);
    debug_assert!(within_one_frame(
        timeline_span_secs(&timeline),
        request.total_secs,
        grid
    ));

    Ok(RenderJob {
        variant_index,
        seed,
        timeline,
        cues: cues.to_vec(),
        resolution: config.resolution,
        fps: config.fps,
        total_secs: request.total_secs,
        audio_path: config.audio_path.clone(),
        bgm_ref: config.bgm_ref.clone(),
        subtitle_style: config.subtitle_style.clone(),
        output_path: request
            .output_dir
            .join(format!("variant_{}.mp4", variant_index + 1)),
    })
}

/// Plan the whole batch.
///
/// Configuration problems shared by every variant (invalid config, unknown
/// groups) fail the call; anything scoped to a single variant is recorded
/// in that job's outcome and planning continues. The cancellation flag is
/// honored between job boundaries only.
pub fn plan_batch(
    request: &BatchRequest<'_>,
    observer: &dyn PlanObserver,
    cancel: &CancellationToken,
) -> AutoclipResult<BatchPlan> {
    request.config.validate()?;
    let groups = request.library.select(&request.config.groups)?;

    let sync_config = SynchronizerConfig {
        offset_secs: request.config.offset_secs,
        min_cue_secs: request.config.min_cue_secs,
    };
    // Cues are shared by every variant; synchronize once against the
    // common duration and attach a copy per job.
    let synchronized = if request.cues_generated {
        synchronize_generated(request.raw_cues.clone(), request.total_secs, &sync_config)
    } else {
        synchronize_provided(request.raw_cues.clone(), request.total_secs, &sync_config)
    };

    let cues = match synchronized {
        Ok(cues) => cues,
        Err(e) => {
            // Alignment failure hits each variant identically; report it
            // per job rather than crashing the host.
            tracing::warn!(error = %e, "Subtitle synchronization failed for all variants");
            let jobs: Vec<JobOutcome> = (0..request.config.total_variants)
                .map(|k| JobOutcome::Failed(failure_from_error(k, &e)))
                .collect();
            let plan = BatchPlan {
                jobs,
                cancelled: false,
            };
            observer.on_batch_complete(&plan);
            return Ok(plan);
        }
    };

    let mut jobs = Vec::with_capacity(request.config.total_variants);
    let mut cancelled = false;

    for variant_index in 0..request.config.total_variants {
        if cancel.is_cancelled() {
            tracing::info!(
                planned = jobs.len(),
                requested = request.config.total_variants,
                "Batch planning cancelled"
            );
            cancelled = true;
            break;
        }

        let seed = request.config.base_seed.wrapping_add(variant_index as u64);
        let outcome = match plan_job(variant_index, seed, &groups, &cues, request, observer) {
            Ok(job) => {
                tracing::info!(
                    variant = variant_index,
                    seed,
                    segments = job.timeline.len(),
                    "Variant planned"
                );
                JobOutcome::Planned(job)
            }
            Err(e) => {
                tracing::warn!(variant = variant_index, error = %e, "Variant planning failed");
                JobOutcome::Failed(failure_from_error(variant_index, &e))
            }
        };
        observer.on_job_complete(variant_index, &outcome);
        jobs.push(outcome);
    }

    let plan = BatchPlan { jobs, cancelled };
    observer.on_batch_complete(&plan);
    Ok(plan)
}

fn failure_from_error(variant_index: usize, error: &AutoclipError) -> JobFailure {
    let group = match error {
        AutoclipError::InsufficientMaterial { group, .. } => Some(group.clone()),
        _ => None,
    };
    JobFailure {
        variant_index,
        kind: error.kind().to_string(),
        message: error.to_string(),
        group,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoclip_material::clip::Clip;
    use autoclip_material::mix::{GroupSpec, SubtitleMode};
    use crate::observe::NoopObserver;

    fn clip(name: &str, secs: f64) -> Clip {
        Clip {
            source_path: PathBuf::from(format!("/assets/{name}")),
            duration_secs: secs,
            width: 1080,
            height: 1920,
        }
    }

    fn library() -> MaterialLibrary {
        MaterialLibrary {
            root: PathBuf::from("/assets"),
            groups: vec![
                MaterialGroup {
                    name: "intro".into(),
                    weight: 1,
                    order_index: 0,
                    clips: vec![clip("intro/a.mp4", 10.0), clip("intro/b.mp4", 15.0)],
                },
                MaterialGroup {
                    name: "body".into(),
                    weight: 1,
                    order_index: 1,
                    clips: vec![clip("body/c.mp4", 8.0), clip("body/d.mp4", 9.0)],
                },
            ],
        }
    }

    fn config() -> MixConfig {
        MixConfig {
            audio_path: Some(PathBuf::from("/assets/narration.mp3")),
            groups: vec![
                GroupSpec {
                    name: "intro".into(),
                    weight: 60,
                    order: 0,
                },
                GroupSpec {
                    name: "body".into(),
                    weight: 40,
                    order: 1,
                },
            ],
            total_variants: 3,
            subtitle_mode: SubtitleMode::Provided {
                path: PathBuf::from("/assets/track.srt"),
            },
            base_seed: 99,
            ..MixConfig::default()
        }
    }

    fn request<'a>(library: &'a MaterialLibrary, config: &'a MixConfig) -> BatchRequest<'a> {
        BatchRequest {
            library,
            config,
            total_secs: 30.0,
            raw_cues: vec![SubtitleCue::new(0.0, 2.0, "hello")],
            cues_generated: false,
            output_dir: PathBuf::from("/out/batch"),
        }
    }

    #[test]
    fn test_batch_plans_every_variant() {
        let library = library();
        let config = config();
        let req = request(&library, &config);

        let batch = plan_batch(&req, &NoopObserver, &CancellationToken::new()).unwrap();
        assert_eq!(batch.jobs.len(), 3);
        assert_eq!(batch.planned_jobs().count(), 3);
        assert!(!batch.cancelled);

        for job in batch.planned_jobs() {
            let span = timeline_span_secs(&job.timeline);
            assert!((span - 30.0).abs() < 1.0 / 30.0 + 1e-9);
            assert_eq!(job.cues.len(), 1);
        }
    }

    #[test]
    fn test_variants_get_sequential_seeds_and_paths() {
        let library = library();
        let config = config();
        let req = request(&library, &config);

        let batch = plan_batch(&req, &NoopObserver, &CancellationToken::new()).unwrap();
        let jobs: Vec<&RenderJob> = batch.planned_jobs().collect();
        assert_eq!(jobs[0].seed, 99);
        assert_eq!(jobs[2].seed, 101);
        assert_eq!(jobs[0].output_path, PathBuf::from("/out/batch/variant_1.mp4"));
        assert_eq!(jobs[2].output_path, PathBuf::from("/out/batch/variant_3.mp4"));
    }

    #[test]
    fn test_insufficient_group_fails_only_its_jobs() {
        let mut library = library();
        // Starve one group: a single clip below the eligibility floor.
        library.groups[1].clips = vec![clip("body/tiny.mp4", 0.05)];
        let config = config();
        let req = request(&library, &config);

        let batch = plan_batch(&req, &NoopObserver, &CancellationToken::new()).unwrap();
        assert_eq!(batch.planned_jobs().count(), 0);
        let failure = batch.failures().next().unwrap();
        assert_eq!(failure.kind, "insufficient_material");
        assert_eq!(failure.group.as_deref(), Some("body"));
        // The batch itself still completed with a full status list.
        assert_eq!(batch.jobs.len(), 3);
    }

    #[test]
    fn test_unknown_group_is_boundary_error() {
        let library = library();
        let mut config = config();
        config.groups[0].name = "missing".into();
        let req = request(&library, &config);

        let err = plan_batch(&req, &NoopObserver, &CancellationToken::new()).unwrap_err();
        assert_eq!(err.kind(), "configuration");
    }

    #[test]
    fn test_cancellation_stops_between_jobs() {
        let library = library();
        let config = config();
        let req = request(&library, &config);

        let cancel = CancellationToken::new();
        cancel.cancel();
        let batch = plan_batch(&req, &NoopObserver, &cancel).unwrap();
        assert!(batch.cancelled);
        assert!(batch.jobs.is_empty());
    }

    #[test]
    fn test_alignment_failure_reported_per_job() {
        let library = library();
        let config = config();
        let mut req = request(&library, &config);
        // Every cue starts past the end of the timeline.
        req.raw_cues = vec![SubtitleCue::new(50.0, 51.0, "late")];

        let batch = plan_batch(&req, &NoopObserver, &CancellationToken::new()).unwrap();
        assert_eq!(batch.jobs.len(), 3);
        assert!(batch
            .failures()
            .all(|f| f.kind == "subtitle_alignment"));
    }
}
