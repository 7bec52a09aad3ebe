//! Throttled batch execution and the output directory convention.
//!
//! Planning is embarrassingly parallel and cheap; encoding is not. Each
//! batch renders its planned jobs under a bounded concurrency limit, one
//! semaphore permit per encode process, and reports a per-job status list
//! instead of aborting on the first failure.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use autoclip_common::error::{AutoclipError, AutoclipResult};
use autoclip_engine::batch::{BatchPlan, JobOutcome, RenderJob};
use autoclip_engine::observe::CancellationToken;

use crate::backend::RenderBackend;

/// Factory producing one backend per concurrent encode.
pub type BackendFactory = Arc<dyn Fn() -> Box<dyn RenderBackend> + Send + Sync>;

/// Final status of one batch variant after planning and rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderOutcome {
    pub variant_index: usize,
    pub output_path: Option<PathBuf>,
    pub status: RenderStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum RenderStatus {
    Completed,
    PlanningFailed { kind: String, message: String },
    EncodingFailed { kind: String, message: String },
    Cancelled,
}

impl RenderStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, RenderStatus::Completed)
    }
}

/// Strip a name down to `[A-Za-z0-9_-]`, the alphabet safe in every
/// output path we generate.
pub fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Compose the batch directory name: `{tag_}{timestamp}_{audio_stem}`.
pub fn batch_dir_name(tag: Option<&str>, audio_path: Option<&Path>, timestamp: &str) -> String {
    let stem = audio_path
        .and_then(|p| p.file_stem())
        .and_then(|s| s.to_str())
        .map(sanitize_component)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "mix".to_string());

    let base = format!("{timestamp}_{stem}");
    match tag.map(sanitize_component).filter(|t| !t.is_empty()) {
        Some(tag) => format!("{tag}_{base}"),
        None => base,
    }
}

/// Create the timestamped batch output directory under `output_root`.
pub fn create_batch_dir(
    output_root: &Path,
    tag: Option<&str>,
    audio_path: Option<&Path>,
) -> AutoclipResult<PathBuf> {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    let dir = output_root.join(batch_dir_name(tag, audio_path, &timestamp));
    std::fs::create_dir_all(&dir)?;
    tracing::info!(dir = %dir.display(), "Batch output directory created");
    Ok(dir)
}

/// Write the per-output metadata sidecar: every segment's source file,
/// trim points, and timeline placement.
pub fn write_metadata_sidecar(job: &RenderJob) -> AutoclipResult<PathBuf> {
    let path = job.output_path.with_extension("metadata.json");
    let payload = serde_json::json!({
        "variant_index": job.variant_index,
        "seed": job.seed,
        "total_secs": job.total_secs,
        "resolution": { "width": job.resolution.width(), "height": job.resolution.height() },
        "segments": job.timeline,
    });
    std::fs::write(&path, serde_json::to_string_pretty(&payload)?)?;
    Ok(path)
}

/// Render every planned job in the batch under `max_concurrent` encodes.
///
/// Planning failures pass through as per-job statuses; cancellation is
/// honored between job boundaries, leaving already-started encodes to
/// finish. The returned list is ordered by variant index.
pub async fn render_batch(
    plan: &BatchPlan,
    backend_factory: BackendFactory,
    max_concurrent: usize,
    cancel: &CancellationToken,
) -> Vec<RenderOutcome> {
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut outcomes: Vec<RenderOutcome> = Vec::with_capacity(plan.jobs.len());
    let mut handles = Vec::new();

    for outcome in &plan.jobs {
        match outcome {
            JobOutcome::Failed(failure) => {
                outcomes.push(RenderOutcome {
                    variant_index: failure.variant_index,
                    output_path: None,
                    status: RenderStatus::PlanningFailed {
                        kind: failure.kind.clone(),
                        message: failure.message.clone(),
                    },
                });
            }
            JobOutcome::Planned(job) => {
                if cancel.is_cancelled() {
                    outcomes.push(RenderOutcome {
                        variant_index: job.variant_index,
                        output_path: None,
                        status: RenderStatus::Cancelled,
                    });
                    continue;
                }

                let job = job.clone();
                let factory = Arc::clone(&backend_factory);
                let semaphore = Arc::clone(&semaphore);
                handles.push(tokio::spawn(async move {
                    let variant_index = job.variant_index;
                    let output_path = job.output_path.clone();

                    let Ok(_permit) = semaphore.acquire_owned().await else {
                        return RenderOutcome {
                            variant_index,
                            output_path: None,
                            status: RenderStatus::Cancelled,
                        };
                    };

                    let result = tokio::task::spawn_blocking(move || render_one(&job, &*factory))
                        .await
                        .unwrap_or_else(|e| {
                            Err(AutoclipError::encoding(
                                &output_path,
                                format!("render task panicked: {e}"),
                            ))
                        });

                    match result {
                        Ok(path) => RenderOutcome {
                            variant_index,
                            output_path: Some(path),
                            status: RenderStatus::Completed,
                        },
                        Err(e) => RenderOutcome {
                            variant_index,
                            output_path: None,
                            status: RenderStatus::EncodingFailed {
                                kind: e.kind().to_string(),
                                message: e.to_string(),
                            },
                        },
                    }
                }));
            }
        }
    }

    for handle in handles {
        match handle.await {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => tracing::error!(error = %e, "Render task join failed"),
        }
    }

    outcomes.sort_by_key(|o| o.variant_index);
    outcomes
}

fn render_one(job: &RenderJob, factory: &dyn Fn() -> Box<dyn RenderBackend>) -> AutoclipResult<PathBuf> {
    let mut backend = factory();
    if !backend.is_available() {
        return Err(AutoclipError::encoding(
            &job.output_path,
            format!("render backend '{}' is not available", backend.name()),
        ));
    }

    write_metadata_sidecar(job)?;
    backend.render(job, None)?;
    Ok(job.output_path.clone())
}
