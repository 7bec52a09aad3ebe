//! Plan and render a batch of variants.

use std::path::PathBuf;
use std::sync::Arc;

use autoclip_common::config::AppConfig;
use autoclip_engine::batch::{plan_batch, BatchRequest};
use autoclip_engine::observe::CancellationToken;
use autoclip_render::backend::{FfmpegBackend, RenderBackend};
use autoclip_render::batch::{create_batch_dir, render_batch, BackendFactory, RenderStatus};

use crate::commands::{prepare, ConsoleObserver};
use crate::MixArgs;

pub async fn run(mix: MixArgs, output: PathBuf, max_encodes: usize) -> anyhow::Result<()> {
    let app_config = AppConfig::load();
    let prepared = prepare(&mix)?;

    let batch_dir = create_batch_dir(
        &output,
        prepared.config.output_tag.as_deref(),
        prepared.config.audio_path.as_deref(),
    )?;

    let request = BatchRequest {
        library: &prepared.library,
        config: &prepared.config,
        total_secs: prepared.total_secs,
        raw_cues: prepared.raw_cues.clone(),
        cues_generated: prepared.cues_generated,
        output_dir: batch_dir.clone(),
    };

    let cancel = CancellationToken::new();
    let batch = plan_batch(&request, &ConsoleObserver, &cancel)?;
    if batch.planned_jobs().count() == 0 {
        anyhow::bail!("no variant could be planned; nothing to render");
    }

    let mut encode = app_config.encode.clone();
    encode.fps = prepared.config.fps;
    let factory: BackendFactory = {
        let encode = encode.clone();
        Arc::new(move || -> Box<dyn RenderBackend> {
            Box::new(FfmpegBackend::new(encode.clone()))
        })
    };

    println!(
        "Rendering {} variants (max {} concurrent encodes)...",
        batch.planned_jobs().count(),
        max_encodes
    );
    let outcomes = render_batch(&batch, factory, max_encodes, &cancel).await;

    let mut succeeded = 0usize;
    for outcome in &outcomes {
        match &outcome.status {
            RenderStatus::Completed => {
                succeeded += 1;
                if let Some(path) = &outcome.output_path {
                    println!("  Variant {}: {}", outcome.variant_index + 1, path.display());
                }
            }
            RenderStatus::PlanningFailed { kind, message }
            | RenderStatus::EncodingFailed { kind, message } => {
                println!(
                    "  Variant {}: FAILED ({kind}): {message}",
                    outcome.variant_index + 1
                );
            }
            RenderStatus::Cancelled => {
                println!("  Variant {}: cancelled", outcome.variant_index + 1);
            }
        }
    }

    println!(
        "Batch complete: {succeeded}/{} succeeded, output in {}",
        outcomes.len(),
        batch_dir.display()
    );
    if succeeded == 0 {
        anyhow::bail!("every variant failed to render");
    }
    Ok(())
}
