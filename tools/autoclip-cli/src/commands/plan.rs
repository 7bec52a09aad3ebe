//! Plan a batch without rendering.

use std::path::PathBuf;

use autoclip_engine::batch::{plan_batch, BatchRequest, JobOutcome};
use autoclip_engine::observe::CancellationToken;

use crate::commands::{prepare, ConsoleObserver};
use crate::MixArgs;

pub fn run(mix: MixArgs, json: Option<PathBuf>) -> anyhow::Result<()> {
    let prepared = prepare(&mix)?;

    let request = BatchRequest {
        library: &prepared.library,
        config: &prepared.config,
        total_secs: prepared.total_secs,
        raw_cues: prepared.raw_cues.clone(),
        cues_generated: prepared.cues_generated,
        output_dir: PathBuf::from("output").join("dry-run"),
    };

    let batch = plan_batch(&request, &ConsoleObserver, &CancellationToken::new())?;

    for outcome in &batch.jobs {
        let JobOutcome::Planned(job) = outcome else {
            continue;
        };
        println!("\nVariant {} (seed {}):", job.variant_index + 1, job.seed);
        for segment in &job.timeline {
            println!(
                "  {:>8.3}s - {:>8.3}s  {} [{:.3}s - {:.3}s]",
                segment.timeline_start_secs,
                segment.timeline_end_secs,
                segment.source_path.display(),
                segment.in_secs,
                segment.out_secs,
            );
        }
    }

    if let Some(path) = json {
        std::fs::write(&path, serde_json::to_string_pretty(&batch)?)?;
        println!("\nBatch plan written to {}", path.display());
    }

    Ok(())
}
