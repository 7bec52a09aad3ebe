//! Normalize raw assets to a target resolution.

use std::path::PathBuf;

use autoclip_render::preprocess::preprocess_assets;
use autoclip_render::FfprobeProber;

use crate::commands::parse_resolution;

pub fn run(input: PathBuf, output: PathBuf, resolution: String) -> anyhow::Result<()> {
    let resolution = parse_resolution(&resolution)?;

    println!(
        "Normalizing {} -> {} at {}x{}",
        input.display(),
        output.display(),
        resolution.width(),
        resolution.height()
    );

    let summary = preprocess_assets(
        &input,
        &output,
        resolution.width(),
        resolution.height(),
        &FfprobeProber,
    )?;

    println!(
        "Done: {} converted, {} already at target, {} failed",
        summary.converted.len(),
        summary.skipped.len(),
        summary.failed.len()
    );
    for path in &summary.failed {
        println!("  failed: {}", path.display());
    }

    Ok(())
}
