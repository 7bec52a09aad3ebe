//! Asset preprocessing.
//!
//! Normalizes a folder of raw clips to the target resolution ahead of
//! time, so generation runs spend no encode budget on scale mismatches.
//! Files already at the target pass through untouched.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};

use autoclip_common::error::{AutoclipError, AutoclipResult};
use autoclip_material::discover::{is_video_file, ClipProber};

/// Result of one preprocessing sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreprocessSummary {
    pub converted: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Recursively collect video files under `dir`.
pub fn collect_video_files(dir: &Path) -> AutoclipResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![dir.to_path_buf()];

    while let Some(current) = stack.pop() {
        for entry in std::fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                stack.push(path);
            } else if is_video_file(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// The ffmpeg arguments for normalizing one file: scale to cover the
/// target box, then center-crop to exact size.
pub fn normalize_args(input: &Path, output: &Path, width: u32, height: u32) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-i".to_string(),
        input.display().to_string(),
        "-vf".to_string(),
        format!(
            "scale={width}:{height}:force_original_aspect_ratio=increase,crop={width}:{height}"
        ),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        "faster".to_string(),
        "-crf".to_string(),
        "23".to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        "192k".to_string(),
        "-movflags".to_string(),
        "+faststart".to_string(),
        output.display().to_string(),
    ]
}

/// Normalize every video under `input_dir` into `output_dir`, preserving
/// relative layout. Per-file failures are collected, not fatal.
pub fn preprocess_assets(
    input_dir: &Path,
    output_dir: &Path,
    width: u32,
    height: u32,
    prober: &dyn ClipProber,
) -> AutoclipResult<PreprocessSummary> {
    if !input_dir.is_dir() {
        return Err(AutoclipError::configuration(format!(
            "input directory {} does not exist",
            input_dir.display()
        )));
    }

    let files = collect_video_files(input_dir)?;
    tracing::info!(
        files = files.len(),
        input = %input_dir.display(),
        output = %output_dir.display(),
        "Preprocessing assets"
    );

    let mut summary = PreprocessSummary::default();
    for input in files {
        let relative = input
            .strip_prefix(input_dir)
            .unwrap_or(input.as_path())
            .to_path_buf();
        let output = output_dir.join(&relative);
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent)?;
        }

        match prober.probe(&input) {
            Ok(meta) if meta.width == width && meta.height == height => {
                std::fs::copy(&input, &output)?;
                summary.skipped.push(input);
                continue;
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!(file = %input.display(), error = %e, "Probe failed, skipping");
                summary.failed.push(input);
                continue;
            }
        }

        let status = Command::new("ffmpeg")
            .args(normalize_args(&input, &output, width, height))
            .status();

        match status {
            Ok(status) if status.success() => summary.converted.push(input),
            Ok(status) => {
                tracing::warn!(file = %input.display(), %status, "ffmpeg normalize failed");
                summary.failed.push(input);
            }
            Err(e) => {
                tracing::warn!(file = %input.display(), error = %e, "failed to run ffmpeg");
                summary.failed.push(input);
            }
        }
    }

    Ok(summary)
}
