//! Probe a media file.

use std::path::PathBuf;

use autoclip_material::discover::ClipProber;
use autoclip_render::probe::{probe_audio_duration, FfprobeProber};

pub fn run(path: PathBuf) -> anyhow::Result<()> {
    match FfprobeProber.probe(&path) {
        Ok(meta) => {
            println!("{}", path.display());
            println!("  Duration:   {:.3}s", meta.duration_secs);
            println!("  Resolution: {}x{}", meta.width, meta.height);
            return Ok(());
        }
        Err(e) => {
            tracing::debug!(error = %e, "No video stream, trying audio probe");
        }
    }

    let secs = probe_audio_duration(&path)
        .map_err(|e| anyhow::anyhow!("could not probe {}: {e}", path.display()))?;
    println!("{}", path.display());
    println!("  Duration: {secs:.3}s (audio)");
    Ok(())
}
