//! Media probing collaborators backed by ffprobe.

use std::path::Path;
use std::process::Command;

use autoclip_common::error::{AutoclipError, AutoclipResult};
use autoclip_material::discover::{ClipMeta, ClipProber};

/// Production [`ClipProber`] shelling out to ffprobe.
pub struct FfprobeProber;

impl ClipProber for FfprobeProber {
    fn probe(&self, path: &Path) -> AutoclipResult<ClipMeta> {
        let output = Command::new("ffprobe")
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height:format=duration",
                "-of",
                "csv=p=0:s=x",
            ])
            .arg(path)
            .output()
            .map_err(|e| AutoclipError::clip_read(path, format!("failed to run ffprobe: {e}")))?;

        if !output.status.success() {
            return Err(AutoclipError::clip_read(
                path,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        parse_probe_output(&String::from_utf8_lossy(&output.stdout))
            .ok_or_else(|| AutoclipError::clip_read(path, "unparseable ffprobe output"))
    }
}

/// Parse ffprobe csv output: a `WxH` stream line and a duration line.
fn parse_probe_output(raw: &str) -> Option<ClipMeta> {
    let mut width = None;
    let mut height = None;
    let mut duration = None;

    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((w, h)) = line.split_once('x') {
            if let (Ok(w), Ok(h)) = (w.parse::<u32>(), h.parse::<u32>()) {
                width = Some(w);
                height = Some(h);
                continue;
            }
        }
        if let Ok(secs) = line.parse::<f64>() {
            duration = Some(secs);
        }
    }

    match (width, height, duration) {
        (Some(width), Some(height), Some(duration_secs)) if duration_secs > 0.0 => Some(ClipMeta {
            duration_secs,
            width,
            height,
        }),
        _ => None,
    }
}

/// Probe an audio file's duration.
///
/// This is the duration-probe collaborator: a missing or unreadable
/// narration track is a configuration problem, not a clip problem.
pub fn probe_audio_duration(path: &Path) -> AutoclipResult<f64> {
    let output = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "csv=p=0",
        ])
        .arg(path)
        .output()
        .map_err(|e| {
            AutoclipError::configuration(format!(
                "failed to probe audio {}: {e}",
                path.display()
            ))
        })?;

    if !output.status.success() {
        return Err(AutoclipError::configuration(format!(
            "ffprobe failed for audio {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let raw = String::from_utf8_lossy(&output.stdout);
    let secs: f64 = raw.trim().parse().map_err(|_| {
        AutoclipError::configuration(format!(
            "unparseable audio duration '{}' for {}",
            raw.trim(),
            path.display()
        ))
    })?;

    if secs <= 0.0 {
        return Err(AutoclipError::configuration(format!(
            "audio {} has non-positive duration",
            path.display()
        )));
    }
    Ok(secs)
}

/// Whether a binary is reachable on PATH.
pub fn command_exists(binary: &str) -> bool {
    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_output() {
        let meta = parse_probe_output("1920x1080\n12.480000\n").unwrap();
        assert_eq!(meta.width, 1920);
        assert_eq!(meta.height, 1080);
        assert!((meta.duration_secs - 12.48).abs() < 1e-9);
    }

    #[test]
    fn test_parse_probe_output_order_independent() {
        let meta = parse_probe_output("3.5\n1080x1920\n").unwrap();
        assert_eq!(meta.height, 1920);
    }

    #[test]
    fn test_parse_probe_rejects_incomplete_output() {
        assert!(parse_probe_output("1920x1080\n").is_none());
        assert!(parse_probe_output("garbage\n").is_none());
        assert!(parse_probe_output("1920x1080\n0.0\n").is_none());
    }
}
