//! Total duration resolution.
//!
//! A render job's length comes from the narration audio when one exists;
//! without audio it falls back to the end of the subtitle track plus a
//! short trailing pad so the last cue does not end on the final frame.

use autoclip_common::error::{AutoclipError, AutoclipResult};
use autoclip_subtitles::cue::SubtitleCue;

/// Resolve the total target duration for a render job.
///
/// `audio_duration_secs` is the probed narration length, if a track was
/// supplied. Fails with a configuration error when neither source is
/// available.
pub fn resolve_total_duration(
    audio_duration_secs: Option<f64>,
    cues: &[SubtitleCue],
    trailing_pad_secs: f64,
) -> AutoclipResult<f64> {
    if let Some(secs) = audio_duration_secs {
        if secs > 0.0 {
            return Ok(secs);
        }
        return Err(AutoclipError::configuration(format!(
            "audio track has non-positive duration {secs:.3}s"
        )));
    }

    let last_end = cues
        .iter()
        .map(|c| c.end_secs)
        .fold(f64::NEG_INFINITY, f64::max);
    if last_end > 0.0 {
        return Ok(last_end + trailing_pad_secs);
    }

    Err(AutoclipError::configuration(
        "no duration source: neither audio track nor subtitle cues supplied",
    ))
}
