//! Cue synchronization against a compiled timeline.
//!
//! Both subtitle sources funnel through the same correction step: apply the
//! global offset, clamp negative starts, drop cues past the end of the
//! timeline, and repair overlaps by clipping the earlier cue. Generated
//! cues additionally get very short fragments merged first so rapid
//! recognizer output does not flicker on screen.

use autoclip_common::error::{AutoclipError, AutoclipResult};

use crate::cue::SubtitleCue;

/// Synchronizer parameters.
#[derive(Debug, Clone, Copy)]
pub struct SynchronizerConfig {
    /// Global time-offset correction in seconds. Negative shifts cues
    /// earlier, compensating leading silence or recognition lag.
    pub offset_secs: f64,

    /// Generated cues shorter than this are merged into a neighbor.
    pub min_cue_secs: f64,
}

impl Default for SynchronizerConfig {
    fn default() -> Self {
        Self {
            offset_secs: 0.0,
            min_cue_secs: 0.5,
        }
    }
}

/// Synchronize an externally provided track.
pub fn synchronize_provided(
    cues: Vec<SubtitleCue>,
    total_secs: f64,
    config: &SynchronizerConfig,
) -> AutoclipResult<Vec<SubtitleCue>> {
    align(cues, total_secs, config.offset_secs)
}

/// Synchronize raw recognizer output: merge short fragments, then apply
/// the same offset-and-clamp step as the provided path.
pub fn synchronize_generated(
    cues: Vec<SubtitleCue>,
    total_secs: f64,
    config: &SynchronizerConfig,
) -> AutoclipResult<Vec<SubtitleCue>> {
    let merged = merge_short_fragments(cues, config.min_cue_secs);
    align(merged, total_secs, config.offset_secs)
}

/// Merge cues shorter than `min_secs` into the following cue (the trailing
/// cue merges backwards). Text is joined with a space; the merged cue spans
/// both originals.
pub fn merge_short_fragments(cues: Vec<SubtitleCue>, min_secs: f64) -> Vec<SubtitleCue> {
    if min_secs <= 0.0 || cues.len() < 2 {
        return cues;
    }

    let mut merged: Vec<SubtitleCue> = Vec::with_capacity(cues.len());
    let mut pending: Option<SubtitleCue> = None;

    for cue in cues {
        let cue = match pending.take() {
            Some(prev) => SubtitleCue {
                start_secs: prev.start_secs.min(cue.start_secs),
                end_secs: prev.end_secs.max(cue.end_secs),
                text: join_text(&prev.text, &cue.text),
            },
            None => cue,
        };

        if cue.duration_secs() < min_secs {
            pending = Some(cue);
        } else {
            merged.push(cue);
        }
    }

    // A short trailing fragment has no successor; fold it into the last
    // full cue instead of dropping the words.
    if let Some(rest) = pending {
        match merged.last_mut() {
            Some(last) => {
                last.end_secs = last.end_secs.max(rest.end_secs);
                last.text = join_text(&last.text, &rest.text);
            }
            None => merged.push(rest),
        }
    }

    merged
}

fn join_text(a: &str, b: &str) -> String {
    match (a.is_empty(), b.is_empty()) {
        (true, _) => b.to_string(),
        (_, true) => a.to_string(),
        _ => format!("{a} {b}"),
    }
}

/// Offset, clamp, drop, and repair a cue list against the timeline span.
fn align(
    cues: Vec<SubtitleCue>,
    total_secs: f64,
    offset_secs: f64,
) -> AutoclipResult<Vec<SubtitleCue>> {
    let input_len = cues.len();

    let mut shifted: Vec<SubtitleCue> = cues
        .into_iter()
        .map(|cue| SubtitleCue {
            start_secs: cue.start_secs + offset_secs,
            end_secs: cue.end_secs + offset_secs,
            text: cue.text,
        })
        // Drop (not truncate) cues starting at or past the end.
        .filter(|cue| cue.start_secs < total_secs)
        .map(|cue| SubtitleCue {
            start_secs: cue.start_secs.max(0.0),
            end_secs: cue.end_secs.min(total_secs),
            text: cue.text,
        })
        .filter(|cue| cue.end_secs > cue.start_secs)
        .collect();

    shifted.sort_by(|a, b| a.start_secs.total_cmp(&b.start_secs));

    // Overlaps are repaired by clipping the earlier cue's end to the next
    // cue's start rather than rejecting the whole track.
    for i in 0..shifted.len().saturating_sub(1) {
        let next_start = shifted[i + 1].start_secs;
        if shifted[i].end_secs > next_start {
            shifted[i].end_secs = next_start;
        }
    }
    let repaired: Vec<SubtitleCue> = shifted
        .into_iter()
        .filter(|cue| cue.end_secs > cue.start_secs)
        .collect();

    if repaired.is_empty() && input_len > 0 {
        return Err(AutoclipError::subtitle_alignment(format!(
            "all {input_len} cues collapsed during correction \
             (offset {offset_secs:+.3}s, timeline {total_secs:.3}s)"
        )));
    }

    debug_assert!(repaired
        .windows(2)
        .all(|w| w[0].end_secs <= w[1].start_secs));

    Ok(repaired)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(start: f64, end: f64, text: &str) -> SubtitleCue {
        SubtitleCue::new(start, end, text)
    }

    #[test]
    fn test_negative_start_clamped_to_zero() {
        let cues = vec![cue(0.2, 1.5, "a"), cue(2.0, 3.0, "b")];
        let config = SynchronizerConfig {
            offset_secs: -0.5,
            ..Default::default()
        };
        let out = synchronize_provided(cues, 30.0, &config).unwrap();
        assert_eq!(out[0].start_secs, 0.0);
        assert!((out[0].end_secs - 1.0).abs() < 1e-9);
        assert!((out[1].start_secs - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_cues_past_end_are_dropped_not_truncated() {
        let cues = vec![cue(1.0, 2.0, "keep"), cue(31.0, 33.0, "drop")];
        let out = synchronize_provided(cues, 30.0, &SynchronizerConfig::default()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "keep");
    }

    #[test]
    fn test_end_clamped_to_total_duration() {
        let cues = vec![cue(28.0, 35.0, "tail")];
        let out = synchronize_provided(cues, 30.0, &SynchronizerConfig::default()).unwrap();
        assert!((out[0].end_secs - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlap_repaired_by_clipping_earlier_cue() {
        let cues = vec![cue(0.0, 3.0, "a"), cue(2.0, 4.0, "b")];
        let out = synchronize_provided(cues, 30.0, &SynchronizerConfig::default()).unwrap();
        assert!((out[0].end_secs - 2.0).abs() < 1e-9);
        assert!((out[1].start_secs - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_unsorted_input_is_ordered() {
        let cues = vec![cue(5.0, 6.0, "late"), cue(1.0, 2.0, "early")];
        let out = synchronize_provided(cues, 30.0, &SynchronizerConfig::default()).unwrap();
        assert_eq!(out[0].text, "early");
        assert!(out.windows(2).all(|w| w[0].end_secs <= w[1].start_secs));
    }

    #[test]
    fn test_pathological_track_raises_alignment_error() {
        // Every cue lands past the end after the offset.
        let cues = vec![cue(40.0, 41.0, "a"), cue(42.0, 43.0, "b")];
        let err = synchronize_provided(cues, 30.0, &SynchronizerConfig::default()).unwrap_err();
        assert_eq!(err.kind(), "subtitle_alignment");
    }

    #[test]
    fn test_empty_input_stays_empty() {
        let out = synchronize_provided(vec![], 30.0, &SynchronizerConfig::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_merge_short_fragments_into_next() {
        let cues = vec![cue(0.0, 0.2, "one"), cue(0.2, 1.5, "two"), cue(2.0, 3.0, "three")];
        let merged = merge_short_fragments(cues, 0.5);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text, "one two");
        assert!((merged[0].start_secs - 0.0).abs() < 1e-9);
        assert!((merged[0].end_secs - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_merge_trailing_fragment_into_previous() {
        let cues = vec![cue(0.0, 1.5, "body"), cue(1.6, 1.7, "tail")];
        let merged = merge_short_fragments(cues, 0.5);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "body tail");
        assert!((merged[0].end_secs - 1.7).abs() < 1e-9);
    }

    #[test]
    fn test_merge_chains_consecutive_fragments() {
        let cues = vec![cue(0.0, 0.1, "a"), cue(0.1, 0.2, "b"), cue(0.2, 1.0, "c")];
        let merged = merge_short_fragments(cues, 0.5);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].text, "a b c");
    }

    #[test]
    fn test_generated_path_merges_then_aligns() {
        let cues = vec![cue(0.0, 0.2, "hi"), cue(0.2, 2.0, "there")];
        let config = SynchronizerConfig {
            offset_secs: 0.0,
            min_cue_secs: 0.5,
        };
        let out = synchronize_generated(cues, 30.0, &config).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].text, "hi there");
    }
}
