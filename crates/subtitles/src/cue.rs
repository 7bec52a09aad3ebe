//! Timed subtitle cues.

use serde::{Deserialize, Serialize};

/// A single timed subtitle entry.
///
/// Inside a synchronized track, cues are sorted by start, non-overlapping,
/// and end no later than the job's total duration. Raw cues straight from
/// a parser or recognizer carry no such guarantees; [`crate::sync`]
/// establishes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleCue {
    /// Start time in seconds.
    pub start_secs: f64,

    /// End time in seconds.
    pub end_secs: f64,

    /// Cue text. May contain newlines for multi-line display.
    pub text: String,
}

impl SubtitleCue {
    pub fn new(start_secs: f64, end_secs: f64, text: impl Into<String>) -> Self {
        Self {
            start_secs,
            end_secs,
            text: text.into(),
        }
    }

    /// Cue duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let cue = SubtitleCue::new(1.5, 3.0, "hello");
        assert!((cue.duration_secs() - 1.5).abs() < 1e-9);
    }
}
