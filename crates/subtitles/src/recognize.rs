//! Speech recognition collaborator boundary.
//!
//! The engine never runs ASR inference itself; it hands the narration audio
//! to whatever implements [`SpeechRecognizer`] and treats the returned raw
//! cues as untrusted input for the synchronizer.

use std::path::Path;

use serde::{Deserialize, Serialize};

use autoclip_common::error::{AutoclipError, AutoclipResult};

use crate::cue::SubtitleCue;

/// Configuration for recognition requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionConfig {
    /// Language hint (ISO 639-1 code, e.g., "zh", "en").
    pub language: Option<String>,

    /// Inference window in seconds; long inputs are processed in windows
    /// of this size to bound memory.
    pub batch_window_secs: u32,
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            language: None,
            batch_window_secs: 60,
        }
    }
}

/// Collaborator that turns narration audio into raw timed cues.
///
/// Implementations may fail or return empty output; callers decide whether
/// a provided fallback track exists.
pub trait SpeechRecognizer {
    fn transcribe(
        &self,
        audio_path: &Path,
        config: &RecognitionConfig,
    ) -> AutoclipResult<Vec<SubtitleCue>>;
}

/// Run the recognizer and enforce the non-empty contract.
///
/// A collaborator failure or an empty transcript becomes
/// `SubtitleGenerationError`; the caller supplies the provided-track
/// fallback, if any, before reaching this point.
pub fn recognize_cues(
    recognizer: &dyn SpeechRecognizer,
    audio_path: &Path,
    config: &RecognitionConfig,
) -> AutoclipResult<Vec<SubtitleCue>> {
    tracing::info!(
        audio = %audio_path.display(),
        language = ?config.language,
        "Requesting transcription"
    );

    let cues = recognizer
        .transcribe(audio_path, config)
        .map_err(|e| AutoclipError::subtitle_generation(format!("recognizer failed: {e}")))?;

    if cues.is_empty() {
        return Err(AutoclipError::subtitle_generation(format!(
            "recognizer returned no cues for {}",
            audio_path.display()
        )));
    }

    tracing::info!(cues = cues.len(), "Transcription complete");
    Ok(cues)
}
