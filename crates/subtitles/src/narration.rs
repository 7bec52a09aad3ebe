//! Text-to-speech collaborator boundary and script utilities.

use std::path::Path;
use std::time::Duration;

use autoclip_common::error::{AutoclipError, AutoclipResult};

/// Collaborator that synthesizes narration audio from text.
pub trait TextToSpeech {
    fn synthesize(&self, text: &str, voice: &str, output: &Path) -> AutoclipResult<()>;
}

/// Attempts before giving up on a flaky synthesis backend.
const MAX_TTS_ATTEMPTS: u32 = 3;

/// Synthesize with bounded retries. Network-backed voices fail
/// transiently; each attempt after the first waits one second.
pub fn synthesize_with_retry(
    tts: &dyn TextToSpeech,
    text: &str,
    voice: &str,
    output: &Path,
) -> AutoclipResult<()> {
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut last_error = None;
    for attempt in 1..=MAX_TTS_ATTEMPTS {
        match tts.synthesize(text, voice, output) {
            Ok(()) => return Ok(()),
            Err(e) => {
                tracing::warn!(
                    attempt,
                    max = MAX_TTS_ATTEMPTS,
                    error = %e,
                    "TTS attempt failed"
                );
                last_error = Some(e);
                if attempt < MAX_TTS_ATTEMPTS {
                    std::thread::sleep(Duration::from_secs(1));
                }
            }
        }
    }

    Err(AutoclipError::subtitle_generation(format!(
        "TTS failed after {MAX_TTS_ATTEMPTS} attempts: {}",
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )))
}

/// Split a script into sentences on terminal punctuation and newlines,
/// dropping empty fragments.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(['。', '！', '？', '\n'])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
