//! Speech recognition via an external whisper.cpp-style binary.
//!
//! The engine only defines the collaborator trait; this is the CLI's
//! wiring for it. The binary is expected to accept `-f <audio>` and to
//! write an SRT next to the given output prefix (`-osrt -of <prefix>`),
//! the whisper.cpp command-line convention.

use std::path::{Path, PathBuf};
use std::process::Command;

use autoclip_common::error::{AutoclipError, AutoclipResult};
use autoclip_subtitles::cue::SubtitleCue;
use autoclip_subtitles::recognize::{RecognitionConfig, SpeechRecognizer};
use autoclip_subtitles::srt::load_srt;

/// Environment variable naming the recognizer binary.
const BINARY_ENV: &str = "AUTOCLIP_WHISPER_BIN";

/// Environment variable naming the model file passed via `-m`.
const MODEL_ENV: &str = "AUTOCLIP_WHISPER_MODEL";

/// Recognizer that shells out to a whisper.cpp-compatible binary.
pub struct WhisperCliRecognizer {
    binary: String,
    model: Option<PathBuf>,
}

impl WhisperCliRecognizer {
    pub fn new(binary: impl Into<String>, model: Option<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            model,
        }
    }

    /// Configure from the environment, defaulting to `whisper-cli`.
    pub fn from_env() -> Self {
        let binary = std::env::var(BINARY_ENV).unwrap_or_else(|_| "whisper-cli".to_string());
        let model = std::env::var(MODEL_ENV).ok().map(PathBuf::from);
        Self::new(binary, model)
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }
}

impl SpeechRecognizer for WhisperCliRecognizer {
    fn transcribe(
        &self,
        audio_path: &Path,
        config: &RecognitionConfig,
    ) -> AutoclipResult<Vec<SubtitleCue>> {
        let prefix = std::env::temp_dir().join(format!(
            "autoclip_asr_{}",
            autoclip_render::sanitize_component(
                audio_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("audio"),
            )
        ));

        let mut cmd = Command::new(&self.binary);
        cmd.arg("-f").arg(audio_path);
        if let Some(model) = &self.model {
            cmd.arg("-m").arg(model);
        }
        if let Some(language) = &config.language {
            cmd.arg("-l").arg(language);
        }
        cmd.arg("-osrt").arg("-of").arg(&prefix);

        tracing::info!(
            binary = %self.binary,
            audio = %audio_path.display(),
            "Running speech recognition"
        );
        let output = cmd.output().map_err(|e| {
            AutoclipError::subtitle_generation(format!(
                "failed to run recognizer '{}': {e}",
                self.binary
            ))
        })?;

        if !output.status.success() {
            return Err(AutoclipError::subtitle_generation(format!(
                "recognizer exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let srt_path = prefix.with_extension("srt");
        let cues = load_srt(&srt_path)?;
        std::fs::remove_file(&srt_path).ok();
        Ok(cues)
    }
}
