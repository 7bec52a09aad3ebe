//! Error types shared across AutoClip crates.

use std::path::PathBuf;

/// Top-level error type for AutoClip operations.
#[derive(Debug, thiserror::Error)]
pub enum AutoclipError {
    /// No usable groups, no duration source, malformed weights, or any
    /// other invalid configuration rejected at the engine boundary.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A group's pool cannot fill its allocated budget.
    #[error(
        "Insufficient material in group '{group}': budget {budget_secs:.3}s, \
         available {available_secs:.3}s"
    )]
    InsufficientMaterial {
        group: String,
        budget_secs: f64,
        available_secs: f64,
    },

    /// A clip file is unreadable or corrupt. Recovered locally by excluding
    /// the clip and re-sampling; never fatal to a job on its own.
    #[error("Failed to read clip {path}: {message}")]
    ClipRead { path: PathBuf, message: String },

    /// Subtitle cues cannot be made non-overlapping after correction.
    #[error("Subtitle alignment error: {message}")]
    SubtitleAlignment { message: String },

    /// The speech recognition collaborator failed or returned empty output
    /// with no provided fallback.
    #[error("Subtitle generation error: {message}")]
    SubtitleGeneration { message: String },

    /// The external renderer failed for one job.
    #[error("Encoding error for {output}: {message}")]
    Encoding { output: PathBuf, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using AutoclipError.
pub type AutoclipResult<T> = Result<T, AutoclipError>;

impl AutoclipError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }

    pub fn insufficient_material(
        group: impl Into<String>,
        budget_secs: f64,
        available_secs: f64,
    ) -> Self {
        Self::InsufficientMaterial {
            group: group.into(),
            budget_secs,
            available_secs,
        }
    }

    pub fn clip_read(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::ClipRead {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn subtitle_alignment(msg: impl Into<String>) -> Self {
        Self::SubtitleAlignment {
            message: msg.into(),
        }
    }

    pub fn subtitle_generation(msg: impl Into<String>) -> Self {
        Self::SubtitleGeneration {
            message: msg.into(),
        }
    }

    pub fn encoding(output: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Encoding {
            output: output.into(),
            message: msg.into(),
        }
    }

    /// Duration deficit for an insufficient-material error, zero otherwise.
    pub fn shortfall_secs(&self) -> f64 {
        match self {
            Self::InsufficientMaterial {
                budget_secs,
                available_secs,
                ..
            } => (budget_secs - available_secs).max(0.0),
            _ => 0.0,
        }
    }

    /// Stable machine-readable kind for per-job status reporting.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::InsufficientMaterial { .. } => "insufficient_material",
            Self::ClipRead { .. } => "clip_read",
            Self::SubtitleAlignment { .. } => "subtitle_alignment",
            Self::SubtitleGeneration { .. } => "subtitle_generation",
            Self::Encoding { .. } => "encoding",
            Self::FileNotFound { .. } => "file_not_found",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Other(_) => "other",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortfall_secs() {
        let err = AutoclipError::insufficient_material("scenery", 8.0, 5.0);
        assert!((err.shortfall_secs() - 3.0).abs() < 1e-9);

        let other = AutoclipError::configuration("no groups");
        assert_eq!(other.shortfall_secs(), 0.0);
    }

    #[test]
    fn test_error_kinds_are_stable() {
        assert_eq!(AutoclipError::configuration("x").kind(), "configuration");
        assert_eq!(
            AutoclipError::insufficient_material("g", 1.0, 0.0).kind(),
            "insufficient_material"
        );
        assert_eq!(
            AutoclipError::encoding("/tmp/out.mp4", "ffmpeg died").kind(),
            "encoding"
        );
    }
}
