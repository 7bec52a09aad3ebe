//! The validated per-generation configuration surface.
//!
//! The control layer (GUI, HTTP, whatever drives the engine) constructs a
//! [`MixConfig`] and it is rejected here, at the boundary, before any
//! planning starts. The engine itself never re-validates.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use autoclip_common::error::{AutoclipError, AutoclipResult};

/// Output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// 9:16 vertical (Reels / Shorts / TikTok).
    #[serde(rename = "1080x1920")]
    Portrait1080x1920,
    /// 16:9 widescreen.
    #[serde(rename = "1920x1080")]
    Landscape1920x1080,
    /// Custom dimensions.
    Custom { width: u32, height: u32 },
}

impl Resolution {
    pub fn width(&self) -> u32 {
        match self {
            Resolution::Portrait1080x1920 => 1080,
            Resolution::Landscape1920x1080 => 1920,
            Resolution::Custom { width, .. } => *width,
        }
    }

    pub fn height(&self) -> u32 {
        match self {
            Resolution::Portrait1080x1920 => 1920,
            Resolution::Landscape1920x1080 => 1080,
            Resolution::Custom { height, .. } => *height,
        }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::Portrait1080x1920
    }
}

/// How a segment whose source resolution differs from the job's target
/// resolution is normalized by the external renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScalePolicy {
    /// Scale to fill the frame, then center-crop the overflow.
    #[default]
    ScaleCrop,
    /// Scale to fit inside the frame, padding the remainder with black.
    Letterbox,
}

/// Where subtitle cues come from, mutually exclusive per job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum SubtitleMode {
    /// Parse an externally supplied SRT file.
    Provided { path: PathBuf },
    /// Delegate the audio to the speech recognition collaborator.
    Generated,
}

/// One group declaration: which folder participates, how heavily, and where
/// in the playback order. Order is semantically meaningful: it controls
/// clip appearance sequence, not just proportion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    pub weight: u32,
    pub order: usize,
}

/// Subtitle burn-in styling handed to the external renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleStyle {
    /// Font family name.
    pub font: String,
    /// Font size in points.
    pub size: u32,
    /// Primary colour as `#RRGGBB`.
    pub color: String,
    /// Outline thickness.
    pub outline: u32,
    /// Shadow depth.
    pub shadow: u32,
    /// Bold text.
    pub bold: bool,
    /// Vertical margin from the bottom edge.
    pub margin_v: u32,
}

impl Default for SubtitleStyle {
    fn default() -> Self {
        Self {
            font: "Noto Sans CJK SC".to_string(),
            size: 9,
            color: "#FFFFFF".to_string(),
            outline: 1,
            shadow: 1,
            bold: true,
            margin_v: 15,
        }
    }
}

/// Complete configuration for one generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MixConfig {
    /// Primary narration audio track. When absent, the total duration is
    /// resolved from the subtitle track instead.
    pub audio_path: Option<PathBuf>,

    /// Participating groups with weights and playback order.
    pub groups: Vec<GroupSpec>,

    /// Number of independent variants to generate.
    pub total_variants: usize,

    /// Output resolution.
    pub resolution: Resolution,

    /// Resolution mismatch policy.
    pub scale_policy: ScalePolicy,

    /// Subtitle source.
    pub subtitle_mode: SubtitleMode,

    /// Subtitle burn-in styling.
    pub subtitle_style: SubtitleStyle,

    /// Global subtitle time-offset correction in seconds. Negative values
    /// shift cues earlier (compensating recognition lag), positive later.
    pub offset_secs: f64,

    /// Optional background music file, mixed under the narration.
    pub bgm_ref: Option<PathBuf>,

    /// Output frame rate; also the planning grid's sampling unit.
    pub fps: u32,

    /// Base seed; variant `k` plans with `base_seed + k`.
    pub base_seed: u64,

    /// Clips shorter than this are excluded from sampling entirely.
    pub min_clip_secs: f64,

    /// Generated cues shorter than this are merged into their neighbor.
    pub min_cue_secs: f64,

    /// Trailing pad after the last cue when resolving duration without audio.
    pub trailing_pad_secs: f64,

    /// Whether the sampler may re-draw clips once a pool is exhausted.
    pub allow_repetition: bool,

    /// Optional tag prefixed to the batch output directory name.
    pub output_tag: Option<String>,
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            audio_path: None,
            groups: vec![],
            total_variants: 1,
            resolution: Resolution::default(),
            scale_policy: ScalePolicy::default(),
            subtitle_mode: SubtitleMode::Generated,
            subtitle_style: SubtitleStyle::default(),
            offset_secs: 0.0,
            bgm_ref: None,
            fps: 30,
            base_seed: 0,
            min_clip_secs: 0.2,
            min_cue_secs: 0.5,
            trailing_pad_secs: 0.5,
            allow_repetition: true,
            output_tag: None,
        }
    }
}

impl MixConfig {
    /// Validate the configuration at the boundary. Planning assumes a
    /// validated config and never re-checks these.
    pub fn validate(&self) -> AutoclipResult<()> {
        if self.groups.is_empty() {
            return Err(AutoclipError::configuration("no material groups declared"));
        }
        for spec in &self.groups {
            if spec.weight == 0 || spec.weight > 100 {
                return Err(AutoclipError::configuration(format!(
                    "group '{}' has weight {} (expected 1..=100)",
                    spec.name, spec.weight
                )));
            }
        }
        if self.total_variants == 0 {
            return Err(AutoclipError::configuration("total_variants must be >= 1"));
        }
        if self.resolution.width() == 0 || self.resolution.height() == 0 {
            return Err(AutoclipError::configuration(
                "custom resolution must be non-zero",
            ));
        }
        if self.fps == 0 {
            return Err(AutoclipError::configuration("fps must be >= 1"));
        }
        if self.min_clip_secs < 0.0 || self.min_cue_secs < 0.0 || self.trailing_pad_secs < 0.0 {
            return Err(AutoclipError::configuration(
                "duration thresholds must be non-negative",
            ));
        }
        if self.audio_path.is_none() && self.subtitle_mode == SubtitleMode::Generated {
            return Err(AutoclipError::configuration(
                "generated subtitles require an audio track",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> MixConfig {
        MixConfig {
            audio_path: Some(PathBuf::from("narration.mp3")),
            groups: vec![GroupSpec {
                name: "city".into(),
                weight: 50,
                order: 0,
            }],
            ..MixConfig::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_groups() {
        let config = MixConfig {
            groups: vec![],
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_weight() {
        let mut config = valid_config();
        config.groups[0].weight = 0;
        assert!(config.validate().is_err());
        config.groups[0].weight = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_generated_mode_without_audio() {
        let config = MixConfig {
            audio_path: None,
            subtitle_mode: SubtitleMode::Generated,
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_provided_mode_without_audio_is_fine() {
        let config = MixConfig {
            audio_path: None,
            subtitle_mode: SubtitleMode::Provided {
                path: PathBuf::from("track.srt"),
            },
            ..valid_config()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolution_dimensions() {
        assert_eq!(Resolution::Portrait1080x1920.width(), 1080);
        assert_eq!(Resolution::Landscape1920x1080.height(), 1080);
        let custom = Resolution::Custom {
            width: 720,
            height: 1280,
        };
        assert_eq!((custom.width(), custom.height()), (720, 1280));
    }

    #[test]
    fn test_resolution_serde_names() {
        let json = serde_json::to_string(&Resolution::Portrait1080x1920).unwrap();
        assert_eq!(json, "\"1080x1920\"");
        let parsed: Resolution = serde_json::from_str("\"1920x1080\"").unwrap();
        assert_eq!(parsed, Resolution::Landscape1920x1080);
    }
}
