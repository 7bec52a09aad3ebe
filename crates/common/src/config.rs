//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root directory holding material folders (one subfolder per group)
    /// and the `bgm/` directory.
    pub assets_dir: PathBuf,

    /// Directory batch output folders are created under.
    pub output_dir: PathBuf,

    /// Default encoding parameters handed to the external renderer.
    pub encode: EncodeDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default encoding parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeDefaults {
    /// Output frame rate. Also the sampling unit of the planning grid.
    pub fps: u32,

    /// Video bitrate in kbps.
    pub video_bitrate_kbps: u32,

    /// Audio bitrate in kbps.
    pub audio_bitrate_kbps: u32,

    /// Maximum number of concurrent encode processes. Encoding is the
    /// resource-heavy stage and is throttled independently of planning.
    pub max_concurrent_encodes: usize,

    /// Background music mix volume in `[0.0, 1.0]`.
    pub bgm_volume: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "autoclip=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            output_dir: PathBuf::from("output"),
            encode: EncodeDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for EncodeDefaults {
    fn default() -> Self {
        Self {
            fps: 30,
            video_bitrate_kbps: 8000,
            audio_bitrate_kbps: 192,
            max_concurrent_encodes: 2,
            bgm_volume: 0.3,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("autoclip").join("config.json")
}
