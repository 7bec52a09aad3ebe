//! AutoClip CLI — Command-line interface for material discovery, timeline
//! planning, and batch generation.
//!
//! Usage:
//!   autoclip generate [OPTIONS]      Plan and render a batch of variants
//!   autoclip plan [OPTIONS]          Plan only; print the dry-run result
//!   autoclip materials <ROOT>        List discovered material groups
//!   autoclip probe <FILE>            Probe a media file
//!   autoclip preprocess [OPTIONS]    Normalize raw assets to a resolution
//!   autoclip check                   Check system capabilities

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod recognizer;

#[derive(Parser)]
#[command(
    name = "autoclip",
    about = "Batch short-form video mixing from weighted material folders",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by `generate` and `plan`.
#[derive(clap::Args, Clone)]
struct MixArgs {
    /// Material root; each immediate subfolder is one group
    #[arg(short, long)]
    materials: PathBuf,

    /// Group declaration as name:weight, repeatable; declaration order is
    /// playback order
    #[arg(short, long = "group", value_name = "NAME:WEIGHT", required = true)]
    groups: Vec<String>,

    /// Narration audio track
    #[arg(short, long)]
    audio: Option<PathBuf>,

    /// Provided subtitle track (SRT); omit to generate via recognition
    #[arg(long)]
    srt: Option<PathBuf>,

    /// Number of variants to generate
    #[arg(short = 'n', long, default_value = "1")]
    variants: usize,

    /// Output resolution: 1080x1920, 1920x1080, or WIDTHxHEIGHT
    #[arg(short, long, default_value = "1080x1920")]
    resolution: String,

    /// Resolution mismatch policy: crop or letterbox
    #[arg(long, default_value = "crop")]
    scale_policy: String,

    /// Subtitle time-offset correction in seconds
    #[arg(long, default_value = "0.0")]
    offset: f64,

    /// Background music file
    #[arg(long)]
    bgm: Option<PathBuf>,

    /// Base random seed; variant k plans with seed + k
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Output frame rate
    #[arg(long, default_value = "30")]
    fps: u32,

    /// Forbid re-drawing clips once a pool is exhausted
    #[arg(long)]
    no_repeat: bool,

    /// Tag prefixed to the batch output directory name
    #[arg(long)]
    tag: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan and render a batch of variants
    Generate {
        #[command(flatten)]
        mix: MixArgs,

        /// Output root directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,

        /// Maximum concurrent encodes
        #[arg(long, default_value = "2")]
        max_encodes: usize,
    },

    /// Plan a batch without rendering and print the result
    Plan {
        #[command(flatten)]
        mix: MixArgs,

        /// Write the full batch plan as JSON to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// List discovered material groups under a root folder
    Materials {
        /// Material root directory
        root: PathBuf,
    },

    /// Probe a media file's duration and resolution
    Probe {
        /// Path to the media file
        path: PathBuf,
    },

    /// Normalize raw assets to a target resolution
    Preprocess {
        /// Input directory containing raw videos
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for normalized videos
        #[arg(short, long)]
        output: PathBuf,

        /// Target resolution as WIDTHxHEIGHT
        #[arg(short, long, default_value = "1080x1920")]
        resolution: String,
    },

    /// Check system capabilities
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    autoclip_common::logging::init_logging(&autoclip_common::config::LoggingConfig {
        level: log_level.to_string(),
        json: false,
        file: None,
    });

    match cli.command {
        Commands::Generate {
            mix,
            output,
            max_encodes,
        } => commands::generate::run(mix, output, max_encodes).await,
        Commands::Plan { mix, json } => commands::plan::run(mix, json),
        Commands::Materials { root } => commands::materials::run(root),
        Commands::Probe { path } => commands::probe::run(path),
        Commands::Preprocess {
            input,
            output,
            resolution,
        } => commands::preprocess::run(input, output, resolution),
        Commands::Check => commands::check::run(),
    }
}
