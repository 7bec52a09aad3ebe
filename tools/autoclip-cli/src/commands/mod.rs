//! CLI subcommands.

pub mod check;
pub mod generate;
pub mod materials;
pub mod plan;
pub mod preprocess;
pub mod probe;

use autoclip_engine::batch::{BatchPlan, JobOutcome};
use autoclip_engine::observe::PlanObserver;
use autoclip_engine::AllocationPlan;
use autoclip_material::clip::MaterialLibrary;
use autoclip_material::discover::discover_library;
use autoclip_material::mix::{GroupSpec, MixConfig, Resolution, ScalePolicy, SubtitleMode};
use autoclip_render::probe::probe_audio_duration;
use autoclip_render::FfprobeProber;
use autoclip_subtitles::cue::SubtitleCue;
use autoclip_subtitles::recognize::{recognize_cues, RecognitionConfig};
use autoclip_subtitles::srt::load_srt;

use crate::recognizer::WhisperCliRecognizer;
use crate::MixArgs;

/// Everything `plan` and `generate` share after the front-door work:
/// discovery, duration resolution, and raw cue acquisition.
pub struct Prepared {
    pub library: MaterialLibrary,
    pub config: MixConfig,
    pub total_secs: f64,
    pub raw_cues: Vec<SubtitleCue>,
    pub cues_generated: bool,
}

/// Parse a `WIDTHxHEIGHT` string, mapping the two standard presets onto
/// their enum forms.
pub fn parse_resolution(raw: &str) -> anyhow::Result<Resolution> {
    match raw {
        "1080x1920" => Ok(Resolution::Portrait1080x1920),
        "1920x1080" => Ok(Resolution::Landscape1920x1080),
        other => {
            let (w, h) = other
                .split_once('x')
                .ok_or_else(|| anyhow::anyhow!("resolution must be WIDTHxHEIGHT, got '{other}'"))?;
            Ok(Resolution::Custom {
                width: w.parse()?,
                height: h.parse()?,
            })
        }
    }
}

/// Parse repeated `name:weight` declarations; position is playback order.
pub fn parse_groups(raw: &[String]) -> anyhow::Result<Vec<GroupSpec>> {
    raw.iter()
        .enumerate()
        .map(|(order, spec)| {
            let (name, weight) = spec
                .split_once(':')
                .ok_or_else(|| anyhow::anyhow!("group must be NAME:WEIGHT, got '{spec}'"))?;
            Ok(GroupSpec {
                name: name.to_string(),
                weight: weight.parse()?,
                order,
            })
        })
        .collect()
}

/// Build the validated config and gather all planning inputs.
pub fn prepare(mix: &MixArgs) -> anyhow::Result<Prepared> {
    let subtitle_mode = match &mix.srt {
        Some(path) => SubtitleMode::Provided { path: path.clone() },
        None => SubtitleMode::Generated,
    };

    let config = MixConfig {
        audio_path: mix.audio.clone(),
        groups: parse_groups(&mix.groups)?,
        total_variants: mix.variants,
        resolution: parse_resolution(&mix.resolution)?,
        scale_policy: match mix.scale_policy.as_str() {
            "crop" => ScalePolicy::ScaleCrop,
            "letterbox" => ScalePolicy::Letterbox,
            other => anyhow::bail!("scale policy must be crop or letterbox, got '{other}'"),
        },
        subtitle_mode: subtitle_mode.clone(),
        offset_secs: mix.offset,
        bgm_ref: mix.bgm.clone(),
        fps: mix.fps,
        base_seed: mix.seed,
        allow_repetition: !mix.no_repeat,
        output_tag: mix.tag.clone(),
        ..MixConfig::default()
    };
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    println!("Discovering material under: {}", mix.materials.display());
    let library = discover_library(&mix.materials, &FfprobeProber)?;
    println!(
        "  {} groups, {} clips",
        library.groups.len(),
        library.groups.iter().map(|g| g.clips.len()).sum::<usize>()
    );

    let audio_duration = match &config.audio_path {
        Some(path) => Some(probe_audio_duration(path)?),
        None => None,
    };

    let (raw_cues, cues_generated) = match &subtitle_mode {
        SubtitleMode::Provided { path } => (load_srt(path)?, false),
        SubtitleMode::Generated => {
            let audio = config.audio_path.as_ref().ok_or_else(|| {
                anyhow::anyhow!("generated subtitles require an audio track")
            })?;
            let recognizer = WhisperCliRecognizer::from_env();
            let cues = recognize_cues(&recognizer, audio, &RecognitionConfig::default())?;
            (cues, true)
        }
    };

    let total_secs = autoclip_engine::resolve_total_duration(
        audio_duration,
        &raw_cues,
        config.trailing_pad_secs,
    )?;
    println!("  Target duration: {total_secs:.2}s, {} raw cues", raw_cues.len());

    Ok(Prepared {
        library,
        config,
        total_secs,
        raw_cues,
        cues_generated,
    })
}

/// Observer printing checkpoint progress to the terminal.
pub struct ConsoleObserver;

impl PlanObserver for ConsoleObserver {
    fn on_allocation(&self, variant_index: usize, plan: &AllocationPlan) {
        let shares: Vec<String> = plan
            .entries
            .iter()
            .map(|e| format!("{} {:.2}s", e.group, e.budget_secs))
            .collect();
        println!("  Variant {}: allocated {}", variant_index + 1, shares.join(", "));
    }

    fn on_job_complete(&self, variant_index: usize, outcome: &JobOutcome) {
        match outcome {
            JobOutcome::Planned(job) => {
                println!(
                    "  Variant {}: {} segments, {} cues",
                    variant_index + 1,
                    job.timeline.len(),
                    job.cues.len()
                );
            }
            JobOutcome::Failed(failure) => {
                println!(
                    "  Variant {}: FAILED ({}): {}",
                    variant_index + 1,
                    failure.kind,
                    failure.message
                );
            }
        }
    }

    fn on_batch_complete(&self, batch: &BatchPlan) {
        println!(
            "Planning complete: {}/{} variants planned",
            batch.planned_jobs().count(),
            batch.jobs.len()
        );
    }
}
