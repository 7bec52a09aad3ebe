use std::path::PathBuf;

use autoclip_engine::observe::{CancellationToken, NoopObserver};
use autoclip_engine::{plan_batch, timeline_span_secs, BatchRequest, JobOutcome};
use autoclip_material::clip::{Clip, MaterialGroup, MaterialLibrary};
use autoclip_material::mix::{GroupSpec, MixConfig, SubtitleMode};
use autoclip_subtitles::cue::SubtitleCue;

fn clip(group: &str, name: &str, secs: f64) -> Clip {
    Clip {
        source_path: PathBuf::from(format!("/assets/{group}/{name}")),
        duration_secs: secs,
        width: 1080,
        height: 1920,
    }
}

fn fixture_library() -> MaterialLibrary {
    MaterialLibrary {
        root: PathBuf::from("/assets"),
        groups: vec![
            MaterialGroup {
                name: "scenery".into(),
                weight: 1,
                order_index: 0,
                clips: vec![
                    clip("scenery", "dawn.mp4", 7.2),
                    clip("scenery", "dusk.mp4", 5.6),
                    clip("scenery", "harbor.mp4", 9.1),
                    clip("scenery", "skyline.mp4", 4.4),
                    clip("scenery", "street.mp4", 6.3),
                    clip("scenery", "tide.mp4", 8.0),
                ],
            },
            MaterialGroup {
                name: "detail".into(),
                weight: 1,
                order_index: 1,
                clips: vec![
                    clip("detail", "hands.mp4", 3.5),
                    clip("detail", "pour.mp4", 2.8),
                    clip("detail", "steam.mp4", 4.1),
                    clip("detail", "stir.mp4", 3.0),
                ],
            },
        ],
    }
}

fn fixture_config(variants: usize, base_seed: u64) -> MixConfig {
    MixConfig {
        audio_path: Some(PathBuf::from("/assets/narration.mp3")),
        groups: vec![
            GroupSpec {
                name: "scenery".into(),
                weight: 60,
                order: 0,
            },
            GroupSpec {
                name: "detail".into(),
                weight: 40,
                order: 1,
            },
        ],
        total_variants: variants,
        subtitle_mode: SubtitleMode::Provided {
            path: PathBuf::from("/assets/track.srt"),
        },
        base_seed,
        ..MixConfig::default()
    }
}

fn fixture_cues() -> Vec<SubtitleCue> {
    vec![
        SubtitleCue::new(0.4, 2.1, "first line"),
        SubtitleCue::new(2.3, 5.0, "second line"),
        SubtitleCue::new(5.2, 8.9, "third line"),
    ]
}

fn plan_signature(variants: usize, base_seed: u64) -> String {
    let library = fixture_library();
    let config = fixture_config(variants, base_seed);
    let request = BatchRequest {
        library: &library,
        config: &config,
        total_secs: 30.0,
        raw_cues: fixture_cues(),
        cues_generated: false,
        output_dir: PathBuf::from("/out"),
    };

    let batch = plan_batch(&request, &NoopObserver, &CancellationToken::new()).unwrap();
    batch
        .jobs
        .iter()
        .map(|outcome| match outcome {
            JobOutcome::Planned(job) => job
                .timeline
                .iter()
                .map(|seg| {
                    format!(
                        "{}|{:.6}|{:.6}|{:.6}|{:.6}",
                        seg.source_path.display(),
                        seg.in_secs,
                        seg.out_secs,
                        seg.timeline_start_secs,
                        seg.timeline_end_secs,
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
            JobOutcome::Failed(failure) => format!("failed:{}", failure.kind),
        })
        .collect::<Vec<_>>()
        .join("\n---\n")
}

fn fnv1a_64(input: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in input.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[test]
fn identical_inputs_produce_identical_batches() {
    let first = plan_signature(4, 1234);
    let second = plan_signature(4, 1234);
    assert_eq!(fnv1a_64(&first), fnv1a_64(&second));
    assert_eq!(first, second);
}

#[test]
fn variants_diverge_when_pools_offer_choices() {
    let signature = plan_signature(8, 77);
    let per_variant: Vec<&str> = signature.split("\n---\n").collect();
    assert_eq!(per_variant.len(), 8);

    let distinct: std::collections::HashSet<&&str> = per_variant.iter().collect();
    assert!(
        distinct.len() >= 2,
        "expected at least two distinct timelines across 8 variants"
    );
}

#[test]
fn different_base_seeds_change_the_batch() {
    let a = plan_signature(2, 1);
    let b = plan_signature(2, 100_000);
    assert_ne!(a, b);
}

#[test]
fn sixty_forty_scenario_allocates_eighteen_and_twelve() {
    let library = MaterialLibrary {
        root: PathBuf::from("/assets"),
        groups: vec![
            MaterialGroup {
                name: "a".into(),
                weight: 1,
                order_index: 0,
                clips: vec![clip("a", "ten.mp4", 10.0), clip("a", "fifteen.mp4", 15.0)],
            },
            MaterialGroup {
                name: "b".into(),
                weight: 1,
                order_index: 1,
                clips: vec![clip("b", "twelve.mp4", 12.0)],
            },
        ],
    };
    let config = MixConfig {
        audio_path: Some(PathBuf::from("/assets/narration.mp3")),
        groups: vec![
            GroupSpec {
                name: "a".into(),
                weight: 60,
                order: 0,
            },
            GroupSpec {
                name: "b".into(),
                weight: 40,
                order: 1,
            },
        ],
        total_variants: 1,
        subtitle_mode: SubtitleMode::Provided {
            path: PathBuf::from("/assets/track.srt"),
        },
        ..MixConfig::default()
    };
    let request = BatchRequest {
        library: &library,
        config: &config,
        total_secs: 30.0,
        raw_cues: vec![],
        cues_generated: false,
        output_dir: PathBuf::from("/out"),
    };

    let batch = plan_batch(&request, &NoopObserver, &CancellationToken::new()).unwrap();
    let job = batch.planned_jobs().next().unwrap();

    // Group a covers [0, 18): both pool clips appear, one whole and one
    // trimmed to close the 18s budget exactly.
    let group_a: Vec<_> = job
        .timeline
        .iter()
        .filter(|s| s.timeline_start_secs < 18.0 - 1e-9)
        .collect();
    let a_total: f64 = group_a.iter().map(|s| s.duration_secs()).sum();
    assert!((a_total - 18.0).abs() < 1e-6);
    assert_eq!(group_a.len(), 2);

    let source_secs = |seg: &autoclip_engine::TimelineSegment| {
        if seg.source_path.ends_with("ten.mp4") {
            10.0
        } else {
            15.0
        }
    };
    let trimmed = group_a
        .iter()
        .filter(|s| s.duration_secs() + 1e-6 < source_secs(s))
        .count();
    let whole = group_a
        .iter()
        .filter(|s| (s.duration_secs() - source_secs(s)).abs() < 1e-6)
        .count();
    assert_eq!((whole, trimmed), (1, 1));

    // Group b fills the remaining [18, 30).
    let span = timeline_span_secs(&job.timeline);
    assert!((span - 30.0).abs() < 1.0 / 30.0 + 1e-9);
}
