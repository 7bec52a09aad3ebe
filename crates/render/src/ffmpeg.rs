//! ffmpeg command construction.
//!
//! Turns a fully-specified [`RenderJob`] into the argument vector for one
//! external encode. Everything here is pure string assembly, so the exact
//! command each job would run is testable without an encoder installed.

use std::path::Path;

use autoclip_common::config::EncodeDefaults;
use autoclip_engine::batch::RenderJob;
use autoclip_engine::timeline::ScalingDirective;
use autoclip_material::mix::SubtitleStyle;

/// Build the complete ffmpeg argument vector for one job.
///
/// `srt_path` is the synchronized cue sidecar written next to the output;
/// `None` burns no subtitles.
pub fn build_render_args(
    job: &RenderJob,
    encode: &EncodeDefaults,
    srt_path: Option<&Path>,
) -> Vec<String> {
    let mut args = vec![
        "-y".to_string(),
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-nostats".to_string(),
        "-progress".to_string(),
        "pipe:1".to_string(),
    ];

    // One trimmed input per timeline segment, in timeline order.
    for segment in &job.timeline {
        args.push("-ss".to_string());
        args.push(format!("{:.6}", segment.in_secs));
        args.push("-t".to_string());
        args.push(format!("{:.6}", segment.duration_secs()));
        args.push("-i".to_string());
        args.push(segment.source_path.display().to_string());
    }

    let audio_index = job.timeline.len();
    if let Some(audio) = &job.audio_path {
        args.push("-i".to_string());
        args.push(audio.display().to_string());
    }

    if let Some(bgm) = &job.bgm_ref {
        args.push("-stream_loop".to_string());
        args.push("-1".to_string());
        args.push("-i".to_string());
        args.push(bgm.display().to_string());
    }

    args.push("-filter_complex".to_string());
    args.push(build_filter_graph(job, encode, srt_path));

    args.push("-map".to_string());
    args.push("[vout]".to_string());
    match (job.audio_path.is_some(), job.bgm_ref.is_some()) {
        (false, false) => {
            args.push("-an".to_string());
        }
        (true, false) => {
            args.push("-map".to_string());
            args.push(format!("{audio_index}:a:0"));
        }
        _ => {
            args.push("-map".to_string());
            args.push("[aout]".to_string());
        }
    }

    args.push("-r".to_string());
    args.push(job.fps.to_string());
    args.push("-t".to_string());
    args.push(format!("{:.6}", job.total_secs));

    args.extend(codec_args(encode));
    args.push(job.output_path.display().to_string());
    args
}

/// Build the filter graph: per-segment normalization, concat, subtitle
/// burn, and the audio mix.
fn build_filter_graph(job: &RenderJob, encode: &EncodeDefaults, srt_path: Option<&Path>) -> String {
    let mut graph = String::new();

    for (i, segment) in job.timeline.iter().enumerate() {
        let chain = match segment.scaling {
            ScalingDirective::None => "setsar=1".to_string(),
            ScalingDirective::ScaleCrop { width, height } => format!(
                "scale={width}:{height}:force_original_aspect_ratio=increase,\
                 crop={width}:{height},setsar=1"
            ),
            ScalingDirective::Letterbox { width, height } => format!(
                "scale={width}:{height}:force_original_aspect_ratio=decrease,\
                 pad={width}:{height}:(ow-iw)/2:(oh-ih)/2,setsar=1"
            ),
        };
        graph.push_str(&format!("[{i}:v]{chain},fps={}[v{i}];", job.fps));
    }

    for i in 0..job.timeline.len() {
        graph.push_str(&format!("[v{i}]"));
    }
    graph.push_str(&format!("concat=n={}:v=1:a=0[vcat]", job.timeline.len()));

    match srt_path {
        Some(path) => {
            graph.push_str(&format!(
                ";[vcat]subtitles='{}':force_style='{}'[vout]",
                escape_filter_path(path),
                force_style(&job.subtitle_style),
            ));
        }
        None => graph.push_str(";[vcat]null[vout]"),
    }

    let audio_index = job.timeline.len();
    let bgm_index = audio_index + usize::from(job.audio_path.is_some());
    match (job.audio_path.is_some(), job.bgm_ref.is_some()) {
        (true, true) => {
            graph.push_str(&format!(
                ";[{audio_index}:a]anull[voice];[{bgm_index}:a]volume={:.2}[music];\
                 [voice][music]amix=inputs=2:duration=first[aout]",
                encode.bgm_volume,
            ));
        }
        (false, true) => {
            graph.push_str(&format!(
                ";[{bgm_index}:a]volume={:.2}[aout]",
                encode.bgm_volume
            ));
        }
        _ => {}
    }

    graph
}

/// Encoder flags shared by every job.
fn codec_args(encode: &EncodeDefaults) -> Vec<String> {
    vec![
        "-c:v".to_string(),
        "libx264".to_string(),
        "-preset".to_string(),
        "medium".to_string(),
        "-pix_fmt".to_string(),
        "yuv420p".to_string(),
        "-b:v".to_string(),
        format!("{}k", encode.video_bitrate_kbps.max(1000)),
        "-c:a".to_string(),
        "aac".to_string(),
        "-b:a".to_string(),
        format!("{}k", encode.audio_bitrate_kbps.max(64)),
        "-movflags".to_string(),
        "+faststart".to_string(),
    ]
}

/// Render a subtitle style as an ASS `force_style` string.
fn force_style(style: &SubtitleStyle) -> String {
    format!(
        "Fontname={},FontSize={},PrimaryColour={},Outline={},Shadow={},MarginV={},Alignment=2,Bold={}",
        style.font.replace(' ', r"\ "),
        style.size,
        hex_to_ass(&style.color),
        style.outline,
        style.shadow,
        style.margin_v,
        u8::from(style.bold),
    )
}

/// Convert `#RRGGBB` to the ASS `&H00BBGGRR` colour form. Anything
/// unparseable falls back to opaque white.
fn hex_to_ass(hex: &str) -> String {
    let c = hex.trim_start_matches('#');
    if c.len() == 6 && c.chars().all(|ch| ch.is_ascii_hexdigit()) {
        let (r, rest) = c.split_at(2);
        let (g, b) = rest.split_at(2);
        return format!("&H00{}{}{}", b, g, r).to_uppercase();
    }
    "&H00FFFFFF".to_string()
}

/// Escape a path for use inside the `subtitles=` filter argument.
fn escape_filter_path(path: &Path) -> String {
    path.display()
        .to_string()
        .replace('\\', "/")
        .replace(':', r"\:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use autoclip_engine::timeline::TimelineSegment;
    use autoclip_material::mix::Resolution;
    use std::path::PathBuf;

    fn segment(src: &str, in_s: f64, out_s: f64, start: f64, scaling: ScalingDirective) -> TimelineSegment {
        TimelineSegment {
            source_path: PathBuf::from(src),
            in_secs: in_s,
            out_secs: out_s,
            timeline_start_secs: start,
            timeline_end_secs: start + (out_s - in_s),
            scaling,
        }
    }

    fn job() -> RenderJob {
        RenderJob {
            variant_index: 0,
            seed: 1,
            timeline: vec![
                segment("/a.mp4", 0.0, 3.0, 0.0, ScalingDirective::None),
                segment(
                    "/b.mp4",
                    0.0,
                    2.0,
                    3.0,
                    ScalingDirective::ScaleCrop {
                        width: 1080,
                        height: 1920,
                    },
                ),
            ],
            cues: vec![],
            resolution: Resolution::Portrait1080x1920,
            fps: 30,
            total_secs: 5.0,
            audio_path: Some(PathBuf::from("/narration.mp3")),
            bgm_ref: None,
            subtitle_style: SubtitleStyle::default(),
            output_path: PathBuf::from("/out/variant_1.mp4"),
        }
    }

    #[test]
    fn test_each_segment_becomes_a_trimmed_input() {
        let args = build_render_args(&job(), &EncodeDefaults::default(), None);
        let joined = args.join(" ");
        assert!(joined.contains("-ss 0.000000 -t 3.000000 -i /a.mp4"));
        assert!(joined.contains("-ss 0.000000 -t 2.000000 -i /b.mp4"));
        assert!(joined.contains("-i /narration.mp3"));
        assert!(joined.ends_with("/out/variant_1.mp4"));
    }

    #[test]
    fn test_filter_graph_normalizes_and_concats() {
        let graph = build_filter_graph(&job(), &EncodeDefaults::default(), None);
        assert!(graph.contains("[0:v]setsar=1,fps=30[v0]"));
        assert!(graph.contains(
            "scale=1080:1920:force_original_aspect_ratio=increase"
        ));
        assert!(graph.contains("crop=1080:1920"));
        assert!(graph.contains("[v0][v1]concat=n=2:v=1:a=0[vcat]"));
        assert!(graph.contains("[vcat]null[vout]"));
    }

    #[test]
    fn test_letterbox_directive_pads() {
        let mut j = job();
        j.timeline[1].scaling = ScalingDirective::Letterbox {
            width: 1080,
            height: 1920,
        };
        let graph = build_filter_graph(&j, &EncodeDefaults::default(), None);
        assert!(graph.contains("force_original_aspect_ratio=decrease"));
        assert!(graph.contains("pad=1080:1920:(ow-iw)/2:(oh-ih)/2"));
    }

    #[test]
    fn test_subtitles_are_burned_with_style() {
        let graph = build_filter_graph(
            &job(),
            &EncodeDefaults::default(),
            Some(Path::new("/out/variant_1.srt")),
        );
        assert!(graph.contains("subtitles='/out/variant_1.srt'"));
        assert!(graph.contains("force_style='Fontname=Noto\\ Sans\\ CJK\\ SC"));
        assert!(graph.contains("PrimaryColour=&H00FFFFFF"));
        assert!(graph.contains("Alignment=2"));
    }

    #[test]
    fn test_audio_without_bgm_maps_directly() {
        let args = build_render_args(&job(), &EncodeDefaults::default(), None);
        let joined = args.join(" ");
        assert!(joined.contains("-map [vout] -map 2:a:0"));
        assert!(!joined.contains("amix"));
    }

    #[test]
    fn test_bgm_is_looped_and_mixed_under_narration() {
        let mut j = job();
        j.bgm_ref = Some(PathBuf::from("/bgm/calm.mp3"));
        let args = build_render_args(&j, &EncodeDefaults::default(), None);
        let joined = args.join(" ");
        assert!(joined.contains("-stream_loop -1 -i /bgm/calm.mp3"));
        assert!(joined.contains("volume=0.30[music]"));
        assert!(joined.contains("amix=inputs=2:duration=first[aout]"));
        assert!(joined.contains("-map [aout]"));
    }

    #[test]
    fn test_no_audio_sources_disables_audio() {
        let mut j = job();
        j.audio_path = None;
        let args = build_render_args(&j, &EncodeDefaults::default(), None);
        assert!(args.contains(&"-an".to_string()));
    }

    #[test]
    fn test_hex_to_ass_swaps_channel_order() {
        assert_eq!(hex_to_ass("#FFCC00"), "&H0000CCFF");
        assert_eq!(hex_to_ass("#ffffff"), "&H00FFFFFF");
        assert_eq!(hex_to_ass("nonsense"), "&H00FFFFFF");
    }

    #[test]
    fn test_escape_filter_path_escapes_colons() {
        assert_eq!(
            escape_filter_path(Path::new("C:\\subs\\track.srt")),
            "C\\:/subs/track.srt"
        );
    }
}
