//! Check system capabilities.

use autoclip_render::probe::command_exists;

use crate::recognizer::WhisperCliRecognizer;

pub fn run() -> anyhow::Result<()> {
    println!("System capabilities:");

    let ffmpeg = command_exists("ffmpeg");
    let ffprobe = command_exists("ffprobe");
    let recognizer = WhisperCliRecognizer::from_env();
    let whisper = command_exists(recognizer.binary());

    println!(
        "  ffmpeg:   {}",
        if ffmpeg { "found" } else { "MISSING (required for rendering)" }
    );
    println!(
        "  ffprobe:  {}",
        if ffprobe { "found" } else { "MISSING (required for discovery)" }
    );
    println!(
        "  {}: {}",
        recognizer.binary(),
        if whisper {
            "found"
        } else {
            "missing (generated subtitles unavailable; use --srt)"
        }
    );

    if !ffmpeg || !ffprobe {
        anyhow::bail!("required tools are missing");
    }
    Ok(())
}
