//! SRT parsing and serialization.
//!
//! The standard indexed cue format: `(index, start --> end, text)` blocks,
//! timestamps as `HH:MM:SS,mmm`. Parsing is tolerant of CRLF line endings
//! and `.`-separated milliseconds; serialization always emits the canonical
//! comma form.

use std::path::Path;

use autoclip_common::error::{AutoclipError, AutoclipResult};

use crate::cue::SubtitleCue;

/// Parse SRT content into raw cues, in file order.
pub fn parse_srt(content: &str) -> AutoclipResult<Vec<SubtitleCue>> {
    let mut cues = Vec::new();
    let mut lines = content.lines().map(|l| l.trim_end_matches('\r')).peekable();

    while let Some(line) = lines.next() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        // Index line; the value itself is ignored and regenerated on output.
        let time_line = if trimmed.contains("-->") {
            trimmed.to_string()
        } else {
            if trimmed.parse::<u64>().is_err() {
                return Err(AutoclipError::subtitle_alignment(format!(
                    "expected cue index or timing line, got '{trimmed}'"
                )));
            }
            match lines.next() {
                Some(l) => l.trim().to_string(),
                None => {
                    return Err(AutoclipError::subtitle_alignment(
                        "cue index at end of file with no timing line",
                    ));
                }
            }
        };

        let (start_raw, end_raw) = time_line.split_once("-->").ok_or_else(|| {
            AutoclipError::subtitle_alignment(format!("malformed timing line '{time_line}'"))
        })?;
        let start_secs = parse_timestamp(start_raw.trim())?;
        let end_secs = parse_timestamp(end_raw.trim())?;

        let mut text_lines = Vec::new();
        while let Some(&text) = lines.peek() {
            lines.next();
            if text.trim().is_empty() {
                break;
            }
            text_lines.push(text.to_string());
        }

        cues.push(SubtitleCue {
            start_secs,
            end_secs,
            text: text_lines.join("\n"),
        });
    }

    Ok(cues)
}

/// Serialize cues as SRT content with sequential 1-based indices.
pub fn format_srt(cues: &[SubtitleCue]) -> String {
    let mut output = String::new();

    for (i, cue) in cues.iter().enumerate() {
        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            format_timestamp(cue.start_secs),
            format_timestamp(cue.end_secs),
        ));
        output.push_str(&cue.text);
        output.push_str("\n\n");
    }

    output
}

/// Load and parse an SRT file.
pub fn load_srt(path: &Path) -> AutoclipResult<Vec<SubtitleCue>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AutoclipError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            AutoclipError::Io(e)
        }
    })?;
    parse_srt(&content)
}

/// Serialize cues to an SRT file.
pub fn save_srt(cues: &[SubtitleCue], path: &Path) -> AutoclipResult<()> {
    std::fs::write(path, format_srt(cues))?;
    Ok(())
}

/// Parse `HH:MM:SS,mmm` (or `HH:MM:SS.mmm`) into seconds.
fn parse_timestamp(raw: &str) -> AutoclipResult<f64> {
    let bad = || AutoclipError::subtitle_alignment(format!("malformed timestamp '{raw}'"));

    let mut parts = raw.split(':');
    let hours: u64 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let minutes: u64 = parts.next().ok_or_else(bad)?.parse().map_err(|_| bad())?;
    let sec_part = parts.next().ok_or_else(bad)?;
    if parts.next().is_some() {
        return Err(bad());
    }

    let (secs_raw, millis_raw) = sec_part
        .split_once(',')
        .or_else(|| sec_part.split_once('.'))
        .ok_or_else(bad)?;
    let seconds: u64 = secs_raw.parse().map_err(|_| bad())?;
    if millis_raw.len() != 3 {
        return Err(bad());
    }
    let millis: u64 = millis_raw.parse().map_err(|_| bad())?;

    if minutes >= 60 || seconds >= 60 {
        return Err(bad());
    }

    let total_ms = ((hours * 60 + minutes) * 60 + seconds) * 1000 + millis;
    Ok(total_ms as f64 / 1000.0)
}

/// Format seconds as an SRT timestamp: `HH:MM:SS,mmm`.
fn format_timestamp(secs: f64) -> String {
    let total_ms = (secs.max(0.0) * 1000.0).round() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}
