//! Render backends.
//!
//! The engine hands a fully-specified [`RenderJob`] across this boundary;
//! the backend produces the output media file. Failures are per-job and
//! reported back, never retried automatically.

use std::io::{BufRead, BufReader, Read};
use std::process::{Command, Stdio};

use autoclip_common::config::EncodeDefaults;
use autoclip_common::error::{AutoclipError, AutoclipResult};
use autoclip_engine::batch::RenderJob;

use crate::ffmpeg::build_render_args;
use crate::probe::command_exists;

/// Progress callback for encode execution.
pub type ProgressCallback = Box<dyn Fn(EncodeProgress) + Send>;

/// Encode progress report.
#[derive(Debug, Clone)]
pub struct EncodeProgress {
    /// Current progress `[0.0, 1.0]`.
    pub progress: f64,

    /// Seconds of output written so far.
    pub out_time_secs: f64,

    /// Current stage.
    pub stage: EncodeStage,
}

/// Stages of one encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeStage {
    Preparing,
    Encoding,
    Complete,
    Failed,
}

/// Trait for render backends (ffmpeg today, anything else tomorrow).
pub trait RenderBackend: Send {
    /// Execute one encode.
    fn render(&mut self, job: &RenderJob, progress: Option<ProgressCallback>) -> AutoclipResult<()>;

    /// Check if this backend is available on the system.
    fn is_available(&self) -> bool;

    /// Backend name.
    fn name(&self) -> &str;
}

/// ffmpeg subprocess backend.
pub struct FfmpegBackend {
    encode: EncodeDefaults,
}

impl FfmpegBackend {
    pub fn new(encode: EncodeDefaults) -> Self {
        Self { encode }
    }

    fn run_ffmpeg(
        &self,
        job: &RenderJob,
        args: &[String],
        progress: Option<ProgressCallback>,
    ) -> AutoclipResult<()> {
        tracing::debug!(args = ?args, "Running ffmpeg");
        let mut child = Command::new("ffmpeg")
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                AutoclipError::encoding(&job.output_path, format!("failed to start ffmpeg: {e}"))
            })?;

        let stdout = child.stdout.take().ok_or_else(|| {
            AutoclipError::encoding(&job.output_path, "failed to capture ffmpeg stdout")
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            AutoclipError::encoding(&job.output_path, "failed to capture ffmpeg stderr")
        })?;

        // Drain stderr concurrently so ffmpeg never blocks on a full pipe.
        let stderr_task = std::thread::spawn(move || -> String {
            let mut reader = BufReader::new(stderr);
            let mut output = String::new();
            match reader.read_to_string(&mut output) {
                Ok(_) => output,
                Err(err) => format!("<failed to read ffmpeg stderr: {err}>"),
            }
        });

        let mut reader = BufReader::new(stdout);
        let mut line = String::new();
        let mut out_time_secs = 0.0f64;
        loop {
            line.clear();
            let bytes = reader.read_line(&mut line).map_err(|e| {
                AutoclipError::encoding(
                    &job.output_path,
                    format!("failed reading ffmpeg progress: {e}"),
                )
            })?;
            if bytes == 0 {
                break;
            }

            let trimmed = line.trim();
            let Some((key, value)) = trimmed.split_once('=') else {
                continue;
            };
            match key {
                "out_time_us" | "out_time_ms" => {
                    if let Ok(us) = value.trim().parse::<u64>() {
                        out_time_secs = us as f64 / 1_000_000.0;
                    }
                }
                "progress" => {
                    if let Some(cb) = &progress {
                        let fraction = if job.total_secs > 0.0 {
                            (out_time_secs / job.total_secs).clamp(0.0, 1.0)
                        } else {
                            0.0
                        };
                        cb(EncodeProgress {
                            progress: fraction,
                            out_time_secs,
                            stage: EncodeStage::Encoding,
                        });
                    }
                }
                _ => {}
            }
        }

        let status = child.wait().map_err(|e| {
            AutoclipError::encoding(&job.output_path, format!("failed to wait on ffmpeg: {e}"))
        })?;
        let stderr_output = stderr_task
            .join()
            .unwrap_or_else(|_| "<failed to join stderr reader>".to_string());

        if !status.success() {
            if let Some(cb) = &progress {
                cb(EncodeProgress {
                    progress: 0.0,
                    out_time_secs,
                    stage: EncodeStage::Failed,
                });
            }
            return Err(AutoclipError::encoding(
                &job.output_path,
                format!("ffmpeg exited with {}: {}", status, stderr_output.trim()),
            ));
        }

        if let Some(cb) = &progress {
            cb(EncodeProgress {
                progress: 1.0,
                out_time_secs,
                stage: EncodeStage::Complete,
            });
        }
        Ok(())
    }
}

impl RenderBackend for FfmpegBackend {
    fn render(&mut self, job: &RenderJob, progress: Option<ProgressCallback>) -> AutoclipResult<()> {
        let started = std::time::Instant::now();

        if let Some(parent) = job.output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        if let Some(cb) = &progress {
            cb(EncodeProgress {
                progress: 0.0,
                out_time_secs: 0.0,
                stage: EncodeStage::Preparing,
            });
        }

        let srt_path = if job.cues.is_empty() {
            None
        } else {
            let path = job.output_path.with_extension("srt");
            autoclip_subtitles::srt::save_srt(&job.cues, &path)?;
            Some(path)
        };

        let args = build_render_args(job, &self.encode, srt_path.as_deref());
        self.run_ffmpeg(job, &args, progress)?;

        tracing::info!(
            output = %job.output_path.display(),
            elapsed_secs = started.elapsed().as_secs_f64(),
            "Encode finished"
        );
        Ok(())
    }

    fn is_available(&self) -> bool {
        command_exists("ffmpeg")
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}
