//! AutoClip Render Boundary
//!
//! The hand-off between the planning engine and the external encoder:
//!
//! ```text
//! material folders ──► discovery ──► planning (autoclip-engine)
//!                                        │
//!                                   RenderJob(s)
//!                                        │
//!              ┌─────────────────────────┼──────────────────────┐
//!              ▼                         ▼                      ▼
//!        srt sidecar             metadata sidecar        ffmpeg argv
//!              └─────────────────────────┴──────────────────────┘
//!                                        │
//!                            bounded concurrent encodes
//!                                        │
//!                                        ▼
//!                        {tag_}{timestamp}_{stem}/variant_k.mp4
//! ```
//!
//! The core never encodes pixels; it builds fully-specified commands and
//! throttles how many run at once.

pub mod backend;
pub mod batch;
pub mod ffmpeg;
pub mod preprocess;
pub mod probe;

pub use backend::{EncodeProgress, EncodeStage, FfmpegBackend, ProgressCallback, RenderBackend};
pub use batch::{
    batch_dir_name, create_batch_dir, render_batch, sanitize_component, write_metadata_sidecar,
    BackendFactory, RenderOutcome, RenderStatus,
};
pub use ffmpeg::build_render_args;
pub use preprocess::{preprocess_assets, PreprocessSummary};
pub use probe::{command_exists, probe_audio_duration, FfprobeProber};
