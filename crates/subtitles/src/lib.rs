//! AutoClip Subtitle Intelligence
//!
//! Everything between raw speech and burn-ready cues:
//! - **Cues:** The timed subtitle entry model
//! - **SRT:** Parse and emit the standard indexed cue format
//! - **Synchronization:** Offset correction, clamping, fragment merging,
//!   and overlap repair against a compiled timeline
//! - **Collaborators:** Trait boundaries for speech recognition and
//!   text-to-speech; inference itself stays external

pub mod cue;
pub mod narration;
pub mod recognize;
pub mod srt;
pub mod sync;

pub use cue::*;
pub use recognize::*;
pub use srt::*;
pub use sync::*;
