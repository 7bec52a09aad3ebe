//! AutoClip Material Model
//!
//! Defines the core data contracts for AutoClip generation runs:
//! - **Clips:** Probed source files (path, duration, resolution)
//! - **Groups:** Named, weighted, ordered clip pools
//! - **Mix configuration:** The validated per-generation config surface
//! - **Discovery:** Folder scan producing the read-only library snapshot
//!
//! The library snapshot is built once per generation request and shared
//! read-only across all batch jobs.

pub mod clip;
pub mod discover;
pub mod mix;

pub use clip::*;
pub use discover::*;
pub use mix::*;
