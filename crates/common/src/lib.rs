//! AutoClip Common Utilities
//!
//! Shared infrastructure for all AutoClip crates:
//! - Error types and result aliases
//! - Frame-grid time utilities
//! - Tracing/logging initialization
//! - Configuration loading

pub mod config;
pub mod error;
pub mod frames;
pub mod logging;

pub use config::*;
pub use error::*;
pub use frames::*;
