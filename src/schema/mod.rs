//! Schema module - Configuration types for playback and encoding.

mod config;

pub use config::*;
