//! Configuration types for playback and encoding.

use serde::{Deserialize, Serialize};

/// Compressed bytes pulled from the source per read. Matches the chunk
/// size the device-side reader has always used.
pub const DEFAULT_CHUNK_SIZE: usize = 512;

/// DEFLATE level used by the encoder unless configured otherwise.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 9;

/// Base-2 log of the DEFLATE window the encoder may reference. A 4 KiB
/// window keeps the device-side decoder within a few kilobytes of RAM.
pub const DEFAULT_WINDOW_BITS: u8 = 12;

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_level() -> u32 {
    DEFAULT_COMPRESSION_LEVEL
}

fn default_window_bits() -> u8 {
    DEFAULT_WINDOW_BITS
}

/// What the reader does with bytes left over at end of stream that do not
/// fill a whole frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingBytes {
    /// Drop the partial frame and wrap to frame 0.
    #[default]
    Discard,
    /// Fail with `EmptyOrTruncatedStream`.
    Reject,
}

/// Reader configuration, passed explicitly at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Size of each compressed read in bytes.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Policy for a partial frame at end of stream.
    #[serde(default)]
    pub trailing: TrailingBytes,
    /// Emit a `trace!` record for every frame produced.
    #[serde(default)]
    pub trace_frames: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            trailing: TrailingBytes::default(),
            trace_frames: false,
        }
    }
}

impl PlaybackConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        Ok(())
    }
}

/// Encoder configuration for recorded sequences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderConfig {
    /// Wrap the frame stream in raw DEFLATE.
    #[serde(default)]
    pub compressed: bool,
    /// DEFLATE level, 0-9.
    #[serde(default = "default_level")]
    pub level: u32,
    /// DEFLATE window size as a power of two, 9-15. Decoders need at
    /// least this much history to read the stream back.
    #[serde(default = "default_window_bits")]
    pub window_bits: u8,
    /// Replace an existing file with the same final name.
    #[serde(default)]
    pub overwrite: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            compressed: false,
            level: DEFAULT_COMPRESSION_LEVEL,
            window_bits: DEFAULT_WINDOW_BITS,
            overwrite: false,
        }
    }
}

impl EncoderConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.level > 9 {
            return Err(ConfigError::InvalidLevel(self.level));
        }
        if !(9..=15).contains(&self.window_bits) {
            return Err(ConfigError::InvalidWindowBits(self.window_bits));
        }
        Ok(())
    }
}

/// Top-level configuration file for the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub encoder: EncoderConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.playback.validate()?;
        self.encoder.validate()
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Chunk size must be non-zero")]
    InvalidChunkSize,
    #[error("Compression level {0} is out of range 0-9")]
    InvalidLevel(u32),
    #[error("Window bits {0} is out of range 9-15")]
    InvalidWindowBits(u8),
}
