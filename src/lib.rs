//! SSD1306 animations - bit-plane transcoding and looping frame playback.
//!
//! This crate converts 1 bpp images between the conventional row-major
//! layout and the paged layout of SSD1306-class OLED controllers, and
//! streams sequences of paged frames (optionally raw-DEFLATE compressed)
//! for endless playback with a working set of one frame plus one read chunk.
//!
//! # Architecture
//!
//! - `transcode`: Linear <-> paged bit-plane transform
//! - `animation`: File name metadata, streaming reader, recorder, sinks
//! - `schema`: Configuration passed to readers and encoders
//!
//! # Example
//!
//! ```rust,no_run
//! use ssd1306_anim::{
//!     animation::FrameReader,
//!     schema::PlaybackConfig,
//! };
//!
//! let mut reader = FrameReader::open("animated_python.128x64.36img.z", PlaybackConfig::default())?;
//! for _ in 0..reader.frame_count() * 2 {
//!     let _frame = reader.next_frame()?;
//!     // hand the frame to the display driver
//! }
//! # Ok::<(), ssd1306_anim::Error>(())
//! ```

pub mod animation;
pub mod error;
pub mod schema;
pub mod transcode;

// Re-export commonly used types
pub use animation::{Frame, FrameReader, FrameSink, SequenceDescriptor, SequenceRecorder};
pub use error::{Error, Result};
pub use schema::{EncoderConfig, PlaybackConfig};
pub use transcode::{Geometry, from_paged, to_paged};
