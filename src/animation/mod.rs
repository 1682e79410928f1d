//! Frame sequence recording and looping playback for SSD1306-class panels.
//!
//! # File Format
//!
//! A sequence file has no header. Its name carries the metadata and its
//! body is the frames back to back, each `width * height / 8` bytes in
//! paged-panel layout:
//!
//! ```text
//! Name: <base>.<W>x<H>.<N>img.raw   (or .z)
//!
//! Body (.raw):
//!   frame 0 | frame 1 | ... | frame N-1
//!
//! Body (.z):
//!   raw DEFLATE stream (no zlib/gzip framing) of the .raw body
//! ```
//!
//! Legacy names without a frame count (`<base>.<W>x<H>.z`) are accepted;
//! the count is then measured from the stream when the reader opens.

mod format;
mod player;
mod recorder;
mod sink;

pub use format::{
    Compression, DEFLATE_EXTENSION, FRAME_COUNT_SUFFIX, RAW_EXTENSION, SequenceDescriptor,
};
pub use player::{Frame, FrameReader, Frames};
pub use recorder::{RecordingStats, SequenceEncoder, SequenceRecorder};
pub use sink::{FrameSink, TextPreview, play};
