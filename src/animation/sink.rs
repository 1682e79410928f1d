//! Frame consumers and the playback pump.

use std::io::{Read, Seek, Write};

use super::player::{Frame, FrameReader};
use super::recorder::{SequenceEncoder, SequenceRecorder};
use crate::error::Result;
use crate::transcode::Geometry;

/// Anything that accepts one paged frame at a time: a display driver's
/// buffer upload, a re-encoder, a preview.
pub trait FrameSink {
    fn send_frame(&mut self, frame: &[u8]) -> Result<()>;
}

impl<S: FrameSink + ?Sized> FrameSink for &mut S {
    fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        (**self).send_frame(frame)
    }
}

/// Collects copies of every frame.
impl FrameSink for Vec<Frame> {
    fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.push(Frame::new(frame.to_vec()));
        Ok(())
    }
}

impl<W: Write> FrameSink for SequenceEncoder<W> {
    fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.push_paged(frame)
    }
}

impl FrameSink for SequenceRecorder {
    fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        self.record_paged(frame)
    }
}

/// Pump `count` frames from `reader` into `sink` through a single reused
/// buffer. Stops at the first error from either side.
pub fn play<R, S>(reader: &mut FrameReader<R>, sink: &mut S, count: u64) -> Result<()>
where
    R: Read + Seek,
    S: FrameSink + ?Sized,
{
    let mut buffer = vec![0u8; reader.frame_size()];
    for _ in 0..count {
        reader.read_frame_into(&mut buffer)?;
        sink.send_frame(&buffer)?;
    }
    Ok(())
}

/// Renders frames as text, one character per pixel, for terminals and logs.
pub struct TextPreview<W> {
    out: W,
    geometry: Geometry,
    lit: char,
    unlit: char,
    frames: u64,
}

impl<W: Write> TextPreview<W> {
    pub fn new(out: W, geometry: Geometry) -> Self {
        Self {
            out,
            geometry,
            lit: '#',
            unlit: '.',
            frames: 0,
        }
    }

    pub fn with_glyphs(mut self, lit: char, unlit: char) -> Self {
        self.lit = lit;
        self.unlit = unlit;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameSink for TextPreview<W> {
    fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        let linear = self.geometry.paged_to_linear(frame)?;
        let stride = self.geometry.stride();

        writeln!(self.out, "-- frame {} --", self.frames)?;
        for row in linear.chunks_exact(stride) {
            let line: String = row
                .iter()
                .flat_map(|&byte| (0..8).map(move |bit| byte & (0x80 >> bit) != 0))
                .map(|on| if on { self.lit } else { self.unlit })
                .collect();
            writeln!(self.out, "{}", line)?;
        }
        self.frames += 1;
        Ok(())
    }
}
