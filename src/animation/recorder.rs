//! Sequence recorder for writing frames in panel layout.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::NamedTempFile;

use super::format::{Compression, SequenceDescriptor};
use crate::error::{Error, Result};
use crate::schema::EncoderConfig;
use crate::transcode::{Geometry, to_paged_overwrite};

enum Output<W: Write> {
    Raw(W),
    #[cfg(feature = "deflate")]
    Deflate(DeflateWriter<W>),
}

impl<W: Write> Output<W> {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        match self {
            Output::Raw(w) => w.write_all(bytes)?,
            #[cfg(feature = "deflate")]
            Output::Deflate(w) => w.write_all(bytes)?,
        }
        Ok(())
    }

    #[cfg(feature = "deflate")]
    fn deflate(writer: W, config: &EncoderConfig) -> Result<Self> {
        Ok(Output::Deflate(DeflateWriter::new(
            writer,
            config.level,
            config.window_bits,
        )))
    }

    #[cfg(not(feature = "deflate"))]
    fn deflate(_writer: W, _config: &EncoderConfig) -> Result<Self> {
        Err(Error::CompressionUnavailable)
    }

    fn finish(self) -> Result<W> {
        Ok(match self {
            Output::Raw(w) => w,
            #[cfg(feature = "deflate")]
            Output::Deflate(w) => w.finish()?,
        })
    }
}

/// Compressed output staged per call before it reaches the writer.
#[cfg(feature = "deflate")]
const DEFLATE_BUFFER: usize = 32 * 1024;

/// Raw DEFLATE writer with a bounded history window, so the stream never
/// references further back than `1 << window_bits` bytes.
#[cfg(feature = "deflate")]
struct DeflateWriter<W: Write> {
    inner: W,
    compress: flate2::Compress,
    buf: Vec<u8>,
}

#[cfg(feature = "deflate")]
impl<W: Write> DeflateWriter<W> {
    /// `window_bits` must already be validated to 9..=15.
    fn new(inner: W, level: u32, window_bits: u8) -> Self {
        let compress = flate2::Compress::new_with_window_bits(
            flate2::Compression::new(level),
            false,
            window_bits,
        );
        Self {
            inner,
            compress,
            buf: Vec::with_capacity(DEFLATE_BUFFER),
        }
    }

    fn write_all(&mut self, mut input: &[u8]) -> io::Result<()> {
        while !input.is_empty() {
            let before = self.compress.total_in();
            self.run(input, flate2::FlushCompress::None)?;
            let consumed = (self.compress.total_in() - before) as usize;
            input = &input[consumed..];
        }
        Ok(())
    }

    /// One compressor step; whatever it produced goes straight to `inner`.
    fn run(&mut self, input: &[u8], flush: flate2::FlushCompress) -> io::Result<flate2::Status> {
        self.buf.clear();
        let status = self
            .compress
            .compress_vec(input, &mut self.buf, flush)
            .map_err(io::Error::other)?;
        self.inner.write_all(&self.buf)?;
        Ok(status)
    }

    fn finish(mut self) -> io::Result<W> {
        loop {
            match self.run(&[], flate2::FlushCompress::Finish)? {
                flate2::Status::StreamEnd => return Ok(self.inner),
                flate2::Status::Ok => {}
                flate2::Status::BufError => {
                    return Err(io::Error::other("deflate encoder stalled while finishing"));
                }
            }
        }
    }
}

/// Writes a frame stream to any [`Write`], raw or through raw DEFLATE.
///
/// Frames go in as linear bitmaps (transcoded here) or already paged.
pub struct SequenceEncoder<W: Write> {
    output: Output<W>,
    geometry: Geometry,
    compression: Compression,
    frames_written: u32,
    /// Paged scratch for linear input.
    paged: Vec<u8>,
}

impl<W: Write> SequenceEncoder<W> {
    pub fn new(writer: W, geometry: Geometry, config: &EncoderConfig) -> Result<Self> {
        config.validate()?;

        let (output, compression) = if config.compressed {
            (Output::deflate(writer, config)?, Compression::Deflate)
        } else {
            (Output::Raw(writer), Compression::None)
        };

        Ok(Self {
            output,
            geometry,
            compression,
            frames_written: 0,
            paged: vec![0u8; geometry.frame_size()],
        })
    }

    /// Transcode a linear bitmap and append it.
    pub fn push_linear(&mut self, linear: &[u8]) -> Result<()> {
        to_paged_overwrite(
            self.geometry.width(),
            self.geometry.height(),
            linear,
            &mut self.paged,
        )?;
        self.output.write_all(&self.paged)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Append a frame already in panel layout.
    pub fn push_paged(&mut self, paged: &[u8]) -> Result<()> {
        self.geometry.check_len("paged", paged.len())?;
        self.output.write_all(paged)?;
        self.frames_written += 1;
        Ok(())
    }

    /// Append every linear bitmap a producer yields. Returns how many were
    /// written.
    pub fn push_linear_frames<I, B>(&mut self, frames: I) -> Result<u32>
    where
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let before = self.frames_written;
        for frame in frames {
            self.push_linear(frame.as_ref())?;
        }
        Ok(self.frames_written - before)
    }

    pub fn frames_written(&self) -> u32 {
        self.frames_written
    }

    /// Descriptor matching what has been written so far.
    pub fn descriptor(&self) -> SequenceDescriptor {
        let count = (self.frames_written > 0).then_some(self.frames_written);
        SequenceDescriptor::new(self.geometry, count, self.compression)
    }

    /// Terminate the stream and hand back the writer.
    pub fn finish(self) -> Result<(W, u32)> {
        Ok((self.output.finish()?, self.frames_written))
    }
}

/// File-backed recorder. Frames go to a temporary file in the target
/// directory that is persisted as the canonical
/// `<base>.<W>x<H>.<N>img.<ext>` once the count is known. The temporary
/// file is removed if the recorder is dropped or fails before that.
///
/// Usage:
/// ```ignore
/// let mut recorder = SequenceRecorder::create("out", "anim", geometry, &EncoderConfig::default())?;
/// for bitmap in bitmaps {
///     recorder.record_linear(&bitmap)?;
/// }
/// let stats = recorder.finalize()?;
/// ```
pub struct SequenceRecorder {
    encoder: SequenceEncoder<BufWriter<NamedTempFile>>,
    dir: PathBuf,
    base: String,
    overwrite: bool,
}

impl SequenceRecorder {
    pub fn create<P: AsRef<Path>>(
        dir: P,
        base: &str,
        geometry: Geometry,
        config: &EncoderConfig,
    ) -> Result<Self> {
        config.validate()?;
        let dir = dir.as_ref().to_path_buf();
        let prefix = format!("{}.{}.", base, geometry);
        let file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(".partial")
            .tempfile_in(&dir)?;
        debug!("Recording to {}", file.path().display());
        let encoder = SequenceEncoder::new(BufWriter::new(file), geometry, config)?;

        Ok(Self {
            encoder,
            dir,
            base: base.to_owned(),
            overwrite: config.overwrite,
        })
    }

    pub fn record_linear(&mut self, linear: &[u8]) -> Result<()> {
        self.encoder.push_linear(linear)
    }

    pub fn record_paged(&mut self, paged: &[u8]) -> Result<()> {
        self.encoder.push_paged(paged)
    }

    pub fn frames_written(&self) -> u32 {
        self.encoder.frames_written()
    }

    /// Flush, close and move into place under the final name.
    ///
    /// A recording without frames cannot be named and returns
    /// `EmptyOrTruncatedStream`. An existing file with the final name is
    /// left alone and reported as `OutputExists` unless the encoder config
    /// allows overwriting. The temporary file is gone in every case.
    pub fn finalize(self) -> Result<RecordingStats> {
        let descriptor = self.encoder.descriptor();
        let (writer, frame_count) = self.encoder.finish()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;

        if frame_count == 0 {
            return Err(Error::EmptyOrTruncatedStream {
                frame_size: descriptor.frame_size(),
                available: 0,
            });
        }

        let path = self.dir.join(descriptor.file_name(&self.base));
        let persisted = if self.overwrite {
            file.persist(&path)
        } else {
            file.persist_noclobber(&path)
        };
        if let Err(e) = persisted {
            return Err(if e.error.kind() == io::ErrorKind::AlreadyExists {
                Error::OutputExists(path)
            } else {
                e.error.into()
            });
        }

        let stored_bytes = fs::metadata(&path)?.len();
        debug!("Finalized {}", path.display());

        Ok(RecordingStats {
            path,
            descriptor,
            frame_count,
            raw_bytes: frame_count as u64 * descriptor.frame_size() as u64,
            stored_bytes,
        })
    }
}

/// Statistics from a recording session.
#[derive(Debug, Clone)]
pub struct RecordingStats {
    /// Final file location.
    pub path: PathBuf,
    pub descriptor: SequenceDescriptor,
    pub frame_count: u32,
    /// Frame bytes before compression.
    pub raw_bytes: u64,
    /// Bytes on disk.
    pub stored_bytes: u64,
}

impl std::fmt::Display for RecordingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} frames, {} bytes stored ({} raw, {:.1}%), {}",
            self.frame_count,
            self.stored_bytes,
            self.raw_bytes,
            self.stored_bytes as f64 * 100.0 / self.raw_bytes.max(1) as f64,
            self.path.display()
        )
    }
}
