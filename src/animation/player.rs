//! Streaming frame reader for looping playback.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::ops::Deref;
use std::path::Path;

use log::{debug, trace, warn};

use super::format::SequenceDescriptor;
use crate::error::{Error, Result};
use crate::schema::{PlaybackConfig, TrailingBytes};
use crate::transcode::Geometry;

/// One panel image in paged layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame(Vec<u8>);

impl Frame {
    pub(crate) fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Re-convert to a linear bitmap, e.g. for a generic image viewer.
    pub fn to_linear(&self, geometry: &Geometry) -> Result<Vec<u8>> {
        geometry.paged_to_linear(&self.0)
    }
}

impl Deref for Frame {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Frame> for Vec<u8> {
    fn from(frame: Frame) -> Self {
        frame.0
    }
}

/// Sequential reader yielding fixed-size frames forever.
///
/// Uncompressed sources are read one frame at a time. Compressed sources are
/// pulled in `chunk_size` pieces and inflated straight into the frame being
/// assembled, so the working set stays at one frame plus one chunk no matter
/// how long the sequence is or how well it compresses.
///
/// When the stream runs out the reader seeks back to the start and carries
/// on with frame 0. For compressed sources the decompression context is
/// thrown away and rebuilt, since inflate state cannot be rewound.
///
/// Usage:
/// ```ignore
/// let mut reader = FrameReader::open("anim.128x64.36img.z", PlaybackConfig::default())?;
/// loop {
///     let frame = reader.next_frame()?;
///     display.send_buffer(&frame);
/// }
/// ```
pub struct FrameReader<R> {
    source: R,
    descriptor: SequenceDescriptor,
    frame_count: u32,
    config: PlaybackConfig,
    #[cfg(feature = "deflate")]
    inflate: Option<Inflate>,
    /// Frames yielded since the last wrap.
    position: u32,
    /// Completed passes over the stream.
    cycles: u64,
}

impl FrameReader<File> {
    /// Open a sequence file, taking its metadata from the file name.
    ///
    /// The name is validated before the file is touched.
    pub fn open<P: AsRef<Path>>(path: P, config: PlaybackConfig) -> Result<Self> {
        let path = path.as_ref();
        let descriptor = SequenceDescriptor::from_path(path)?;
        let file = File::open(path)?;
        debug!("Opened {} ({})", path.display(), descriptor);
        Self::new(file, descriptor, config)
    }
}

impl<R: Read + Seek> FrameReader<R> {
    /// Wrap an already open source.
    ///
    /// A descriptor without a frame count gets one by measuring the stream,
    /// which for compressed sources means one full inflate pass.
    pub fn new(
        mut source: R,
        descriptor: SequenceDescriptor,
        config: PlaybackConfig,
    ) -> Result<Self> {
        config.validate()?;
        if descriptor.is_compressed() && !cfg!(feature = "deflate") {
            return Err(Error::CompressionUnavailable);
        }

        let frame_count = match descriptor.frame_count {
            Some(count) => count,
            None => {
                let count = measure_frames(&mut source, &descriptor, &config)?;
                debug!("Measured {} frames in stream", count);
                count
            }
        };

        Ok(Self {
            source,
            descriptor: descriptor.with_frame_count(frame_count),
            frame_count,
            config,
            #[cfg(feature = "deflate")]
            inflate: None,
            position: 0,
            cycles: 0,
        })
    }

    /// Produce the next frame, wrapping to frame 0 at end of stream.
    pub fn next_frame(&mut self) -> Result<Frame> {
        let mut frame = vec![0u8; self.frame_size()];
        self.read_frame_into(&mut frame)?;
        Ok(Frame::new(frame))
    }

    /// Like [`next_frame`](Self::next_frame), reusing a caller buffer of
    /// exactly one frame.
    ///
    /// On error the buffer content is unspecified and the session should
    /// be dropped.
    pub fn read_frame_into(&mut self, frame: &mut [u8]) -> Result<()> {
        self.descriptor.geometry.check_len("frame", frame.len())?;

        if self.descriptor.is_compressed() {
            self.fill_compressed(frame)?;
        } else {
            self.fill_raw(frame)?;
        }

        if self.config.trace_frames {
            trace!(
                "Frame {}/{} (cycle {})",
                self.position + 1,
                self.frame_count,
                self.cycles
            );
        }
        self.position += 1;
        Ok(())
    }

    /// Iterate frames without end. Stops after the first error.
    pub fn frames(&mut self) -> Frames<'_, R> {
        Frames {
            reader: self,
            failed: false,
        }
    }

    fn fill_raw(&mut self, frame: &mut [u8]) -> Result<()> {
        let filled = read_full(&mut self.source, frame)?;
        if filled == frame.len() {
            return Ok(());
        }

        self.end_of_stream(filled)?;

        let filled = read_full(&mut self.source, frame)?;
        if filled < frame.len() {
            return Err(Error::EmptyOrTruncatedStream {
                frame_size: frame.len(),
                available: filled,
            });
        }
        Ok(())
    }

    #[cfg(feature = "deflate")]
    fn fill_compressed(&mut self, frame: &mut [u8]) -> Result<()> {
        let chunk_size = self.config.chunk_size;
        let mut filled = 0;

        loop {
            let inflate = self
                .inflate
                .get_or_insert_with(|| Inflate::new(chunk_size));
            filled += inflate.fill(&mut self.source, &mut frame[filled..])?;
            if filled == frame.len() {
                return Ok(());
            }

            // Inflate only stops short at the end of the deflate stream.
            let tail = std::mem::take(&mut filled);
            self.end_of_stream(tail)?;
        }
    }

    #[cfg(not(feature = "deflate"))]
    fn fill_compressed(&mut self, _frame: &mut [u8]) -> Result<()> {
        Err(Error::CompressionUnavailable)
    }

    /// Apply the trailing-bytes policy to a partial frame and rewind.
    fn end_of_stream(&mut self, tail: usize) -> Result<()> {
        let frame_size = self.frame_size();

        if tail > 0 {
            match self.config.trailing {
                TrailingBytes::Reject => {
                    return Err(Error::EmptyOrTruncatedStream {
                        frame_size,
                        available: tail,
                    });
                }
                TrailingBytes::Discard => {
                    warn!(
                        "Discarding {} trailing bytes after frame {} (frame size {})",
                        tail, self.position, frame_size
                    );
                }
            }
        }

        // A whole pass without a single frame would rewind forever.
        if self.position == 0 {
            return Err(Error::EmptyOrTruncatedStream {
                frame_size,
                available: tail,
            });
        }

        self.rewind()
    }

    fn rewind(&mut self) -> Result<()> {
        if self.position != self.frame_count {
            warn!(
                "Stream held {} frames but {} were declared",
                self.position, self.frame_count
            );
        }

        self.source.seek(SeekFrom::Start(0))?;
        #[cfg(feature = "deflate")]
        {
            self.inflate = None;
        }
        self.position = 0;
        self.cycles += 1;
        debug!("Rewound to frame 0, starting cycle {}", self.cycles);
        Ok(())
    }
}

impl<R> FrameReader<R> {
    pub fn descriptor(&self) -> &SequenceDescriptor {
        &self.descriptor
    }

    pub fn geometry(&self) -> Geometry {
        self.descriptor.geometry
    }

    /// Frames per cycle, declared or measured.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    pub fn frame_size(&self) -> usize {
        self.descriptor.frame_size()
    }

    /// Index of the next frame within the current cycle.
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Number of times the stream has wrapped.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn into_inner(self) -> R {
        self.source
    }
}

/// Endless iterator over a [`FrameReader`].
pub struct Frames<'a, R> {
    reader: &'a mut FrameReader<R>,
    failed: bool,
}

impl<R: Read + Seek> Iterator for Frames<'_, R> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.reader.next_frame();
        self.failed = result.is_err();
        Some(result)
    }
}

/// Incremental raw-DEFLATE state: decoder plus the unconsumed part of the
/// last compressed chunk.
#[cfg(feature = "deflate")]
struct Inflate {
    decoder: flate2::Decompress,
    chunk: Vec<u8>,
    pos: usize,
    len: usize,
    source_eof: bool,
    stream_end: bool,
}

#[cfg(feature = "deflate")]
impl Inflate {
    fn new(chunk_size: usize) -> Self {
        Self {
            decoder: flate2::Decompress::new(false),
            chunk: vec![0u8; chunk_size],
            pos: 0,
            len: 0,
            source_eof: false,
            stream_end: false,
        }
    }

    /// Inflate into `out` until it is full or the deflate stream ends.
    /// Returns the number of bytes written.
    fn fill<R: Read>(&mut self, source: &mut R, out: &mut [u8]) -> Result<usize> {
        use flate2::{FlushDecompress, Status};

        let mut produced = 0;
        while produced < out.len() && !self.stream_end {
            if self.pos == self.len && !self.source_eof {
                self.len = read_full(source, &mut self.chunk)?;
                self.pos = 0;
                self.source_eof = self.len == 0;
            }
            if self.source_eof && self.decoder.total_in() == 0 {
                // Zero-length source: an empty stream, not a corrupt one.
                self.stream_end = true;
                break;
            }

            let flush = if self.source_eof {
                FlushDecompress::Finish
            } else {
                FlushDecompress::None
            };
            let (in_before, out_before) = (self.decoder.total_in(), self.decoder.total_out());
            let status = self
                .decoder
                .decompress(&self.chunk[self.pos..self.len], &mut out[produced..], flush)
                .map_err(|e| Error::CorruptStream(e.to_string()))?;
            let consumed = (self.decoder.total_in() - in_before) as usize;
            let written = (self.decoder.total_out() - out_before) as usize;
            self.pos += consumed;
            produced += written;

            match status {
                Status::StreamEnd => self.stream_end = true,
                _ if consumed == 0 && written == 0 => {
                    if self.source_eof {
                        return Err(Error::CorruptStream(
                            "source ended before the final deflate block".into(),
                        ));
                    }
                    if self.pos < self.len {
                        return Err(Error::CorruptStream("inflate made no progress".into()));
                    }
                }
                _ => {}
            }
        }
        Ok(produced)
    }
}

/// Count the whole frames in a stream, leaving the source at its start.
fn measure_frames<R: Read + Seek>(
    source: &mut R,
    descriptor: &SequenceDescriptor,
    config: &PlaybackConfig,
) -> Result<u32> {
    let frame_size = descriptor.frame_size() as u64;
    let total = if descriptor.is_compressed() {
        inflated_len(source, config.chunk_size)?
    } else {
        source.seek(SeekFrom::End(0))?
    };
    source.seek(SeekFrom::Start(0))?;

    let count = total / frame_size;
    let tail = (total % frame_size) as usize;
    if count == 0 || (tail > 0 && config.trailing == TrailingBytes::Reject) {
        return Err(Error::EmptyOrTruncatedStream {
            frame_size: frame_size as usize,
            available: tail,
        });
    }
    if tail > 0 {
        warn!("Stream ends with {} bytes past frame {}", tail, count);
    }
    Ok(u32::try_from(count).unwrap_or(u32::MAX))
}

#[cfg(feature = "deflate")]
fn inflated_len<R: Read>(source: &mut R, chunk_size: usize) -> Result<u64> {
    let mut inflate = Inflate::new(chunk_size);
    let mut scratch = vec![0u8; chunk_size];
    let mut total = 0u64;
    while !inflate.stream_end {
        total += inflate.fill(source, &mut scratch)? as u64;
    }
    Ok(total)
}

#[cfg(not(feature = "deflate"))]
fn inflated_len<R: Read>(_source: &mut R, _chunk_size: usize) -> Result<u64> {
    Err(Error::CompressionUnavailable)
}

/// Read until `buf` is full or the source is exhausted.
fn read_full<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::format::Compression;
    use std::io::Cursor;

    fn geometry() -> Geometry {
        Geometry::new(32, 16).unwrap()
    }

    /// Distinct, poorly aligned content per frame.
    fn make_frames(count: usize) -> Vec<Vec<u8>> {
        let size = geometry().frame_size();
        (0..count)
            .map(|i| (0..size).map(|j| (i * 131 + j * 7 + j / 5) as u8).collect())
            .collect()
    }

    fn descriptor(count: Option<u32>, compression: Compression) -> SequenceDescriptor {
        SequenceDescriptor::new(geometry(), count, compression)
    }

    fn raw_reader(
        bytes: Vec<u8>,
        count: Option<u32>,
        config: PlaybackConfig,
    ) -> Result<FrameReader<Cursor<Vec<u8>>>> {
        FrameReader::new(Cursor::new(bytes), descriptor(count, Compression::None), config)
    }

    fn read_n<R: Read + Seek>(reader: &mut FrameReader<R>, n: usize) -> Vec<Vec<u8>> {
        (0..n).map(|_| reader.next_frame().unwrap().into_bytes()).collect()
    }

    #[test]
    fn test_raw_yields_sequential_slices() {
        let frames = make_frames(5);
        let mut reader = raw_reader(frames.concat(), Some(5), PlaybackConfig::default()).unwrap();

        let read = read_n(&mut reader, 5);
        assert_eq!(read, frames);
        for (i, a) in read.iter().enumerate() {
            for b in &read[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(reader.position(), 5);
        assert_eq!(reader.cycles(), 0);
    }

    #[test]
    fn test_raw_loops_exactly() {
        let frames = make_frames(4);
        let mut reader = raw_reader(frames.concat(), Some(4), PlaybackConfig::default()).unwrap();

        let read = read_n(&mut reader, 8);
        assert_eq!(&read[..4], &frames[..]);
        assert_eq!(&read[4..], &frames[..]);
        assert_eq!(reader.cycles(), 1);
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_single_frame_loops() {
        let frames = make_frames(1);
        let mut reader = raw_reader(frames.concat(), Some(1), PlaybackConfig::default()).unwrap();
        for _ in 0..3 {
            assert_eq!(reader.next_frame().unwrap().as_bytes(), &frames[0][..]);
        }
        assert_eq!(reader.cycles(), 2);
    }

    #[test]
    fn test_raw_trailing_bytes() {
        let frames = make_frames(3);
        let mut bytes = frames.concat();
        bytes.extend_from_slice(&[1, 2, 3]);

        let mut reader = raw_reader(bytes.clone(), Some(3), PlaybackConfig::default()).unwrap();
        let read = read_n(&mut reader, 6);
        assert_eq!(&read[3..], &frames[..]);

        let strict = PlaybackConfig {
            trailing: TrailingBytes::Reject,
            ..Default::default()
        };
        let mut reader = raw_reader(bytes, Some(3), strict).unwrap();
        read_n(&mut reader, 3);
        assert!(matches!(
            reader.next_frame(),
            Err(Error::EmptyOrTruncatedStream { available: 3, .. })
        ));
    }

    #[test]
    fn test_raw_empty_or_short() {
        let mut reader = raw_reader(Vec::new(), Some(1), PlaybackConfig::default()).unwrap();
        assert!(matches!(
            reader.next_frame(),
            Err(Error::EmptyOrTruncatedStream { available: 0, .. })
        ));

        let mut reader = raw_reader(vec![0xAA; 10], Some(1), PlaybackConfig::default()).unwrap();
        assert!(matches!(
            reader.next_frame(),
            Err(Error::EmptyOrTruncatedStream { .. })
        ));
    }

    #[test]
    fn test_rejects_wrong_buffer() {
        let frames = make_frames(1);
        let mut reader = raw_reader(frames.concat(), Some(1), PlaybackConfig::default()).unwrap();
        let mut small = vec![0u8; 3];
        assert!(matches!(
            reader.read_frame_into(&mut small),
            Err(Error::InvalidDimensions(_))
        ));
    }

    #[test]
    fn test_raw_measures_legacy_count() {
        let frames = make_frames(6);
        let mut reader = raw_reader(frames.concat(), None, PlaybackConfig::default()).unwrap();
        assert_eq!(reader.frame_count(), 6);
        assert_eq!(reader.descriptor().frame_count, Some(6));
        assert_eq!(read_n(&mut reader, 6), frames);
    }

    #[test]
    fn test_frames_iterator() {
        let frames = make_frames(2);
        let mut reader = raw_reader(frames.concat(), Some(2), PlaybackConfig::default()).unwrap();
        let read: Vec<Frame> = reader.frames().take(5).collect::<Result<_>>().unwrap();
        assert_eq!(read.len(), 5);
        assert_eq!(read[4].as_bytes(), &frames[0][..]);

        let mut empty = raw_reader(Vec::new(), Some(1), PlaybackConfig::default()).unwrap();
        let mut iter = empty.frames();
        assert!(matches!(iter.next(), Some(Err(_))));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_invalid_config() {
        let config = PlaybackConfig {
            chunk_size: 0,
            ..Default::default()
        };
        assert!(matches!(
            raw_reader(make_frames(1).concat(), Some(1), config),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_open_rejects_bad_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo.raw");
        std::fs::write(&path, make_frames(1).concat()).unwrap();
        assert!(matches!(
            FrameReader::open(&path, PlaybackConfig::default()),
            Err(Error::InvalidSequenceDescriptor { .. })
        ));
    }

    #[test]
    fn test_open_raw_file() {
        let dir = tempfile::tempdir().unwrap();
        let frames = make_frames(3);
        let path = dir.path().join(descriptor(Some(3), Compression::None).file_name("clip"));
        std::fs::write(&path, frames.concat()).unwrap();

        let mut reader = FrameReader::open(&path, PlaybackConfig::default()).unwrap();
        let read = read_n(&mut reader, 6);
        assert_eq!(&read[..3], &frames[..]);
        assert_eq!(&read[3..], &frames[..]);
    }

    #[test]
    fn test_frame_to_linear() {
        let frames = make_frames(1);
        let mut reader = raw_reader(frames.concat(), Some(1), PlaybackConfig::default()).unwrap();
        let frame = reader.next_frame().unwrap();
        let linear = frame.to_linear(&geometry()).unwrap();
        assert_eq!(geometry().linear_to_paged(&linear).unwrap(), frames[0]);
    }

    #[cfg(feature = "deflate")]
    mod deflate {
        use super::*;
        use flate2::write::DeflateEncoder;
        use std::io::Write;

        fn compress(bytes: &[u8]) -> Vec<u8> {
            let mut encoder = DeflateEncoder::new(Vec::new(), flate2::Compression::new(9));
            encoder.write_all(bytes).unwrap();
            encoder.finish().unwrap()
        }

        fn reader(
            compressed: Vec<u8>,
            count: Option<u32>,
            config: PlaybackConfig,
        ) -> Result<FrameReader<Cursor<Vec<u8>>>> {
            FrameReader::new(
                Cursor::new(compressed),
                descriptor(count, Compression::Deflate),
                config,
            )
        }

        fn chunked(chunk_size: usize) -> PlaybackConfig {
            PlaybackConfig {
                chunk_size,
                ..Default::default()
            }
        }

        #[test]
        fn test_compressed_loops_exactly() {
            let frames = make_frames(5);
            let mut reader = reader(compress(&frames.concat()), Some(5), chunked(64)).unwrap();

            let read = read_n(&mut reader, 10);
            assert_eq!(&read[..5], &frames[..]);
            assert_eq!(&read[5..], &frames[..]);
            assert_eq!(reader.cycles(), 1);
        }

        #[test]
        fn test_chunk_size_independent() {
            let frames = make_frames(7);
            let compressed = compress(&frames.concat());

            let expected: Vec<Vec<u8>> = frames.iter().chain(frames.iter()).cloned().collect();
            for chunk_size in [1, 3, 64, 511, 4096] {
                let mut reader = reader(compressed.clone(), Some(7), chunked(chunk_size)).unwrap();
                assert_eq!(read_n(&mut reader, 14), expected, "chunk size {}", chunk_size);
            }
        }

        #[test]
        fn test_highly_compressible_stays_bounded() {
            let geometry = Geometry::SSD1306_128X64;
            let frames = vec![0u8; geometry.frame_size() * 50];
            let compressed = compress(&frames);
            assert!(compressed.len() < 512);

            let mut reader = FrameReader::new(
                Cursor::new(compressed),
                SequenceDescriptor::new(geometry, Some(50), Compression::Deflate),
                PlaybackConfig::default(),
            )
            .unwrap();
            for _ in 0..120 {
                assert!(reader.next_frame().unwrap().iter().all(|&b| b == 0));
            }
            assert_eq!(reader.cycles(), 2);
            assert_eq!(reader.position(), 20);
        }

        #[test]
        fn test_compressed_trailing_bytes() {
            let frames = make_frames(3);
            let mut bytes = frames.concat();
            bytes.extend_from_slice(&[9; 5]);
            let compressed = compress(&bytes);

            let mut lenient = reader(compressed.clone(), Some(3), chunked(16)).unwrap();
            let read = read_n(&mut lenient, 9);
            assert_eq!(&read[3..6], &frames[..]);
            assert_eq!(&read[6..], &frames[..]);

            let strict = PlaybackConfig {
                chunk_size: 16,
                trailing: TrailingBytes::Reject,
                ..Default::default()
            };
            let mut strict = reader(compressed, Some(3), strict).unwrap();
            read_n(&mut strict, 3);
            assert!(matches!(
                strict.next_frame(),
                Err(Error::EmptyOrTruncatedStream { available: 5, .. })
            ));
        }

        #[test]
        fn test_compressed_empty() {
            let mut reader = reader(compress(&[]), Some(1), chunked(8)).unwrap();
            assert!(matches!(
                reader.next_frame(),
                Err(Error::EmptyOrTruncatedStream { available: 0, .. })
            ));
        }

        #[test]
        fn test_zero_length_source() {
            let mut reader = reader(Vec::new(), Some(1), chunked(8)).unwrap();
            assert!(matches!(
                reader.next_frame(),
                Err(Error::EmptyOrTruncatedStream { available: 0, .. })
            ));
        }

        #[test]
        fn test_shorter_than_one_frame() {
            let mut reader = reader(compress(&[1, 2, 3]), Some(1), chunked(8)).unwrap();
            assert!(matches!(
                reader.next_frame(),
                Err(Error::EmptyOrTruncatedStream { available: 3, .. })
            ));
        }

        #[test]
        fn test_corrupt_stream() {
            // BFINAL=1 with the reserved block type.
            let mut reader = reader(vec![0xFF; 32], Some(1), chunked(8)).unwrap();
            assert!(matches!(reader.next_frame(), Err(Error::CorruptStream(_))));
        }

        #[test]
        fn test_truncated_stream() {
            let frames = make_frames(4);
            let compressed = compress(&frames.concat());
            let cut = compressed[..compressed.len() / 2].to_vec();

            let mut reader = reader(cut, Some(4), chunked(32)).unwrap();
            let err = (0..8).find_map(|_| reader.next_frame().err()).unwrap();
            assert!(matches!(err, Error::CorruptStream(_)), "{:?}", err);
        }

        #[test]
        fn test_compressed_measures_legacy_count() {
            let frames = make_frames(4);
            let mut reader = reader(compress(&frames.concat()), None, chunked(32)).unwrap();
            assert_eq!(reader.frame_count(), 4);
            let read = read_n(&mut reader, 8);
            assert_eq!(&read[4..], &frames[..]);
        }

        #[test]
        fn test_legacy_count_rejects_empty() {
            assert!(matches!(
                reader(compress(&[]), None, chunked(32)),
                Err(Error::EmptyOrTruncatedStream { .. })
            ));
        }
    }
}
