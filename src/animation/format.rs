//! File name metadata for frame sequences.
//!
//! Sequences carry no in-band header. Everything the reader needs is in the
//! file name suffix:
//!
//! ```text
//! <base>.<W>x<H>.<N>img.raw     canonical, uncompressed
//! <base>.<W>x<H>.<N>img.z       canonical, raw DEFLATE
//! <base>.<W>x<H>.<N>img         extension omitted, uncompressed
//! <base>.<W>x<H>.<N>.raw|.z     bare frame count
//! <base>.<W>x<H>.raw|.z         legacy, count implied by stream length
//! ```

use std::fmt;
use std::path::Path;

use crate::error::{Error, Result};
use crate::transcode::Geometry;

/// Extension of raw DEFLATE sequences.
pub const DEFLATE_EXTENSION: &str = "z";

/// Extension of uncompressed sequences.
pub const RAW_EXTENSION: &str = "raw";

/// Suffix of the frame count field.
pub const FRAME_COUNT_SUFFIX: &str = "img";

/// Compression applied to the frame stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Frames stored back to back.
    #[default]
    None,
    /// Raw DEFLATE stream, no zlib or gzip framing.
    Deflate,
}

impl Compression {
    pub fn extension(self) -> &'static str {
        match self {
            Compression::None => RAW_EXTENSION,
            Compression::Deflate => DEFLATE_EXTENSION,
        }
    }
}

/// Geometry, frame count and compression of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceDescriptor {
    pub geometry: Geometry,
    /// `None` for legacy names until the stream has been measured.
    pub frame_count: Option<u32>,
    pub compression: Compression,
}

impl SequenceDescriptor {
    pub fn new(geometry: Geometry, frame_count: Option<u32>, compression: Compression) -> Self {
        Self {
            geometry,
            frame_count,
            compression,
        }
    }

    /// Parse the metadata suffix of a bare file name.
    pub fn parse(name: &str) -> Result<Self> {
        Self::parse_with_base(name).map(|(_, descriptor)| descriptor)
    }

    /// Parse a file name, also returning the base part before the metadata.
    pub fn parse_with_base(name: &str) -> Result<(String, Self)> {
        let mut fields: Vec<&str> = name.split('.').collect();

        let compression = match fields.last().copied() {
            Some(DEFLATE_EXTENSION) => {
                fields.pop();
                Compression::Deflate
            }
            Some(RAW_EXTENSION) => {
                fields.pop();
                Compression::None
            }
            _ => Compression::None,
        };

        let last = fields
            .pop()
            .ok_or_else(|| Error::invalid_name(name, "missing WxH field"))?;

        let ((width, height), frame_count) = match parse_dims(last) {
            Some(dims) => (dims, None),
            None => {
                let count = parse_count(last)
                    .ok_or_else(|| Error::invalid_name(name, "missing WxH field"))?;
                let dims = fields
                    .pop()
                    .and_then(parse_dims)
                    .ok_or_else(|| Error::invalid_name(name, "missing WxH field"))?;
                (dims, Some(count))
            }
        };

        let geometry = Geometry::new(width, height).map_err(|_| {
            Error::invalid_name(name, "dimensions must be non-zero multiples of 8")
        })?;
        if frame_count == Some(0) {
            return Err(Error::invalid_name(name, "frame count must be non-zero"));
        }

        Ok((
            fields.join("."),
            Self::new(geometry, frame_count, compression),
        ))
    }

    /// Parse the file name component of `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::invalid_name(&path.to_string_lossy(), "no UTF-8 file name"))?;
        Self::parse(name)
    }

    /// Build the file name for this descriptor. Legacy form when the frame
    /// count is unknown.
    pub fn file_name(&self, base: &str) -> String {
        match self.frame_count {
            Some(count) => format!(
                "{}.{}.{}{}.{}",
                base,
                self.geometry,
                count,
                FRAME_COUNT_SUFFIX,
                self.compression.extension()
            ),
            None => format!(
                "{}.{}.{}",
                base,
                self.geometry,
                self.compression.extension()
            ),
        }
    }

    pub fn with_frame_count(self, frame_count: u32) -> Self {
        Self {
            frame_count: Some(frame_count),
            ..self
        }
    }

    #[inline]
    pub fn frame_size(&self) -> usize {
        self.geometry.frame_size()
    }

    #[inline]
    pub fn is_compressed(&self) -> bool {
        self.compression == Compression::Deflate
    }
}

impl fmt::Display for SequenceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.geometry)?;
        match self.frame_count {
            Some(1) => write!(f, ", 1 frame")?,
            Some(n) => write!(f, ", {} frames", n)?,
            None => write!(f, ", frame count from stream")?,
        }
        write!(
            f,
            ", {}",
            match self.compression {
                Compression::None => "uncompressed",
                Compression::Deflate => "deflate",
            }
        )
    }
}

fn parse_number(field: &str) -> Option<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

fn parse_dims(field: &str) -> Option<(u32, u32)> {
    let (width, height) = field.split_once('x')?;
    Some((parse_number(width)?, parse_number(height)?))
}

fn parse_count(field: &str) -> Option<u32> {
    parse_number(field.strip_suffix(FRAME_COUNT_SUFFIX).unwrap_or(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(width: u32, height: u32) -> Geometry {
        Geometry::new(width, height).unwrap()
    }

    #[test]
    fn test_canonical_names() {
        let d = SequenceDescriptor::parse("animated_python.128x64.36img.z").unwrap();
        assert_eq!(d.geometry, geometry(128, 64));
        assert_eq!(d.frame_count, Some(36));
        assert!(d.is_compressed());
        assert_eq!(d.frame_size(), 1024);

        let d = SequenceDescriptor::parse("still_mycat.128x64.1img.raw").unwrap();
        assert_eq!(d.frame_count, Some(1));
        assert_eq!(d.compression, Compression::None);

        let d = SequenceDescriptor::parse("clip.64x32.5img").unwrap();
        assert_eq!(d.geometry, geometry(64, 32));
        assert_eq!(d.frame_count, Some(5));
        assert_eq!(d.compression, Compression::None);
    }

    #[test]
    fn test_legacy_names() {
        let d = SequenceDescriptor::parse("my_animation.128x64.z").unwrap();
        assert_eq!(d.frame_count, None);
        assert!(d.is_compressed());

        let d = SequenceDescriptor::parse("my_animation.128x64.raw").unwrap();
        assert_eq!(d.frame_count, None);
        assert!(!d.is_compressed());

        let d = SequenceDescriptor::parse("my_animation.128x64.42.z").unwrap();
        assert_eq!(d.frame_count, Some(42));
    }

    #[test]
    fn test_base_with_dots() {
        let (base, d) = SequenceDescriptor::parse_with_base("th a.n.o.s.128x64.45img.raw").unwrap();
        assert_eq!(base, "th a.n.o.s");
        assert_eq!(d.frame_count, Some(45));
    }

    #[test]
    fn test_rejects_unrecognized() {
        for name in [
            "foo.raw",
            "foo",
            "foo.36img.z",
            "foo.128y64.raw",
            "foo.128x.raw",
            "foo.x64.3img.raw",
            "foo.+128x64.raw",
            "foo.128x64.abcimg.z",
            "foo.12x64.2img.raw",
            "foo.128x60.raw",
            "foo.128x64.0img.z",
            "foo.99999999999x64.raw",
        ] {
            let err = SequenceDescriptor::parse(name).unwrap_err();
            assert!(
                matches!(err, Error::InvalidSequenceDescriptor { .. }),
                "{} gave {:?}",
                name,
                err
            );
        }
    }

    #[test]
    fn test_file_name_roundtrip() {
        let d = SequenceDescriptor::new(geometry(128, 64), Some(200), Compression::Deflate);
        let name = d.file_name("video_Big_Buck_Bunny_monow");
        assert_eq!(name, "video_Big_Buck_Bunny_monow.128x64.200img.z");
        assert_eq!(SequenceDescriptor::parse(&name).unwrap(), d);

        let legacy = SequenceDescriptor::new(geometry(32, 16), None, Compression::None);
        assert_eq!(legacy.file_name("x"), "x.32x16.raw");
    }

    #[test]
    fn test_from_path_uses_file_name() {
        let d = SequenceDescriptor::from_path("/tmp/some.dir/anim.16x8.3img.raw").unwrap();
        assert_eq!(d.frame_count, Some(3));
        assert_eq!(d.frame_size(), 16);
    }

    #[test]
    fn test_display() {
        let d = SequenceDescriptor::parse("a.128x64.36img.z").unwrap();
        assert_eq!(d.to_string(), "128x64, 36 frames, deflate");
    }
}
