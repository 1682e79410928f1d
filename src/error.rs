//! Error taxonomy shared by the transcoder, the descriptor codec and the
//! streaming reader.

use std::io;
use std::path::PathBuf;

use crate::schema::ConfigError;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors surfaced by every public operation of this crate.
///
/// None of these are retried internally. The only retry in the crate is
/// the single rewind on an empty uncompressed read, which implements
/// looping rather than fault tolerance.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Width/height not a non-zero multiple of 8, or a buffer whose length
    /// does not match `width * height / 8`. Raised before any byte is
    /// written.
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// A file name without a recognizable `WxH[.N[img]][.raw|.z]` suffix.
    #[error("Invalid sequence descriptor '{name}': {reason}")]
    InvalidSequenceDescriptor { name: String, reason: &'static str },

    /// The stream cannot yield a single full frame, even after rewinding,
    /// or it ends on a partial frame under `TrailingBytes::Reject`.
    #[error("Empty or truncated stream: {available} of {frame_size} frame bytes available")]
    EmptyOrTruncatedStream { frame_size: usize, available: usize },

    /// The DEFLATE decoder rejected the stream.
    #[error("Corrupt stream: {0}")]
    CorruptStream(String),

    /// A compressed sequence was requested in a build without the
    /// `deflate` feature.
    #[error("Compressed sequences require the `deflate` feature")]
    CompressionUnavailable,

    /// A recording would replace an existing file and overwriting is off.
    #[error("{} already exists, remove it or enable overwrite", .0.display())]
    OutputExists(PathBuf),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub(crate) fn invalid_name(name: &str, reason: &'static str) -> Self {
        Error::InvalidSequenceDescriptor {
            name: name.to_owned(),
            reason,
        }
    }
}
