//! Validated panel geometry.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Pixel rows per controller page.
pub const PAGE_HEIGHT: u32 = 8;

/// Width and height of a 1 bpp panel image, both non-zero multiples of 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGeometry")]
pub struct Geometry {
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct RawGeometry {
    width: u32,
    height: u32,
}

impl TryFrom<RawGeometry> for Geometry {
    type Error = Error;

    fn try_from(raw: RawGeometry) -> Result<Self> {
        Geometry::new(raw.width, raw.height)
    }
}

impl Geometry {
    /// The 128x64 panel found on most SSD1306 modules.
    pub const SSD1306_128X64: Geometry = Geometry {
        width: 128,
        height: 64,
    };

    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 || width % 8 != 0 || height % PAGE_HEIGHT != 0 {
            return Err(Error::InvalidDimensions(format!(
                "{}x{} (width and height must be non-zero multiples of 8)",
                width, height
            )));
        }
        Ok(Self { width, height })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row of the linear bitmap.
    #[inline]
    pub fn stride(&self) -> usize {
        self.width as usize / 8
    }

    /// Number of 8-row pages.
    #[inline]
    pub fn pages(&self) -> usize {
        (self.height / PAGE_HEIGHT) as usize
    }

    /// Size of one frame in either layout.
    #[inline]
    pub fn frame_size(&self) -> usize {
        self.width as usize * self.height as usize / 8
    }

    /// Reject a buffer whose length is not exactly one frame.
    pub(crate) fn check_len(&self, what: &str, len: usize) -> Result<()> {
        if len != self.frame_size() {
            return Err(Error::InvalidDimensions(format!(
                "{} buffer is {} bytes, {}x{} needs {}",
                what,
                len,
                self.width,
                self.height,
                self.frame_size()
            )));
        }
        Ok(())
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
