//! Bit-plane transform between linear bitmaps and paged-panel layout.
//!
//! A linear bitmap stores row `y` at bytes `y * stride .. (y + 1) * stride`,
//! eight horizontal pixels per byte, MSB leftmost. The panel layout stores
//! byte `page * width + col` as eight vertical pixels of column `col`,
//! bit 0 being the top row of the page.
//!
//! The plain entry points OR into the destination so several layers can be
//! composed into one buffer. Use the `_overwrite` variants to get a clean
//! conversion regardless of what the destination held before.

use super::geometry::Geometry;
use crate::error::Result;

/// Convert a linear bitmap to paged-panel layout, OR-ing into `paged_out`.
///
/// Both buffers must be exactly `width * height / 8` bytes. Bits already set
/// in `paged_out` are kept.
pub fn to_paged(width: u32, height: u32, linear_in: &[u8], paged_out: &mut [u8]) -> Result<()> {
    let geometry = Geometry::new(width, height)?;
    geometry.check_len("linear", linear_in.len())?;
    geometry.check_len("paged", paged_out.len())?;
    scatter_to_paged(&geometry, linear_in, paged_out);
    Ok(())
}

/// Convert a paged-panel buffer to a linear bitmap, OR-ing into `linear_out`.
///
/// Both buffers must be exactly `width * height / 8` bytes. Bits already set
/// in `linear_out` are kept.
pub fn from_paged(width: u32, height: u32, paged_in: &[u8], linear_out: &mut [u8]) -> Result<()> {
    let geometry = Geometry::new(width, height)?;
    geometry.check_len("paged", paged_in.len())?;
    geometry.check_len("linear", linear_out.len())?;
    scatter_to_linear(&geometry, paged_in, linear_out);
    Ok(())
}

/// Like [`to_paged`], but zero-fills `paged_out` first.
pub fn to_paged_overwrite(
    width: u32,
    height: u32,
    linear_in: &[u8],
    paged_out: &mut [u8],
) -> Result<()> {
    let geometry = Geometry::new(width, height)?;
    geometry.check_len("linear", linear_in.len())?;
    geometry.check_len("paged", paged_out.len())?;
    paged_out.fill(0);
    scatter_to_paged(&geometry, linear_in, paged_out);
    Ok(())
}

/// Like [`from_paged`], but zero-fills `linear_out` first.
pub fn from_paged_overwrite(
    width: u32,
    height: u32,
    paged_in: &[u8],
    linear_out: &mut [u8],
) -> Result<()> {
    let geometry = Geometry::new(width, height)?;
    geometry.check_len("paged", paged_in.len())?;
    geometry.check_len("linear", linear_out.len())?;
    linear_out.fill(0);
    scatter_to_linear(&geometry, paged_in, linear_out);
    Ok(())
}

impl Geometry {
    /// Allocate a fresh paged buffer for `linear`.
    pub fn linear_to_paged(&self, linear: &[u8]) -> Result<Vec<u8>> {
        self.check_len("linear", linear.len())?;
        let mut paged = vec![0u8; self.frame_size()];
        scatter_to_paged(self, linear, &mut paged);
        Ok(paged)
    }

    /// Allocate a fresh linear bitmap for `paged`.
    pub fn paged_to_linear(&self, paged: &[u8]) -> Result<Vec<u8>> {
        self.check_len("paged", paged.len())?;
        let mut linear = vec![0u8; self.frame_size()];
        scatter_to_linear(self, paged, &mut linear);
        Ok(linear)
    }
}

/// Lengths have been checked by the caller.
fn scatter_to_paged(geometry: &Geometry, linear: &[u8], paged: &mut [u8]) {
    let stride = geometry.stride();
    let width = geometry.width() as usize;

    for page in 0..geometry.pages() {
        let band = &linear[page * stride * 8..(page + 1) * stride * 8];
        let row_out = &mut paged[page * width..(page + 1) * width];

        for (x, columns) in row_out.chunks_exact_mut(8).enumerate() {
            for z in 0..8 {
                let a = band[z * stride + x];
                for (bit, column) in columns.iter_mut().enumerate() {
                    *column |= ((a >> (7 - bit)) & 1) << z;
                }
            }
        }
    }
}

/// Lengths have been checked by the caller.
fn scatter_to_linear(geometry: &Geometry, paged: &[u8], linear: &mut [u8]) {
    let stride = geometry.stride();
    let width = geometry.width() as usize;

    for page in 0..geometry.pages() {
        let row_in = &paged[page * width..(page + 1) * width];
        let band = &mut linear[page * stride * 8..(page + 1) * stride * 8];

        for (x, columns) in row_in.chunks_exact(8).enumerate() {
            for (z, &a) in columns.iter().enumerate() {
                for row in 0..8 {
                    band[row * stride + x] |= ((a >> row) & 1) << (7 - z);
                }
            }
        }
    }
}
