//! Transcode module - Bit-plane conversion between linear bitmaps and the
//! paged layout of SSD1306-class controllers.

mod bitplane;
mod geometry;

pub use bitplane::*;
pub use geometry::*;
