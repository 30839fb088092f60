//! Output types for the rendering pipeline.
//!
//! [`DitheredImage`] is the canonical result of quantization: palette
//! indices with dimensions and an owned [`Palette`](crate::palette::Palette).
//! [`encode_bmp`] turns such a raster into a display-ready Windows bitmap.

mod bmp;
mod dithered_image;

pub use bmp::{encode_bmp, pack_row_4bpp, BitDepth, BitmapError};
pub use dithered_image::DitheredImage;
