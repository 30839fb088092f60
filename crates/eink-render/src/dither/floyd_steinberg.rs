//! Floyd-Steinberg error diffusion dithering algorithm.

use crate::color::Rgb;
use crate::palette::Palette;

use super::{dither_with_kernel, Dither, FLOYD_STEINBERG};

/// Floyd-Steinberg error diffusion dithering.
///
/// Distributes 100% of the quantization error to 4 neighbors:
///
/// ```text
///        X   7
///    3   5   1
/// ```
///
/// Weights: 7/16 right, 3/16 bottom-left, 5/16 bottom, 1/16 bottom-right.
/// Every scan runs left-to-right so the kernel is never mirrored.
pub struct FloydSteinberg;

impl Dither for FloydSteinberg {
    fn dither(&self, image: &[Rgb], width: usize, height: usize, palette: &Palette) -> Vec<u8> {
        dither_with_kernel(image, width, height, palette, &FLOYD_STEINBERG)
    }
}
