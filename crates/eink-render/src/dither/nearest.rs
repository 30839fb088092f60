//! Direct nearest-color quantization.

use crate::color::Rgb;
use crate::palette::Palette;

use super::Dither;

/// Maps every pixel to its nearest palette color independently.
///
/// Used when dithering is disabled: no error is tracked, so the result for
/// a pixel depends on that pixel alone.
pub struct NearestColor;

impl Dither for NearestColor {
    fn dither(&self, image: &[Rgb], width: usize, height: usize, palette: &Palette) -> Vec<u8> {
        debug_assert_eq!(image.len(), width * height);
        image.iter().map(|&pixel| palette.find_nearest(pixel)).collect()
    }
}
