//! DitheredImage: the index raster handed to the bitmap encoder.

use crate::palette::Palette;

use super::bmp::{encode_bmp, BitDepth, BitmapError};

/// Palette indices with dimensions and the palette they index into.
///
/// One `u8` per pixel in row-major (top-down) order. Every index is below
/// `palette().len()`.
///
/// # Example
///
/// ```
/// use eink_render::{DitheredImage, Palette, Rgb};
///
/// let palette = Palette::new(&[Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap();
/// let image = DitheredImage::new(vec![0, 1, 1, 0], 2, 2, palette);
///
/// assert_eq!(image.indices(), &[0, 1, 1, 0]);
/// assert_eq!(&image.to_bmp(Default::default()).unwrap()[0..2], b"BM");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DitheredImage {
    indices: Vec<u8>,
    width: usize,
    height: usize,
    palette: Palette,
}

impl DitheredImage {
    /// Wrap dithered indices.
    ///
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `indices.len() == width * height`.
    pub fn new(indices: Vec<u8>, width: usize, height: usize, palette: Palette) -> Self {
        debug_assert_eq!(
            indices.len(),
            width * height,
            "indices length ({}) must match width * height ({}x{})",
            indices.len(),
            width,
            height,
        );
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    /// Palette indices, row-major.
    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Serialize as a BMP file at the given bit depth.
    pub fn to_bmp(&self, depth: BitDepth) -> Result<Vec<u8>, BitmapError> {
        encode_bmp(&self.indices, self.width, self.height, &self.palette, depth)
    }
}
