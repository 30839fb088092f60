//! Palette quantization with optional error diffusion.
//!
//! Two strategies implement the [`Dither`] trait:
//!
//! - [`FloydSteinberg`]: classic error diffusion, 100% propagation
//! - [`NearestColor`]: direct per-pixel quantization, no state between pixels
//!
//! Both scan row-major, left-to-right, top-to-bottom, and both read the
//! input raster without modifying it.
//!
//! # Example
//!
//! ```
//! use eink_render::{Dither, FloydSteinberg, Palette, Rgb};
//!
//! let palette = Palette::new(&[Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap();
//! let pixels = vec![Rgb::new(128, 128, 128); 16];
//!
//! let indices = FloydSteinberg.dither(&pixels, 4, 4, &palette);
//! assert_eq!(indices.len(), 16);
//! ```

mod floyd_steinberg;
mod kernel;
mod nearest;

pub use floyd_steinberg::FloydSteinberg;
pub use kernel::{Kernel, FLOYD_STEINBERG};
pub use nearest::NearestColor;

use crate::color::Rgb;
use crate::palette::Palette;

/// Dither algorithm selection for the builder API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherAlgorithm {
    /// Floyd-Steinberg error diffusion.
    #[default]
    FloydSteinberg,

    /// Direct nearest-color mapping without error tracking.
    None,
}

impl DitherAlgorithm {
    /// Map the "dithering enabled" setting onto an algorithm.
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            DitherAlgorithm::FloydSteinberg
        } else {
            DitherAlgorithm::None
        }
    }

    /// Run this algorithm over an image.
    pub fn apply(self, image: &[Rgb], width: usize, height: usize, palette: &Palette) -> Vec<u8> {
        match self {
            DitherAlgorithm::FloydSteinberg => FloydSteinberg.dither(image, width, height, palette),
            DitherAlgorithm::None => NearestColor.dither(image, width, height, palette),
        }
    }
}

/// Converts a continuous-tone raster into palette indices.
pub trait Dither {
    /// Dither an image to palette indices.
    ///
    /// `image` is row-major with `width * height` pixels. The result holds
    /// one index per pixel in the same order, each in `0..palette.len()`.
    fn dither(&self, image: &[Rgb], width: usize, height: usize, palette: &Palette) -> Vec<u8>;
}

/// Error buffer for efficient error diffusion.
///
/// Keeps only the rows the kernel can reach (`max_dy + 1`) instead of a
/// full-image working copy. Values are per-channel errors on the 0..255
/// scale.
///
/// # Usage Pattern
///
/// 1. Create buffer with `new(width, row_depth)`
/// 2. For each row:
///    a. Read accumulated error with `get_accumulated(x)`
///    b. After processing pixel, distribute error with `add_error(x, dy, error)`
///    c. After row complete, call `advance_row()`
#[derive(Debug)]
pub struct ErrorBuffer {
    /// Error rows: rows[0] is current row, rows[1] is next, etc.
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    /// Create a new error buffer with `row_depth` zeroed rows.
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    /// Accumulated error for pixel `x` of the current row.
    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to a future pixel. Out-of-bounds targets are ignored.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            for c in 0..3 {
                self.rows[row_offset][x][c] += error[c];
            }
        }
    }

    /// Advance to the next row: drop the current one and append a zeroed row.
    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

/// Clamp an error-adjusted channel into the displayable range.
#[inline]
pub(crate) fn clamp_channel(value: f32) -> f32 {
    value.clamp(0.0, 255.0)
}

/// Error diffusion loop parameterized by kernel.
///
/// Neighbors that fall outside the image are skipped, with no wraparound.
pub(crate) fn dither_with_kernel(
    image: &[Rgb],
    width: usize,
    height: usize,
    palette: &Palette,
    kernel: &Kernel,
) -> Vec<u8> {
    debug_assert_eq!(image.len(), width * height);

    let mut output = vec![0u8; width * height];
    let mut error_buf = ErrorBuffer::new(width, kernel.max_dy + 1);
    let divisor = kernel.divisor as f32;

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;

            let source = image[idx].to_f32();
            let accumulated = error_buf.get_accumulated(x);
            let adjusted = [
                clamp_channel(source[0] + accumulated[0]),
                clamp_channel(source[1] + accumulated[1]),
                clamp_channel(source[2] + accumulated[2]),
            ];

            let pixel = Rgb::from_f32_clamped(adjusted[0], adjusted[1], adjusted[2]);
            let nearest_idx = palette.find_nearest(pixel);
            output[idx] = nearest_idx;

            let chosen = palette.color(nearest_idx as usize).to_f32();
            let error = [
                adjusted[0] - chosen[0],
                adjusted[1] - chosen[1],
                adjusted[2] - chosen[2],
            ];

            for &(dx, dy, weight) in kernel.entries {
                let nx = x as i32 + dx;
                if nx >= 0 && (nx as usize) < width && y + (dy as usize) < height {
                    let share = weight as f32 / divisor;
                    error_buf.add_error(
                        nx as usize,
                        dy as usize,
                        [error[0] * share, error[1] * share, error[2] * share],
                    );
                }
            }
        }

        error_buf.advance_row();
    }

    output
}
