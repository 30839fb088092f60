//! EinkRenderer builder -- the primary ergonomic entry point for the crate.
//!
//! [`EinkRenderer`] wraps preprocessing, quantization and bitmap encoding
//! behind fluent configuration.

use crate::color::Rgb;
use crate::dither::DitherAlgorithm;
use crate::output::{BitDepth, DitheredImage};
use crate::palette::Palette;
use crate::preprocess::{PreprocessOptions, Preprocessor};

use super::error::RenderPipelineError;

/// High-level render builder for e-ink displays.
///
/// - Constructor requires [`Palette`] (no invalid states)
/// - Configuration methods consume and return `self`
/// - [`render()`](Self::render) takes `&self`, so one renderer can be
///   reused across images and threads
///
/// # Example
///
/// ```
/// use eink_render::{EinkRenderer, Palette, Rgb};
///
/// let renderer = EinkRenderer::new(Palette::eink_7color())
///     .saturation(1.15)
///     .contrast(1.2);
///
/// let pixels = vec![Rgb::new(128, 128, 128); 4];
/// let result = renderer.render(&pixels, 2, 2);
///
/// assert_eq!(result.width(), 2);
/// assert_eq!(result.height(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct EinkRenderer {
    palette: Palette,
    preprocess: PreprocessOptions,
    algorithm: DitherAlgorithm,
    bit_depth: BitDepth,
}

impl EinkRenderer {
    /// Create a renderer for `palette`.
    ///
    /// Defaults: Floyd-Steinberg, no preprocessing, 4 bits per pixel.
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            preprocess: PreprocessOptions::default(),
            algorithm: DitherAlgorithm::default(),
            bit_depth: BitDepth::default(),
        }
    }

    /// Set unsharp mask sigma; `0` disables sharpening.
    #[inline]
    pub fn sharpen(mut self, sigma: f32) -> Self {
        self.preprocess = self.preprocess.sharpen(sigma);
        self
    }

    /// Set saturation multiplier.
    #[inline]
    pub fn saturation(mut self, factor: f32) -> Self {
        self.preprocess = self.preprocess.saturation(factor);
        self
    }

    /// Set contrast gain.
    #[inline]
    pub fn contrast(mut self, factor: f32) -> Self {
        self.preprocess = self.preprocess.contrast(factor);
        self
    }

    /// Set gamma.
    #[inline]
    pub fn gamma(mut self, gamma: f32) -> Self {
        self.preprocess = self.preprocess.gamma(gamma);
        self
    }

    /// Replace all preprocessing options at once.
    #[inline]
    pub fn preprocess(mut self, options: PreprocessOptions) -> Self {
        self.preprocess = options;
        self
    }

    /// Set the quantization algorithm.
    #[inline]
    pub fn algorithm(mut self, algorithm: DitherAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Toggle error diffusion. `false` quantizes each pixel directly.
    #[inline]
    pub fn dithering(self, enabled: bool) -> Self {
        self.algorithm(DitherAlgorithm::from_enabled(enabled))
    }

    /// Set the bit depth used by [`render_bmp()`](Self::render_bmp).
    #[inline]
    pub fn bit_depth(mut self, depth: BitDepth) -> Self {
        self.bit_depth = depth;
        self
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Preprocess and quantize an in-memory raster.
    ///
    /// `pixels` is row-major with `width * height` entries and is not
    /// modified.
    pub fn render(&self, pixels: &[Rgb], width: usize, height: usize) -> DitheredImage {
        let processed = if self.preprocess.is_identity() {
            None
        } else {
            Some(Preprocessor::new(self.preprocess.clone()).process(pixels, width, height))
        };
        let source = processed.as_deref().unwrap_or(pixels);

        let indices = self.algorithm.apply(source, width, height, &self.palette);
        DitheredImage::new(indices, width, height, self.palette.clone())
    }

    /// Render a packed `[R, G, B, ...]` buffer straight to BMP bytes.
    ///
    /// # Errors
    ///
    /// [`RenderPipelineError::InvalidRaster`] when `rgb` is not exactly
    /// `width * height * 3` bytes, or a bitmap error for empty or
    /// oversized dimensions.
    pub fn render_bmp(
        &self,
        rgb: &[u8],
        width: usize,
        height: usize,
    ) -> Result<Vec<u8>, RenderPipelineError> {
        let expected = width.checked_mul(height).and_then(|n| n.checked_mul(3));
        if expected != Some(rgb.len()) {
            return Err(RenderPipelineError::InvalidRaster {
                width,
                height,
                len: rgb.len(),
            });
        }

        let pixels: Vec<Rgb> = rgb
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        let image = self.render(&pixels, width, height);
        Ok(image.to_bmp(self.bit_depth)?)
    }
}
