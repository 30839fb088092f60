//! The ordered preprocessing chain.
//!
//! Stages always run sharpen → saturation → contrast → gamma. Later stages
//! amplify whatever earlier ones produced, so the order is part of the
//! output contract and must not change.

use crate::color::Rgb;

use super::options::PreprocessOptions;
use super::sharpen::unsharp_mask;
use super::tone::ToneLut;

/// Applies [`PreprocessOptions`] to 8-bit RGB rasters.
///
/// The preprocessor is immutable after construction and can be shared
/// across threads; the tone curve is built once up front.
///
/// # Example
///
/// ```
/// use eink_render::{Preprocessor, PreprocessOptions, Rgb};
///
/// let preprocessor = Preprocessor::new(PreprocessOptions::new().contrast(2.0));
/// let out = preprocessor.process(&[Rgb::new(100, 128, 156)], 1, 1);
/// assert_eq!(out, vec![Rgb::new(72, 128, 184)]);
/// ```
#[derive(Debug, Clone)]
pub struct Preprocessor {
    options: PreprocessOptions,
    /// Contrast followed by gamma, or `None` when both are identity.
    tone: Option<ToneLut>,
}

impl Preprocessor {
    /// Create a preprocessor for the given options.
    pub fn new(options: PreprocessOptions) -> Self {
        let contrast = options
            .contrast_enabled()
            .then(|| ToneLut::contrast(options.contrast));
        let gamma = options.gamma_enabled().then(|| ToneLut::gamma(options.gamma));

        let tone = match (contrast, gamma) {
            (Some(c), Some(g)) => Some(c.then(&g)),
            (Some(c), None) => Some(c),
            (None, Some(g)) => Some(g),
            (None, None) => None,
        };

        Self { options, tone }
    }

    /// The options this preprocessor was built with.
    pub fn options(&self) -> &PreprocessOptions {
        &self.options
    }

    /// Run the chain over `input`, returning a new raster.
    ///
    /// `input` is left untouched. With identity options the result is a
    /// plain copy.
    pub fn process(&self, input: &[Rgb], width: usize, height: usize) -> Vec<Rgb> {
        debug_assert_eq!(input.len(), width * height);

        let mut pixels = input.to_vec();

        if self.options.sharpen_enabled() {
            unsharp_mask(&mut pixels, width, height, self.options.sharpen_sigma);
        }

        if self.options.saturation_enabled() {
            let factor = self.options.saturation;
            for pixel in &mut pixels {
                *pixel = saturate(*pixel, factor);
            }
        }

        if let Some(tone) = &self.tone {
            for pixel in &mut pixels {
                *pixel = Rgb::new(tone.apply(pixel.r), tone.apply(pixel.g), tone.apply(pixel.b));
            }
        }

        pixels
    }
}

/// Scale each channel's distance from the pixel's luma by `factor`.
#[inline]
fn saturate(pixel: Rgb, factor: f32) -> Rgb {
    let luma = pixel.luma();
    let [r, g, b] = pixel.to_f32();
    Rgb::from_f32_clamped(
        luma + (r - luma) * factor,
        luma + (g - luma) * factor,
        luma + (b - luma) * factor,
    )
}
