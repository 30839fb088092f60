//! Preprocessing options and configuration.

/// Configuration for the preprocessing chain run before quantization.
///
/// Every stage has an identity value that skips it entirely:
///
/// | Stage      | Parameter        | Identity |
/// |------------|------------------|----------|
/// | Sharpen    | `sharpen_sigma`  | `0.0`    |
/// | Saturation | `saturation`     | `1.0`    |
/// | Contrast   | `contrast`       | `1.0`    |
/// | Gamma      | `gamma`          | `1.0`    |
///
/// # Example
///
/// ```
/// use eink_render::PreprocessOptions;
///
/// let options = PreprocessOptions::new()
///     .sharpen(1.0)
///     .saturation(1.15)
///     .contrast(1.2);
/// assert!(!options.is_identity());
/// assert!(PreprocessOptions::new().is_identity());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PreprocessOptions {
    /// Gaussian sigma of the unsharp mask, in pixels.
    pub sharpen_sigma: f32,

    /// Chroma multiplier around each pixel's luma.
    ///
    /// - 1.0 = no change
    /// - 0.0 = grayscale
    /// - 1.5 = 50% more vivid
    pub saturation: f32,

    /// Contrast gain pivoting on the 128 midpoint.
    pub contrast: f32,

    /// Tone curve exponent; `out = 255 * (in / 255)^(1 / gamma)`.
    ///
    /// Values above 1.0 lift shadows and midtones.
    pub gamma: f32,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            sharpen_sigma: 0.0,
            saturation: 1.0,
            contrast: 1.0,
            gamma: 1.0,
        }
    }
}

impl PreprocessOptions {
    /// Options that leave the raster untouched.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unsharp mask sigma (0.0 disables sharpening).
    #[inline]
    pub fn sharpen(mut self, sigma: f32) -> Self {
        self.sharpen_sigma = sigma;
        self
    }

    /// Set the saturation multiplier.
    #[inline]
    pub fn saturation(mut self, factor: f32) -> Self {
        self.saturation = factor;
        self
    }

    /// Set the contrast gain.
    #[inline]
    pub fn contrast(mut self, factor: f32) -> Self {
        self.contrast = factor;
        self
    }

    /// Set the gamma exponent.
    #[inline]
    pub fn gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    pub(crate) fn sharpen_enabled(&self) -> bool {
        self.sharpen_sigma > 0.0 && self.sharpen_sigma.is_finite()
    }

    pub(crate) fn saturation_enabled(&self) -> bool {
        self.saturation != 1.0 && self.saturation.is_finite() && self.saturation >= 0.0
    }

    pub(crate) fn contrast_enabled(&self) -> bool {
        self.contrast != 1.0 && self.contrast.is_finite()
    }

    pub(crate) fn gamma_enabled(&self) -> bool {
        self.gamma != 1.0 && self.gamma.is_finite() && self.gamma > 0.0
    }

    /// True when no stage would change a pixel.
    pub fn is_identity(&self) -> bool {
        !(self.sharpen_enabled()
            || self.saturation_enabled()
            || self.contrast_enabled()
            || self.gamma_enabled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let opts = PreprocessOptions::default();
        assert_eq!(opts.sharpen_sigma, 0.0);
        assert_eq!(opts.saturation, 1.0);
        assert_eq!(opts.contrast, 1.0);
        assert_eq!(opts.gamma, 1.0);
        assert!(opts.is_identity());
    }

    #[test]
    fn test_builder_chaining() {
        let opts = PreprocessOptions::new()
            .sharpen(1.5)
            .saturation(1.8)
            .contrast(1.2)
            .gamma(2.2);

        assert_eq!(opts.sharpen_sigma, 1.5);
        assert_eq!(opts.saturation, 1.8);
        assert_eq!(opts.contrast, 1.2);
        assert_eq!(opts.gamma, 2.2);
        assert!(!opts.is_identity());
    }

    #[test]
    fn test_degenerate_values_are_skipped() {
        let opts = PreprocessOptions::new()
            .sharpen(-1.0)
            .saturation(f32::NAN)
            .gamma(0.0);
        assert!(opts.is_identity());
    }
}
