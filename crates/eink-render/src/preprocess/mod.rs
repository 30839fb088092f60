//! Raster adjustments applied before quantization.
//!
//! The chain runs in a fixed order, each stage independently skippable:
//!
//! 1. **Sharpen** - unsharp mask with a Gaussian of configurable sigma
//! 2. **Saturation** - linear chroma scaling around each pixel's luma
//! 3. **Contrast** - `out = in * gain - 128 * (gain - 1)`, pivoting on 128
//! 4. **Gamma** - `out = 255 * (in / 255)^(1 / gamma)`
//!
//! Contrast and gamma are per-channel curves, so they are fused into one
//! 256-entry lookup table when both are active.
//!
//! # Example
//!
//! ```
//! use eink_render::{Preprocessor, PreprocessOptions, Rgb};
//!
//! let options = PreprocessOptions::new().saturation(1.15).contrast(1.2);
//! let preprocessor = Preprocessor::new(options);
//!
//! let input = vec![Rgb::new(128, 128, 128); 4];
//! let output = preprocessor.process(&input, 2, 2);
//!
//! // Mid-gray is the contrast pivot and has no chroma to scale
//! assert!(output.iter().all(|&p| p == Rgb::new(128, 128, 128)));
//! ```

mod options;
mod preprocessor;
mod sharpen;
mod tone;

pub use options::PreprocessOptions;
pub use preprocessor::Preprocessor;
