#![allow(clippy::module_inception)]

//! eink-render: palette rendering for e-ink photo frames
//!
//! Turns an arbitrary 8-bit RGB raster into the indexed bitmap an e-ink
//! panel consumes: a small fixed palette, no alpha, nibble-packed rows.
//!
//! # Quick Start
//!
//! The [`EinkRenderer`] builder is the primary entry point:
//!
//! ```
//! use eink_render::{EinkRenderer, Palette, Rgb};
//!
//! let renderer = EinkRenderer::new(Palette::eink_7color())
//!     .sharpen(1.0)
//!     .saturation(1.15)
//!     .contrast(1.2);
//!
//! let pixels = vec![Rgb::new(200, 40, 40); 6];
//! let image = renderer.render(&pixels, 3, 2);
//! assert!(image.indices().iter().all(|&i| (i as usize) < 7));
//! ```
//!
//! # Pipeline
//!
//! ```text
//! RGB raster
//!     |
//!     v
//! sharpen -> saturation -> contrast -> gamma     (Preprocessor)
//!     |
//!     v
//! Floyd-Steinberg or nearest color               (DitherAlgorithm)
//!     |
//!     v
//! palette indices                                (DitheredImage)
//!     |
//!     v
//! BMP, 4 bits per pixel, bottom-up               (encode_bmp)
//! ```
//!
//! Every stage is a pure function of its inputs: the same raster and
//! options always produce the same bytes.
//!
//! # Color Matching
//!
//! Nearest color is plain squared Euclidean distance in 8-bit RGB with
//! ties going to the lowest palette index. Error diffusion also works on
//! the 0..255 scale; the adjusted pixel is clamped before matching but the
//! error pushed to neighbors is measured against that clamped value.

pub mod api;
pub mod color;
pub mod dither;
pub mod output;
pub mod palette;
pub mod preprocess;


pub use api::{EinkRenderer, RenderPipelineError};
pub use color::Rgb;
pub use dither::{Dither, DitherAlgorithm, FloydSteinberg, Kernel, NearestColor, FLOYD_STEINBERG};
pub use output::{encode_bmp, BitDepth, BitmapError, DitheredImage};
pub use palette::{Palette, PaletteError, ParseColorError, MAX_PALETTE_COLORS};
pub use preprocess::{PreprocessOptions, Preprocessor};
