//! Unified error type for the eink-render public API.

use crate::output::BitmapError;
use crate::palette::PaletteError;
use std::fmt;

/// Unified error type for the eink-render public API.
///
/// Wraps all error types from the crate into a single enum for
/// convenient `?` propagation in application code.
///
/// # Example
///
/// ```
/// use eink_render::{Palette, RenderPipelineError};
///
/// fn create_palette() -> Result<Palette, RenderPipelineError> {
///     let palette = Palette::from_hex(&["#000000", "#FFFFFF"])?;
///     Ok(palette)
/// }
/// ```
#[derive(Debug)]
pub enum RenderPipelineError {
    /// Palette could not be built
    Palette(PaletteError),
    /// Bitmap encoding error
    Bitmap(BitmapError),
    /// Raw pixel buffer does not describe a `width x height` RGB raster
    InvalidRaster {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
        /// Length of the supplied buffer in bytes
        len: usize,
    },
}

impl fmt::Display for RenderPipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderPipelineError::Palette(err) => write!(f, "palette error: {}", err),
            RenderPipelineError::Bitmap(err) => write!(f, "bitmap error: {}", err),
            RenderPipelineError::InvalidRaster { width, height, len } => write!(
                f,
                "{} bytes is not a {}x{} RGB raster",
                len, width, height
            ),
        }
    }
}

impl std::error::Error for RenderPipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderPipelineError::Palette(err) => Some(err),
            RenderPipelineError::Bitmap(err) => Some(err),
            RenderPipelineError::InvalidRaster { .. } => None,
        }
    }
}

impl From<PaletteError> for RenderPipelineError {
    fn from(err: PaletteError) -> Self {
        RenderPipelineError::Palette(err)
    }
}

impl From<BitmapError> for RenderPipelineError {
    fn from(err: BitmapError) -> Self {
        RenderPipelineError::Bitmap(err)
    }
}
