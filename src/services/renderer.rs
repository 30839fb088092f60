use crate::error::RenderError;
use crate::models::{DisplayConfig, Settings};
use eink_render::{EinkRenderer, Palette};
use image::{imageops::FilterType, ImageError, ImageReader, Limits};
use std::io::Cursor;

/// Rasters above this many pixels are rejected before decoding.
pub const MAX_SOURCE_PIXELS: u64 = 100_000_000;

/// Widest decoded sample: 16-bit RGBA.
const MAX_BYTES_PER_PIXEL: u64 = 8;

/// Turns uploaded image bytes into display-ready 4-bpp bitmaps
#[derive(Debug, Clone)]
pub struct RenderService {
    width: u32,
    height: u32,
    palette: Palette,
}

impl RenderService {
    pub fn new(display: &DisplayConfig) -> Result<Self, RenderError> {
        if display.width == 0 || display.height == 0 {
            return Err(RenderError::EmptyRaster);
        }
        let palette = display
            .palette()
            .map_err(|e| RenderError::Palette(e.to_string()))?;
        Ok(Self {
            width: display.width,
            height: display.height,
            palette,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Render uploaded bytes to a BMP for the configured display
    ///
    /// Uses spawn_blocking to avoid blocking the async runtime during
    /// decoding, resampling and dithering.
    pub async fn render(&self, bytes: Vec<u8>, settings: &Settings) -> Result<Vec<u8>, RenderError> {
        let service = self.clone();
        let settings = settings.clone();

        tokio::task::spawn_blocking(move || service.render_blocking(&bytes, &settings))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))?
    }

    /// Synchronous pipeline: decode, fit to the display, preprocess, dither, encode
    pub fn render_blocking(&self, bytes: &[u8], settings: &Settings) -> Result<Vec<u8>, RenderError> {
        let started = std::time::Instant::now();
        let rgb = self.decode_and_fit(bytes)?;

        let bitmap = EinkRenderer::new(self.palette.clone())
            .preprocess(settings.preprocess_options())
            .dithering(settings.dithering_enabled)
            .render_bmp(rgb.as_raw(), self.width as usize, self.height as usize)
            .map_err(|e| RenderError::Encode(e.to_string()))?;

        tracing::debug!(
            width = self.width,
            height = self.height,
            dithering = settings.dithering_enabled,
            bytes = bitmap.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Rendered bitmap"
        );

        Ok(bitmap)
    }

    /// Decode any supported format and center-crop-resize to the display
    fn decode_and_fit(&self, bytes: &[u8]) -> Result<image::RgbImage, RenderError> {
        if bytes.is_empty() {
            return Err(RenderError::InvalidInput("empty body".to_string()));
        }

        let (width, height) = guessed_reader(bytes)?
            .into_dimensions()
            .map_err(|e| RenderError::InvalidInput(e.to_string()))?;
        check_dimensions(width, height)?;

        let mut reader = guessed_reader(bytes)?;
        reader.limits(decode_limits());
        let decoded = reader
            .decode()
            .map_err(|e| decode_error(e, width as u64 * height as u64))?;

        let fitted = if decoded.width() == self.width && decoded.height() == self.height {
            decoded
        } else {
            decoded.resize_to_fill(self.width, self.height, FilterType::Lanczos3)
        };

        // Alpha is dropped, not composited
        Ok(fitted.to_rgb8())
    }
}

fn guessed_reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, RenderError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| RenderError::InvalidInput(e.to_string()))
}

/// Decoder limits sized so any raster under the pixel cap can be decoded.
fn decode_limits() -> Limits {
    let mut limits = Limits::default();
    limits.max_alloc = Some(MAX_SOURCE_PIXELS * MAX_BYTES_PER_PIXEL);
    limits
}

/// Limit hits are a size problem, everything else is a bad upload.
fn decode_error(error: ImageError, pixels: u64) -> RenderError {
    match error {
        ImageError::Limits(_) => RenderError::ImageTooLarge {
            pixels,
            max: MAX_SOURCE_PIXELS,
        },
        other => RenderError::InvalidInput(other.to_string()),
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), RenderError> {
    if width == 0 || height == 0 {
        return Err(RenderError::EmptyRaster);
    }
    let pixels = width as u64 * height as u64;
    if pixels > MAX_SOURCE_PIXELS {
        return Err(RenderError::ImageTooLarge {
            pixels,
            max: MAX_SOURCE_PIXELS,
        });
    }
    Ok(())
}
