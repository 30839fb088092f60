//! Test fixtures and constants.

use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

use inkframe::models::{AppConfig, DisplayConfig};

/// Display size used by the test app; small enough to render instantly
pub const DISPLAY_WIDTH: u32 = 16;
pub const DISPLAY_HEIGHT: u32 = 8;

/// Palette indices of the default 7-color panel
pub mod colors {
    pub const WHITE: u8 = 0;
    pub const BLACK: u8 = 1;
    pub const RED: u8 = 2;
    pub const GREEN: u8 = 5;
    pub const BLUE: u8 = 6;
}

/// Config with a tiny display and default settings
pub fn test_config() -> AppConfig {
    AppConfig {
        display: DisplayConfig {
            width: DISPLAY_WIDTH,
            height: DISPLAY_HEIGHT,
            ..DisplayConfig::default()
        },
        ..AppConfig::default()
    }
}

/// Encode an RGB image as PNG
pub fn encode_png(image: &RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("Failed to encode PNG");
    bytes
}

/// A single-color PNG
pub fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encode_png(&RgbImage::from_pixel(width, height, Rgb(color)))
}

/// A display-sized PNG: left half red, right half blue
pub fn red_blue_png() -> Vec<u8> {
    let image = RgbImage::from_fn(DISPLAY_WIDTH, DISPLAY_HEIGHT, |x, _| {
        if x < DISPLAY_WIDTH / 2 {
            Rgb([255, 0, 0])
        } else {
            Rgb([0, 0, 255])
        }
    });
    encode_png(&image)
}

/// Byte offset of the pixel array in a 4bpp bitmap with a 16-entry table
pub const BMP_PIXEL_OFFSET: usize = 14 + 40 + 16 * 4;

/// Bytes per padded 4bpp row at the test display width
pub const BMP_ROW_SIZE: usize = (DISPLAY_WIDTH as usize * 4).div_ceil(32) * 4;
