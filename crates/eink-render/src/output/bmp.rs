//! Indexed BMP encoder.
//!
//! Writes a Windows bitmap with a BITMAPINFOHEADER and a color table:
//!
//! ```text
//! offset  size  field
//! 0       2     "BM"
//! 2       4     file size
//! 6       4     reserved (0)
//! 10      4     pixel data offset
//! 14      40    BITMAPINFOHEADER
//! 54      4*n   color table, B G R 0 per entry
//! ...           pixel rows, bottom row first, each padded to 4 bytes
//! ```
//!
//! All integers are little-endian. At 4 bits per pixel the even column
//! sits in the high nibble and the odd column in the low nibble.

use std::fmt;

use crate::palette::Palette;

const FILE_HEADER_SIZE: usize = 14;
const INFO_HEADER_SIZE: usize = 40;
/// 72 DPI expressed in pixels per meter.
const PIXELS_PER_METER: i32 = 2835;

/// Bits per pixel of the encoded bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    /// Two pixels per byte, 16-entry color table. The display format.
    #[default]
    Four,
    /// One pixel per byte, color table sized to the palette.
    Eight,
}

impl BitDepth {
    /// Bits per pixel as written to the header.
    #[inline]
    pub fn bits(self) -> u16 {
        match self {
            BitDepth::Four => 4,
            BitDepth::Eight => 8,
        }
    }

    /// Number of color table entries written for `palette_len` colors.
    #[inline]
    pub fn table_len(self, palette_len: usize) -> usize {
        match self {
            BitDepth::Four => 16,
            BitDepth::Eight => palette_len,
        }
    }

    /// Bytes per stored row, including padding to a 4-byte boundary.
    #[inline]
    pub fn row_size(self, width: usize) -> usize {
        (self.bits() as usize * width).div_ceil(32) * 4
    }
}

/// Error type for bitmap encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum BitmapError {
    /// Width or height is zero
    EmptyImage,
    /// Dimensions do not fit the header fields
    TooLarge {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },
    /// Index buffer length does not match width * height
    LengthMismatch {
        /// Expected number of indices
        expected: usize,
        /// Number supplied
        actual: usize,
    },
    /// Palette has more colors than the bit depth can address
    PaletteTooLarge {
        /// Palette length
        colors: usize,
        /// Bits per pixel requested
        bits: u16,
    },
    /// A pixel references a color past the end of the palette
    IndexOutOfRange {
        /// Flat pixel position
        position: usize,
        /// Offending index
        index: u8,
    },
}

impl fmt::Display for BitmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BitmapError::EmptyImage => write!(f, "bitmap must be at least 1x1"),
            BitmapError::TooLarge { width, height } => {
                write!(f, "bitmap dimensions {}x{} too large", width, height)
            }
            BitmapError::LengthMismatch { expected, actual } => write!(
                f,
                "expected {} pixel indices, got {}",
                expected, actual
            ),
            BitmapError::PaletteTooLarge { colors, bits } => write!(
                f,
                "{} palette colors cannot be indexed with {} bits per pixel",
                colors, bits
            ),
            BitmapError::IndexOutOfRange { position, index } => write!(
                f,
                "pixel {} uses palette index {} outside the palette",
                position, index
            ),
        }
    }
}

impl std::error::Error for BitmapError {}

/// Encode an index raster as a BMP file.
///
/// `indices` is row-major, top row first, `width * height` entries. The
/// output is a pure function of the arguments.
///
/// # Errors
///
/// Fails on empty or oversized dimensions, a length mismatch, a palette
/// too large for `depth`, or any index outside the palette. Nothing is
/// returned on failure.
///
/// # Example
///
/// ```
/// use eink_render::{encode_bmp, BitDepth, Palette};
///
/// let palette = Palette::eink_7color();
/// let bmp = encode_bmp(&[0, 1, 2], 3, 1, &palette, BitDepth::Four).unwrap();
///
/// // 14 + 40 header bytes, 16 table entries, one padded row
/// assert_eq!(bmp.len(), 14 + 40 + 16 * 4 + 4);
/// assert_eq!(&bmp[bmp.len() - 4..], &[0x01, 0x20, 0x00, 0x00]);
/// ```
pub fn encode_bmp(
    indices: &[u8],
    width: usize,
    height: usize,
    palette: &Palette,
    depth: BitDepth,
) -> Result<Vec<u8>, BitmapError> {
    if width == 0 || height == 0 {
        return Err(BitmapError::EmptyImage);
    }
    let expected = width
        .checked_mul(height)
        .ok_or(BitmapError::TooLarge { width, height })?;
    if indices.len() != expected {
        return Err(BitmapError::LengthMismatch {
            expected,
            actual: indices.len(),
        });
    }

    let table_len = depth.table_len(palette.len());
    if palette.len() > table_len || palette.len() > (1usize << depth.bits()) {
        return Err(BitmapError::PaletteTooLarge {
            colors: palette.len(),
            bits: depth.bits(),
        });
    }
    if let Some((position, &index)) = indices
        .iter()
        .enumerate()
        .find(|(_, &i)| i as usize >= palette.len())
    {
        return Err(BitmapError::IndexOutOfRange { position, index });
    }

    let row_size = depth.row_size(width);
    let pixel_offset = FILE_HEADER_SIZE + INFO_HEADER_SIZE + table_len * 4;
    let too_large = || BitmapError::TooLarge { width, height };
    let image_size = row_size.checked_mul(height).ok_or_else(too_large)?;
    let file_size = pixel_offset.checked_add(image_size).ok_or_else(too_large)?;
    let file_size_u32 = u32::try_from(file_size).map_err(|_| too_large())?;
    let width_i32 = i32::try_from(width).map_err(|_| too_large())?;
    let height_i32 = i32::try_from(height).map_err(|_| too_large())?;

    let mut out = Vec::with_capacity(file_size);

    // BITMAPFILEHEADER
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&file_size_u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(pixel_offset as u32).to_le_bytes());

    // BITMAPINFOHEADER; positive height means bottom-up rows
    out.extend_from_slice(&(INFO_HEADER_SIZE as u32).to_le_bytes());
    out.extend_from_slice(&width_i32.to_le_bytes());
    out.extend_from_slice(&height_i32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&depth.bits().to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    out.extend_from_slice(&(image_size as u32).to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
    out.extend_from_slice(&PIXELS_PER_METER.to_le_bytes());
    out.extend_from_slice(&(table_len as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());

    for slot in 0..table_len {
        if slot < palette.len() {
            let c = palette.color(slot);
            out.extend_from_slice(&[c.b, c.g, c.r, 0]);
        } else {
            out.extend_from_slice(&[0, 0, 0, 0]);
        }
    }

    for row in indices.chunks_exact(width).rev() {
        let start = out.len();
        match depth {
            BitDepth::Four => pack_row_4bpp(row, &mut out),
            BitDepth::Eight => out.extend_from_slice(row),
        }
        out.resize(start + row_size, 0);
    }

    debug_assert_eq!(out.len(), file_size);
    Ok(out)
}

/// Pack one row of 4-bit indices, high nibble first.
///
/// An odd trailing pixel leaves the low nibble of the last byte zero.
pub fn pack_row_4bpp(row: &[u8], out: &mut Vec<u8>) {
    for pair in row.chunks(2) {
        let high = pair[0] & 0x0F;
        let low = pair.get(1).map_or(0, |&v| v & 0x0F);
        out.push((high << 4) | low);
    }
}
