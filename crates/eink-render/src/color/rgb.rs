//! 8-bit RGB color type
//!
//! Every stage of the pipeline works on gamma-encoded 8-bit channels, the
//! same representation the decoder produces and the bitmap stores in its
//! color table.

use std::str::FromStr;

use crate::palette::ParseColorError;

/// A color with 8 bits per channel and no alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    /// Red channel (0..=255)
    pub r: u8,
    /// Green channel (0..=255)
    pub g: u8,
    /// Blue channel (0..=255)
    pub b: u8,
}

impl Rgb {
    /// Create a color from its three channels.
    ///
    /// # Example
    /// ```
    /// use eink_render::Rgb;
    /// let red = Rgb::new(255, 0, 0);
    /// assert_eq!(red.r, 255);
    /// ```
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a byte array [R, G, B].
    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    /// Convert to a byte array [R, G, B].
    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Build a color from float channels, rounding and clamping each to 0..=255.
    ///
    /// Used by the preprocessing stages, which compute in `f32` and must
    /// hand an 8-bit raster to the quantizer.
    #[inline]
    pub fn from_f32_clamped(r: f32, g: f32, b: f32) -> Self {
        Self::new(clamp_u8(r), clamp_u8(g), clamp_u8(b))
    }

    /// Channels as `f32`, in [R, G, B] order.
    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32, self.g as f32, self.b as f32]
    }

    /// Rec.601 luma in the 0.0..=255.0 range.
    #[inline]
    pub fn luma(self) -> f32 {
        0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32
    }

    /// Squared Euclidean distance between two colors.
    ///
    /// Integer arithmetic only; the maximum value (3 * 255^2) fits in a `u32`.
    #[inline]
    pub fn distance_squared(self, other: Rgb) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

#[inline]
fn clamp_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

impl From<[u8; 3]> for Rgb {
    fn from(bytes: [u8; 3]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Parse a color from a hex string.
    ///
    /// Accepts `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`, case-insensitive,
    /// with surrounding whitespace trimmed.
    ///
    /// ```
    /// use eink_render::Rgb;
    ///
    /// let orange: Rgb = "#FF8000".parse().unwrap();
    /// assert_eq!(orange, Rgb::new(255, 128, 0));
    ///
    /// let red: Rgb = "f00".parse().unwrap();
    /// assert_eq!(red, Rgb::new(255, 0, 0));
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        let digits = s
            .chars()
            .map(|c| {
                c.to_digit(16)
                    .map(|d| d as u8)
                    .ok_or(ParseColorError::Digit(c))
            })
            .collect::<Result<Vec<u8>, _>>()?;

        match digits[..] {
            // Shorthand: 0xF -> 0xFF
            [r, g, b] => Ok(Self::new(r * 17, g * 17, b * 17)),
            [r1, r0, g1, g0, b1, b0] => Ok(Self::new((r1 << 4) | r0, (g1 << 4) | g0, (b1 << 4) | b0)),
            _ => Err(ParseColorError::Length(digits.len())),
        }
    }
}
