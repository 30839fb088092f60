//! Palette struct with nearest-color matching.
//!
//! A [`Palette`] is the ordered list of colors the panel can physically show.
//! Its order is significant twice: the index of a color is what the bitmap
//! stores, and on distance ties the lowest index wins.

use std::collections::HashMap;

use super::error::PaletteError;
use crate::color::Rgb;

/// Largest palette a 4-bit packed bitmap can address.
pub const MAX_PALETTE_COLORS: usize = 16;

/// The seven inks of an ACeP / Spectra color panel, in driver order.
const EINK_7COLOR: [Rgb; 7] = [
    Rgb::new(255, 255, 255), // white
    Rgb::new(0, 0, 0),       // black
    Rgb::new(255, 0, 0),     // red
    Rgb::new(255, 128, 0),   // orange
    Rgb::new(255, 255, 0),   // yellow
    Rgb::new(0, 255, 0),     // green
    Rgb::new(0, 0, 255),     // blue
];

/// An ordered, validated set of display colors.
///
/// # Example
///
/// ```
/// use eink_render::{Palette, Rgb};
///
/// let palette = Palette::new(&[Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap();
/// assert_eq!(palette.len(), 2);
/// assert_eq!(palette.find_nearest(Rgb::new(200, 200, 200)), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
}

impl Palette {
    /// Create a palette from an ordered list of colors.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::Empty`] if `colors` is empty
    /// - [`PaletteError::TooManyColors`] if there are more than [`MAX_PALETTE_COLORS`]
    /// - [`PaletteError::Duplicate`] if a color appears twice
    pub fn new(colors: &[Rgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::Empty);
        }
        if colors.len() > MAX_PALETTE_COLORS {
            return Err(PaletteError::TooManyColors {
                count: colors.len(),
                max: MAX_PALETTE_COLORS,
            });
        }

        let mut seen = HashMap::new();
        for (index, color) in colors.iter().enumerate() {
            if let Some(&first) = seen.get(color) {
                return Err(PaletteError::Duplicate { index, first });
            }
            seen.insert(*color, index);
        }

        Ok(Self {
            colors: colors.to_vec(),
        })
    }

    /// Create a palette from hex color strings such as `"#FF0000"` or `"F00"`.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::InvalidColor`] for the first string that does
    /// not parse, and otherwise the same errors as [`Palette::new`].
    ///
    /// # Example
    ///
    /// ```
    /// use eink_render::Palette;
    ///
    /// let palette = Palette::from_hex(&["#000", "#FFF", "#F00"]).unwrap();
    /// assert_eq!(palette.len(), 3);
    /// ```
    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Self, PaletteError> {
        let parsed = colors
            .iter()
            .enumerate()
            .map(|(index, s)| {
                s.as_ref()
                    .parse::<Rgb>()
                    .map_err(|source| PaletteError::InvalidColor { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(&parsed)
    }

    /// The 7-color e-ink palette: white, black, red, orange, yellow, green, blue.
    pub fn eink_7color() -> Self {
        Self {
            colors: EINK_7COLOR.to_vec(),
        }
    }

    /// Returns the number of colors in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Get the color at the given index.
    #[inline]
    pub fn color(&self, idx: usize) -> Rgb {
        self.colors[idx]
    }

    /// All colors in palette order.
    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Find the index of the palette color nearest to `pixel`.
    ///
    /// Distance is squared Euclidean in 8-bit RGB. Only a strictly smaller
    /// distance replaces the current best, so ties resolve to the lowest
    /// index. Runs once per pixel, so it must not allocate.
    #[inline]
    pub fn find_nearest(&self, pixel: Rgb) -> u8 {
        let mut best_idx = 0;
        let mut best_dist = u32::MAX;

        for (i, &candidate) in self.colors.iter().enumerate() {
            let dist = pixel.distance_squared(candidate);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        best_idx as u8
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::eink_7color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::ParseColorError;

    #[test]
    fn test_empty_palette_rejected() {
        assert_eq!(Palette::new(&[]), Err(PaletteError::Empty));
    }

    #[test]
    fn test_too_many_colors_rejected() {
        let colors: Vec<Rgb> = (0..17u8).map(|i| Rgb::new(i, i, i)).collect();
        assert_eq!(
            Palette::new(&colors),
            Err(PaletteError::TooManyColors { count: 17, max: 16 })
        );

        // Exactly sixteen is fine
        assert!(Palette::new(&colors[..16]).is_ok());
    }

    #[test]
    fn test_duplicate_rejected() {
        let colors = [Rgb::new(0, 0, 0), Rgb::new(9, 9, 9), Rgb::new(0, 0, 0)];
        assert_eq!(
            Palette::new(&colors),
            Err(PaletteError::Duplicate { index: 2, first: 0 })
        );
    }

    #[test]
    fn test_from_hex_invalid() {
        let result = Palette::from_hex(&["#000000", "#XYZXYZ"]);
        assert_eq!(
            result,
            Err(PaletteError::InvalidColor {
                index: 1,
                source: ParseColorError::Digit('X'),
            })
        );
        assert_eq!(
            result.unwrap_err().to_string(),
            "palette entry 1: 'X' is not a hex digit"
        );
    }

    #[test]
    fn test_eink_7color_order() {
        let palette = Palette::eink_7color();
        assert_eq!(palette.len(), 7);
        assert_eq!(palette.color(0), Rgb::new(255, 255, 255));
        assert_eq!(palette.color(1), Rgb::new(0, 0, 0));
        assert_eq!(palette.color(2), Rgb::new(255, 0, 0));
        assert_eq!(palette.color(6), Rgb::new(0, 0, 255));
        assert_eq!(Palette::default(), palette);
    }

    #[test]
    fn test_find_nearest_exact_colors() {
        let palette = Palette::eink_7color();
        for (i, &color) in palette.colors().iter().enumerate() {
            assert_eq!(palette.find_nearest(color) as usize, i);
        }
    }

    #[test]
    fn test_find_nearest_tie_prefers_lowest_index() {
        // 100 is exactly halfway between 50 and 150
        let palette = Palette::new(&[Rgb::new(150, 150, 150), Rgb::new(50, 50, 50)]).unwrap();
        assert_eq!(palette.find_nearest(Rgb::new(100, 100, 100)), 0);

        let reversed =
            Palette::new(&[Rgb::new(50, 50, 50), Rgb::new(150, 150, 150)]).unwrap();
        assert_eq!(reversed.find_nearest(Rgb::new(100, 100, 100)), 0);
    }

    #[test]
    fn test_find_nearest_mid_gray_goes_white() {
        let palette = Palette::new(&[Rgb::new(0, 0, 0), Rgb::new(255, 255, 255)]).unwrap();
        assert_eq!(palette.find_nearest(Rgb::new(128, 128, 128)), 1);
        assert_eq!(palette.find_nearest(Rgb::new(127, 127, 127)), 0);
    }
}
