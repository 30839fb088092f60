//! Palette construction and hex color errors.

use std::fmt;

/// Why a hex color string was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseColorError {
    /// Number of hex digits after the optional `#`; only 3 and 6 are valid
    Length(usize),
    /// First character that is not a hex digit
    Digit(char),
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::Length(n) => write!(f, "expected 3 or 6 hex digits, got {}", n),
            ParseColorError::Digit(c) => write!(f, "{:?} is not a hex digit", c),
        }
    }
}

impl std::error::Error for ParseColorError {}

/// Why a set of colors cannot be used as a panel palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    Empty,
    /// A 4-bit bitmap indexes at most `max` entries
    TooManyColors { count: usize, max: usize },
    /// `index` repeats the color at `first` and could never be chosen
    Duplicate { index: usize, first: usize },
    /// Entry `index` of a hex list did not parse
    InvalidColor {
        index: usize,
        source: ParseColorError,
    },
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::Empty => write!(f, "palette has no colors"),
            PaletteError::TooManyColors { count, max } => {
                write!(f, "palette has {} colors, a bitmap can index {}", count, max)
            }
            PaletteError::Duplicate { index, first } => {
                write!(f, "palette entry {} repeats entry {}", index, first)
            }
            PaletteError::InvalidColor { index, source } => {
                write!(f, "palette entry {}: {}", index, source)
            }
        }
    }
}

impl std::error::Error for PaletteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PaletteError::InvalidColor { source, .. } => Some(source),
            _ => None,
        }
    }
}
