//! Per-channel tone curves as 256-entry lookup tables.
//!
//! Contrast and gamma map each channel value independently, so both are
//! evaluated once per possible input byte and then applied by indexing.

/// A per-channel mapping from input byte to output byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ToneLut([u8; 256]);

impl ToneLut {
    /// The identity mapping.
    pub(crate) fn identity() -> Self {
        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = i as u8;
        }
        Self(table)
    }

    fn from_fn(f: impl Fn(f32) -> f32) -> Self {
        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = f(i as f32).round().clamp(0.0, 255.0) as u8;
        }
        Self(table)
    }

    /// Linear contrast `out = in * gain + offset` pivoting on 128.
    pub(crate) fn contrast(gain: f32) -> Self {
        let offset = -(128.0 * (gain - 1.0));
        Self::from_fn(|v| v * gain + offset)
    }

    /// Power-law tone curve `out = 255 * (in / 255)^(1 / gamma)`.
    pub(crate) fn gamma(gamma: f32) -> Self {
        let exponent = 1.0 / gamma;
        Self::from_fn(|v| 255.0 * (v / 255.0).powf(exponent))
    }

    /// Apply `self` first, then `next`.
    pub(crate) fn then(&self, next: &ToneLut) -> Self {
        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = next.0[self.0[i] as usize];
        }
        Self(table)
    }

    #[inline]
    pub(crate) fn apply(&self, value: u8) -> u8 {
        self.0[value as usize]
    }
}
