//! Unsharp mask sharpening.
//!
//! `out = in + (in - blur(in))`, where `blur` is a separable Gaussian with
//! edge pixels replicated past the border.

use crate::color::Rgb;

/// Kernel radius in sigmas; the Gaussian is negligible beyond 3 sigma.
const RADIUS_SIGMAS: f32 = 3.0;

/// Normalized 1-D Gaussian weights for `sigma`, length `2 * radius + 1`.
fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * RADIUS_SIGMAS).ceil().max(1.0) as i32;
    let denom = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (-radius..=radius)
        .map(|i| (-(i * i) as f32 / denom).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// One blur pass along a single axis.
///
/// `step` is the index distance between neighbors along that axis and
/// `len` the number of samples on it; `at(line, i)` yields the flat index.
fn blur_axis(
    src: &[[f32; 3]],
    dst: &mut [[f32; 3]],
    lines: usize,
    len: usize,
    weights: &[f32],
    at: impl Fn(usize, usize) -> usize,
) {
    let radius = (weights.len() / 2) as i64;
    for line in 0..lines {
        for i in 0..len {
            let mut acc = [0.0f32; 3];
            for (k, &w) in weights.iter().enumerate() {
                let j = (i as i64 + k as i64 - radius).clamp(0, len as i64 - 1) as usize;
                let sample = src[at(line, j)];
                acc[0] += sample[0] * w;
                acc[1] += sample[1] * w;
                acc[2] += sample[2] * w;
            }
            dst[at(line, i)] = acc;
        }
    }
}

/// Sharpen `image` in place with an unsharp mask of the given sigma.
pub(crate) fn unsharp_mask(image: &mut [Rgb], width: usize, height: usize, sigma: f32) {
    if width == 0 || height == 0 {
        return;
    }

    let weights = gaussian_kernel(sigma);
    let original: Vec<[f32; 3]> = image.iter().map(|p| p.to_f32()).collect();
    let mut horizontal = vec![[0.0f32; 3]; original.len()];
    let mut blurred = vec![[0.0f32; 3]; original.len()];

    blur_axis(&original, &mut horizontal, height, width, &weights, |y, x| {
        y * width + x
    });
    blur_axis(&horizontal, &mut blurred, width, height, &weights, |x, y| {
        y * width + x
    });

    for ((pixel, src), blur) in image.iter_mut().zip(&original).zip(&blurred) {
        *pixel = Rgb::from_f32_clamped(
            2.0 * src[0] - blur[0],
            2.0 * src[1] - blur[1],
            2.0 * src[2] - blur[2],
        );
    }
}
