use eink_render::PreprocessOptions;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ConfigError;

/// Runtime settings, read on every scheduler tick and every render
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Settings {
    /// Target time for one full cycle through the visible pool, in hours
    pub rotation_interval_hours: u32,
    /// Upper bound on how long a single image stays current, in hours
    pub default_image_duration_hours: u32,
    /// Floyd-Steinberg diffusion; off means direct nearest-color mapping
    pub dithering_enabled: bool,
    /// Unsharp mask sigma; 0 disables sharpening
    pub sharpen_sigma: f32,
    pub saturation_multiplier: f32,
    pub contrast_multiplier: f32,
    pub gamma: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rotation_interval_hours: 4,
            default_image_duration_hours: 24,
            dithering_enabled: true,
            sharpen_sigma: 1.0,
            saturation_multiplier: 1.15,
            contrast_multiplier: 1.2,
            gamma: 2.2,
        }
    }
}

/// Check `value` lies in `min..=max`; NaN is rejected.
fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl Settings {
    /// Reject values outside the ranges accepted over the API.
    ///
    /// These are wider than the admin UI sliders, which limit gamma to
    /// 1.0-3.0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range(
            "rotation_interval_hours",
            self.rotation_interval_hours as f64,
            1.0,
            1000.0,
        )?;
        check_range(
            "default_image_duration_hours",
            self.default_image_duration_hours as f64,
            1.0,
            100.0,
        )?;
        check_range("sharpen_sigma", self.sharpen_sigma as f64, 0.0, 3.0)?;
        check_range(
            "saturation_multiplier",
            self.saturation_multiplier as f64,
            0.5,
            2.0,
        )?;
        check_range(
            "contrast_multiplier",
            self.contrast_multiplier as f64,
            0.8,
            2.0,
        )?;
        check_range("gamma", self.gamma as f64, 0.1, 5.0)?;
        Ok(())
    }

    /// Raster adjustments for the render pipeline.
    pub fn preprocess_options(&self) -> PreprocessOptions {
        PreprocessOptions::new()
            .sharpen(self.sharpen_sigma)
            .saturation(self.saturation_multiplier)
            .contrast(self.contrast_multiplier)
            .gamma(self.gamma)
    }
}
