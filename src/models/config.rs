use eink_render::Palette;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::models::Settings;

/// Largest panel edge accepted from config.
const MAX_DISPLAY_EDGE: u32 = 4000;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Address the HTTP server listens on
    pub bind_addr: String,

    /// JSON file holding the persisted scheduler state
    pub state_file: PathBuf,

    /// Panel geometry and palette
    pub display: DisplayConfig,

    /// Initial runtime settings (editable later through the admin API)
    pub settings: Settings,
}

/// The e-ink panel the bitmaps are rendered for
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,

    /// Panel colors as hex strings, in the panel's index order
    pub palette: Vec<String>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 480,
            palette: Palette::eink_7color()
                .colors()
                .iter()
                .map(|c| format!("#{:02X}{:02X}{:02X}", c.r, c.g, c.b))
                .collect(),
        }
    }
}

impl DisplayConfig {
    /// Parse and validate the configured palette.
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        Palette::from_hex(&self.palette).map_err(|e| ConfigError::Palette(e.to_string()))
    }

    /// Check the panel size and palette are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0
            || self.height == 0
            || self.width > MAX_DISPLAY_EDGE
            || self.height > MAX_DISPLAY_EDGE
        {
            return Err(ConfigError::DisplaySize {
                width: self.width,
                height: self.height,
            });
        }
        self.palette()?;
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            state_file: PathBuf::from("inkframe-state.json"),
            display: DisplayConfig::default(),
            settings: Settings::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        path = %path.display(),
                        width = config.display.width,
                        height = config.display.height,
                        colors = config.display.palette.len(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, path = %path.display(), "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Load from `CONFIG_FILE` (default `config.yaml`) and apply environment overrides
    pub fn from_env() -> Self {
        let path = std::env::var("CONFIG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.yaml"));
        let mut config = Self::load(&path);
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Override file values with `BIND_ADDR` and `STATE_FILE` when set
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(addr) = lookup("BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(path) = lookup("STATE_FILE") {
            self.state_file = PathBuf::from(path);
        }
    }

    /// Validate everything the server needs before it starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.display.validate()?;
        self.settings.validate()
    }
}
