pub mod config;
pub mod image;
pub mod settings;

pub use config::{AppConfig, DisplayConfig};
pub use image::{ImageId, ImageRecord, NewImage};
pub use settings::Settings;
