//! Inkframe - rotating photo frame server for color e-ink displays.
//!
//! Uploaded photos are rendered once into palette-indexed bitmaps and
//! rotated through the display by a persistent scheduler.
//! This library exposes modules for integration testing.

pub mod api;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
