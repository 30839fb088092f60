//! Color types
//!
//! The pipeline works on gamma-encoded 8-bit RGB throughout: the decoder
//! produces it, the quantizer measures distances in it, and the bitmap
//! color table stores it.

mod rgb;

pub use rgb::Rgb;
