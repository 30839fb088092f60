//! Public API for the eink-render crate.
//!
//! This module provides the high-level API: [`EinkRenderer`] builder and
//! [`RenderPipelineError`] unified error type.

mod builder;
mod error;

pub use builder::EinkRenderer;
pub use error::RenderPipelineError;
