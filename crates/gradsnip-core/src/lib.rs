//! GradSnip Core - Sample buffers for image binarization
//!
//! This crate provides the data structures shared by every GradSnip crate:
//!
//! - [`Image`] / [`ImageMut`] - Interleaved 8-bit sample buffer (immutable / mutable)
//! - [`ImageFormat`] - File format tag used by the I/O crate
//! - [`Error`] / [`Result`] - Buffer construction and access errors

pub mod error;
pub mod image;

pub use error::{Error, Result};
pub use image::{Image, ImageFormat, ImageMut, MAX_CHANNELS, try_alloc_samples};

/// Sample value written for black output pixels.
pub const BLACK: u8 = 0;

/// Sample value written for white output pixels.
pub const WHITE: u8 = 255;
