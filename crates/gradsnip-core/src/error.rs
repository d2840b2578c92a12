//! Error types for gradsnip-core
//!
//! Provides a unified error type for buffer construction and access.
//! Each variant captures enough context for diagnostics without exposing
//! the internal sample layout.

use thiserror::Error;

/// GradSnip core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Unsupported number of interleaved channels
    #[error("invalid channel count: {0} (expected 1..=4)")]
    InvalidChannels(u32),

    /// Sample buffer length does not match width x height x channels
    #[error("sample buffer length mismatch: expected {expected}, got {actual}")]
    SampleLengthMismatch { expected: usize, actual: usize },

    /// Index out of bounds
    #[error("index out of bounds: ({x}, {y}, channel {channel}) in {width}x{height}x{channels}")]
    IndexOutOfBounds {
        x: u32,
        y: u32,
        channel: u32,
        width: u32,
        height: u32,
        channels: u32,
    },

    /// Memory allocation failed
    #[error("memory allocation failed ({0} samples)")]
    AllocationFailed(usize),
}

/// Result type alias for GradSnip core operations
pub type Result<T> = std::result::Result<T, Error>;
