//! Error types for gradsnip-threshold

use thiserror::Error;

/// Errors that can occur during thresholding
///
/// Buffers that do not fit together are reported here instead of being
/// silently skipped, so a mis-shaped blur or threshold list never produces
/// an untouched "result".
#[derive(Debug, Error)]
pub enum ThresholdError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] gradsnip_core::Error),

    /// Blur filter error
    #[error("filter error: {0}")]
    Filter(#[from] gradsnip_filter::FilterError),

    /// Image and blur buffer do not have the same shape
    #[error("image is {}x{}x{} but blur is {}x{}x{}", .image.0, .image.1, .image.2, .blur.0, .blur.1, .blur.2)]
    DimensionMismatch {
        image: (u32, u32, u32),
        blur: (u32, u32, u32),
    },

    /// Number of thresholds differs from the number of channels
    #[error("expected {expected} channel thresholds, got {actual}")]
    ChannelMismatch { expected: usize, actual: usize },

    /// Lower bound above upper bound
    #[error("bounds not normalized: lower {lower} > upper {upper}")]
    InvalidBounds { lower: u8, upper: u8 },
}

/// Result type for threshold operations
pub type ThresholdResult<T> = Result<T, ThresholdError>;
