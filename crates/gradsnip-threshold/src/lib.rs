//! gradsnip-threshold - Gradient-informed adaptive thresholding
//!
//! Binarizes an image against a blurred copy of itself. The blur acts as
//! an estimate of the local background, and one global threshold per
//! channel is derived from the gradient between image and blur:
//!
//! - [`gradient_statistics`] - per-channel global thresholds and mean gradient
//! - [`threshold_apply`] - blend local and global thresholds, write 0/255
//! - [`gradsnip`] - the whole pipeline, blur included
//!
//! # Example
//!
//! ```
//! use gradsnip_core::Image;
//! use gradsnip_threshold::{GradSnipOptions, NullObserver, gradsnip_with_observer};
//!
//! let image = Image::from_samples(3, 1, 1, vec![20, 230, 25]).unwrap();
//! let options = GradSnipOptions { sigma: 1.0, ..Default::default() };
//! let out = gradsnip_with_observer(image, &options, &mut NullObserver).unwrap();
//! assert_eq!(out.report.thresholds.len(), 1);
//! ```

mod apply;
mod error;
mod gradient;
mod options;
#[cfg(feature = "parallel")]
mod parallel;
mod pipeline;
mod report;

pub use apply::threshold_apply;
pub use error::{ThresholdError, ThresholdResult};
pub use gradient::{
    ChannelThresholds, GradientStats, MIDPOINT_THRESHOLD, gradient_statistics, round_threshold,
};
pub use options::{ApplyParams, Bounds, GradSnipOptions};
pub use pipeline::{GradSnipOutput, gradsnip, gradsnip_with_blur, gradsnip_with_observer};
pub use report::{GradSnipObserver, GradSnipReport, LogObserver, NullObserver};
