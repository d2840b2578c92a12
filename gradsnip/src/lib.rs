//! GradSnip - Gradient-informed adaptive thresholding
//!
//! Binarizes scanned pages with uneven lighting. Each sample is compared
//! with a threshold that blends a Gaussian-blurred background estimate
//! with a per-channel global threshold derived from gradient-weighted
//! statistics.
//!
//! # Overview
//!
//! - Sample buffers ([`Image`], [`ImageMut`])
//! - Recursive Gaussian blur ([`filter`])
//! - Gradient statistics and threshold application ([`threshold`])
//! - PNG / PNM / JPEG / BMP / GIF I/O ([`io`])
//!
//! # Example
//!
//! ```
//! use gradsnip::{GradSnipOptions, Image, gradsnip};
//!
//! let page = Image::from_samples(4, 2, 1, vec![200, 30, 210, 220, 190, 25, 205, 215]).unwrap();
//! let out = gradsnip(page, &GradSnipOptions { sigma: 2.0, ..Default::default() }).unwrap();
//! assert!(out.image.samples().iter().all(|&s| s == 0 || s == 255));
//! ```

// Re-export core types (primary data structures used everywhere)
pub use gradsnip_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use gradsnip_filter as filter;
pub use gradsnip_io as io;
pub use gradsnip_threshold as threshold;

// The pipeline entry points
pub use gradsnip_threshold::{
    Bounds, GradSnipObserver, GradSnipOptions, GradSnipOutput, GradSnipReport, LogObserver,
    gradsnip, gradsnip_with_blur, gradsnip_with_observer,
};
