//! gradsnip-filter - Background estimation filters
//!
//! This crate provides the blur that produces the background estimate
//! consumed by the thresholding stage:
//!
//! - Recursive (IIR) Gaussian blur after Young & van Vliet, whose cost
//!   does not depend on sigma

mod error;
pub mod iir;

pub use error::{FilterError, FilterResult};
pub use iir::{IirCoefficients, gauss_blur, gauss_blur_in_place};
