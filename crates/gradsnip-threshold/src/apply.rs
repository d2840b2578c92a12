//! Adaptive threshold application
//!
//! Turns every sample into 0 or 255. For channel `c` with global
//! threshold `tg` the local threshold of a sample is
//!
//! ```text
//! t = blur * coef + tg * (1 - coef) + delta
//! ```
//!
//! and the sample becomes black when
//!
//! ```text
//! sample < lower  ||  (sample <= upper && sample < t)
//! ```
//!
//! The lower bound is a hard floor; samples above the upper bound always
//! end up white.

use crate::gradient::check_blur_shape;
use crate::{ApplyParams, ChannelThresholds, ThresholdError, ThresholdResult};
use gradsnip_core::{BLACK, Image, ImageMut, MAX_CHANNELS, WHITE};

/// Per-channel global thresholds as `f32`, ready for the decision rule.
pub(crate) type GlobalArray = [f32; MAX_CHANNELS as usize];

/// Decide whether one sample is black.
#[inline]
pub(crate) fn is_black(sample: u8, blur: u8, tg: f32, params: &ApplyParams) -> bool {
    if sample < params.bounds.lower {
        return true;
    }
    let t = f32::from(blur) * params.coef + tg * (1.0 - params.coef) + params.delta;
    sample <= params.bounds.upper && f32::from(sample) < t
}

/// Binarize interleaved samples in place; returns the number of black samples.
pub(crate) fn apply_samples(
    image: &mut [u8],
    blur: &[u8],
    channels: usize,
    global: &GlobalArray,
    params: &ApplyParams,
) -> usize {
    let mut black = 0;
    for (px, bx) in image
        .chunks_exact_mut(channels)
        .zip(blur.chunks_exact(channels))
    {
        for c in 0..channels {
            if is_black(px[c], bx[c], global[c], params) {
                px[c] = BLACK;
                black += 1;
            } else {
                px[c] = WHITE;
            }
        }
    }
    black
}

/// Binarize `image` in place against its blur and global thresholds.
///
/// All checks happen before the first sample is written: on error the
/// image is untouched, on success every sample is 0 or 255.
///
/// # Arguments
///
/// * `image` - Source image, overwritten with the binary result
/// * `blur` - Blurred copy of the source (same shape)
/// * `params` - Blend coefficient, regulator and normalized bounds
/// * `thresholds` - One global threshold per channel
///
/// # Returns
///
/// The fraction of black samples, in `[0, 1]`.
///
/// # Errors
///
/// - [`ThresholdError::DimensionMismatch`] if image and blur differ in shape
/// - [`ThresholdError::ChannelMismatch`] if there is not exactly one
///   threshold per channel
/// - [`ThresholdError::InvalidBounds`] if `lower > upper`
pub fn threshold_apply(
    image: &mut ImageMut,
    blur: &Image,
    params: &ApplyParams,
    thresholds: &ChannelThresholds,
) -> ThresholdResult<f32> {
    check_blur_shape(image.shape(), blur)?;

    let channels = image.channels() as usize;
    if thresholds.len() != channels {
        return Err(ThresholdError::ChannelMismatch {
            expected: channels,
            actual: thresholds.len(),
        });
    }
    if !params.bounds.is_normalized() {
        return Err(ThresholdError::InvalidBounds {
            lower: params.bounds.lower,
            upper: params.bounds.upper,
        });
    }

    let mut global = GlobalArray::default();
    for (g, t) in global.iter_mut().zip(thresholds.iter()) {
        *g = f32::from(t);
    }

    let total = image.samples().len();

    #[cfg(feature = "parallel")]
    let black = {
        let row_len = image.row_len();
        crate::parallel::apply_rows(
            image.samples_mut(),
            blur.samples(),
            channels,
            row_len,
            &global,
            params,
        )
    };
    #[cfg(not(feature = "parallel"))]
    let black = apply_samples(image.samples_mut(), blur.samples(), channels, &global, params);

    Ok((black as f64 / total as f64) as f32)
}
