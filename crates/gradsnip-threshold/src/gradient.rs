//! Gradient statistics
//!
//! Derives one global threshold per channel from an image and its blurred
//! background. Every sample is weighted by its local gradient
//! `g = |sample - blur|`, so the threshold lands where the image changes
//! fastest, i.e. on the edges between ink and paper:
//!
//! ```text
//! threshold[c] = sum(g * sample) / sum(g)        (127.5 if sum(g) == 0)
//! gradient     = mean over c of sum(g) / (width * height)
//! ```
//!
//! Sums are kept in `u64`, which is exact for any image that fits in
//! memory, so the reduction order (sequential or parallel) does not change
//! the result.

use crate::{ThresholdError, ThresholdResult};
use gradsnip_core::{Image, MAX_CHANNELS};

/// Threshold used for a channel without any gradient.
pub const MIDPOINT_THRESHOLD: f32 = 127.5;

/// Per-channel global thresholds
///
/// Holds the rounded thresholds used by the decision rule together with
/// the unrounded values for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelThresholds {
    values: Vec<u8>,
    raw: Vec<f32>,
}

impl ChannelThresholds {
    /// Thresholds given directly as sample values.
    pub fn new(values: Vec<u8>) -> Self {
        let raw = values.iter().map(|&v| f32::from(v)).collect();
        Self { values, raw }
    }

    /// Thresholds from unrounded values; see [`round_threshold`].
    pub fn from_raw(raw: Vec<f32>) -> Self {
        let values = raw.iter().map(|&t| round_threshold(t)).collect();
        Self { values, raw }
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rounded threshold of channel `c`.
    pub fn get(&self, c: usize) -> Option<u8> {
        self.values.get(c).copied()
    }

    /// Unrounded threshold of channel `c`.
    pub fn get_raw(&self, c: usize) -> Option<f32> {
        self.raw.get(c).copied()
    }

    /// Rounded thresholds, one per channel.
    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }

    /// Unrounded thresholds, one per channel.
    pub fn raw(&self) -> &[f32] {
        &self.raw
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.values.iter().copied()
    }
}

/// Result of [`gradient_statistics`]
#[derive(Debug, Clone, PartialEq)]
pub struct GradientStats {
    /// Global threshold of each channel
    pub thresholds: ChannelThresholds,
    /// Mean gradient magnitude over all channels (diagnostic only)
    pub gradient: f32,
}

/// Gradient sums of one channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ChannelSums {
    /// `sum(g)`
    pub sum_g: u64,
    /// `sum(g * sample)`
    pub sum_gi: u64,
}

impl ChannelSums {
    #[inline]
    pub fn add_sample(&mut self, sample: u8, blur: u8) {
        let g = u64::from(sample.abs_diff(blur));
        self.sum_g += g;
        self.sum_gi += g * u64::from(sample);
    }

    /// Unrounded global threshold of the channel.
    pub fn threshold(self) -> f32 {
        if self.sum_g > 0 {
            (self.sum_gi as f64 / self.sum_g as f64) as f32
        } else {
            MIDPOINT_THRESHOLD
        }
    }
}

pub(crate) type SumsArray = [ChannelSums; MAX_CHANNELS as usize];

/// Accumulate the sums of interleaved `image`/`blur` samples.
pub(crate) fn accumulate(image: &[u8], blur: &[u8], channels: usize) -> SumsArray {
    let mut sums = SumsArray::default();
    for (px, bx) in image
        .chunks_exact(channels)
        .zip(blur.chunks_exact(channels))
    {
        for c in 0..channels {
            sums[c].add_sample(px[c], bx[c]);
        }
    }
    sums
}

/// Round a threshold to a sample value.
///
/// Values below 0 map to 0, values at or above 255 map to 255, everything
/// else is rounded half up.
pub fn round_threshold(t: f32) -> u8 {
    if t < 0.0 {
        0
    } else if t < 255.0 {
        (t + 0.5) as u8
    } else {
        255
    }
}

/// Fail unless `image` and `blur` have the same width, height and channels.
pub(crate) fn check_blur_shape(image: (u32, u32, u32), blur: &Image) -> ThresholdResult<()> {
    if image != blur.shape() {
        return Err(ThresholdError::DimensionMismatch {
            image,
            blur: blur.shape(),
        });
    }
    Ok(())
}

/// Compute the per-channel global thresholds and the mean gradient.
///
/// # Arguments
///
/// * `image` - Source image
/// * `blur` - Blurred copy of `image` (same shape)
///
/// # Errors
///
/// Returns [`ThresholdError::DimensionMismatch`] if the shapes differ.
///
/// # Example
///
/// ```
/// use gradsnip_core::Image;
/// use gradsnip_threshold::gradient_statistics;
///
/// let image = Image::from_samples(2, 2, 1, vec![10, 200, 10, 200]).unwrap();
/// let blur = Image::from_samples(2, 2, 1, vec![100; 4]).unwrap();
/// let stats = gradient_statistics(&image, &blur).unwrap();
/// assert_eq!(stats.thresholds.get(0), Some(110));
/// assert_eq!(stats.gradient, 95.0);
/// ```
pub fn gradient_statistics(image: &Image, blur: &Image) -> ThresholdResult<GradientStats> {
    check_blur_shape(image.shape(), blur)?;

    let channels = image.channels() as usize;

    #[cfg(feature = "parallel")]
    let sums = crate::parallel::accumulate_rows(
        image.samples(),
        blur.samples(),
        channels,
        image.row_len(),
    );
    #[cfg(not(feature = "parallel"))]
    let sums = accumulate(image.samples(), blur.samples(), channels);

    let pixels = image.pixel_count() as f64;
    let mut raw = Vec::with_capacity(channels);
    let mut gradient = 0.0f64;
    for (c, s) in sums.iter().take(channels).enumerate() {
        log::debug!("channel {c}: sum_g={} sum_gi={}", s.sum_g, s.sum_gi);
        raw.push(s.threshold());
        gradient += s.sum_g as f64 / pixels;
    }
    gradient /= channels as f64;

    Ok(GradientStats {
        thresholds: ChannelThresholds::from_raw(raw),
        gradient: gradient as f32,
    })
}
