//! Sample access functions
//!
//! Bounds-checked getters and setters for individual samples plus
//! per-channel iteration over the interleaved layout.

use super::{Image, ImageMut};
use crate::error::{Error, Result};

#[inline]
fn sample_index(width: u32, channels: u32, x: u32, y: u32, c: u32) -> usize {
    (y as usize * width as usize + x as usize) * channels as usize + c as usize
}

impl Image {
    /// Get the sample of channel `c` at (x, y).
    ///
    /// Returns `None` if any coordinate is out of bounds.
    pub fn get_sample(&self, x: u32, y: u32, c: u32) -> Option<u8> {
        let (w, h, ch) = self.shape();
        if x >= w || y >= h || c >= ch {
            return None;
        }
        Some(self.samples()[sample_index(w, ch, x, y, c)])
    }

    /// Iterate over all samples of channel `c`, in row-major pixel order.
    ///
    /// # Panics
    ///
    /// Panics if `c >= channels`.
    pub fn channel_samples(&self, c: u32) -> impl Iterator<Item = u8> + '_ {
        assert!(c < self.channels(), "channel {c} out of range");
        self.samples()
            .iter()
            .skip(c as usize)
            .step_by(self.channels() as usize)
            .copied()
    }
}

impl ImageMut {
    /// Set all channels of pixel (x, y) at once.
    ///
    /// `pixel` must hold exactly `channels` samples.
    pub fn set_pixel(&mut self, x: u32, y: u32, pixel: &[u8]) -> Result<()> {
        let (width, height, channels) = self.shape();
        if pixel.len() != channels as usize {
            return Err(Error::SampleLengthMismatch {
                expected: channels as usize,
                actual: pixel.len(),
            });
        }
        if x >= width || y >= height {
            return Err(Error::IndexOutOfBounds {
                x,
                y,
                channel: 0,
                width,
                height,
                channels,
            });
        }
        let start = sample_index(width, channels, x, y, 0);
        self.samples_mut()[start..start + pixel.len()].copy_from_slice(pixel);
        Ok(())
    }
}
