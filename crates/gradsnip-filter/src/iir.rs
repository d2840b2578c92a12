//! Recursive (IIR) Gaussian blur
//!
//! Implements the third-order recursive approximation of the Gaussian
//! filter from Ian T. Young and Lucas J. van Vliet, "Recursive
//! implementation of the Gaussian filter" (Signal Processing 44, 1995).
//!
//! # Algorithm
//!
//! Each line (first every row, then every column) is filtered twice per
//! channel:
//!
//! 1. Forward: `w[n] = B * in[n] + (b1 * w[n-1] + b2 * w[n-2] + b3 * w[n-3]) / b0`
//! 2. Backward: the same recursion run from the end of the line over `w`
//!
//! The history before the first sample of a pass is the edge sample
//! replicated. Between the horizontal and the vertical pass the line is
//! rounded back to 8 bits, so the only scratch storage is one line of `f32`.
//!
//! # Example
//!
//! ```
//! use gradsnip_core::Image;
//! use gradsnip_filter::gauss_blur;
//!
//! let image = Image::from_samples(4, 1, 1, vec![0, 0, 255, 255]).unwrap();
//! let blur = gauss_blur(&image, 1.0).unwrap();
//! assert_eq!(blur.shape(), image.shape());
//! ```

use crate::{FilterError, FilterResult};
use gradsnip_core::{Error, Image, ImageMut};

/// Coefficients of the recursive filter for one sigma.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IirCoefficients {
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    pub b3: f32,
    /// Gain of the current input sample (`B` in the paper)
    pub gain: f32,
}

impl IirCoefficients {
    /// Compute the coefficients for a Gaussian of standard deviation `sigma`.
    ///
    /// The paper's fit for `q` is only valid for `sigma >= 0.5`; below that
    /// a fixed `q` giving a very light blur is used.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidParameters`] if `sigma` is negative or
    /// not finite.
    pub fn from_sigma(sigma: f32) -> FilterResult<Self> {
        if !sigma.is_finite() || sigma < 0.0 {
            return Err(FilterError::InvalidParameters(format!(
                "sigma must be a finite number >= 0, got {sigma}"
            )));
        }

        let q = if sigma >= 2.5 {
            0.98711 * sigma - 0.96330
        } else if sigma >= 0.5 {
            3.97156 - 4.14554 * (1.0 - 0.26891 * sigma).sqrt()
        } else {
            0.114_770_5
        };

        let q2 = q * q;
        let q3 = q2 * q;
        let b0 = 1.57825 + 2.44413 * q + 1.4281 * q2 + 0.422205 * q3;
        let b1 = 2.44413 * q + 2.85619 * q2 + 1.26661 * q3;
        let b2 = -(1.4281 * q2 + 1.26661 * q3);
        let b3 = 0.422205 * q3;
        let gain = 1.0 - (b1 + b2 + b3) / b0;

        Ok(Self {
            b0,
            b1,
            b2,
            b3,
            gain,
        })
    }

    #[inline]
    fn step(&self, input: f32, w1: f32, w2: f32, w3: f32) -> f32 {
        self.gain * input + (self.b1 * w1 + self.b2 * w2 + self.b3 * w3) / self.b0
    }

    /// Filter one line in place: forward pass, then backward pass.
    fn filter_line(&self, line: &mut [f32]) {
        let Some(&first) = line.first() else {
            return;
        };
        let (mut w1, mut w2, mut w3) = (first, first, first);
        for v in line.iter_mut() {
            let w = self.step(*v, w1, w2, w3);
            *v = w;
            w3 = w2;
            w2 = w1;
            w1 = w;
        }

        let last = line[line.len() - 1];
        let (mut w1, mut w2, mut w3) = (last, last, last);
        for v in line.iter_mut().rev() {
            let w = self.step(*v, w1, w2, w3);
            *v = w;
            w3 = w2;
            w2 = w1;
            w1 = w;
        }
    }
}

#[inline]
fn to_sample(v: f32) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}

/// Blur an image with a recursive Gaussian of standard deviation `sigma`.
///
/// Every channel is filtered independently; the result has the same shape
/// as the input. Runtime does not depend on `sigma`.
///
/// # Errors
///
/// - [`FilterError::InvalidParameters`] for a negative or non-finite sigma
/// - [`FilterError::Core`] with [`Error::AllocationFailed`] if the output or
///   the line scratch cannot be allocated
pub fn gauss_blur(image: &Image, sigma: f32) -> FilterResult<Image> {
    let coeffs = IirCoefficients::from_sigma(sigma)?;
    let mut out = image.try_to_mut()?;
    blur_with(&mut out, &coeffs)?;
    Ok(out.into())
}

/// In-place variant of [`gauss_blur`].
pub fn gauss_blur_in_place(image: &mut ImageMut, sigma: f32) -> FilterResult<()> {
    let coeffs = IirCoefficients::from_sigma(sigma)?;
    blur_with(image, &coeffs)
}

fn blur_with(image: &mut ImageMut, coeffs: &IirCoefficients) -> FilterResult<()> {
    log::debug!(
        "iir gauss: b0={} b1={} b2={} b3={} B={}",
        coeffs.b0,
        coeffs.b1,
        coeffs.b2,
        coeffs.b3,
        coeffs.gain
    );

    let (w, h, channels) = image.shape();
    let (w, h, ch) = (w as usize, h as usize, channels as usize);

    let scratch_len = w.max(h);
    let mut line: Vec<f32> = Vec::new();
    line.try_reserve_exact(scratch_len)
        .map_err(|_| Error::AllocationFailed(scratch_len))?;
    line.resize(scratch_len, 0.0);

    let samples = image.samples_mut();

    // Horizontal pass
    for y in 0..h {
        let row = &mut samples[y * w * ch..(y + 1) * w * ch];
        for c in 0..ch {
            let line = &mut line[..w];
            for (x, v) in line.iter_mut().enumerate() {
                *v = f32::from(row[x * ch + c]);
            }
            coeffs.filter_line(line);
            for (x, v) in line.iter().enumerate() {
                row[x * ch + c] = to_sample(*v);
            }
        }
    }

    // Vertical pass
    let stride = w * ch;
    for x in 0..w {
        for c in 0..ch {
            let offset = x * ch + c;
            let line = &mut line[..h];
            for (y, v) in line.iter_mut().enumerate() {
                *v = f32::from(samples[y * stride + offset]);
            }
            coeffs.filter_line(line);
            for (y, v) in line.iter().enumerate() {
                samples[y * stride + offset] = to_sample(*v);
            }
        }
    }

    Ok(())
}
