//! GradSnip pipeline
//!
//! Runs the fixed sequence of one binarization:
//!
//! 1. Normalize the bounds
//! 2. Blur the source ([`gauss_blur`]) unless a blur is supplied
//! 3. Gradient statistics -> per-channel global thresholds
//! 4. Apply the adaptive threshold in place
//! 5. Hand the report to the observer
//!
//! The source image is taken by value and comes back binarized in
//! [`GradSnipOutput::image`]; its samples are reused when nothing else
//! holds a reference to them.

use crate::{
    GradSnipObserver, GradSnipOptions, GradSnipReport, LogObserver, ThresholdResult,
    gradient_statistics, threshold_apply,
};
use gradsnip_core::Image;
use gradsnip_filter::gauss_blur;

/// Result of a GradSnip run
#[derive(Debug, Clone)]
pub struct GradSnipOutput {
    /// Binarized image, every sample 0 or 255
    pub image: Image,
    /// Diagnostics of the run
    pub report: GradSnipReport,
}

/// Binarize `image`, logging the report through [`LogObserver`].
///
/// # Example
///
/// ```
/// use gradsnip_core::Image;
/// use gradsnip_threshold::{GradSnipOptions, gradsnip};
///
/// let image = Image::from_samples(4, 1, 1, vec![30, 220, 40, 210]).unwrap();
/// let out = gradsnip(image, &GradSnipOptions { sigma: 1.0, ..Default::default() }).unwrap();
/// assert!(out.image.samples().iter().all(|&s| s == 0 || s == 255));
/// ```
pub fn gradsnip(image: Image, options: &GradSnipOptions) -> ThresholdResult<GradSnipOutput> {
    gradsnip_with_observer(image, options, &mut LogObserver)
}

/// Binarize `image`, reporting to `observer`.
///
/// # Errors
///
/// Propagates blur errors (invalid sigma, allocation) and the
/// precondition errors of the two passes.
pub fn gradsnip_with_observer(
    image: Image,
    options: &GradSnipOptions,
    observer: &mut dyn GradSnipObserver,
) -> ThresholdResult<GradSnipOutput> {
    let options = options.normalized();
    let blur = gauss_blur(&image, options.sigma)?;
    gradsnip_with_blur(image, &blur, &options, observer)
}

/// Binarize `image` against a caller-supplied `blur`.
///
/// `options.sigma` is not used; `blur` must have the shape of `image`.
pub fn gradsnip_with_blur(
    image: Image,
    blur: &Image,
    options: &GradSnipOptions,
    observer: &mut dyn GradSnipObserver,
) -> ThresholdResult<GradSnipOutput> {
    let options = options.normalized();
    let stats = gradient_statistics(&image, blur)?;

    let mut image = match image.try_into_mut() {
        Ok(image) => image,
        Err(shared) => shared.try_to_mut()?,
    };
    let black_white_ratio =
        threshold_apply(&mut image, blur, &options.apply_params(), &stats.thresholds)?;

    let report = GradSnipReport {
        options,
        gradient: stats.gradient,
        thresholds: stats.thresholds,
        black_white_ratio,
    };
    observer.report(&report);

    Ok(GradSnipOutput {
        image: image.into(),
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bounds, NullObserver, ThresholdError};

    #[test]
    fn test_with_blur_two_by_two() {
        let image = Image::from_samples(2, 2, 1, vec![10, 200, 10, 200]).unwrap();
        let blur = Image::from_samples(2, 2, 1, vec![100; 4]).unwrap();
        let out =
            gradsnip_with_blur(image, &blur, &GradSnipOptions::default(), &mut NullObserver)
                .unwrap();
        assert_eq!(out.image.samples(), &[0, 255, 0, 255]);
        assert_eq!(out.report.thresholds.as_slice(), &[110]);
        assert_eq!(out.report.gradient, 95.0);
        assert_eq!(out.report.black_white_ratio, 0.5);
    }

    #[test]
    fn test_report_has_normalized_bounds() {
        let image = Image::from_samples(2, 1, 1, vec![0, 255]).unwrap();
        let options = GradSnipOptions {
            sigma: 1.0,
            bounds: Bounds::new(180, 20),
            ..Default::default()
        };
        let out = gradsnip_with_observer(image, &options, &mut NullObserver).unwrap();
        assert_eq!(out.report.options.bounds, Bounds::new(20, 180));
    }

    #[test]
    fn test_shared_source_is_not_modified() {
        let image = Image::from_samples(2, 2, 1, vec![10, 200, 10, 200]).unwrap();
        let keep = image.clone();
        let blur = Image::from_samples(2, 2, 1, vec![100; 4]).unwrap();
        let out =
            gradsnip_with_blur(image, &blur, &GradSnipOptions::default(), &mut NullObserver)
                .unwrap();
        assert_eq!(keep.samples(), &[10, 200, 10, 200]);
        assert_eq!(out.image.samples(), &[0, 255, 0, 255]);
    }

    #[test]
    fn test_observer_receives_report() {
        let image = Image::from_samples(3, 1, 1, vec![5, 250, 5]).unwrap();
        let mut reports = Vec::new();
        let out = gradsnip_with_observer(
            image,
            &GradSnipOptions {
                sigma: 0.5,
                ..Default::default()
            },
            &mut |r: &GradSnipReport| reports.push(r.clone()),
        )
        .unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0], out.report);
    }

    #[test]
    fn test_invalid_sigma() {
        let image = Image::new(2, 2, 1).unwrap();
        let options = GradSnipOptions {
            sigma: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            gradsnip_with_observer(image, &options, &mut NullObserver),
            Err(ThresholdError::Filter(_))
        ));
    }

    #[test]
    fn test_blur_shape_mismatch() {
        let image = Image::new(2, 2, 1).unwrap();
        let blur = Image::new(2, 2, 3).unwrap();
        assert!(matches!(
            gradsnip_with_blur(image, &blur, &GradSnipOptions::default(), &mut NullObserver),
            Err(ThresholdError::DimensionMismatch { .. })
        ));
    }
}
