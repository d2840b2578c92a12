//! Thresholding parameters
//!
//! [`GradSnipOptions`] carries everything one run needs; [`ApplyParams`]
//! is the subset the per-pixel decision uses. [`Bounds`] holds the hard
//! intensity limits and knows how to put them in order.

/// Hard intensity bounds of the decision rule.
///
/// Samples below `lower` are always black; samples above `upper` are
/// never blackened by the adaptive test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub lower: u8,
    pub upper: u8,
}

impl Bounds {
    /// Bounds covering the whole sample range; they never override the
    /// adaptive decision.
    pub const FULL: Bounds = Bounds {
        lower: 0,
        upper: 255,
    };

    /// Create bounds as given, without reordering.
    pub fn new(lower: u8, upper: u8) -> Self {
        Self { lower, upper }
    }

    /// Return the bounds with `lower <= upper`, swapping them if necessary.
    pub fn normalized(self) -> Self {
        if self.upper < self.lower {
            Self {
                lower: self.upper,
                upper: self.lower,
            }
        } else {
            self
        }
    }

    /// Check whether `lower <= upper`.
    pub fn is_normalized(self) -> bool {
        self.lower <= self.upper
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::FULL
    }
}

/// Parameters of the per-pixel decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplyParams {
    /// Weight of the blurred background against the global threshold.
    /// `1.0` is purely local, `0.0` purely global.
    pub coef: f32,
    /// Regulator offset added to the adaptive threshold
    pub delta: f32,
    /// Hard bounds; must be normalized
    pub bounds: Bounds,
}

impl Default for ApplyParams {
    fn default() -> Self {
        Self {
            coef: 0.75,
            delta: 0.0,
            bounds: Bounds::FULL,
        }
    }
}

/// Options for one GradSnip run
///
/// # Example
///
/// ```
/// use gradsnip_threshold::{Bounds, GradSnipOptions};
///
/// let options = GradSnipOptions {
///     sigma: 4.0,
///     bounds: Bounds::new(200, 30),
///     ..Default::default()
/// };
/// assert_eq!(options.normalized().bounds, Bounds::new(30, 200));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradSnipOptions {
    /// Standard deviation of the Gaussian background blur
    pub sigma: f32,
    /// Blend coefficient, see [`ApplyParams::coef`]
    pub coef: f32,
    /// Regulator offset, see [`ApplyParams::delta`]
    pub delta: f32,
    /// Hard bounds (normalized before use)
    pub bounds: Bounds,
}

impl Default for GradSnipOptions {
    fn default() -> Self {
        Self {
            sigma: 10.0,
            coef: 0.75,
            delta: 0.0,
            bounds: Bounds::FULL,
        }
    }
}

impl GradSnipOptions {
    /// Copy of the options with normalized bounds.
    pub fn normalized(&self) -> Self {
        Self {
            bounds: self.bounds.normalized(),
            ..*self
        }
    }

    /// Decision parameters of these options, bounds normalized.
    pub fn apply_params(&self) -> ApplyParams {
        ApplyParams {
            coef: self.coef,
            delta: self.delta,
            bounds: self.bounds.normalized(),
        }
    }
}
