//! Run reports and observers
//!
//! Every GradSnip run ends with a [`GradSnipReport`] handed to a
//! [`GradSnipObserver`]. The numeric code itself never prints; the
//! default [`LogObserver`] forwards the report to the `log` facade.

use std::fmt;

use crate::{ChannelThresholds, GradSnipOptions};

/// Diagnostics of one GradSnip run
#[derive(Debug, Clone, PartialEq)]
pub struct GradSnipReport {
    /// Options actually used (bounds normalized)
    pub options: GradSnipOptions,
    /// Mean gradient magnitude over all channels
    pub gradient: f32,
    /// Global threshold of each channel
    pub thresholds: ChannelThresholds,
    /// Fraction of samples that ended up black
    pub black_white_ratio: f32,
}

impl fmt::Display for GradSnipReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "gradient {:.6}", self.gradient)?;
        for (c, t) in self.thresholds.iter().enumerate() {
            writeln!(f, "component {c} : threshold {t}")?;
        }
        write!(f, "BW metric {:.6}", self.black_white_ratio)
    }
}

/// Receives the report of every run
///
/// Implemented for closures, so a caller can collect reports with
/// `&mut |report: &GradSnipReport| reports.push(report.clone())`.
pub trait GradSnipObserver {
    fn report(&mut self, report: &GradSnipReport);
}

impl<F> GradSnipObserver for F
where
    F: FnMut(&GradSnipReport),
{
    fn report(&mut self, report: &GradSnipReport) {
        self(report)
    }
}

/// Observer that logs the report at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl GradSnipObserver for LogObserver {
    fn report(&mut self, report: &GradSnipReport) {
        for line in report.to_string().lines() {
            log::info!("{line}");
        }
    }
}

/// Observer that discards the report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl GradSnipObserver for NullObserver {
    fn report(&mut self, _report: &GradSnipReport) {}
}
