//! Statistical estimators for fixed-length signal windows.
//!
//! This crate provides the computations behind every channel report:
//!
//! - **Moments**: mean, sample variance and standard deviation, coefficient of
//!   variation, skewness and excess kurtosis
//! - **Histogram**: fixed-width binning over the sample range with relative frequencies
//! - **Percentiles**: linearly interpolated quartiles and box-plot whiskers
//! - **Normal curve**: a Gaussian reference density for overlaying on histograms
//! - **Summary**: all of the above for one window in a single value
//!
//! Every function is pure: it reads a slice of samples and returns a new value.
//! Degenerate inputs (too few samples, zero mean, zero spread) are reported as
//! [`StatsError`] values instead of leaking `NaN` or infinity. Samples must be
//! finite, and a statistic whose fold leaves the `f64` range fails with
//! [`StatsError::Overflow`].
//!
//! # Modules
//!
//! - [`moments`]: central tendency, dispersion and shape
//! - [`histogram`]: frequency distribution
//! - [`percentiles`]: quartiles and box-plot summary
//! - [`normal`]: normal reference density
//! - [`summary`]: combined per-window statistics
//!
//! # Examples
//!
//! ## Computing moments
//!
//! ```
//! use vitalstats_stats::moments::MomentReport;
//!
//! let report = MomentReport::new(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
//! assert_eq!(report.mean, 3.0);
//! assert_eq!(report.variance, 2.5);
//! ```
//!
//! ## Binning samples
//!
//! ```
//! use vitalstats_stats::histogram::Histogram;
//!
//! let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
//! let histogram = Histogram::new(&values, 5).unwrap();
//! assert_eq!(histogram.bins().len(), 5);
//! ```
//!
//! ## Handling degenerate input
//!
//! ```
//! use vitalstats_stats::{Degeneracy, StatsError, moments};
//!
//! let flat = [2.0, 2.0, 2.0, 2.0];
//! assert_eq!(moments::coefficient_of_variation(&flat), Ok(0.0));
//! assert_eq!(
//!     moments::skewness(&flat),
//!     Err(StatsError::DegenerateDistribution { reason: Degeneracy::ZeroSpread })
//! );
//! ```

use serde::{Deserialize, Serialize};

pub mod histogram;
pub mod moments;
pub mod normal;
pub mod percentiles;
pub mod summary;

/// Errors reported by the estimators.
#[derive(
    Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error, Serialize, Deserialize,
)]
pub enum StatsError {
    /// The sequence is shorter than the statistic requires.
    #[display("at least {required} samples required, got {actual}")]
    InsufficientSamples { required: usize, actual: usize },
    /// The formula divides by a quantity that is zero for this sequence.
    #[display("degenerate distribution: {reason}")]
    DegenerateDistribution { reason: Degeneracy },
    /// A histogram was requested with zero bins.
    #[display("histogram requires at least one bin")]
    InvalidBinCount,
    /// A normal curve was requested with a non-positive or non-finite scale.
    #[display("standard deviation must be positive and finite, got {std_dev}")]
    InvalidStdDev { std_dev: f64 },
    /// A sample is `NaN` or infinite.
    #[display("sample {index} is not a finite number")]
    NonFiniteSample { index: usize },
    /// An intermediate sum left the `f64` range.
    #[display("statistic overflowed the floating-point range")]
    Overflow,
}

/// Why a distribution is degenerate for a given statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, Serialize, Deserialize)]
pub enum Degeneracy {
    /// The mean is exactly zero (coefficient of variation).
    #[display("mean is zero")]
    ZeroMean,
    /// All samples are equal (skewness, kurtosis).
    #[display("samples have zero spread")]
    ZeroSpread,
}

impl StatsError {
    pub(crate) fn degenerate(reason: Degeneracy) -> Self {
        Self::DegenerateDistribution { reason }
    }
}

/// Returns an error unless `samples` holds at least `required` values.
pub(crate) fn require_samples(samples: &[f64], required: usize) -> Result<(), StatsError> {
    if samples.len() < required {
        return Err(StatsError::InsufficientSamples {
            required,
            actual: samples.len(),
        });
    }
    Ok(())
}

/// Returns an error naming the first `NaN` or infinite sample.
pub(crate) fn require_finite(samples: &[f64]) -> Result<(), StatsError> {
    match samples.iter().position(|x| !x.is_finite()) {
        Some(index) => Err(StatsError::NonFiniteSample { index }),
        None => Ok(()),
    }
}

#[expect(clippy::cast_precision_loss)]
pub(crate) fn len_f64(samples: &[f64]) -> f64 {
    samples.len() as f64
}
