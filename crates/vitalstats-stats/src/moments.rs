//! Central tendency, dispersion and shape of a sample window.
//!
//! Each statistic is an explicit sequential fold over the samples. The divisor
//! differs per statistic and is part of its definition:
//!
//! | Statistic | Divisor |
//! |-----------|---------|
//! | mean | N |
//! | variance | N − 1 (Bessel's correction) |
//! | skewness, kurtosis | N |
//!
//! Skewness and kurtosis standardize by the *sample* standard deviation.
//!
//! The free functions recompute the mean (and standard deviation) they depend
//! on. [`MomentReport::new`] computes them once and reuses them.

use serde::{Deserialize, Serialize};

use crate::{Degeneracy, StatsError, len_f64, require_finite, require_samples};

/// The moment statistics of one sample window.
///
/// All fields derive from the same sequence; the report is either computed
/// completely or not at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MomentReport {
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (square root of [`variance`](Self::variance)).
    pub std_dev: f64,
    /// Sample variance with Bessel's correction.
    pub variance: f64,
    /// `std_dev / |mean| * 100`, in percent.
    pub coefficient_of_variation: f64,
    /// Third standardized moment.
    pub skewness: f64,
    /// Fourth standardized moment minus 3.
    pub excess_kurtosis: f64,
}

impl MomentReport {
    /// Computes every moment statistic of `samples`.
    ///
    /// # Errors
    ///
    /// * [`StatsError::InsufficientSamples`] - fewer than two samples
    /// * [`StatsError::NonFiniteSample`] - a sample is `NaN` or infinite
    /// * [`StatsError::Overflow`] - the mean or a squared deviation sum
    ///   exceeds the `f64` range
    /// * [`StatsError::DegenerateDistribution`] - the mean is zero
    ///   ([`Degeneracy::ZeroMean`]) or all samples are equal
    ///   ([`Degeneracy::ZeroSpread`])
    ///
    /// # Examples
    ///
    /// ```
    /// # use vitalstats_stats::moments::MomentReport;
    /// let report = MomentReport::new(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
    /// assert!((report.std_dev - 1.5811).abs() < 1e-4);
    /// assert!((report.coefficient_of_variation - 52.70).abs() < 1e-2);
    /// assert!(report.skewness.abs() < 1e-12);
    /// ```
    pub fn new(samples: &[f64]) -> Result<Self, StatsError> {
        let mean = spread_input(samples)?;
        let variance = variance_about(samples, mean)?;
        let std_dev = variance.sqrt();
        let coefficient_of_variation = coefficient_of_variation_from(mean, std_dev)?;
        let skewness = standardized_moment(samples, mean, std_dev, 3)?;
        let excess_kurtosis = standardized_moment(samples, mean, std_dev, 4)? - 3.0;

        Ok(Self {
            mean,
            std_dev,
            variance,
            coefficient_of_variation,
            skewness,
            excess_kurtosis,
        })
    }
}

/// Arithmetic mean, `(1/N)·Σxᵢ`.
///
/// A constant sequence yields its value exactly.
///
/// # Errors
///
/// [`StatsError::InsufficientSamples`] if `samples` is empty,
/// [`StatsError::NonFiniteSample`] or [`StatsError::Overflow`] as for
/// [`MomentReport::new`].
pub fn mean(samples: &[f64]) -> Result<f64, StatsError> {
    require_samples(samples, 1)?;
    require_finite(samples)?;
    mean_of(samples)
}

/// Sample variance, `[1/(N−1)]·Σ(xᵢ−mean)²`.
///
/// # Errors
///
/// [`StatsError::InsufficientSamples`] if `samples` holds fewer than two values,
/// [`StatsError::NonFiniteSample`] or [`StatsError::Overflow`] as for
/// [`MomentReport::new`].
pub fn variance(samples: &[f64]) -> Result<f64, StatsError> {
    let mean = spread_input(samples)?;
    variance_about(samples, mean)
}

/// Sample standard deviation, the square root of [`variance`].
pub fn std_dev(samples: &[f64]) -> Result<f64, StatsError> {
    variance(samples).map(f64::sqrt)
}

/// Coefficient of variation in percent, `std_dev / |mean| · 100`.
///
/// The absolute value of the mean is used, so a negative-mean signal gives a
/// positive coefficient.
///
/// # Errors
///
/// * [`StatsError::InsufficientSamples`] - fewer than two samples
/// * [`StatsError::DegenerateDistribution`] with [`Degeneracy::ZeroMean`] -
///   the mean is exactly zero
///
/// A constant non-zero sequence is well defined and yields `0.0`.
pub fn coefficient_of_variation(samples: &[f64]) -> Result<f64, StatsError> {
    let mean = spread_input(samples)?;
    let std_dev = variance_about(samples, mean)?.sqrt();
    coefficient_of_variation_from(mean, std_dev)
}

/// Skewness, `(1/N)·Σ[(xᵢ−mean)/std_dev]³`.
///
/// # Errors
///
/// * [`StatsError::InsufficientSamples`] - fewer than two samples
/// * [`StatsError::DegenerateDistribution`] with [`Degeneracy::ZeroSpread`] -
///   all samples are equal
pub fn skewness(samples: &[f64]) -> Result<f64, StatsError> {
    let mean = spread_input(samples)?;
    let std_dev = variance_about(samples, mean)?.sqrt();
    standardized_moment(samples, mean, std_dev, 3)
}

/// Excess kurtosis, `(1/N)·Σ[(xᵢ−mean)/std_dev]⁴ − 3`.
///
/// A normal distribution yields approximately zero.
///
/// # Errors
///
/// Same as [`skewness`].
pub fn excess_kurtosis(samples: &[f64]) -> Result<f64, StatsError> {
    let mean = spread_input(samples)?;
    let std_dev = variance_about(samples, mean)?.sqrt();
    Ok(standardized_moment(samples, mean, std_dev, 4)? - 3.0)
}

/// Validates input for the dispersion statistics and returns its mean.
fn spread_input(samples: &[f64]) -> Result<f64, StatsError> {
    require_samples(samples, 2)?;
    require_finite(samples)?;
    mean_of(samples)
}

/// Requires a non-empty, finite sequence.
fn mean_of(samples: &[f64]) -> Result<f64, StatsError> {
    // Folding a constant that has no exact binary form drifts away from it.
    if let Some(value) = constant_value(samples) {
        return Ok(value);
    }
    let sum = samples.iter().fold(0.0, |acc, &x| acc + x);
    finite(sum / len_f64(samples))
}

/// Requires `samples.len() >= 2`.
fn variance_about(samples: &[f64], mean: f64) -> Result<f64, StatsError> {
    if constant_value(samples).is_some() {
        return Ok(0.0);
    }
    let sum_sq = samples.iter().fold(0.0, |acc, &x| acc + (x - mean).powi(2));
    finite(sum_sq / (len_f64(samples) - 1.0))
}

fn coefficient_of_variation_from(mean: f64, std_dev: f64) -> Result<f64, StatsError> {
    if mean == 0.0 {
        return Err(StatsError::degenerate(Degeneracy::ZeroMean));
    }
    finite(std_dev / mean.abs() * 100.0)
}

fn standardized_moment(
    samples: &[f64],
    mean: f64,
    std_dev: f64,
    order: i32,
) -> Result<f64, StatsError> {
    if std_dev == 0.0 {
        return Err(StatsError::degenerate(Degeneracy::ZeroSpread));
    }
    let sum = samples
        .iter()
        .fold(0.0, |acc, &x| acc + ((x - mean) / std_dev).powi(order));
    finite(sum / len_f64(samples))
}

fn finite(value: f64) -> Result<f64, StatsError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(StatsError::Overflow)
    }
}

#[expect(clippy::float_cmp)]
fn constant_value(samples: &[f64]) -> Option<f64> {
    let (&first, rest) = samples.split_first()?;
    rest.iter().all(|&x| x == first).then_some(first)
}
