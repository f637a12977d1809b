use serde::{Deserialize, Serialize};

use crate::StatsError;

/// Whisker reach, in multiples of the interquartile range, used by default.
pub const DEFAULT_WHISKER_FACTOR: f64 = 1.5;

/// Computes a single percentile value from sorted data.
///
/// Uses linear interpolation between the two closest order statistics: the
/// p-th percentile sits at fractional rank `p / 100 * (n - 1)`.
///
/// # Arguments
///
/// * `sorted_values` - Values sorted in ascending order
/// * `percentile` - The percentile to compute (0.0 to 100.0, clamped)
///
/// # Returns
///
/// The value at the specified percentile. Returns `f64::NAN` if the input is empty.
///
/// # Examples
///
/// ```
/// use vitalstats_stats::percentiles::percentile;
///
/// let values = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(percentile(&values, 50.0), 2.5);
/// assert_eq!(percentile(&values, 25.0), 1.75);
/// assert_eq!(percentile(&values, 100.0), 4.0);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn percentile(sorted_values: &[f64], percentile: f64) -> f64 {
    debug_assert!(
        sorted_values.is_sorted_by(|a, b| a <= b),
        "values must be sorted in ascending order"
    );
    let Some(last) = sorted_values.len().checked_sub(1) else {
        return f64::NAN;
    };
    let rank = percentile.clamp(0.0, 100.0) / 100.0 * last as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * fraction
}

/// Five-number summary with Tukey-style whiskers, as drawn by a box plot.
///
/// # Examples
///
/// ```
/// use vitalstats_stats::percentiles::BoxPlot;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 100.0];
/// let box_plot = BoxPlot::new(&values, 1.5).unwrap();
/// assert_eq!(box_plot.median, 5.0);
/// assert_eq!(box_plot.upper_whisker, 8.0);
/// assert_eq!(box_plot.outliers, 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxPlot {
    pub min: f64,
    /// 25th percentile.
    pub q1: f64,
    pub median: f64,
    /// 75th percentile.
    pub q3: f64,
    pub max: f64,
    /// Smallest sample not below `q1 - whisker_factor * iqr`.
    pub lower_whisker: f64,
    /// Largest sample not above `q3 + whisker_factor * iqr`.
    pub upper_whisker: f64,
    /// Number of samples outside the whiskers.
    pub outliers: usize,
}

impl BoxPlot {
    /// Computes the box-plot summary of unsorted samples.
    ///
    /// # Errors
    ///
    /// [`StatsError::InsufficientSamples`] if `samples` is empty,
    /// [`StatsError::NonFiniteSample`] if one of them is `NaN` or infinite.
    pub fn new(samples: &[f64], whisker_factor: f64) -> Result<Self, StatsError> {
        crate::require_finite(samples)?;
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        Self::from_sorted(&sorted, whisker_factor)
    }

    /// Computes the box-plot summary of pre-sorted samples.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn from_sorted(sorted_values: &[f64], whisker_factor: f64) -> Result<Self, StatsError> {
        crate::require_samples(sorted_values, 1)?;
        crate::require_finite(sorted_values)?;
        debug_assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let q1 = percentile(sorted_values, 25.0);
        let median = percentile(sorted_values, 50.0);
        let q3 = percentile(sorted_values, 75.0);
        let reach = whisker_factor * (q3 - q1);
        let (low_fence, high_fence) = (q1 - reach, q3 + reach);

        // The quartiles themselves always lie inside the fences, so both
        // searches find a sample.
        let lower_whisker = sorted_values
            .iter()
            .copied()
            .find(|&v| v >= low_fence)
            .unwrap_or(q1);
        let upper_whisker = sorted_values
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= high_fence)
            .unwrap_or(q3);
        let outliers = sorted_values
            .iter()
            .filter(|&&v| v < lower_whisker || v > upper_whisker)
            .count();

        Ok(Self {
            min: sorted_values[0],
            q1,
            median,
            q3,
            max: sorted_values[sorted_values.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }

    /// Interquartile range.
    #[must_use]
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}
