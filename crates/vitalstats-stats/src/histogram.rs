use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::{StatsError, len_f64};

/// Number of bins used when the caller has no preference.
pub const DEFAULT_NUM_BINS: usize = 60;

/// A fixed-width histogram over the closed sample range `[min, max]`.
///
/// Bins are ordered by increasing center. The last bin is closed on the right,
/// so the maximum sample is always counted in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    min: f64,
    max: f64,
    bin_width: f64,
    total: u64,
    bins: Vec<HistogramBin>,
}

/// A single bin of a [`Histogram`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// The range of values covered by this bin (inclusive start, exclusive end,
    /// except for the last bin which also includes its end).
    pub range: Range<f64>,
    /// `min + (i + 0.5) * bin_width`.
    pub center: f64,
    /// The number of samples that fall within this bin.
    pub count: u64,
    /// `count / N`.
    pub frequency: f64,
}

impl Histogram {
    /// Bins `samples` into `num_bins` equal-width bins.
    ///
    /// A sample at index position `floor((x - min) / width)` past the last bin
    /// (which only happens for the maximum, or through rounding just below it)
    /// is counted in the last bin.
    ///
    /// When every sample has the same value the range has zero width. In that
    /// case the histogram falls back to a single bin centered on that value
    /// holding every sample, regardless of `num_bins`; see
    /// [`is_degenerate`](Self::is_degenerate).
    ///
    /// # Errors
    ///
    /// * [`StatsError::InsufficientSamples`] - `samples` is empty
    /// * [`StatsError::InvalidBinCount`] - `num_bins` is zero
    /// * [`StatsError::NonFiniteSample`] - a sample is `NaN` or infinite
    ///
    /// # Examples
    ///
    /// ```
    /// # use vitalstats_stats::histogram::Histogram;
    /// let values = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
    /// let histogram = Histogram::new(&values, 5).unwrap();
    /// assert!(histogram.counts().iter().all(|&c| c == 2));
    /// assert!((histogram.bin_width() - 1.8).abs() < 1e-12);
    /// ```
    #[expect(
        clippy::cast_precision_loss,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    pub fn new(samples: &[f64], num_bins: usize) -> Result<Self, StatsError> {
        crate::require_samples(samples, 1)?;
        if num_bins == 0 {
            return Err(StatsError::InvalidBinCount);
        }
        crate::require_finite(samples)?;

        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let total = samples.len() as u64;

        if max - min == 0.0 {
            return Ok(Self {
                min,
                max,
                bin_width: 0.0,
                total,
                bins: vec![HistogramBin {
                    range: min..max,
                    center: min,
                    count: total,
                    frequency: 1.0,
                }],
            });
        }

        let bin_width = (max - min) / num_bins as f64;

        let mut counts = vec![0_u64; num_bins];
        for &x in samples {
            // x >= min, so the quotient is never negative.
            let idx = ((x - min) / bin_width).floor() as usize;
            counts[idx.min(num_bins - 1)] += 1;
        }

        let n = len_f64(samples);
        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| {
                // Recompute edges from the index to avoid accumulating width error.
                let start = min + i as f64 * bin_width;
                let end = if i == num_bins - 1 {
                    max
                } else {
                    min + (i + 1) as f64 * bin_width
                };
                HistogramBin {
                    range: start..end,
                    center: min + (i as f64 + 0.5) * bin_width,
                    count,
                    frequency: count as f64 / n,
                }
            })
            .collect();

        Ok(Self {
            min,
            max,
            bin_width,
            total,
            bins,
        })
    }

    /// Smallest sample.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest sample.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Width of every bin; zero for a degenerate histogram.
    #[must_use]
    pub fn bin_width(&self) -> f64 {
        self.bin_width
    }

    /// Number of samples that were binned.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Whether all samples were equal and the single-bin fallback was used.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.bin_width == 0.0
    }

    #[must_use]
    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    /// Bin centers in increasing order.
    #[must_use]
    pub fn centers(&self) -> Vec<f64> {
        self.bins.iter().map(|bin| bin.center).collect()
    }

    /// Relative frequencies, parallel to [`centers`](Self::centers).
    #[must_use]
    pub fn frequencies(&self) -> Vec<f64> {
        self.bins.iter().map(|bin| bin.frequency).collect()
    }

    #[must_use]
    pub fn counts(&self) -> Vec<u64> {
        self.bins.iter().map(|bin| bin.count).collect()
    }

    /// Probability density per bin (`frequency / bin_width`), which integrates
    /// to one over the sample range.
    ///
    /// Returns `None` for a degenerate histogram, whose single bin has no width.
    #[must_use]
    pub fn densities(&self) -> Option<Vec<f64>> {
        if self.is_degenerate() {
            return None;
        }
        Some(
            self.bins
                .iter()
                .map(|bin| bin.frequency / self.bin_width)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_frequencies_sum_to_one(histogram: &Histogram) {
        let sum = histogram.frequencies().iter().sum::<f64>();
        assert!((sum - 1.0).abs() < 1e-9, "frequencies sum to {sum}");
    }

    #[test]
    fn test_even_fixture() {
        let values = (0..10).map(f64::from).collect::<Vec<_>>();
        let histogram = Histogram::new(&values, 5).unwrap();

        assert_eq!(histogram.bin_width(), 9.0 / 5.0);
        assert_eq!(histogram.counts(), vec![2, 2, 2, 2, 2]);
        assert_eq!(histogram.counts().iter().sum::<u64>(), 10);
        assert_frequencies_sum_to_one(&histogram);

        let expected_centers = [0.9, 2.7, 4.5, 6.3, 8.1];
        for (center, expected) in histogram.centers().iter().zip(expected_centers) {
            assert!((center - expected).abs() < 1e-12, "center {center}");
        }
    }

    #[test]
    fn test_maximum_is_clamped_into_last_bin() {
        let values = [0.0, 0.5, 1.0];
        let histogram = Histogram::new(&values, 2).unwrap();
        // 1.0 maps to index 2 before clamping.
        assert_eq!(histogram.counts(), vec![1, 2]);
        assert_eq!(histogram.bins().len(), 2);
    }

    #[test]
    fn test_maximum_clamp_with_single_bin() {
        let values = [3.0, 4.0, 5.0];
        let histogram = Histogram::new(&values, 1).unwrap();
        assert_eq!(histogram.counts(), vec![3]);
        assert_eq!(histogram.centers(), vec![4.0]);
    }

    #[test]
    fn test_frequencies_sum_to_one_for_irregular_data() {
        let values = [
            -0.31, 0.12, 1.77, 0.05, -2.6, 0.98, 0.98, 3.33, -0.4, 0.0, 0.7,
        ];
        for num_bins in [1, 3, 7, 60, 1000] {
            let histogram = Histogram::new(&values, num_bins).unwrap();
            assert_eq!(histogram.bins().len(), num_bins);
            assert_eq!(histogram.total(), values.len() as u64);
            assert_frequencies_sum_to_one(&histogram);
        }
    }

    #[test]
    fn test_centers_are_increasing_and_inside_range() {
        let values = [5.0, -3.0, 12.5, 0.25, 7.0];
        let histogram = Histogram::new(&values, 60).unwrap();
        let centers = histogram.centers();
        assert!(centers.is_sorted_by(|a, b| a < b));
        assert!(centers.iter().all(|&c| (-3.0..=12.5).contains(&c)));
        for bin in histogram.bins() {
            assert!(bin.range.start <= bin.center && bin.center <= bin.range.end);
        }
    }

    #[test]
    fn test_constant_samples_fall_back_to_single_bin() {
        let values = [2.0, 2.0, 2.0, 2.0];
        let histogram = Histogram::new(&values, 60).unwrap();
        assert!(histogram.is_degenerate());
        assert_eq!(histogram.bins().len(), 1);
        assert_eq!(histogram.centers(), vec![2.0]);
        assert_eq!(histogram.frequencies(), vec![1.0]);
        assert_eq!(histogram.counts(), vec![4]);
        assert_eq!(histogram.densities(), None);
    }

    #[test]
    fn test_single_sample() {
        let histogram = Histogram::new(&[1.5], 10).unwrap();
        assert!(histogram.is_degenerate());
        assert_frequencies_sum_to_one(&histogram);
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(
            Histogram::new(&[], 10),
            Err(StatsError::InsufficientSamples {
                required: 1,
                actual: 0
            })
        );
        assert_eq!(
            Histogram::new(&[1.0, 2.0], 0),
            Err(StatsError::InvalidBinCount)
        );
    }

    #[test]
    fn test_non_finite_samples_are_rejected() {
        assert_eq!(
            Histogram::new(&[0.5, f64::NAN, 1.0], 10),
            Err(StatsError::NonFiniteSample { index: 1 })
        );
        assert_eq!(
            Histogram::new(&[0.5, 1.0, f64::NEG_INFINITY], 10),
            Err(StatsError::NonFiniteSample { index: 2 })
        );
    }

    #[test]
    fn test_densities_integrate_to_one() {
        let values = [0.0, 0.1, 0.2, 0.25, 0.9, 1.0, 1.0, 2.0];
        let histogram = Histogram::new(&values, 4).unwrap();
        let densities = histogram.densities().unwrap();
        let area = densities.iter().sum::<f64>() * histogram.bin_width();
        assert!((area - 1.0).abs() < 1e-9);
    }
}
