use serde::{Deserialize, Serialize};

use crate::{
    StatsError, histogram::Histogram, moments::MomentReport, normal::NormalCurve,
    percentiles::BoxPlot,
};

/// Complete statistical overview of one sample window.
///
/// Combines:
/// - Moment statistics (mean, dispersion, shape)
/// - A fixed-width histogram with relative frequencies
/// - A box-plot summary (quartiles and whiskers)
///
/// The histogram and box plot exist for any non-empty finite window. The
/// moments may still fail, e.g. for a flat trace, and keep their error so the
/// rest of the summary stays usable.
///
/// # Examples
///
/// ```
/// use vitalstats_stats::summary::SignalSummary;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let summary = SignalSummary::new(
///     &values,
///     5,    // Number of histogram bins
///     1.5,  // Whisker reach in IQRs
/// ).unwrap();
///
/// assert_eq!(summary.count, 10);
/// assert_eq!(summary.moments.unwrap().mean, 5.5);
/// assert_eq!(summary.box_plot.median, 5.5);
///
/// let flat = SignalSummary::new(&[2.0; 4], 5, 1.5).unwrap();
/// assert!(flat.moments.is_err());
/// assert!(flat.histogram.is_degenerate());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub moments: Result<MomentReport, StatsError>,
    pub histogram: Histogram,
    pub box_plot: BoxPlot,
}

impl SignalSummary {
    /// Computes every statistic of `samples`.
    ///
    /// # Errors
    ///
    /// Any error of [`Histogram::new`]. Errors of [`MomentReport::new`] are
    /// stored in [`moments`](Self::moments) instead.
    pub fn new(samples: &[f64], num_bins: usize, whisker_factor: f64) -> Result<Self, StatsError> {
        let histogram = Histogram::new(samples, num_bins)?;
        let box_plot = BoxPlot::new(samples, whisker_factor)?;
        let moments = MomentReport::new(samples);

        Ok(Self {
            count: samples.len(),
            min: histogram.min(),
            max: histogram.max(),
            moments,
            histogram,
            box_plot,
        })
    }

    /// Normal density with this window's mean and standard deviation, if the
    /// moments are available.
    #[must_use]
    pub fn normal_curve(&self) -> Option<NormalCurve> {
        let moments = self.moments.as_ref().ok()?;
        NormalCurve::new(moments.mean, moments.std_dev).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Degeneracy, histogram::DEFAULT_NUM_BINS, percentiles::DEFAULT_WHISKER_FACTOR};

    #[test]
    fn test_summary_components_agree() {
        let values = [0.8, -0.1, 1.4, 0.3, 2.9, 0.0, 0.6, 1.1];
        let summary = SignalSummary::new(&values, DEFAULT_NUM_BINS, DEFAULT_WHISKER_FACTOR).unwrap();
        assert_eq!(summary.count, values.len());
        assert_eq!(summary.min, -0.1);
        assert_eq!(summary.max, 2.9);
        assert_eq!(summary.box_plot.min, summary.min);
        assert_eq!(summary.box_plot.max, summary.max);
        assert_eq!(summary.histogram.bins().len(), DEFAULT_NUM_BINS);
        assert_eq!(summary.moments, MomentReport::new(&values));

        let curve = summary.normal_curve().unwrap();
        assert_eq!(curve.mean(), summary.moments.unwrap().mean);
    }

    #[test]
    fn test_flat_window_keeps_histogram_and_box_plot() {
        let summary = SignalSummary::new(&[2.0; 4], 10, DEFAULT_WHISKER_FACTOR).unwrap();
        assert_eq!(
            summary.moments,
            Err(StatsError::DegenerateDistribution {
                reason: Degeneracy::ZeroSpread
            })
        );
        assert!(summary.histogram.is_degenerate());
        assert_eq!(summary.histogram.counts(), vec![4]);
        assert_eq!(summary.box_plot.median, 2.0);
        assert_eq!((summary.min, summary.max), (2.0, 2.0));
        assert!(summary.normal_curve().is_none());
    }

    #[test]
    fn test_single_sample_window() {
        let summary = SignalSummary::new(&[0.7], 10, DEFAULT_WHISKER_FACTOR).unwrap();
        assert_eq!(summary.count, 1);
        assert!(matches!(
            summary.moments,
            Err(StatsError::InsufficientSamples { .. })
        ));
        assert_eq!(summary.box_plot.q1, 0.7);
    }

    #[test]
    fn test_invalid_window_is_an_error() {
        assert_eq!(
            SignalSummary::new(&[1.0, f64::NAN], 10, DEFAULT_WHISKER_FACTOR),
            Err(StatsError::NonFiniteSample { index: 1 })
        );
        assert!(SignalSummary::new(&[], 10, DEFAULT_WHISKER_FACTOR).is_err());
    }
}
