//! Normal reference density for comparing a histogram against a Gaussian with
//! the same mean and standard deviation.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::StatsError;

/// Number of points used when sampling the curve for display.
pub const DEFAULT_CURVE_POINTS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalCurve {
    mean: f64,
    std_dev: f64,
}

impl NormalCurve {
    /// # Errors
    ///
    /// [`StatsError::InvalidStdDev`] unless `std_dev` is positive and finite.
    pub fn new(mean: f64, std_dev: f64) -> Result<Self, StatsError> {
        if !(std_dev.is_finite() && std_dev > 0.0) {
            return Err(StatsError::InvalidStdDev { std_dev });
        }
        Ok(Self { mean, std_dev })
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Probability density at `x`.
    #[must_use]
    pub fn pdf(&self, x: f64) -> f64 {
        let z = (x - self.mean) / self.std_dev;
        (-0.5 * z * z).exp() / (self.std_dev * (2.0 * PI).sqrt())
    }

    /// Evaluates the density at `points` evenly spaced positions spanning
    /// `[lo, hi]`, both ends included.
    ///
    /// # Examples
    ///
    /// ```
    /// use vitalstats_stats::normal::NormalCurve;
    ///
    /// let curve = NormalCurve::new(0.0, 1.0).unwrap();
    /// let points = curve.sample(-3.0, 3.0, 7);
    /// assert_eq!(points.len(), 7);
    /// assert_eq!(points[3].0, 0.0);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn sample(&self, lo: f64, hi: f64, points: usize) -> Vec<(f64, f64)> {
        match points {
            0 => vec![],
            1 => vec![(lo, self.pdf(lo))],
            _ => {
                let step = (hi - lo) / (points - 1) as f64;
                (0..points)
                    .map(|i| {
                        let x = if i == points - 1 {
                            hi
                        } else {
                            lo + i as f64 * step
                        };
                        (x, self.pdf(x))
                    })
                    .collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_normal_peak() {
        let curve = NormalCurve::new(0.0, 1.0).unwrap();
        assert!((curve.pdf(0.0) - 0.398_942_280_401_432_7).abs() < 1e-12);
        assert!((curve.pdf(1.0) - curve.pdf(-1.0)).abs() < 1e-15);
    }

    #[test]
    fn test_scaled_curve_integrates_to_one() {
        let curve = NormalCurve::new(120.0, 8.0).unwrap();
        let points = curve.sample(120.0 - 80.0, 120.0 + 80.0, 4001);
        let step = points[1].0 - points[0].0;
        let area = points.iter().map(|(_, y)| y).sum::<f64>() * step;
        assert!((area - 1.0).abs() < 1e-3, "area {area}");
    }

    #[test]
    fn test_sample_endpoints() {
        let curve = NormalCurve::new(0.0, 2.0).unwrap();
        let points = curve.sample(-0.3, 0.7, 500);
        assert_eq!(points.first().map(|p| p.0), Some(-0.3));
        assert_eq!(points.last().map(|p| p.0), Some(0.7));
        assert!(curve.sample(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_invalid_std_dev() {
        for std_dev in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                NormalCurve::new(0.0, std_dev),
                Err(StatsError::InvalidStdDev { .. })
            ));
        }
    }
}
