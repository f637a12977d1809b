use std::path::Path;

use serde::{Deserialize, Serialize};
use vitalstats_stats::{
    histogram::DEFAULT_NUM_BINS, normal::DEFAULT_CURVE_POINTS,
    percentiles::DEFAULT_WHISKER_FACTOR,
};

use crate::util;

/// Analysis window length used when neither the config file nor `--seconds` sets one.
pub const DEFAULT_WINDOW_SECONDS: f64 = 10.0;

/// Tunables shared by every analysis subcommand.
///
/// Loaded from an optional JSON file; fields missing from the file keep
/// their defaults, and explicit command-line flags win over both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Length of the analyzed window in seconds.
    pub window_seconds: f64,
    pub num_bins: usize,
    /// Whisker reach in multiples of the IQR.
    pub whisker_factor: f64,
    /// Resolution of the normal reference curve in the viewer.
    pub curve_points: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window_seconds: DEFAULT_WINDOW_SECONDS,
            num_bins: DEFAULT_NUM_BINS,
            whisker_factor: DEFAULT_WHISKER_FACTOR,
            curve_points: DEFAULT_CURVE_POINTS,
        }
    }
}

impl AnalysisConfig {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let config = match path {
            Some(path) => {
                log::info!("Loading analysis config from {}", path.display());
                util::read_json_file("config", path)?
            }
            None => Self::default(),
        };
        Ok(config)
    }

    #[must_use]
    pub fn with_overrides(mut self, window_seconds: Option<f64>, num_bins: Option<usize>) -> Self {
        if let Some(seconds) = window_seconds {
            self.window_seconds = seconds;
        }
        if let Some(bins) = num_bins {
            self.num_bins = bins;
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.window_seconds.is_finite() && self.window_seconds > 0.0,
            "window length must be positive, got {}",
            self.window_seconds
        );
        anyhow::ensure!(self.num_bins > 0, "number of bins must be at least 1");
        anyhow::ensure!(
            self.whisker_factor.is_finite() && self.whisker_factor >= 0.0,
            "whisker factor must be non-negative, got {}",
            self.whisker_factor
        );
        anyhow::ensure!(
            self.curve_points >= 2,
            "normal curve needs at least 2 points"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "num_bins": 30, "whisker_factor": 3.0 }"#).unwrap();

        let config = AnalysisConfig::load(Some(&path)).unwrap();
        assert_eq!(config.num_bins, 30);
        assert_eq!(config.whisker_factor, 3.0);
        assert_eq!(config.window_seconds, DEFAULT_WINDOW_SECONDS);
        assert_eq!(config.curve_points, DEFAULT_CURVE_POINTS);
    }

    #[test]
    fn test_flags_override_file() {
        let config = AnalysisConfig {
            num_bins: 30,
            ..AnalysisConfig::default()
        };
        let merged = config.with_overrides(Some(5.0), None);
        assert_eq!(merged.window_seconds, 5.0);
        assert_eq!(merged.num_bins, 30);
        assert_eq!(merged.with_overrides(None, Some(12)).num_bins, 12);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "bins": 30 }"#).unwrap();
        assert!(AnalysisConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(AnalysisConfig::default().validate().is_ok());
        for bad in [
            AnalysisConfig {
                num_bins: 0,
                ..AnalysisConfig::default()
            },
            AnalysisConfig {
                window_seconds: 0.0,
                ..AnalysisConfig::default()
            },
            AnalysisConfig {
                whisker_factor: -1.0,
                ..AnalysisConfig::default()
            },
            AnalysisConfig {
                curve_points: 1,
                ..AnalysisConfig::default()
            },
        ] {
            assert!(bad.validate().is_err(), "{bad:?}");
        }
    }
}
