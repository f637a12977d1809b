//! Console and JSON reporting of per-channel statistics.

use std::fmt;

use anyhow::Context;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use vitalstats_signal::{Channel, SampleWindow};
use vitalstats_stats::{moments::MomentReport, summary::SignalSummary};

use crate::config::AnalysisConfig;

/// Everything computed for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Record, capture file or device the windows came from.
    pub source: String,
    pub generated_at: DateTime<Local>,
    pub config: AnalysisConfig,
    pub channels: Vec<ChannelReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelReport {
    pub channel: Channel,
    pub sample_rate: f64,
    /// Window length in seconds.
    pub duration: f64,
    pub summary: SignalSummary,
}

impl ChannelReport {
    pub fn new(window: &SampleWindow, config: &AnalysisConfig) -> anyhow::Result<Self> {
        let summary = SignalSummary::new(window.samples(), config.num_bins, config.whisker_factor)
            .with_context(|| format!("Failed to compute statistics for {}", window.channel()))?;
        if let Err(err) = &summary.moments {
            log::warn!("{}: moment statistics unavailable: {err}", window.channel());
        }
        if summary.histogram.is_degenerate() {
            log::warn!(
                "{}: all samples equal {}, histogram collapsed to a single bin",
                window.channel(),
                summary.min
            );
        }
        Ok(Self {
            channel: window.channel().clone(),
            sample_rate: window.sample_rate(),
            duration: window.duration(),
            summary,
        })
    }
}

impl AnalysisReport {
    pub fn new(
        source: impl Into<String>,
        config: AnalysisConfig,
        windows: &[SampleWindow],
    ) -> anyhow::Result<Self> {
        let channels = windows
            .iter()
            .map(|window| ChannelReport::new(window, &config))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self {
            source: source.into(),
            generated_at: Local::now(),
            config,
            channels,
        })
    }
}

const RULE_WIDTH: usize = 60;

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(f, "  STATISTICS - {}", self.source)?;
        writeln!(f, "{}", "=".repeat(RULE_WIDTH))?;
        for channel in &self.channels {
            writeln!(f)?;
            write!(f, "{channel}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ChannelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = &self.channel.unit;
        let b = &self.summary.box_plot;
        writeln!(
            f,
            "  {} - {} samples, {} s at {} Hz",
            self.channel, self.summary.count, self.duration, self.sample_rate
        )?;
        writeln!(f, "    Min              : {:>14.6} {unit}", self.summary.min)?;
        writeln!(f, "    Max              : {:>14.6} {unit}", self.summary.max)?;
        match &self.summary.moments {
            Ok(m) => {
                writeln!(f, "    Mean             : {:>14.6} {unit}", m.mean)?;
                writeln!(f, "    Std deviation    : {:>14.6} {unit}", m.std_dev)?;
                writeln!(f, "    Variance         : {:>14.6} {unit}²", m.variance)?;
                writeln!(f, "    Coef. variation  : {:>14.4} %", m.coefficient_of_variation)?;
                writeln!(f, "    Skewness         : {:>14.6}", m.skewness)?;
                writeln!(f, "    Excess kurtosis  : {:>14.6}", m.excess_kurtosis)?;
            }
            Err(err) => writeln!(f, "    Moments          : n/a ({err})")?,
        }
        writeln!(
            f,
            "    Q1 / Median / Q3 : {:.6} / {:.6} / {:.6} {unit}",
            b.q1, b.median, b.q3
        )?;
        writeln!(
            f,
            "    Whiskers         : {:.6} to {:.6} {unit} ({} outliers)",
            b.lower_whisker, b.upper_whisker, b.outliers
        )
    }
}

/// Rows of the comparison table: label and accessor into a moment report.
const COMPARED_STATISTICS: [(&str, fn(&MomentReport) -> f64); 6] = [
    ("Mean", |m| m.mean),
    ("Std deviation", |m| m.std_dev),
    ("Variance", |m| m.variance),
    ("Coef. variation %", |m| m.coefficient_of_variation),
    ("Skewness", |m| m.skewness),
    ("Excess kurtosis", |m| m.excess_kurtosis),
];

/// Side-by-side table of moment statistics, one block per channel label and
/// one column per named report.
///
/// Channels appear in order of first occurrence. A report lacking a channel,
/// or whose moments for it failed, shows `-` in that column.
#[derive(Debug, Clone, Copy)]
pub struct Comparison<'a> {
    pub reports: &'a [(String, AnalysisReport)],
}

impl Comparison<'_> {
    fn channels(&self) -> Vec<&Channel> {
        let mut channels: Vec<&Channel> = vec![];
        for (_, report) in self.reports {
            for entry in &report.channels {
                if !channels.iter().any(|c| c.label == entry.channel.label) {
                    channels.push(&entry.channel);
                }
            }
        }
        channels
    }
}

impl fmt::Display for Comparison<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .reports
            .iter()
            .map(|(name, _)| name.chars().count())
            .max()
            .unwrap_or(0)
            .max(14);

        for channel in self.channels() {
            let columns = self
                .reports
                .iter()
                .map(|(_, report)| {
                    report
                        .channels
                        .iter()
                        .find(|c| c.channel.label == channel.label)
                        .and_then(|c| c.summary.moments.as_ref().ok())
                })
                .collect::<Vec<_>>();

            writeln!(f, "{channel}")?;
            write!(f, "  {:<20}", "Statistic")?;
            for (name, _) in self.reports {
                write!(f, " {name:>width$}")?;
            }
            writeln!(f)?;
            writeln!(f, "  {}", "-".repeat(20 + self.reports.len() * (width + 1)))?;
            for (label, value) in COMPARED_STATISTICS {
                write!(f, "  {label:<20}")?;
                for column in &columns {
                    match column {
                        Some(moments) => write!(f, " {:>width$.6}", value(moments))?,
                        None => write!(f, " {:>width$}", "-")?,
                    }
                }
                writeln!(f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use vitalstats_stats::{Degeneracy, StatsError};

    use super::*;

    fn window(label: &str, samples: Vec<f64>) -> SampleWindow {
        SampleWindow::new(Channel::new(label, "mV"), 5.0, samples).unwrap()
    }

    fn report(source: &str, windows: &[SampleWindow]) -> AnalysisReport {
        AnalysisReport::new(source, AnalysisConfig::default(), windows).unwrap()
    }

    #[test]
    fn test_channel_report_matches_summary() {
        let window = window("ECG", vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        let report = ChannelReport::new(&window, &AnalysisConfig::default()).unwrap();
        assert_eq!(report.summary.count, 5);
        let moments = report.summary.moments.unwrap();
        assert_eq!(moments.mean, 3.0);
        assert_eq!(moments.variance, 2.5);
        assert_eq!(report.duration, 1.0);
        assert_eq!(report.sample_rate, 5.0);
    }

    #[test]
    fn test_flat_channel_next_to_normal_one() {
        let report = report(
            "0743",
            &[
                window("ECG", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
                window("NIBP", vec![2.0; 4]),
            ],
        );
        assert_eq!(report.channels.len(), 2);
        assert!(report.channels[0].summary.moments.is_ok());

        let flat = &report.channels[1].summary;
        assert_eq!(
            flat.moments,
            Err(StatsError::DegenerateDistribution {
                reason: Degeneracy::ZeroSpread
            })
        );
        assert!(flat.histogram.is_degenerate());
        assert_eq!(flat.box_plot.median, 2.0);

        let text = report.to_string();
        assert!(text.contains("Variance         :       2.500000 mV²"));
        assert!(text.contains("NIBP (mV) - 4 samples"));
        assert!(text.contains("Moments          : n/a (degenerate distribution: samples have zero spread)"));

        let json = serde_json::to_string(&report).unwrap();
        let back: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_channel_failure_names_channel() {
        let window = window("NIBP", vec![2.0; 4]);
        let config = AnalysisConfig {
            num_bins: 0,
            ..AnalysisConfig::default()
        };
        let err = ChannelReport::new(&window, &config).unwrap_err();
        assert!(err.to_string().contains("NIBP (mV)"));
    }

    #[test]
    fn test_report_json_round_trip() {
        let report = report(
            "0743",
            &[
                window("ECG", vec![0.1, -0.2, 0.9, 0.0, 0.3, 0.1]),
                window("NIBP", vec![80.0, 95.0, 120.0, 110.0, 90.0]),
            ],
        );
        let json = serde_json::to_string(&report).unwrap();
        let back: AnalysisReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_console_report_lists_statistics() {
        let report = report("0743", &[window("ECG", vec![1.0, 2.0, 3.0, 4.0, 5.0])]);
        let text = report.to_string();
        assert!(text.contains("STATISTICS - 0743"));
        assert!(text.contains("ECG (mV) - 5 samples, 1 s at 5 Hz"));
        assert!(text.contains("Variance         :       2.500000 mV²"));
        assert!(text.contains("Coef. variation  :        52.7046 %"));
    }

    #[test]
    fn test_comparison_table() {
        let a = report(
            "a",
            &[
                window("ECG", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
                window("NIBP", vec![80.0, 95.0, 120.0, 110.0, 90.0]),
            ],
        );
        let b = report("b", &[window("ECG", vec![2.0, 4.0, 6.0, 8.0, 10.0])]);
        let reports = [("part-a.json".to_owned(), a), ("b.json".to_owned(), b)];
        let table = Comparison { reports: &reports }.to_string();

        let lines = table.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "ECG (mV)");
        assert!(lines[1].contains("part-a.json") && lines[1].contains("b.json"));
        let mean = lines.iter().find(|l| l.trim_start().starts_with("Mean")).unwrap();
        assert!(mean.contains("3.000000") && mean.contains("6.000000"));

        let nibp = lines.iter().position(|l| *l == "NIBP (mV)").unwrap();
        let nibp_mean = lines[nibp + 3];
        assert!(nibp_mean.trim_start().starts_with("Mean"));
        assert!(nibp_mean.trim_end().ends_with('-'));
    }

    #[test]
    fn test_comparison_skips_failed_moments() {
        let a = report("a", &[window("NIBP", vec![80.0, 95.0, 120.0])]);
        let b = report("b", &[window("NIBP", vec![90.0; 3])]);
        let reports = [("a.json".to_owned(), a), ("b.json".to_owned(), b)];
        let table = Comparison { reports: &reports }.to_string();

        let mean = table
            .lines()
            .find(|l| l.trim_start().starts_with("Mean"))
            .unwrap();
        assert!(mean.contains("98.333333"));
        assert!(mean.trim_end().ends_with('-'));
    }
}
