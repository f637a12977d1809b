use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum SignalError {
    #[display("sample window is empty")]
    Empty,
    #[display("sample rate must be positive and finite, got {sample_rate}")]
    InvalidSampleRate { sample_rate: f64 },
    #[display("sample {index} is not finite ({value})")]
    NonFiniteSample { index: usize, value: f64 },
}

/// Label and physical unit of a signal channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Channel {
    pub label: String,
    pub unit: String,
}

impl Channel {
    pub fn new(label: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            unit: unit.into(),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.unit)
    }
}

/// A complete window of samples from one channel.
///
/// The samples cannot be modified after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleWindow {
    channel: Channel,
    sample_rate: f64,
    samples: Vec<f64>,
}

impl SampleWindow {
    /// Creates a window, rejecting empty or non-finite data and invalid sample rates.
    pub fn new(channel: Channel, sample_rate: f64, samples: Vec<f64>) -> Result<Self, SignalError> {
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(SignalError::InvalidSampleRate { sample_rate });
        }
        if samples.is_empty() {
            return Err(SignalError::Empty);
        }
        if let Some((index, &value)) = samples.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(SignalError::NonFiniteSample { index, value });
        }
        Ok(Self {
            channel,
            sample_rate,
            samples,
        })
    }

    #[must_use]
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Samples per second.
    #[must_use]
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    #[must_use]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; a window holds at least one sample.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length of the window in seconds.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }

    /// Timestamp of each sample in seconds, starting at zero.
    #[expect(clippy::cast_precision_loss)]
    pub fn time_axis(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.samples.len()).map(|i| i as f64 / self.sample_rate)
    }

    /// `(time, value)` pairs for plotting.
    #[must_use]
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.time_axis().zip(self.samples.iter().copied()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ecg() -> Channel {
        Channel::new("ECG", "mV")
    }

    #[test]
    fn test_time_axis() {
        let window = SampleWindow::new(ecg(), 4.0, vec![0.0, 1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(
            window.time_axis().collect::<Vec<_>>(),
            vec![0.0, 0.25, 0.5, 0.75, 1.0]
        );
        assert_eq!(window.duration(), 1.25);
        assert_eq!(window.points()[2], (0.5, 2.0));
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert_eq!(
            SampleWindow::new(ecg(), 1000.0, vec![]),
            Err(SignalError::Empty)
        );
        assert!(matches!(
            SampleWindow::new(ecg(), 0.0, vec![1.0]),
            Err(SignalError::InvalidSampleRate { .. })
        ));
        assert!(matches!(
            SampleWindow::new(ecg(), f64::NAN, vec![1.0]),
            Err(SignalError::InvalidSampleRate { .. })
        ));
        assert!(matches!(
            SampleWindow::new(ecg(), 1000.0, vec![1.0, f64::INFINITY]),
            Err(SignalError::NonFiniteSample { index: 1, .. })
        ));
    }

    #[test]
    fn test_channel_display() {
        assert_eq!(Channel::new("NIBP", "mmHg").to_string(), "NIBP (mmHg)");
    }
}
