//! Finite acquisition from a data-acquisition device.
//!
//! A capture either yields exactly `sample_rate * duration` samples or fails;
//! a partially filled window is never handed on.

use serde::{Deserialize, Serialize};

use crate::{Channel, SampleWindow, SignalError};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum CaptureError {
    #[display("invalid capture configuration: {reason}")]
    InvalidConfig { reason: String },
    #[display("device '{device}' failed: {message}")]
    Device { device: String, message: String },
    #[display("device delivered {actual} samples, expected {expected}")]
    IncompleteCapture { expected: usize, actual: usize },
    #[from]
    Window(SignalError),
}

/// Channel, clock and range settings for one finite acquisition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Physical channel identifier, e.g. `Dev4/ai0`.
    pub device: String,
    /// Sample clock in Hz.
    pub sample_rate: f64,
    /// Acquisition length in seconds.
    pub duration: f64,
    /// Lower end of the input voltage range.
    pub v_min: f64,
    /// Upper end of the input voltage range.
    pub v_max: f64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device: "Dev4/ai0".to_owned(),
            sample_rate: 1000.0,
            duration: 10.0,
            v_min: -5.0,
            v_max: 5.0,
        }
    }
}

impl CaptureConfig {
    pub fn validate(&self) -> Result<(), CaptureError> {
        let invalid = |reason: &str| {
            Err(CaptureError::InvalidConfig {
                reason: reason.to_owned(),
            })
        };
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return invalid("sample rate must be positive");
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return invalid("duration must be positive");
        }
        if !(self.v_min.is_finite() && self.v_max.is_finite() && self.v_min < self.v_max) {
            return invalid("voltage range must satisfy v_min < v_max");
        }
        if self.samples_per_channel() == 0 {
            return invalid("duration is shorter than one sample period");
        }
        Ok(())
    }

    /// Number of samples the acquisition must deliver (`sample_rate * duration`, truncated).
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn samples_per_channel(&self) -> usize {
        (self.sample_rate * self.duration) as usize
    }
}

/// A device able to perform a finite, clocked read of one analog input.
pub trait CaptureDevice {
    /// Short description used in logs and capture headers.
    fn name(&self) -> &str;

    /// Acquires `config.samples_per_channel()` samples at `config.sample_rate`.
    fn read_finite(&mut self, config: &CaptureConfig) -> Result<Vec<f64>, CaptureError>;
}

/// Runs a complete acquisition and wraps the result in a [`SampleWindow`].
///
/// The device output is checked against the configured sample count.
pub fn capture_window<D>(
    device: &mut D,
    config: &CaptureConfig,
    channel: Channel,
) -> Result<SampleWindow, CaptureError>
where
    D: CaptureDevice + ?Sized,
{
    config.validate()?;
    let expected = config.samples_per_channel();

    log::info!(
        "Capturing {expected} samples from {} ({}) at {} Hz, range {} to {} V",
        config.device,
        device.name(),
        config.sample_rate,
        config.v_min,
        config.v_max
    );
    let samples = device.read_finite(config)?;
    if samples.len() != expected {
        return Err(CaptureError::IncompleteCapture {
            expected,
            actual: samples.len(),
        });
    }
    log::info!("Capture completed");

    Ok(SampleWindow::new(channel, config.sample_rate, samples)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedDevice {
        samples: Vec<f64>,
    }

    impl CaptureDevice for FixedDevice {
        fn name(&self) -> &str {
            "fixed"
        }

        fn read_finite(&mut self, _config: &CaptureConfig) -> Result<Vec<f64>, CaptureError> {
            Ok(self.samples.clone())
        }
    }

    struct FailingDevice;

    impl CaptureDevice for FailingDevice {
        fn name(&self) -> &str {
            "failing"
        }

        fn read_finite(&mut self, config: &CaptureConfig) -> Result<Vec<f64>, CaptureError> {
            Err(CaptureError::Device {
                device: config.device.clone(),
                message: "device not connected".to_owned(),
            })
        }
    }

    fn config(sample_rate: f64, duration: f64) -> CaptureConfig {
        CaptureConfig {
            sample_rate,
            duration,
            ..CaptureConfig::default()
        }
    }

    #[test]
    fn test_samples_per_channel() {
        assert_eq!(CaptureConfig::default().samples_per_channel(), 10_000);
        assert_eq!(config(1000.0, 0.0015).samples_per_channel(), 1);
    }

    #[test]
    fn test_complete_capture() {
        let mut device = FixedDevice {
            samples: vec![0.5, -0.5, 1.0, 0.0],
        };
        let window =
            capture_window(&mut device, &config(4.0, 1.0), Channel::new("DAQ", "V")).unwrap();
        assert_eq!(window.len(), 4);
        assert_eq!(window.sample_rate(), 4.0);
        assert_eq!(window.channel().unit, "V");
    }

    #[test]
    fn test_short_capture_is_rejected() {
        let mut device = FixedDevice {
            samples: vec![0.5, -0.5, 1.0],
        };
        assert_eq!(
            capture_window(&mut device, &config(4.0, 1.0), Channel::new("DAQ", "V")),
            Err(CaptureError::IncompleteCapture {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn test_device_failure_propagates() {
        let result = capture_window(
            &mut FailingDevice,
            &CaptureConfig::default(),
            Channel::new("DAQ", "V"),
        );
        assert!(matches!(result, Err(CaptureError::Device { .. })));
    }

    #[test]
    fn test_invalid_config() {
        let mut device = FixedDevice { samples: vec![] };
        for bad in [
            config(0.0, 1.0),
            config(1000.0, -1.0),
            config(1000.0, 0.0001),
            CaptureConfig {
                v_min: 1.0,
                v_max: 1.0,
                ..CaptureConfig::default()
            },
        ] {
            assert!(matches!(
                capture_window(&mut device, &bad, Channel::new("DAQ", "V")),
                Err(CaptureError::InvalidConfig { .. })
            ));
        }
    }
}
