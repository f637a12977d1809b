//! Seeded signal generators that behave like capture devices.
//!
//! These stand in for a bench biosignal generator wired to a DAQ input: the
//! same seed always produces the same samples, and the output saturates at the
//! configured voltage range like an ADC would.

use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use rand_pcg::Pcg32;

use crate::capture::{CaptureConfig, CaptureDevice, CaptureError};

/// Gaussian component of one heartbeat, positioned relative to the R peak.
#[derive(Debug, Clone, Copy)]
struct Wave {
    /// Seconds from the R peak.
    offset: f64,
    /// Relative to the R amplitude.
    amplitude: f64,
    /// Standard deviation of the bump in seconds.
    width: f64,
}

const BEAT: [Wave; 5] = [
    // P
    Wave {
        offset: -0.2,
        amplitude: 0.12,
        width: 0.025,
    },
    // Q
    Wave {
        offset: -0.035,
        amplitude: -0.12,
        width: 0.01,
    },
    // R
    Wave {
        offset: 0.0,
        amplitude: 1.0,
        width: 0.012,
    },
    // S
    Wave {
        offset: 0.035,
        amplitude: -0.25,
        width: 0.01,
    },
    // T
    Wave {
        offset: 0.3,
        amplitude: 0.3,
        width: 0.05,
    },
];

/// ECG-like beat train with additive Gaussian noise.
#[derive(Debug, Clone)]
pub struct SyntheticEcg {
    rng: Pcg32,
    heart_rate: f64,
    amplitude: f64,
    baseline: f64,
    noise_std_dev: f64,
}

impl SyntheticEcg {
    /// 72 bpm, 1 V R peak, no offset, 20 mV noise.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            heart_rate: 72.0,
            amplitude: 1.0,
            baseline: 0.0,
            noise_std_dev: 0.02,
        }
    }

    /// Beats per minute.
    #[must_use]
    pub fn with_heart_rate(mut self, bpm: f64) -> Self {
        self.heart_rate = bpm;
        self
    }

    /// R-peak amplitude in volts.
    #[must_use]
    pub fn with_amplitude(mut self, amplitude: f64) -> Self {
        self.amplitude = amplitude;
        self
    }

    /// DC offset in volts.
    #[must_use]
    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = baseline;
        self
    }

    #[must_use]
    pub fn with_noise(mut self, std_dev: f64) -> Self {
        self.noise_std_dev = std_dev;
        self
    }
}

/// Noise-free waveform at time `t`, in units of the R amplitude.
fn beat_shape(heart_rate: f64, t: f64) -> f64 {
    let period = 60.0 / heart_rate;
    // First R peak a quarter period in, so the first P wave is visible.
    let r_time = 0.25 * period;
    BEAT.iter()
        .map(|wave| {
            // Distance to the nearest occurrence of this wave.
            let d = (t - r_time - wave.offset + 0.5 * period).rem_euclid(period) - 0.5 * period;
            wave.amplitude * (-0.5 * (d / wave.width).powi(2)).exp()
        })
        .sum()
}

impl CaptureDevice for SyntheticEcg {
    fn name(&self) -> &str {
        "synthetic ECG"
    }

    #[expect(clippy::cast_precision_loss)]
    fn read_finite(&mut self, config: &CaptureConfig) -> Result<Vec<f64>, CaptureError> {
        if !(self.heart_rate.is_finite() && self.heart_rate > 0.0) {
            return Err(device_error(config, "heart rate must be positive"));
        }
        if !(self.amplitude.is_finite() && self.baseline.is_finite()) {
            return Err(device_error(config, "amplitude and baseline must be finite"));
        }
        let noise = gaussian(config, 0.0, self.noise_std_dev)?;
        let samples = (0..config.samples_per_channel())
            .map(|i| {
                let t = i as f64 / config.sample_rate;
                let clean = self.baseline + self.amplitude * beat_shape(self.heart_rate, t);
                (clean + self.rng.sample(noise)).clamp(config.v_min, config.v_max)
            })
            .collect();
        Ok(samples)
    }
}

/// Independent normally distributed samples.
#[derive(Debug, Clone)]
pub struct WhiteNoise {
    rng: Pcg32,
    mean: f64,
    std_dev: f64,
}

impl WhiteNoise {
    #[must_use]
    pub fn new(seed: u64, mean: f64, std_dev: f64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            mean,
            std_dev,
        }
    }
}

impl CaptureDevice for WhiteNoise {
    fn name(&self) -> &str {
        "white noise"
    }

    fn read_finite(&mut self, config: &CaptureConfig) -> Result<Vec<f64>, CaptureError> {
        let normal = gaussian(config, self.mean, self.std_dev)?;
        let samples = (0..config.samples_per_channel())
            .map(|_| self.rng.sample(normal).clamp(config.v_min, config.v_max))
            .collect();
        Ok(samples)
    }
}

/// `Normal::new` accepts a negative scale, so the sign is checked here.
fn gaussian(config: &CaptureConfig, mean: f64, std_dev: f64) -> Result<Normal<f64>, CaptureError> {
    if !(mean.is_finite() && std_dev.is_finite() && std_dev >= 0.0) {
        return Err(device_error(
            config,
            &format!("invalid noise N({mean}, {std_dev}): need a finite mean and std_dev >= 0"),
        ));
    }
    Normal::new(mean, std_dev).map_err(|e| device_error(config, &e.to_string()))
}

fn device_error(config: &CaptureConfig, message: &str) -> CaptureError {
    CaptureError::Device {
        device: config.device.clone(),
        message: message.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CaptureConfig {
        CaptureConfig {
            duration: 5.0,
            ..CaptureConfig::default()
        }
    }

    #[test]
    fn test_same_seed_same_samples() {
        let a = SyntheticEcg::new(42).read_finite(&config()).unwrap();
        let b = SyntheticEcg::new(42).read_finite(&config()).unwrap();
        let c = SyntheticEcg::new(43).read_finite(&config()).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 5000);
    }

    #[test]
    fn test_ecg_peaks_at_heart_rate() {
        let config = config();
        let samples = SyntheticEcg::new(1)
            .with_noise(0.0)
            .read_finite(&config)
            .unwrap();
        // Count upward crossings of half the R amplitude.
        let beats = samples
            .windows(2)
            .filter(|w| w[0] < 0.5 && w[1] >= 0.5)
            .count();
        // 72 bpm over 5 s, R peaks at 0.21 s + k * 0.83 s.
        assert_eq!(beats, 6);
    }

    #[test]
    fn test_ecg_is_right_skewed() {
        let samples = SyntheticEcg::new(3).read_finite(&config()).unwrap();
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let m2 = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        let m3 = samples.iter().map(|x| (x - mean).powi(3)).sum::<f64>() / n;
        assert!(m3 / m2.powf(1.5) > 1.0);
    }

    #[test]
    fn test_output_saturates_at_range() {
        let config = CaptureConfig {
            v_min: -0.1,
            v_max: 0.1,
            ..config()
        };
        let samples = WhiteNoise::new(9, 0.0, 1.0).read_finite(&config).unwrap();
        assert!(samples.iter().all(|v| (-0.1..=0.1).contains(v)));
    }

    #[test]
    fn test_invalid_noise_is_device_error() {
        let result = WhiteNoise::new(9, 0.0, -1.0).read_finite(&config());
        assert!(matches!(result, Err(CaptureError::Device { .. })));
        let result = WhiteNoise::new(9, f64::NAN, 1.0).read_finite(&config());
        assert!(matches!(result, Err(CaptureError::Device { .. })));
        let result = SyntheticEcg::new(9).with_noise(-0.1).read_finite(&config());
        assert!(matches!(result, Err(CaptureError::Device { .. })));
    }

    #[test]
    fn test_invalid_waveform_is_device_error() {
        for ecg in [
            SyntheticEcg::new(1).with_heart_rate(0.0),
            SyntheticEcg::new(1).with_amplitude(f64::INFINITY),
            SyntheticEcg::new(1).with_baseline(f64::NAN),
        ] {
            let result = ecg.clone().read_finite(&config());
            assert!(matches!(result, Err(CaptureError::Device { .. })), "{ecg:?}");
        }
    }

    #[test]
    fn test_waveform_parameters_shape_output() {
        let clean = |ecg: SyntheticEcg| ecg.with_noise(0.0).read_finite(&config()).unwrap();
        let base = clean(SyntheticEcg::new(1));
        let scaled = clean(SyntheticEcg::new(1).with_amplitude(2.0).with_baseline(-0.5));
        for (b, s) in base.iter().zip(&scaled) {
            assert!((s - (2.0 * b - 0.5)).abs() < 1e-12);
        }

        let fast = clean(SyntheticEcg::new(1).with_heart_rate(120.0));
        let beats = fast
            .windows(2)
            .filter(|w| w[0] < 0.5 && w[1] >= 0.5)
            .count();
        // R peaks at 0.125 s + k * 0.5 s.
        assert_eq!(beats, 10);
    }
}
