use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::Local;
use vitalstats_signal::{
    Channel, SampleWindow,
    capture::{self, CaptureConfig, CaptureDevice},
    synthetic::{SyntheticEcg, WhiteNoise},
    text::{self, CaptureHeader},
};

use super::AnalysisArg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum SignalKind {
    /// Beat train with P, QRS and T waves
    Ecg,
    /// Gaussian noise around the baseline
    Noise,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct CaptureArg {
    /// Physical channel to read from
    #[arg(long, default_value = "Dev4/ai0")]
    device: String,

    /// Signal produced by the simulated device
    #[arg(long, value_enum, default_value_t = SignalKind::Ecg)]
    signal: SignalKind,

    /// Generator seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    #[clap(flatten)]
    waveform: WaveformArg,

    /// Sample clock in Hz
    #[arg(long, default_value_t = 1000.0)]
    sample_rate: f64,

    /// Acquisition length in seconds
    #[arg(long, default_value_t = 10.0)]
    duration: f64,

    /// Lower end of the input range in volts
    #[arg(long, default_value_t = -5.0, allow_negative_numbers = true)]
    v_min: f64,

    /// Upper end of the input range in volts
    #[arg(long, default_value_t = 5.0, allow_negative_numbers = true)]
    v_max: f64,

    /// Directory to save the capture as `capture_<timestamp>.txt`
    #[arg(long)]
    save_dir: Option<PathBuf>,

    #[clap(flatten)]
    analysis: AnalysisArg,
}

/// Shape of the simulated signal.
#[derive(Debug, Clone, Copy, PartialEq, clap::Args)]
pub(crate) struct WaveformArg {
    /// Beats per minute of the ECG signal
    #[arg(long, default_value_t = 72.0)]
    heart_rate: f64,

    /// R-peak amplitude in volts for ECG, standard deviation for noise
    /// [default: 1.0 for ECG, 0.5 for noise]
    #[arg(long)]
    amplitude: Option<f64>,

    /// DC offset in volts
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    baseline: f64,
}

impl Default for WaveformArg {
    fn default() -> Self {
        Self {
            heart_rate: 72.0,
            amplitude: None,
            baseline: 0.0,
        }
    }
}

impl SignalKind {
    fn device(self, seed: u64, waveform: &WaveformArg) -> Box<dyn CaptureDevice> {
        match self {
            SignalKind::Ecg => Box::new(
                SyntheticEcg::new(seed)
                    .with_heart_rate(waveform.heart_rate)
                    .with_amplitude(waveform.amplitude.unwrap_or(1.0))
                    .with_baseline(waveform.baseline),
            ),
            SignalKind::Noise => Box::new(WhiteNoise::new(
                seed,
                waveform.baseline,
                waveform.amplitude.unwrap_or(0.5),
            )),
        }
    }
}

pub(crate) fn run(arg: &CaptureArg) -> anyhow::Result<()> {
    let capture_config = CaptureConfig {
        device: arg.device.clone(),
        sample_rate: arg.sample_rate,
        duration: arg.duration,
        v_min: arg.v_min,
        v_max: arg.v_max,
    };
    let config = arg.analysis.resolve_config(Some(arg.duration))?;

    let seed = arg.seed.unwrap_or_else(rand::random);
    log::info!("Using seed {seed}");
    let mut device = arg.signal.device(seed, &arg.waveform);
    let channel = Channel::new(arg.device.clone(), "V");
    let window = capture::capture_window(&mut *device, &capture_config, channel)
        .with_context(|| format!("Failed to capture from {}", arg.device))?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    if let Some(dir) = &arg.save_dir {
        let header = CaptureHeader {
            timestamp: timestamp.clone(),
            device: arg.device.clone(),
        };
        let path = save_capture(dir, &header, &window)?;
        log::info!("Capture saved to {}", path.display());
    }

    let source = format!("{} capture {timestamp}", arg.device);
    super::report_windows(&source, &[window], config, &arg.analysis)
}

fn save_capture(
    dir: &Path,
    header: &CaptureHeader,
    window: &SampleWindow,
) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let path = dir.join(format!("capture_{}.txt", header.timestamp));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create capture file: {}", path.display()))?;
    text::write_capture(BufWriter::new(file), header, window)
        .with_context(|| format!("Failed to write capture file: {}", path.display()))?;
    Ok(path)
}
