use std::path::{Path, PathBuf};

use anyhow::Context;
use vitalstats_signal::wfdb::Record;

use super::AnalysisArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeRecordArg {
    /// WFDB header file (`.hea`); data files are resolved next to it
    header: PathBuf,

    /// Window length in seconds, taken from the start of the record [default: 10]
    #[arg(long)]
    seconds: Option<f64>,

    /// Signal descriptions to analyze (comma-separated); all signals when omitted
    #[arg(long, value_delimiter = ',')]
    channels: Vec<String>,

    #[clap(flatten)]
    analysis: AnalysisArg,
}

pub(crate) fn run(arg: &AnalyzeRecordArg) -> anyhow::Result<()> {
    let AnalyzeRecordArg {
        header,
        seconds,
        channels,
        analysis,
    } = arg;
    let config = analysis.resolve_config(*seconds)?;

    log::info!("Loading record header {}", header.display());
    let record = Record::read_header(header)
        .with_context(|| format!("Failed to read WFDB header: {}", header.display()))?;
    let selected = channels
        .iter()
        .map(|label| record.signal_index(label))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Unknown signal in record {}", record.name))?;

    let frames = record.frames_for_seconds(config.window_seconds);
    log::info!(
        "Record {}: {} signals at {} Hz, reading {frames} frames ({} s)",
        record.name,
        record.signals.len(),
        record.sample_rate,
        config.window_seconds
    );
    let data_dir = header.parent().unwrap_or(Path::new("."));
    let mut windows = record
        .read_window(data_dir, frames)
        .with_context(|| format!("Failed to read samples of record {}", record.name))?;

    if !selected.is_empty() {
        windows = selected.iter().map(|&i| windows[i].clone()).collect();
    }

    super::report_windows(&record.name, &windows, config, analysis)
}
