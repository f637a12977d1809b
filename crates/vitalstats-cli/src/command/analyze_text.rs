use std::{fs::File, io::BufReader, path::PathBuf};

use anyhow::Context;
use vitalstats_signal::text;

use super::AnalysisArg;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeTextArg {
    /// Capture file written by `capture --save-dir`
    file: PathBuf,

    #[clap(flatten)]
    analysis: AnalysisArg,
}

pub(crate) fn run(arg: &AnalyzeTextArg) -> anyhow::Result<()> {
    let AnalyzeTextArg { file, analysis } = arg;
    let config = analysis.resolve_config(None)?;

    log::info!("Loading capture from {}", file.display());
    let label = file
        .file_stem()
        .map_or_else(|| "capture".to_owned(), |stem| stem.to_string_lossy().into_owned());
    let reader = BufReader::new(
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?,
    );
    let capture = text::read_capture(reader, &label)
        .with_context(|| format!("Failed to parse capture file: {}", file.display()))?;
    if let Some(header) = &capture.header {
        log::info!(
            "Captured {} from {}, {} samples at {} Hz",
            header.timestamp,
            header.device,
            capture.window.len(),
            capture.window.sample_rate()
        );
    }

    super::report_windows(&label, &[capture.window], config, analysis)
}
