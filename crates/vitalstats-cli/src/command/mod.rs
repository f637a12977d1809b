use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vitalstats_signal::SampleWindow;

use crate::{config::AnalysisConfig, report::AnalysisReport, util::Output, view};

use self::{
    analyze_record::AnalyzeRecordArg, analyze_text::AnalyzeTextArg, capture::CaptureArg,
    compare::CompareArg,
};

mod analyze_record;
mod analyze_text;
mod capture;
mod compare;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Analyze the first seconds of a WFDB record
    AnalyzeRecord(#[clap(flatten)] AnalyzeRecordArg),
    /// Capture a window from an acquisition device and analyze it
    Capture(#[clap(flatten)] CaptureArg),
    /// Analyze a previously saved text capture
    AnalyzeText(#[clap(flatten)] AnalyzeTextArg),
    /// Compare the statistics of saved JSON reports
    Compare(#[clap(flatten)] CompareArg),
}

/// Options shared by the analyzing subcommands.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AnalysisArg {
    /// Number of histogram bins [default: 60]
    #[arg(long)]
    bins: Option<usize>,

    /// JSON file with analysis settings; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the JSON report to this file (`-` for stdout, which replaces the console report)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Open the interactive viewer after analysis
    #[arg(long)]
    view: bool,
}

impl AnalysisArg {
    fn resolve_config(&self, window_seconds: Option<f64>) -> anyhow::Result<AnalysisConfig> {
        let config = AnalysisConfig::load(self.config.as_deref())?
            .with_overrides(window_seconds, self.bins);
        config.validate()?;
        Ok(config)
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::AnalyzeRecord(arg) => analyze_record::run(&arg)?,
        Mode::Capture(arg) => capture::run(&arg)?,
        Mode::AnalyzeText(arg) => analyze_text::run(&arg)?,
        Mode::Compare(arg) => compare::run(&arg)?,
    }
    Ok(())
}

/// Computes, prints, saves and optionally displays the statistics of `windows`.
fn report_windows(
    source: &str,
    windows: &[SampleWindow],
    config: AnalysisConfig,
    arg: &AnalysisArg,
) -> anyhow::Result<()> {
    log::info!("Computing statistics for {} channels", windows.len());
    let report = AnalysisReport::new(source, config, windows)?;

    let json_to_stdout = arg
        .output
        .as_deref()
        .is_some_and(Output::is_stdout_path);
    if !json_to_stdout {
        println!("{report}");
    }
    if let Some(path) = &arg.output {
        let mut output = Output::create(path)?;
        output.write_json(&report)?;
        log::info!("Report saved to {}", output.display_path());
    }

    if arg.view {
        view::run_tui(windows, report, config)?;
    }
    Ok(())
}
