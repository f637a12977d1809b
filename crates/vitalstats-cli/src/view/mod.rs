//! Interactive terminal viewer of analyzed channels.

use vitalstats_signal::SampleWindow;

use crate::{config::AnalysisConfig, report::AnalysisReport};

use self::{app::App, widgets::ChannelPlot};

mod app;
mod widgets;

pub(crate) fn run_tui(
    windows: &[SampleWindow],
    report: AnalysisReport,
    config: AnalysisConfig,
) -> anyhow::Result<()> {
    let plots = windows
        .iter()
        .zip(report.channels)
        .map(|(window, channel)| ChannelPlot::new(window, channel, config.curve_points))
        .collect();

    let mut terminal = ratatui::init();
    let app_result = App::new(report.source, plots).run(&mut terminal);
    ratatui::restore();
    app_result
}
