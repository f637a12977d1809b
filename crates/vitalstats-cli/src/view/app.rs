use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect, Spacing},
    style::{Color, Style},
    text::Text,
};

use super::widgets::{
    BoxPlotChart, ChannelPlot, ChannelSelector, DensityChart, StatisticsPanel, TimeSeriesChart,
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    #[default]
    Overview,
    TimeSeries,
    Histogram,
    BoxPlot,
}

impl Pane {
    const ALL: [Pane; 4] = [
        Pane::Overview,
        Pane::TimeSeries,
        Pane::Histogram,
        Pane::BoxPlot,
    ];

    fn name(self) -> &'static str {
        match self {
            Pane::Overview => "Overview",
            Pane::TimeSeries => "Time series",
            Pane::Histogram => "Histogram",
            Pane::BoxPlot => "Box plot",
        }
    }

    fn next(self) -> Self {
        let index = Self::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    fn previous(self) -> Self {
        let index = Self::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug)]
pub struct App {
    source: String,
    plots: Vec<ChannelPlot>,
    selected: usize,
    pane: Pane,
    should_exit: bool,
}

impl App {
    pub fn new(source: String, plots: Vec<ChannelPlot>) -> Self {
        Self {
            source,
            plots,
            selected: 0,
            pane: Pane::default(),
            should_exit: false,
        }
    }

    pub(crate) fn run(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        while !self.should_exit {
            terminal.draw(|f| self.draw(f))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let [main_area, help_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(frame.area());

        let [left_area, right_area] =
            Layout::horizontal([Constraint::Length(34), Constraint::Fill(1)])
                .spacing(Spacing::Overlap(1))
                .areas(main_area);

        let [channel_pane, stats_pane] =
            Layout::vertical([Constraint::Length(8), Constraint::Fill(1)])
                .spacing(Spacing::Overlap(1))
                .areas(left_area);

        frame.render_widget(
            ChannelSelector {
                plots: &self.plots,
                selected: self.selected,
            },
            channel_pane,
        );
        if let Some(plot) = self.plots.get(self.selected) {
            frame.render_widget(StatisticsPanel { plot }, stats_pane);
            self.draw_charts(frame, plot, right_area);
        }

        let help_text = Text::from(format!(
            "{} | ↑/↓: Channel | Tab: View ({}) | q/Esc: Quit",
            self.source,
            self.pane.name()
        ))
        .style(Style::default().fg(Color::DarkGray))
        .centered();
        frame.render_widget(help_text, help_area);
    }

    fn draw_charts(&self, frame: &mut Frame, plot: &ChannelPlot, area: Rect) {
        match self.pane {
            Pane::Overview => {
                let [series_pane, distribution_pane] =
                    Layout::vertical([Constraint::Fill(1), Constraint::Fill(1)])
                        .spacing(Spacing::Overlap(1))
                        .areas(area);
                let [histogram_pane, box_pane] =
                    Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                        .spacing(Spacing::Overlap(1))
                        .areas(distribution_pane);
                frame.render_widget(TimeSeriesChart { plot }, series_pane);
                frame.render_widget(DensityChart { plot }, histogram_pane);
                frame.render_widget(BoxPlotChart { plot }, box_pane);
            }
            Pane::TimeSeries => frame.render_widget(TimeSeriesChart { plot }, area),
            Pane::Histogram => frame.render_widget(DensityChart { plot }, area),
            Pane::BoxPlot => frame.render_widget(BoxPlotChart { plot }, area),
        }
    }

    fn handle_events(&mut self) -> anyhow::Result<()> {
        match event::read()? {
            Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                self.handle_key(key_event.code);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_exit = true,
            KeyCode::Tab => self.pane = self.pane.next(),
            KeyCode::BackTab => self.pane = self.pane.previous(),
            KeyCode::Up if !self.plots.is_empty() => {
                self.selected = self
                    .selected
                    .checked_sub(1)
                    .unwrap_or(self.plots.len() - 1);
            }
            KeyCode::Down if !self.plots.is_empty() => {
                self.selected = (self.selected + 1) % self.plots.len();
            }
            _ => {}
        }
    }
}
