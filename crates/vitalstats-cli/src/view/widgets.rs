use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    symbols::{Marker, merge::MergeStrategy},
    text::Line,
    widgets::{
        Axis, Block, Chart, Dataset, GraphType, List, ListItem, ListState, Paragraph,
        StatefulWidget, Widget,
    },
};
use vitalstats_signal::SampleWindow;
use vitalstats_stats::percentiles::BoxPlot;

use crate::report::ChannelReport;

/// Vertical extent of the drawn box in the box-plot chart, whose y axis spans `[0, 1]`.
const BOX_BOTTOM: f64 = 0.3;
const BOX_TOP: f64 = 0.7;
const BOX_MIDDLE: f64 = 0.5;
const CAP_HALF_HEIGHT: f64 = 0.1;

/// Plot series of one channel, computed once when the viewer opens.
#[derive(Debug, Clone)]
pub struct ChannelPlot {
    pub report: ChannelReport,
    series: Vec<(f64, f64)>,
    mean_line: Vec<(f64, f64)>,
    upper_sigma_line: Vec<(f64, f64)>,
    lower_sigma_line: Vec<(f64, f64)>,
    time_bounds: [f64; 2],
    value_bounds: [f64; 2],
    bars: Vec<(f64, f64)>,
    /// `false` when the histogram has a single bin and bars show frequencies.
    is_density: bool,
    curve: Vec<(f64, f64)>,
    box_segments: Vec<Vec<(f64, f64)>>,
    outliers: Vec<(f64, f64)>,
}

impl ChannelPlot {
    pub fn new(window: &SampleWindow, report: ChannelReport, curve_points: usize) -> Self {
        let summary = &report.summary;

        let series = window.points();
        let t_end = series.last().map_or(0.0, |&(t, _)| t);
        let horizontal = |y: f64| vec![(0.0, y), (t_end, y)];

        // Without moments there is no mean or ±σ band to draw.
        let moments = summary.moments.as_ref();
        let (mean_line, upper_sigma_line, lower_sigma_line, value_bounds) = match moments {
            Ok(m) => (
                horizontal(m.mean),
                horizontal(m.mean + m.std_dev),
                horizontal(m.mean - m.std_dev),
                padded_bounds(
                    summary.min.min(m.mean - m.std_dev),
                    summary.max.max(m.mean + m.std_dev),
                ),
            ),
            Err(_) => (
                vec![],
                vec![],
                vec![],
                padded_bounds(summary.min, summary.max),
            ),
        };

        let densities = summary.histogram.densities();
        let is_density = densities.is_some();
        let heights = densities.unwrap_or_else(|| summary.histogram.frequencies());
        let bars = summary.histogram.centers().into_iter().zip(heights).collect();

        let [lo, hi] = padded_bounds(summary.min, summary.max);
        let curve = summary
            .normal_curve()
            .map(|curve| curve.sample(lo, hi, curve_points))
            .unwrap_or_default();

        let box_plot = &summary.box_plot;
        let outliers = window
            .samples()
            .iter()
            .filter(|&&v| v < box_plot.lower_whisker || v > box_plot.upper_whisker)
            .map(|&v| (v, BOX_MIDDLE))
            .collect();

        Self {
            series,
            mean_line,
            upper_sigma_line,
            lower_sigma_line,
            time_bounds: [0.0, t_end.max(f64::EPSILON)],
            value_bounds,
            bars,
            is_density,
            curve,
            box_segments: box_segments(box_plot),
            outliers,
            report,
        }
    }

    fn distribution_bounds(&self) -> [f64; 2] {
        padded_bounds(self.report.summary.min, self.report.summary.max)
    }
}

/// `[lo, hi]` widened by 5 % on each side, or by 0.5 when the range is empty.
pub fn padded_bounds(lo: f64, hi: f64) -> [f64; 2] {
    if hi > lo {
        let pad = (hi - lo) * 0.05;
        [lo - pad, hi + pad]
    } else {
        [lo - 0.5, hi + 0.5]
    }
}

/// Line segments of a horizontal box plot: box outline, median, whiskers and caps.
pub fn box_segments(b: &BoxPlot) -> Vec<Vec<(f64, f64)>> {
    vec![
        vec![
            (b.q1, BOX_BOTTOM),
            (b.q3, BOX_BOTTOM),
            (b.q3, BOX_TOP),
            (b.q1, BOX_TOP),
            (b.q1, BOX_BOTTOM),
        ],
        vec![(b.median, BOX_BOTTOM), (b.median, BOX_TOP)],
        vec![(b.lower_whisker, BOX_MIDDLE), (b.q1, BOX_MIDDLE)],
        vec![(b.q3, BOX_MIDDLE), (b.upper_whisker, BOX_MIDDLE)],
        vec![
            (b.lower_whisker, BOX_MIDDLE - CAP_HALF_HEIGHT),
            (b.lower_whisker, BOX_MIDDLE + CAP_HALF_HEIGHT),
        ],
        vec![
            (b.upper_whisker, BOX_MIDDLE - CAP_HALF_HEIGHT),
            (b.upper_whisker, BOX_MIDDLE + CAP_HALF_HEIGHT),
        ],
    ]
}

fn axis_labels(bounds: [f64; 2]) -> [String; 3] {
    [
        format!("{:.2}", bounds[0]),
        format!("{:.2}", f64::midpoint(bounds[0], bounds[1])),
        format!("{:.2}", bounds[1]),
    ]
}

fn line_dataset<'a>(name: &'a str, data: &'a [(f64, f64)], color: Color) -> Dataset<'a> {
    Dataset::default()
        .name(name)
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(data)
}

pub struct ChannelSelector<'a> {
    pub plots: &'a [ChannelPlot],
    pub selected: usize,
}

impl Widget for ChannelSelector<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let items = self
            .plots
            .iter()
            .map(|plot| ListItem::new(plot.report.channel.to_string()))
            .collect::<Vec<_>>();

        let list = List::new(items)
            .block(
                Block::bordered()
                    .title("Channels")
                    .merge_borders(MergeStrategy::Exact),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(">> ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.selected));

        StatefulWidget::render(list, area, buf, &mut list_state);
    }
}

pub struct StatisticsPanel<'a> {
    pub plot: &'a ChannelPlot,
}

impl Widget for StatisticsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let report = &self.plot.report;
        let summary = &report.summary;
        let b = &summary.box_plot;
        let mut text = vec![
            Line::raw(format!("  N:        {:>12}", summary.count)),
            Line::raw(format!("  Fs:       {:>12} Hz", report.sample_rate)),
        ];
        match &summary.moments {
            Ok(m) => text.extend([
                Line::raw(format!("  Mean:     {:>12.4}", m.mean)),
                Line::raw(format!("  StdDev:   {:>12.4}", m.std_dev)),
                Line::raw(format!("  Variance: {:>12.4}", m.variance)),
                Line::raw(format!("  CV:       {:>11.2} %", m.coefficient_of_variation)),
                Line::raw(format!("  Skewness: {:>12.4}", m.skewness)),
                Line::raw(format!("  Kurtosis: {:>12.4}", m.excess_kurtosis)),
            ]),
            Err(err) => text.extend([
                Line::raw(format!("  Moments:  {:>12}", "n/a")),
                Line::raw(format!("  {err}")).style(Style::default().fg(Color::Yellow)),
            ]),
        }
        text.extend([
            Line::raw(""),
            Line::raw(format!("  Min:      {:>12.4}", summary.min)),
            Line::raw(format!("  Q1:       {:>12.4}", b.q1)),
            Line::raw(format!("  Median:   {:>12.4}", b.median)),
            Line::raw(format!("  Q3:       {:>12.4}", b.q3)),
            Line::raw(format!("  Max:      {:>12.4}", summary.max)),
            Line::raw(format!("  Outliers: {:>12}", b.outliers)),
        ]);
        let paragraph = Paragraph::new(text).block(
            Block::bordered()
                .merge_borders(MergeStrategy::Exact)
                .title(format!("Statistics [{}]", report.channel.unit)),
        );
        Widget::render(paragraph, area, buf);
    }
}

pub struct TimeSeriesChart<'a> {
    pub plot: &'a ChannelPlot,
}

impl Widget for TimeSeriesChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let plot = self.plot;
        let datasets = vec![
            line_dataset("signal", &plot.series, Color::Cyan),
            line_dataset("mean", &plot.mean_line, Color::Red),
            line_dataset("+σ", &plot.upper_sigma_line, Color::Yellow),
            line_dataset("-σ", &plot.lower_sigma_line, Color::Yellow),
        ];
        let chart = Chart::new(datasets)
            .block(
                Block::bordered()
                    .merge_borders(MergeStrategy::Exact)
                    .title(format!("{} - time series", plot.report.channel)),
            )
            .x_axis(
                Axis::default()
                    .title("t [s]")
                    .bounds(plot.time_bounds)
                    .labels(axis_labels(plot.time_bounds)),
            )
            .y_axis(
                Axis::default()
                    .title(plot.report.channel.unit.as_str())
                    .bounds(plot.value_bounds)
                    .labels(axis_labels(plot.value_bounds)),
            );
        Widget::render(chart, area, buf);
    }
}

pub struct DensityChart<'a> {
    pub plot: &'a ChannelPlot,
}

impl Widget for DensityChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let plot = self.plot;
        let x_bounds = plot.distribution_bounds();
        let y_max = plot
            .bars
            .iter()
            .chain(&plot.curve)
            .map(|&(_, y)| y)
            .fold(0.0, f64::max);
        let y_bounds = [0.0, if y_max > 0.0 { y_max * 1.1 } else { 1.0 }];

        let bars = Dataset::default()
            .name("histogram")
            .marker(Marker::HalfBlock)
            .graph_type(GraphType::Bar)
            .style(Style::default().fg(Color::Blue))
            .data(&plot.bars);
        let mut datasets = vec![bars];
        if !plot.curve.is_empty() {
            datasets.push(line_dataset("normal", &plot.curve, Color::Red));
        }

        let chart = Chart::new(datasets)
            .block(
                Block::bordered()
                    .merge_borders(MergeStrategy::Exact)
                    .title(format!("{} - histogram", plot.report.channel)),
            )
            .x_axis(
                Axis::default()
                    .title(plot.report.channel.unit.as_str())
                    .bounds(x_bounds)
                    .labels(axis_labels(x_bounds)),
            )
            .y_axis(
                Axis::default()
                    .title(if plot.is_density { "density" } else { "frequency" })
                    .bounds(y_bounds)
                    .labels(axis_labels(y_bounds)),
            );
        Widget::render(chart, area, buf);
    }
}

pub struct BoxPlotChart<'a> {
    pub plot: &'a ChannelPlot,
}

impl Widget for BoxPlotChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let plot = self.plot;
        let x_bounds = plot.distribution_bounds();

        let mut datasets = plot
            .box_segments
            .iter()
            .map(|segment| {
                Dataset::default()
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(Color::Green))
                    .data(segment)
            })
            .collect::<Vec<_>>();
        datasets.push(
            Dataset::default()
                .marker(Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(Color::Red))
                .data(&plot.outliers),
        );

        let chart = Chart::new(datasets)
            .block(
                Block::bordered()
                    .merge_borders(MergeStrategy::Exact)
                    .title(format!("{} - box plot", plot.report.channel)),
            )
            .x_axis(
                Axis::default()
                    .title(plot.report.channel.unit.as_str())
                    .bounds(x_bounds)
                    .labels(axis_labels(x_bounds)),
            )
            .y_axis(Axis::default().bounds([0.0, 1.0]));
        Widget::render(chart, area, buf);
    }
}
