//! Terminal rendering of the dashboard chart configurations.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use medical_dashboard_core::charts::{ChartConfiguration, ChartError, ChartKind, Rgba};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph, Tabs,
};
use ratatui::Frame;
use std::time::Duration;

use crate::demo::{build_demo, ExportedChart};
use crate::terminal::Tui;

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(50);
const HELP: &str = "←/→ switch chart · r regenerate · q quit";

#[derive(Debug)]
pub struct PreviewState {
    pub weeks: usize,
    pub seed: Option<u64>,
    pub charts: Vec<ExportedChart>,
    pub selected: usize,
    pub running: bool,
}

impl PreviewState {
    pub fn new(weeks: usize, seed: Option<u64>) -> Result<Self, ChartError> {
        Ok(Self {
            weeks,
            seed,
            charts: build_demo(weeks, seed)?.charts,
            selected: 0,
            running: true,
        })
    }

    pub fn current(&self) -> Option<&ExportedChart> {
        self.charts.get(self.selected)
    }

    pub fn next(&mut self) {
        if !self.charts.is_empty() {
            self.selected = (self.selected + 1) % self.charts.len();
        }
    }

    pub fn previous(&mut self) {
        if !self.charts.is_empty() {
            self.selected = (self.selected + self.charts.len() - 1) % self.charts.len();
        }
    }

    /// Draws a fresh random walk; a fixed seed is dropped after the first one.
    pub fn regenerate(&mut self) -> Result<(), ChartError> {
        self.seed = None;
        self.charts = build_demo(self.weeks, None)?.charts;
        self.selected = self.selected.min(self.charts.len().saturating_sub(1));
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<(), ChartError> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => self.next(),
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => self.previous(),
            KeyCode::Char('r') => self.regenerate()?,
            _ => {}
        }
        Ok(())
    }
}

pub fn run(terminal: &mut Tui, state: &mut PreviewState) -> Result<()> {
    while state.running {
        terminal
            .draw(|f| render(state, f))
            .map_err(|e| eyre!("Terminal draw error: {e}"))?;

        if matches!(event::poll(EVENT_POLL_TIMEOUT), Ok(true)) {
            if let Ok(Event::Key(key)) = event::read() {
                if key.kind == KeyEventKind::Press {
                    state.handle_key(key.code)?;
                }
            }
        }
    }
    Ok(())
}

fn color(rgba: Rgba) -> Color {
    Color::Rgb(rgba.red, rgba.green, rgba.blue)
}

fn title(config: &ChartConfiguration) -> String {
    config
        .data
        .datasets
        .iter()
        .map(|dataset| dataset.label.as_str())
        .collect::<Vec<_>>()
        .join(" / ")
}

pub fn render(state: &PreviewState, f: &mut Frame<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    let titles = state
        .charts
        .iter()
        .map(|chart| TextLine::from(chart.canvas.clone()))
        .collect::<Vec<_>>();
    let tabs = Tabs::new(titles)
        .select(state.selected)
        .block(Block::default().borders(Borders::ALL).title("Medical Dashboard"))
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Rgb(13, 110, 253))
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));
    f.render_widget(tabs, chunks[0]);

    match state.current() {
        Some(chart) if chart.config.kind == ChartKind::Bar => {
            render_bar_chart(&chart.config, f, chunks[1]);
        }
        Some(chart) => render_line_chart(&chart.config, f, chunks[1]),
        None => {
            let paragraph = Paragraph::new("No charts available")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center);
            f.render_widget(paragraph, chunks[1]);
        }
    }

    f.render_widget(
        Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

#[allow(clippy::cast_precision_loss)]
fn render_line_chart(config: &ChartConfiguration, f: &mut Frame<'_>, area: Rect) {
    let labels = &config.data.labels;
    let mut series: Vec<Vec<(f64, f64)>> = config
        .data
        .datasets
        .iter()
        .map(|dataset| {
            dataset
                .data
                .iter()
                .enumerate()
                .map(|(index, value)| (index as f64, *value))
                .collect()
        })
        .collect();

    let x_max = labels.len().saturating_sub(1).max(1) as f64;
    let threshold = config
        .options
        .plugins
        .annotation
        .as_ref()
        .and_then(|plugin| plugin.annotations.values().next());
    if let Some(annotation) = threshold {
        series.push(vec![(0.0, annotation.y_min), (x_max, annotation.y_max)]);
    }

    let (mut y_min, mut y_max) = series
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, y)| {
            (lo.min(*y), hi.max(*y))
        });
    if let Some(scale) = config.options.scales.get("y") {
        if scale.begin_at_zero == Some(true) {
            y_min = y_min.min(0.0);
        }
        if let Some(max) = scale.max {
            y_max = y_max.max(max);
        }
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        (y_min, y_max) = (0.0, 1.0);
    }

    let mut datasets: Vec<Dataset<'_>> = config
        .data
        .datasets
        .iter()
        .zip(&series)
        .map(|(dataset, points)| {
            Dataset::default()
                .name(dataset.label.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color(dataset.border_color)))
                .data(points)
        })
        .collect();
    if let (Some(annotation), Some(points)) = (threshold, series.last()) {
        datasets.push(
            Dataset::default()
                .name(annotation.label.content.clone())
                .marker(Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(color(annotation.border_color)))
                .data(points),
        );
    }

    let x_labels = [labels.first(), labels.last()]
        .into_iter()
        .flatten()
        .map(|label| Span::raw(label.clone()))
        .collect::<Vec<_>>();
    let y_labels = vec![
        Span::raw(format!("{y_min:.0}")),
        Span::raw(format!("{:.0}", (y_min + y_max) / 2.0)),
        Span::raw(format!("{y_max:.0}")),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(title(config))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(y_labels),
        );

    f.render_widget(chart, area);
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn render_bar_chart(config: &ChartConfiguration, f: &mut Frame<'_>, area: Rect) {
    let Some(dataset) = config.data.datasets.first() else {
        return;
    };

    let values: Vec<u64> = dataset
        .data
        .iter()
        .map(|value| value.max(0.0).round() as u64)
        .collect();
    let bars: Vec<Bar<'_>> = config
        .data
        .labels
        .iter()
        .zip(&values)
        .map(|(label, value)| {
            Bar::default()
                .value(*value)
                .label(TextLine::from(label.clone()))
                .style(Style::default().fg(color(dataset.border_color)))
                .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        })
        .collect();

    let max_value = values.iter().copied().max().unwrap_or(0).max(1);

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(title(config))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .data(BarGroup::default().bars(&bars))
        .max(max_value)
        .bar_gap(1)
        .bar_width(7);

    f.render_widget(chart, area);
}
