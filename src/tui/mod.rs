//! Ratatui-based terminal UI.
//!
//! The TUI provides a settings panel for choosing the forecaster, metric,
//! horizon and polynomial degree, then renders the historical series with
//! the fitted curve and forecast, plus a coefficient panel.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};

use crate::app::pipeline::{self, RunOutput, SeriesData};
use crate::cli::ForecastArgs;
use crate::domain::{ForecastKind, Metric, MetricKind, SeriesLabel};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::ForecastChart;

/// Start the TUI.
pub fn run(args: ForecastArgs) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(args)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

const FIELD_COUNT: usize = 5;

struct App {
    config: crate::domain::RunConfig,
    selected_field: usize,
    status: String,
    series: Option<SeriesData>,
    run: Option<RunOutput>,
}

impl App {
    fn new(args: ForecastArgs) -> Result<Self, AppError> {
        let config = crate::app::run_config_from_args(&args, ForecastKind::Trend);
        let mut app = Self {
            config,
            selected_field: 0,
            status: "Loading series...".to_string(),
            series: None,
            run: None,
        };
        app.reload_series()?;
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code)? {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> Result<bool, AppError> {
        match code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < FIELD_COUNT - 1 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.selected_field == 4 {
                    self.config.include_fit_curve = !self.config.include_fit_curve;
                    self.refit();
                }
            }
            KeyCode::Char('m') => {
                self.config.kind = next_kind(self.config.kind);
                self.refit();
                self.status = format!("forecaster: {}", self.config.kind.display_name());
            }
            KeyCode::Char('r') => {
                self.config.sample_seed = self.config.sample_seed.wrapping_add(1);
                self.reload_series()?;
                self.status = format!("Reloaded (seed {}).", self.config.sample_seed);
            }
            KeyCode::Char('d') => {
                if let Some(series) = &self.series {
                    match crate::debug::write_debug_bundle(series, &self.config) {
                        Ok(path) => {
                            self.status = format!("Wrote debug bundle: {}", path.display());
                        }
                        Err(err) => {
                            self.status = format!("Debug write failed: {err}");
                        }
                    }
                } else {
                    self.status = "No series loaded.".to_string();
                }
            }
            _ => {}
        }

        Ok(false)
    }

    fn adjust_field(&mut self, delta: i32) {
        match self.selected_field {
            0 => {
                self.config.kind = next_kind(self.config.kind);
                self.refit();
                self.status = format!("forecaster: {}", self.config.kind.display_name());
            }
            1 => {
                let current = self.config.metric.to_kind().unwrap_or(MetricKind::Entrants);
                let next = if delta >= 0 {
                    next_metric(current)
                } else {
                    prev_metric(current)
                };
                self.config.metric = Metric::from(next);
                if let Err(err) = self.reload_series() {
                    self.status = format!("Reload failed: {err}");
                } else {
                    self.status = format!("metric: {}", next.display_name());
                }
            }
            2 => {
                let next = if delta >= 0 {
                    self.config.horizon.saturating_add(1)
                } else {
                    self.config.horizon.saturating_sub(1)
                };
                self.config.horizon = next;
                self.refit();
                self.status = format!("horizon: {}", self.config.horizon);
            }
            3 => {
                let next = if delta >= 0 {
                    self.config.degree.saturating_add(1)
                } else {
                    self.config.degree.saturating_sub(1)
                };
                self.config.degree = next;
                self.refit();
                self.status = format!("degree: {}", self.config.degree);
            }
            4 => {
                self.config.include_fit_curve = !self.config.include_fit_curve;
                self.refit();
                self.status = format!("fit curve: {}", self.config.include_fit_curve);
            }
            _ => {}
        }
    }

    fn reload_series(&mut self) -> Result<(), AppError> {
        let series = pipeline::load_series(&self.config)?;
        self.status = format!("Loaded {} point(s) from {}.", series.stats.n_points, series.source);
        self.series = Some(series);
        self.refit();
        Ok(())
    }

    fn refit(&mut self) {
        let Some(series) = &self.series else {
            self.status = "No series loaded.".to_string();
            return;
        };

        match pipeline::run_forecast(&self.config, series) {
            Ok(run) => {
                if run.rows.is_empty() {
                    self.status = "History too short for the trend model (need 4+ points).".to_string();
                }
                self.run = Some(run);
            }
            Err(err) => {
                // Singular fits are recoverable: keep the previous picture and
                // tell the user what to change.
                self.status = err.to_string();
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("enroll", Style::default().fg(Color::Cyan)),
            Span::raw(" — enrollment forecast curves"),
        ]));

        let (source, metric, n) = match &self.series {
            Some(s) => (s.source.clone(), s.metric.display_name(), s.stats.n_points),
            None => ("-".to_string(), "-", 0),
        };
        lines.push(Line::from(Span::styled(
            format!(
                "source: {source} | metric: {metric} | n={n} | forecaster: {} | horizon: {}",
                self.config.kind.display_name(),
                self.config.horizon,
            ),
            Style::default().fg(Color::Gray),
        )));

        if let Some(series) = &self.series {
            lines.push(Line::from(Span::styled(
                format!(
                    "years=[{}, {}] | value=[{:.0}, {:.0}]",
                    series.stats.year_min,
                    series.stats.year_max,
                    series.stats.value_min,
                    series.stats.value_max,
                ),
                Style::default().fg(Color::Gray),
            )));
        }

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(9)])
            .split(area);

        self.draw_chart(frame, chunks[0]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[1]);

        self.draw_settings(frame, bottom[0]);
        self.draw_model_panel(frame, bottom[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Enrollment Forecast").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("Waiting for data...")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let Some(series) = chart_series(run) else {
            let msg = Paragraph::new("Nothing to plot (history too short).")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        };

        let widget = ForecastChart {
            historical: &series.historical,
            fitted: &series.fitted,
            forecast: &series.forecast,
            x_bounds: series.x_bounds,
            y_bounds: series.y_bounds,
            x_label: "year",
            y_label: "students",
            fmt_x: fmt_axis_year,
            fmt_y: fmt_axis_value,
        };

        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let metric = self
            .config
            .metric
            .to_kind()
            .unwrap_or(MetricKind::Entrants)
            .display_name();

        let items = vec![
            ListItem::new(format!("Forecaster: {}", self.config.kind.display_name())),
            ListItem::new(format!("Metric: {metric}")),
            ListItem::new(format!("Horizon: {}", self.config.horizon)),
            ListItem::new(format!("Degree: {}", self.config.degree)),
            ListItem::new(format!("Fit curve: {}", self.config.include_fit_curve)),
        ];

        let list = List::new(items)
            .block(Block::default().title("Settings").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_model_panel(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();

        match &self.run {
            Some(run) => match run.kind {
                ForecastKind::Trend => match &run.trend_model {
                    Some(model) => {
                        lines.push(Line::from("betas [intercept, trend, lag1, rolling_mean2]:"));
                        for (name, beta) in ["intercept", "trend", "lag1", "rolling_mean2"]
                            .iter()
                            .zip(model.betas.iter())
                        {
                            lines.push(Line::from(format!("  {name:<14} {beta:+.6}")));
                        }
                    }
                    None => lines.push(Line::from("trend model not fitted (short history)")),
                },
                ForecastKind::Poly => {
                    if let Some(model) = &run.poly_model {
                        lines.push(Line::from(format!(
                            "degree {} around year {}:",
                            model.degree(),
                            model.year0
                        )));
                        for (power, coefficient) in model.terms() {
                            lines.push(Line::from(format!("  x^{power:<3} {coefficient:+.6}")));
                        }
                    }
                }
            },
            None => lines.push(Line::from("no fit yet")),
        }

        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("Model").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ adjust  Enter toggle  m forecaster  r reseed  d debug  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Chart-ready series extracted from a run.
struct ChartSeries {
    historical: Vec<(f64, f64)>,
    fitted: Vec<(f64, f64)>,
    forecast: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Build chart series for Plotters. `None` when there is nothing to plot.
fn chart_series(run: &RunOutput) -> Option<ChartSeries> {
    if run.rows.is_empty() {
        return None;
    }

    let mut historical = Vec::new();
    let mut fitted = Vec::new();
    let mut forecast = Vec::new();

    for row in &run.rows {
        let point = (f64::from(row.year), row.value);
        match row.label {
            SeriesLabel::Historical => historical.push(point),
            SeriesLabel::Fitted => fitted.push(point),
            SeriesLabel::Forecast => forecast.push(point),
        }
    }

    let (mut x_min, mut x_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(x, y) in historical.iter().chain(fitted.iter()).chain(forecast.iter()) {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }

    if !x_min.is_finite() || !x_max.is_finite() || x_max <= x_min {
        return None;
    }
    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min -= 1.0;
        y_max += 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    Some(ChartSeries {
        historical,
        fitted,
        forecast,
        x_bounds: [x_min, x_max],
        y_bounds: [y_min - pad, y_max + pad],
    })
}

fn next_kind(cur: ForecastKind) -> ForecastKind {
    match cur {
        ForecastKind::Trend => ForecastKind::Poly,
        ForecastKind::Poly => ForecastKind::Trend,
    }
}

fn next_metric(cur: MetricKind) -> MetricKind {
    match cur {
        MetricKind::Entrants => MetricKind::Graduates,
        MetricKind::Graduates => MetricKind::Total,
        MetricKind::Total => MetricKind::Entrants,
    }
}

fn prev_metric(cur: MetricKind) -> MetricKind {
    match cur {
        MetricKind::Entrants => MetricKind::Total,
        MetricKind::Graduates => MetricKind::Entrants,
        MetricKind::Total => MetricKind::Graduates,
    }
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_value(v: f64) -> String {
    if v.abs() >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if v.abs() >= 1_000.0 {
        format!("{:.0}k", v / 1_000.0)
    } else {
        format!("{v:.0}")
    }
}
