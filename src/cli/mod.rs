//! Command-line parsing for the enrollment forecaster.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::Metric;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "enroll", version, about = "Enrollment time-series forecaster (census-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Forecast with the autoregressive linear trend model.
    Trend(ForecastArgs),
    /// Fit a polynomial curve to the series and extrapolate it.
    Poly(ForecastArgs),
    /// Plot a previously exported forecast JSON.
    Plot(PlotArgs),
    /// Launch the interactive TUI.
    ///
    /// This uses the same underlying pipeline as `enroll trend`/`enroll poly`,
    /// but renders results in a terminal UI using Ratatui.
    Tui(ForecastArgs),
}

/// Common options for forecasting.
#[derive(Debug, Parser, Clone)]
pub struct ForecastArgs {
    /// CSV file with the historical series
    /// (columns: year, entrants/graduates/total, optional level).
    #[arg(short = 'f', long)]
    pub input: Option<PathBuf>,

    /// Fetch the published census CSV instead of reading a local file.
    #[arg(long)]
    pub remote: bool,

    /// Which metric column to forecast.
    #[arg(short = 'm', long, value_enum, default_value_t = Metric::Auto)]
    pub metric: Metric,

    /// Academic-level filter applied when the CSV has a `level` column.
    #[arg(long, default_value = "total")]
    pub level: String,

    /// Number of future years to forecast.
    #[arg(short = 'y', long, default_value_t = 5)]
    pub horizon: usize,

    /// Polynomial degree (poly forecaster only).
    #[arg(short = 'd', long, default_value_t = 2)]
    pub degree: usize,

    /// Include the in-sample fitted curve in the output (poly forecaster only).
    #[arg(long)]
    pub fit_curve: bool,

    /// Years of synthetic data when neither `--input` nor `--remote` is given.
    #[arg(short = 'n', long, default_value_t = 24)]
    pub sample_years: usize,

    /// Random seed for synthetic data generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export forecast rows to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the forecast (kind + model + rows) to JSON.
    #[arg(long = "export-forecast")]
    pub export_forecast: Option<PathBuf>,
}

/// Options for plotting a saved forecast.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Forecast JSON file produced by `enroll trend|poly --export-forecast`.
    #[arg(long, value_name = "JSON")]
    pub forecast: PathBuf,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}
