//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the historical series (file / remote census / sample)
//! - runs the selected forecaster
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, ForecastArgs, PlotArgs};
use crate::domain::{ForecastFile, ForecastKind, RunConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `enroll` binary.
pub fn run() -> Result<(), AppError> {
    // We want `enroll` and `enroll --horizon 10` to behave like
    // `enroll tui ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Trend(args) => handle_forecast(args, ForecastKind::Trend),
        Command::Poly(args) => handle_forecast(args, ForecastKind::Poly),
        Command::Plot(args) => handle_plot(args),
        Command::Tui(args) => crate::tui::run(args),
    }
}

fn handle_forecast(args: ForecastArgs, kind: ForecastKind) -> Result<(), AppError> {
    let config = run_config_from_args(&args, kind);
    let run = pipeline::run(&config)?;

    println!("{}", crate::report::format_run_summary(&run, &config));
    println!("{}", crate::report::format_forecast_table(&run.rows));

    if config.plot && !run.rows.is_empty() {
        let plot = crate::plot::render_ascii_plot(&run.rows, config.plot_width, config.plot_height);
        println!("{plot}");
    }

    // Optional exports.
    if let Some(path) = &config.export_rows {
        crate::io::export::write_rows_csv(path, &run.rows)?;
    }
    if let Some(path) = &config.export_forecast {
        let file = forecast_file_from_run(&run);
        crate::io::forecast::write_forecast_json(path, &file)?;
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let file = crate::io::forecast::read_forecast_json(&args.forecast)?;
    let plot = crate::plot::render_ascii_plot(&file.rows, args.width, args.height);
    println!("{plot}");
    Ok(())
}

pub fn run_config_from_args(args: &ForecastArgs, kind: ForecastKind) -> RunConfig {
    RunConfig {
        input: args.input.clone(),
        remote: args.remote,
        metric: args.metric,
        level: args.level.clone(),
        kind,
        horizon: args.horizon,
        degree: args.degree,
        include_fit_curve: args.fit_curve,
        sample_years: args.sample_years,
        sample_seed: args.seed,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_rows: args.export.clone(),
        export_forecast: args.export_forecast.clone(),
    }
}

/// Build the portable forecast-file representation of a finished run.
pub fn forecast_file_from_run(run: &pipeline::RunOutput) -> ForecastFile {
    ForecastFile {
        tool: "enroll".to_string(),
        generated: chrono::Local::now().to_rfc3339(),
        metric: run.series.metric,
        source: run.series.source.clone(),
        kind: run.kind,
        model: run.poly_model.clone(),
        rows: run.rows.clone(),
    }
}

/// Rewrite argv so `enroll` defaults to `enroll tui`.
///
/// Rules:
/// - `enroll`                      -> `enroll tui`
/// - `enroll --horizon 10 ...`     -> `enroll tui --horizon 10 ...`
/// - `enroll --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "trend" | "poly" | "plot" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(args(&["enroll"])), args(&["enroll", "tui"]));
        assert_eq!(
            rewrite_args(args(&["enroll", "--horizon", "10"])),
            args(&["enroll", "tui", "--horizon", "10"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["enroll", "poly", "-d", "3"])),
            args(&["enroll", "poly", "-d", "3"])
        );
        assert_eq!(rewrite_args(args(&["enroll", "--help"])), args(&["enroll", "--help"]));
    }
}
