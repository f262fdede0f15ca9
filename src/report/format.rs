//! Formatted terminal output for forecast runs.

use crate::app::pipeline::RunOutput;
use crate::domain::{ForecastKind, ForecastRow, RunConfig, SeriesLabel};

/// Format the full run summary (source + dataset stats + model diagnostics).
pub fn format_run_summary(run: &RunOutput, config: &RunConfig) -> String {
    let mut out = String::new();

    out.push_str("=== enroll - Enrollment Forecast ===\n");
    out.push_str(&format!("Source: {}\n", run.series.source));
    out.push_str(&format!("Metric: {}\n", run.series.metric.display_name()));
    out.push_str(&format!("Forecaster: {}\n", run.kind.display_name()));
    out.push_str(&format!(
        "Points: n={} | years=[{}, {}] | value=[{:.0}, {:.0}]\n",
        run.series.stats.n_points,
        run.series.stats.year_min,
        run.series.stats.year_max,
        run.series.stats.value_min,
        run.series.stats.value_max,
    ));
    if run.series.skipped_rows > 0 {
        out.push_str(&format!(
            "Skipped {} invalid row(s) during ingest.\n",
            run.series.skipped_rows
        ));
    }

    out.push_str("\nModel:\n");
    match run.kind {
        ForecastKind::Trend => match &run.trend_model {
            Some(model) => {
                out.push_str(&format!(
                    "- horizon: {} year(s)\n- betas [intercept, trend, lag1, rolling_mean2]: {}\n",
                    config.horizon,
                    fmt_vec(&model.betas),
                ));
            }
            None => {
                out.push_str(
                    "- not fitted: history too short (at least 4 points are needed); no forecast produced\n",
                );
            }
        },
        ForecastKind::Poly => {
            out.push_str(&format!(
                "- degree: {} | horizon: {} year(s)\n",
                config.degree, config.horizon
            ));
            if let Some(model) = &run.poly_model {
                out.push_str(&format!("- normalized around year {}\n", model.year0));
                out.push_str("- coefficients:\n");
                for (power, coefficient) in model.terms() {
                    out.push_str(&format!("    x^{power}: {coefficient:+.6}\n"));
                }
            }
        }
    }

    let historical = count_label(&run.rows, SeriesLabel::Historical);
    let fitted = count_label(&run.rows, SeriesLabel::Fitted);
    let forecast = count_label(&run.rows, SeriesLabel::Forecast);
    out.push_str(&format!(
        "\nRows: {historical} historical, {fitted} fitted, {forecast} forecast\n"
    ));

    out
}

/// Format the output rows as an aligned table.
pub fn format_forecast_table(rows: &[ForecastRow]) -> String {
    let mut out = String::new();

    if rows.is_empty() {
        out.push_str("(no rows)\n");
        return out;
    }

    out.push_str(&format!("{:<6} {:>14} {:<12}\n", "year", "value", "series"));
    out.push_str(&format!("{:-<6} {:-<14} {:-<12}\n", "", "", ""));

    for row in rows {
        out.push_str(&format!(
            "{:<6} {:>14.2} {:<12}\n",
            row.year,
            row.value,
            row.label.display_name()
        ));
    }

    out
}

fn count_label(rows: &[ForecastRow], label: SeriesLabel) -> usize {
    rows.iter().filter(|r| r.label == label).count()
}

fn fmt_vec(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:.6}")).collect();
    format!("[{}]", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::{RunOutput, SeriesData};
    use crate::domain::{DatasetStats, Metric, MetricKind, PolyModel, SeriesPoint};

    fn sample_config(kind: ForecastKind) -> RunConfig {
        RunConfig {
            input: None,
            remote: false,
            metric: Metric::Auto,
            level: "total".to_string(),
            kind,
            horizon: 2,
            degree: 1,
            include_fit_curve: false,
            sample_years: 10,
            sample_seed: 0,
            plot: false,
            plot_width: 80,
            plot_height: 20,
            export_rows: None,
            export_forecast: None,
        }
    }

    fn sample_series() -> SeriesData {
        let points = vec![
            SeriesPoint { year: 2020, value: 10.0 },
            SeriesPoint { year: 2021, value: 12.0 },
        ];
        let stats = DatasetStats::from_points(&points).unwrap();
        SeriesData {
            points,
            metric: MetricKind::Entrants,
            stats,
            source: "test".to_string(),
            skipped_rows: 1,
        }
    }

    #[test]
    fn summary_lists_polynomial_coefficients_by_power() {
        let run = RunOutput {
            series: sample_series(),
            kind: ForecastKind::Poly,
            rows: vec![ForecastRow {
                year: 2020,
                value: 10.0,
                label: SeriesLabel::Historical,
            }],
            trend_model: None,
            poly_model: Some(PolyModel {
                year0: 2020,
                coefficients: vec![10.0, 2.0],
            }),
        };

        let text = format_run_summary(&run, &sample_config(ForecastKind::Poly));
        assert!(text.contains("x^0: +10.000000"));
        assert!(text.contains("x^1: +2.000000"));
        assert!(text.contains("Skipped 1 invalid row(s)"));
    }

    #[test]
    fn summary_notes_unfitted_trend_model() {
        let run = RunOutput {
            series: sample_series(),
            kind: ForecastKind::Trend,
            rows: Vec::new(),
            trend_model: None,
            poly_model: None,
        };

        let text = format_run_summary(&run, &sample_config(ForecastKind::Trend));
        assert!(text.contains("history too short"));
        assert!(text.contains("0 historical, 0 fitted, 0 forecast"));
    }

    #[test]
    fn table_renders_rows_and_empty_marker() {
        assert_eq!(format_forecast_table(&[]), "(no rows)\n");

        let rows = vec![ForecastRow {
            year: 2025,
            value: 1234.5,
            label: SeriesLabel::Forecast,
        }];
        let text = format_forecast_table(&rows);
        assert!(text.contains("2025"));
        assert!(text.contains("1234.50"));
        assert!(text.contains("forecast"));
    }
}
