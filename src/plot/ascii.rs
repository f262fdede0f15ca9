//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - historical observations: `o`
//! - fitted curve: `-` line
//! - forecast values: `*`

use crate::domain::{ForecastRow, SeriesLabel};

/// Render the output rows of a forecast run as a fixed-size character grid.
pub fn render_ascii_plot(rows: &[ForecastRow], width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (year_min, year_max) = year_range(rows).unwrap_or((2000, 2030));
    let (value_min, value_max) = value_range(rows).unwrap_or((0.0, 1.0));
    let (value_min, value_max) = pad_range(value_min, value_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw the fitted curve first (so point markers can overlay).
    let fitted: Vec<&ForecastRow> = rows
        .iter()
        .filter(|r| r.label == SeriesLabel::Fitted)
        .collect();
    let mut prev = None;
    for r in &fitted {
        let x = map_x(r.year, year_min, year_max, width);
        let y = map_y(r.value, value_min, value_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(&mut grid, x0, y0, x, y, '-');
        } else {
            grid[y][x] = '-';
        }
        prev = Some((x, y));
    }

    for r in rows {
        let ch = match r.label {
            SeriesLabel::Historical => 'o',
            SeriesLabel::Forecast => '*',
            SeriesLabel::Fitted => continue,
        };
        let x = map_x(r.year, year_min, year_max, width);
        let y = map_y(r.value, value_min, value_max, height);
        grid[y][x] = ch;
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: years=[{year_min}, {year_max}] | value=[{value_min:.2}, {value_max:.2}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn year_range(rows: &[ForecastRow]) -> Option<(i32, i32)> {
    let mut min_year = i32::MAX;
    let mut max_year = i32::MIN;
    for r in rows {
        min_year = min_year.min(r.year);
        max_year = max_year.max(r.year);
    }
    if rows.is_empty() {
        return None;
    }
    if max_year == min_year {
        // Single-year series: widen so mapping stays well-defined.
        return Some((min_year - 1, max_year + 1));
    }
    Some((min_year, max_year))
}

fn value_range(rows: &[ForecastRow]) -> Option<(f64, f64)> {
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;
    for r in rows {
        min_v = min_v.min(r.value);
        max_v = max_v.max(r.value);
    }
    if min_v.is_finite() && max_v.is_finite() && max_v > min_v {
        Some((min_v, max_v))
    } else if min_v.is_finite() {
        Some((min_v - 0.5, min_v + 0.5))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(year: i32, year_min: i32, year_max: i32, width: usize) -> usize {
    let width = width.max(2);
    let span = f64::from(year_max - year_min).max(1.0);
    let u = (f64::from(year - year_min) / span).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(value: f64, value_min: f64, value_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((value - value_min) / (value_max - value_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_golden_snapshot_small() {
        let rows = vec![
            ForecastRow {
                year: 2020,
                value: 0.0,
                label: SeriesLabel::Historical,
            },
            ForecastRow {
                year: 2029,
                value: 10.0,
                label: SeriesLabel::Historical,
            },
        ];

        let txt = render_ascii_plot(&rows, 10, 5);
        let expected = concat!(
            "Plot: years=[2020, 2029] | value=[-0.50, 10.50]\n",
            "         o\n",
            "          \n",
            "          \n",
            "          \n",
            "o         \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn forecast_rows_render_as_stars() {
        let rows = vec![
            ForecastRow {
                year: 2020,
                value: 1.0,
                label: SeriesLabel::Historical,
            },
            ForecastRow {
                year: 2030,
                value: 2.0,
                label: SeriesLabel::Forecast,
            },
        ];
        let txt = render_ascii_plot(&rows, 20, 6);
        assert!(txt.contains('o'));
        assert!(txt.contains('*'));
    }

    #[test]
    fn empty_rows_still_render_a_grid() {
        let txt = render_ascii_plot(&[], 10, 5);
        // Header + 5 blank rows, no panic.
        assert_eq!(txt.lines().count(), 6);
    }
}
