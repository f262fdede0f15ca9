//! Synthetic enrollment series generation.
//!
//! A smooth compound-growth baseline with seeded log-normal noise stands in
//! for the published census series, so every surface (CLI, TUI, exports)
//! works offline and deterministically.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{DatasetStats, MetricKind, SeriesPoint};
use crate::error::AppError;

/// First year of the generated series.
const FIRST_YEAR: i32 = 2000;

/// Entrants in the first sample year. Other metrics scale off this.
const BASE_LEVEL: f64 = 950_000.0;

/// Compound annual growth of the baseline.
const ANNUAL_GROWTH: f64 = 0.035;

/// Log-noise standard deviation around the baseline.
const NOISE_SIGMA: f64 = 0.02;

#[derive(Debug, Clone)]
pub struct SampleSeries {
    pub points: Vec<SeriesPoint>,
    pub metric: MetricKind,
    pub stats: DatasetStats,
}

/// Generate a synthetic per-year series.
pub fn generate_sample(years: usize, seed: u64, metric: MetricKind) -> Result<SampleSeries, AppError> {
    if years == 0 {
        return Err(AppError::new(2, "Sample year count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    // Graduates lag entrants: lower base, slightly slower growth. The total
    // is roughly the sum of both cohorts' levels.
    let (base, growth) = match metric {
        MetricKind::Entrants => (BASE_LEVEL, ANNUAL_GROWTH),
        MetricKind::Graduates => (BASE_LEVEL * 0.55, ANNUAL_GROWTH * 0.9),
        MetricKind::Total => (BASE_LEVEL * 1.55, ANNUAL_GROWTH),
    };

    let mut points = Vec::with_capacity(years);
    for i in 0..years {
        let baseline = base * (1.0 + growth).powi(i as i32);
        let z: f64 = normal.sample(&mut rng);
        // Half-sigma² correction keeps the expected value on the baseline.
        let noise = (NOISE_SIGMA * z - 0.5 * NOISE_SIGMA * NOISE_SIGMA).exp();
        points.push(SeriesPoint {
            year: FIRST_YEAR + i as i32,
            value: (baseline * noise).round(),
        });
    }

    let stats = DatasetStats::from_points(&points)
        .ok_or_else(|| AppError::new(4, "Failed to compute sample stats."))?;

    Ok(SampleSeries {
        points,
        metric,
        stats,
    })
}
