//! Remote fetch of the published census series CSV.
//!
//! The census publishes a processed per-year CSV in the same schema our
//! local ingest expects (`year`, metric columns, optional `level`). We fetch
//! it over HTTPS and hand the body to the shared ingest path — no
//! position-based spreadsheet reshaping happens here or anywhere else.

use reqwest::blocking::Client;

use crate::domain::Metric;
use crate::error::AppError;
use crate::io::ingest::{read_series, IngestedSeries};

const DEFAULT_URL: &str =
    "https://raw.githubusercontent.com/MuriloBarros304/censo-graduacao-br/main/data/processed/censo_totais.csv";

pub struct CensusClient {
    client: Client,
    url: String,
}

impl CensusClient {
    /// Build a client, honoring a `CENSUS_DATA_URL` override from the
    /// environment (or a `.env` file).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let url = std::env::var("CENSUS_DATA_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
        Self {
            client: Client::new(),
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch and normalize the remote series.
    pub fn fetch_series(&self, metric: Metric, level: &str) -> Result<IngestedSeries, AppError> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| AppError::new(4, format!("Census data request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::new(
                4,
                format!("Census data request failed with status {}.", resp.status()),
            ));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::new(4, format!("Failed to read census data response: {e}")))?;

        read_series(body.as_bytes(), metric, level)
    }
}
