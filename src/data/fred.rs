//! FRED integration: download `<ID>.txt` and parse it into a `Series`.

use reqwest::blocking::Client;
use tracing::debug;

use crate::config::FredConfig;
use crate::data::SeriesSource;
use crate::data::parse::parse_series_text;
use crate::domain::Series;
use crate::error::{AppError, SeriesError};

pub struct FredClient {
    client: Client,
    config: FredConfig,
}

impl FredClient {
    pub fn new(config: FredConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::new(4, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::new(FredConfig::from_env()?)
    }

    fn fetch_text(&self, series_id: &str) -> Result<String, SeriesError> {
        let url = self.config.series_url(series_id);
        debug!(series = series_id, %url, "fetching series");

        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| SeriesError::source_unavailable(series_id, format!("request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(SeriesError::source_unavailable(
                series_id,
                format!("request failed with status {}", resp.status()),
            ));
        }

        resp.text()
            .map_err(|e| SeriesError::source_unavailable(series_id, format!("failed to read body: {e}")))
    }
}

impl SeriesSource for FredClient {
    fn fetch(&self, series_id: &str) -> Result<Series, SeriesError> {
        let series_id = series_id.trim().to_ascii_uppercase();
        if series_id.is_empty() {
            return Err(SeriesError::InvalidParameter("empty series id".into()));
        }
        let text = self.fetch_text(&series_id)?;
        parse_series_text(&series_id, &text)
    }
}
