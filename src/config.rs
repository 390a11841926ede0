//! Runtime configuration for the FRED text endpoint.
//!
//! Values come from the process environment, after loading `.env` if present:
//!
//! - `FRED_DATA_URL`: base URL serving `<ID>.txt` files
//! - `FRED_TIMEOUT_SECS`: request timeout in seconds

use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://fred.stlouisfed.org/data";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FredConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for FredConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl FredConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut config = Self::default();

        if let Some(url) = lookup("FRED_DATA_URL").filter(|u| !u.trim().is_empty()) {
            config.base_url = url.trim().trim_end_matches('/').to_string();
        }

        if let Some(raw) = lookup("FRED_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| AppError::new(2, format!("Invalid FRED_TIMEOUT_SECS '{raw}'.")))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn series_url(&self, series_id: &str) -> String {
        format!("{}/{}.txt", self.base_url, series_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_env() {
        let config = FredConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, FredConfig::default());
        assert_eq!(
            config.series_url("GDPC1"),
            "https://fred.stlouisfed.org/data/GDPC1.txt"
        );
    }

    #[test]
    fn env_overrides_and_validation() {
        let config = FredConfig::from_lookup(|key| match key {
            "FRED_DATA_URL" => Some("http://localhost:8080/fred/".into()),
            "FRED_TIMEOUT_SECS" => Some("5".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.series_url("POP"), "http://localhost:8080/fred/POP.txt");
        assert_eq!(config.timeout, Duration::from_secs(5));

        let err = FredConfig::from_lookup(|key| (key == "FRED_TIMEOUT_SECS").then(|| "soon".into()))
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
