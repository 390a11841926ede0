//! Read/write series JSON files.
//!
//! A series JSON file is the portable form of a transformed series:
//! - id, frequency class and header metadata
//! - the primary observations (missing values as `null`)
//! - recession bands, when attached
//! - the advisories recorded while it was built (informational only)

use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Advisory, Frequency, RecessionBand, Series, SeriesMeta};
use crate::error::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesFile {
    pub tool: String,
    pub id: String,
    pub frequency: Option<Frequency>,
    pub meta: SeriesMeta,
    pub observations: Vec<Observation>,
    #[serde(default)]
    pub recessions: Option<Vec<RecessionBand>>,
    #[serde(default)]
    pub advisories: Vec<Advisory>,
}

impl SeriesFile {
    pub fn from_series(series: &Series) -> Self {
        Self {
            tool: "fred".to_string(),
            id: series.id().to_string(),
            frequency: series.frequency(),
            meta: series.meta().clone(),
            observations: series
                .observations()
                .map(|(date, v)| Observation {
                    date,
                    value: v.is_finite().then_some(v),
                })
                .collect(),
            recessions: series.derived().recessions.clone(),
            advisories: series.advisories().to_vec(),
        }
    }

    /// Rebuild the series. Advisories are not replayed.
    pub fn into_series(self) -> Result<Series, AppError> {
        let (dates, values) = self
            .observations
            .into_iter()
            .map(|o| (o.date, o.value.unwrap_or(f64::NAN)))
            .unzip();
        let mut series = Series::new(self.id, dates, values, self.meta)?;
        if let Some(frequency) = self.frequency {
            series = series.with_frequency(frequency);
        }
        series.derived_mut().recessions = self.recessions;
        Ok(series)
    }
}

/// Write a series JSON file.
pub fn write_series_json(path: &Path, series: &Series) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create series JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, &SeriesFile::from_series(series))
        .map_err(|e| AppError::new(2, format!("Failed to write series JSON: {e}")))?;
    Ok(())
}

/// Read a series JSON file back into a `Series`.
pub fn read_series_json(path: &Path) -> Result<Series, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open series JSON '{}': {e}", path.display())))?;
    let parsed: SeriesFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid series JSON: {e}")))?;
    parsed.into_series()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn json_file_restores_series() {
        let meta = SeriesMeta {
            title: "Unemployment Rate".into(),
            units: "Percent".into(),
            frequency: "Monthly".into(),
            ..SeriesMeta::default()
        };
        let s = Series::new("UNRATE", vec![d(2008, 1), d(2008, 2), d(2008, 3)], vec![5.0, f64::NAN, 5.2], meta)
            .unwrap()
            .recessions()
            .unwrap();

        let path = std::env::temp_dir().join(format!("fred-series-json-{}.json", std::process::id()));
        write_series_json(&path, &s).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let back = read_series_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert!(text.contains("\"value\": null"));
        assert_eq!(back.id(), "UNRATE");
        assert_eq!(back.dates(), s.dates());
        assert_eq!(back.values()[0], 5.0);
        assert!(back.values()[1].is_nan());
        assert_eq!(back.frequency(), Some(Frequency::Monthly));
        assert_eq!(back.meta(), s.meta());
        assert_eq!(back.derived().recessions, s.derived().recessions);
    }

    #[test]
    fn unsorted_file_is_rejected() {
        let file = SeriesFile {
            tool: "fred".into(),
            id: "X".into(),
            frequency: None,
            meta: SeriesMeta::default(),
            observations: vec![
                Observation { date: d(2001, 1), value: Some(1.0) },
                Observation { date: d(2000, 1), value: Some(2.0) },
            ],
            recessions: None,
            advisories: Vec::new(),
        };
        assert_eq!(file.into_series().unwrap_err().exit_code(), 3);
    }
}
