//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - carried on a `Series` through a transformation chain
//! - exported to JSON/CSV
//! - reloaded later for plotting

use std::fmt;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Rendered in place of a date range when a series holds no observations.
pub const NO_DATA: &str = "no data";

/// Observation frequency class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annual,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::Annual,
    ];

    /// Observations expected per calendar year.
    pub fn periods_per_year(self) -> usize {
        match self {
            Frequency::Daily => 365,
            Frequency::Weekly => 52,
            Frequency::Monthly => 12,
            Frequency::Quarterly => 4,
            Frequency::Annual => 1,
        }
    }

    /// Label as it appears in the source metadata header.
    pub fn label(self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly => "Weekly",
            Frequency::Monthly => "Monthly",
            Frequency::Quarterly => "Quarterly",
            Frequency::Annual => "Annual",
        }
    }

    /// Classify free-form metadata text such as `"Monthly, End of Period"`.
    ///
    /// Matching is by prefix; anything unrecognized returns `None`.
    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|f| text.starts_with(f.label()))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a block of higher-frequency observations collapses into one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    #[default]
    Average,
    Sum,
    /// Last observation of the block.
    End,
}

impl Aggregation {
    pub fn apply(self, block: &[f64]) -> f64 {
        match self {
            Aggregation::Average => block.iter().sum::<f64>() / block.len() as f64,
            Aggregation::Sum => block.iter().sum(),
            Aggregation::End => block.last().copied().unwrap_or(f64::NAN),
        }
    }
}

/// Which date of an adjacent pair labels a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Keep the later date.
    #[default]
    Backward,
    /// Keep the earlier date.
    Forward,
}

/// Population reference used for per-capita normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Population {
    /// Total U.S. population.
    #[default]
    Total,
    /// Civilian noninstitutional population, 16 years and over.
    WorkingAge,
}

impl Population {
    pub fn series_id(self) -> &'static str {
        match self {
            Population::Total => "POP",
            Population::WorkingAge => "CNP16OV",
        }
    }
}

/// Descriptive header fields. Best-effort annotation, rewritten by transforms
/// that change what the values mean.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesMeta {
    pub title: String,
    pub source: String,
    pub seasonal_adjustment: String,
    pub frequency: String,
    pub units: String,
    pub date_range: String,
    pub last_updated: String,
}

/// A non-fatal condition noticed while transforming a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// The series frequency differs from the one an operation or parameter set assumes.
    FrequencyMismatch {
        operation: String,
        expected: Frequency,
        found: Option<Frequency>,
    },
    /// A frequency-dependent step was skipped because the class is unknown.
    UnknownFrequency { operation: String },
    /// Windowing left no observations.
    EmptyWindow { start: NaiveDate, end: NaiveDate },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::FrequencyMismatch {
                operation,
                expected,
                found,
            } => {
                let found = found.map(|fr| fr.label()).unwrap_or("unknown");
                write!(f, "{operation}: data frequency is {found}, parameters assume {expected}")
            }
            Advisory::UnknownFrequency { operation } => {
                write!(f, "{operation}: frequency unknown, frequency-dependent step skipped")
            }
            Advisory::EmptyWindow { start, end } => {
                write!(f, "window {start} to {end} contains no observations")
            }
        }
    }
}

/// A moving average kept alongside the primary series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Smoothed {
    pub length: usize,
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
    pub date_range: String,
}

/// A trend/cycle split that shares a date axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    pub dates: Vec<NaiveDate>,
    pub cycle: Vec<f64>,
    /// Absent for filters that only return a cycle (band-pass).
    pub trend: Option<Vec<f64>>,
}

/// First-difference outputs; every vector is one shorter than the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirstDifference {
    pub dates: Vec<NaiveDate>,
    /// `y[t] - y[t-1]`.
    pub difference: Vec<f64>,
    /// Demeaned difference.
    pub cycle: Vec<f64>,
    /// `y[t-1]`.
    pub lagged: Vec<f64>,
    /// `y[t]`.
    pub level: Vec<f64>,
}

/// One shaded recession interval, already clipped to the series range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecessionBand {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Outputs retained next to `values`/`dates` rather than replacing them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Derived {
    pub ma_two_sided: Option<Smoothed>,
    pub ma_one_sided: Option<Smoothed>,
    pub band_pass: Option<Decomposition>,
    pub hodrick_prescott: Option<Decomposition>,
    pub christiano_fitzgerald: Option<Decomposition>,
    pub linear_trend: Option<Decomposition>,
    pub first_difference: Option<FirstDifference>,
    pub recessions: Option<Vec<RecessionBand>>,
}

impl Derived {
    pub fn is_empty(&self) -> bool {
        *self == Derived::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frequency_matches_by_prefix() {
        assert_eq!(Frequency::from_label("Quarterly"), Some(Frequency::Quarterly));
        assert_eq!(
            Frequency::from_label("Monthly, End of Period"),
            Some(Frequency::Monthly)
        );
        assert_eq!(Frequency::from_label("  Daily, Close"), Some(Frequency::Daily));
        assert_eq!(Frequency::from_label("Semiannual"), None);
        assert_eq!(Frequency::from_label(""), None);
        assert_eq!(Frequency::Weekly.periods_per_year(), 52);
    }

    #[test]
    fn aggregation_methods() {
        let block = [1.0, 2.0, 6.0];
        assert!((Aggregation::Average.apply(&block) - 3.0).abs() < 1e-12);
        assert!((Aggregation::Sum.apply(&block) - 9.0).abs() < 1e-12);
        assert!((Aggregation::End.apply(&block) - 6.0).abs() < 1e-12);
    }
}
