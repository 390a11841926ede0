//! The series store: one economic time series plus its metadata.
//!
//! A `Series` owns two index-aligned axes (`dates`, `values`) and every
//! transformation keeps them the same length. Operations in `crate::transform`
//! consume the series and hand it back, so branching a pipeline means cloning.

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::types::{Advisory, Derived, Frequency, NO_DATA, SeriesMeta};
use crate::error::SeriesError;

/// Date formats accepted at string boundaries (CLI flags, source text).
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m-%d-%Y", "%m/%d/%Y"];

#[derive(Debug, Clone)]
pub struct Series {
    id: String,
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
    frequency: Option<Frequency>,
    meta: SeriesMeta,
    derived: Derived,
    advisories: Vec<Advisory>,
}

impl Series {
    /// Build a series from parallel arrays.
    ///
    /// The frequency class is derived from `meta.frequency`; use
    /// [`Series::with_frequency`] to set it explicitly. An empty
    /// `meta.date_range` is filled in from the dates.
    pub fn new(
        id: impl Into<String>,
        dates: Vec<NaiveDate>,
        values: Vec<f64>,
        meta: SeriesMeta,
    ) -> Result<Self, SeriesError> {
        if dates.len() != values.len() {
            return Err(SeriesError::DimensionMismatch {
                dates: dates.len(),
                values: values.len(),
            });
        }
        if let Some(index) = dates.windows(2).position(|w| w[1] < w[0]) {
            return Err(SeriesError::UnsortedDates { index: index + 1 });
        }

        let frequency = Frequency::from_label(&meta.frequency);
        let mut series = Self {
            id: id.into(),
            dates,
            values,
            frequency,
            meta,
            derived: Derived::default(),
            advisories: Vec::new(),
        };
        if series.meta.date_range.trim().is_empty() {
            series.refresh_date_range();
        }
        Ok(series)
    }

    pub fn from_observations(
        id: impl Into<String>,
        observations: Vec<(NaiveDate, f64)>,
        meta: SeriesMeta,
    ) -> Result<Self, SeriesError> {
        let (dates, values) = observations.into_iter().unzip();
        Self::new(id, dates, values, meta)
    }

    /// Override the frequency class (and its metadata label).
    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.set_frequency(frequency);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn frequency(&self) -> Option<Frequency> {
        self.frequency
    }

    pub fn periods_per_year(&self) -> Option<usize> {
        self.frequency.map(Frequency::periods_per_year)
    }

    pub fn meta(&self) -> &SeriesMeta {
        &self.meta
    }

    pub fn meta_mut(&mut self) -> &mut SeriesMeta {
        &mut self.meta
    }

    pub fn derived(&self) -> &Derived {
        &self.derived
    }

    /// Non-fatal conditions recorded so far, oldest first.
    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    pub fn observations(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates.iter().copied().zip(self.values.iter().copied())
    }

    /// Swap in new primary axes.
    ///
    /// Derived outputs are dropped because they were computed on the old axis.
    pub(crate) fn replace_axes(&mut self, dates: Vec<NaiveDate>, values: Vec<f64>) {
        debug_assert_eq!(dates.len(), values.len());
        self.dates = dates;
        self.values = values;
        self.derived = Derived::default();
        self.refresh_date_range();
    }

    pub(crate) fn replace_values(&mut self, values: Vec<f64>) {
        debug_assert_eq!(self.dates.len(), values.len());
        self.values = values;
        self.derived = Derived::default();
    }

    pub(crate) fn derived_mut(&mut self) -> &mut Derived {
        &mut self.derived
    }

    pub(crate) fn set_frequency(&mut self, frequency: Frequency) {
        self.frequency = Some(frequency);
        self.meta.frequency = frequency.label().to_string();
    }

    pub(crate) fn advise(&mut self, advisory: Advisory) {
        warn!(series = %self.id, "{advisory}");
        self.advisories.push(advisory);
    }

    /// Move advisories recorded on another series (already logged) onto this one.
    pub(crate) fn absorb_advisories(&mut self, other: &mut Series) {
        self.advisories.append(&mut other.advisories);
    }

    /// Record a mismatch advisory unless the series has the `expected` frequency.
    pub(crate) fn expect_frequency(&mut self, operation: &str, expected: Frequency) {
        if self.frequency != Some(expected) {
            self.advise(Advisory::FrequencyMismatch {
                operation: operation.to_string(),
                expected,
                found: self.frequency,
            });
        }
    }

    pub(crate) fn require_len(&self, operation: &'static str, needed: usize) -> Result<(), SeriesError> {
        if self.len() < needed {
            return Err(SeriesError::InsufficientLength {
                operation,
                needed,
                got: self.len(),
            });
        }
        Ok(())
    }

    fn refresh_date_range(&mut self) {
        self.meta.date_range = format_date_range(&self.dates);
    }
}

/// Parse a calendar date in any of the accepted boundary formats.
pub fn parse_date(raw: &str) -> Result<NaiveDate, SeriesError> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| SeriesError::InvalidDate(raw.to_string()))
}

/// `"<first> to <last>"`, or the no-data sentinel.
pub fn format_date_range(dates: &[NaiveDate]) -> String {
    match (dates.first(), dates.last()) {
        (Some(first), Some(last)) => format!("{first} to {last}"),
        _ => NO_DATA.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn new_derives_frequency_and_range() {
        let meta = SeriesMeta {
            frequency: "Monthly, End of Period".into(),
            ..SeriesMeta::default()
        };
        let s = Series::new("X", vec![d(2020, 1, 1), d(2020, 2, 1)], vec![1.0, 2.0], meta).unwrap();
        assert_eq!(s.frequency(), Some(Frequency::Monthly));
        assert_eq!(s.periods_per_year(), Some(12));
        assert_eq!(s.meta().date_range, "2020-01-01 to 2020-02-01");
    }

    #[test]
    fn new_rejects_bad_axes() {
        let err = Series::new("X", vec![d(2020, 1, 1)], vec![1.0, 2.0], SeriesMeta::default()).unwrap_err();
        assert_eq!(err, SeriesError::DimensionMismatch { dates: 1, values: 2 });

        let err = Series::new(
            "X",
            vec![d(2020, 2, 1), d(2020, 1, 1)],
            vec![1.0, 2.0],
            SeriesMeta::default(),
        )
        .unwrap_err();
        assert_eq!(err, SeriesError::UnsortedDates { index: 1 });
    }

    #[test]
    fn from_observations_splits_pairs() {
        let meta = SeriesMeta {
            frequency: "Quarterly".into(),
            ..SeriesMeta::default()
        };
        let s = Series::from_observations("Q", vec![(d(2020, 1, 1), 1.5), (d(2020, 4, 1), f64::NAN)], meta).unwrap();
        assert_eq!(s.dates(), &[d(2020, 1, 1), d(2020, 4, 1)]);
        assert_eq!(s.values()[0], 1.5);
        assert!(s.values()[1].is_nan());
        assert_eq!(s.frequency(), Some(Frequency::Quarterly));
        assert_eq!(s.meta().date_range, "2020-01-01 to 2020-04-01");

        let err = Series::from_observations("Q", vec![(d(2020, 4, 1), 1.0), (d(2020, 1, 1), 2.0)], SeriesMeta::default())
            .unwrap_err();
        assert_eq!(err, SeriesError::UnsortedDates { index: 1 });
    }

    #[test]
    fn unknown_frequency_text_leaves_class_unset() {
        let meta = SeriesMeta {
            frequency: "Biweekly".into(),
            ..SeriesMeta::default()
        };
        let s = Series::new("X", vec![], vec![], meta).unwrap();
        assert_eq!(s.frequency(), None);
        assert_eq!(s.meta().date_range, NO_DATA);

        let s = s.with_frequency(Frequency::Annual);
        assert_eq!(s.frequency(), Some(Frequency::Annual));
        assert_eq!(s.meta().frequency, "Annual");
    }

    #[test]
    fn parse_date_accepts_boundary_formats() {
        assert_eq!(parse_date("2009-06-01").unwrap(), d(2009, 6, 1));
        assert_eq!(parse_date("06-01-2009").unwrap(), d(2009, 6, 1));
        assert_eq!(parse_date("06/01/2009").unwrap(), d(2009, 6, 1));
        assert!(matches!(parse_date("June 2009"), Err(SeriesError::InvalidDate(_))));
    }
}
