//! Growth-rate transformations: period-over-period and year-over-year percent
//! change, plus the natural-log transform.
//!
//! All three replace the primary axes.

use chrono::NaiveDate;

use crate::domain::{Advisory, Direction, Series};
use crate::error::SeriesError;

/// Options for [`Series::percent_change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PercentChange {
    /// `100 * ln(v[i]/v[i-1])` when true, `100 * (v[i]/v[i-1] - 1)` otherwise.
    pub log: bool,
    pub direction: Direction,
    /// Scale by periods-per-year.
    pub annualize: bool,
}

impl Default for PercentChange {
    fn default() -> Self {
        Self {
            log: true,
            direction: Direction::Backward,
            annualize: false,
        }
    }
}

impl Series {
    /// Period-over-period percent change. The result is one observation shorter.
    pub fn percent_change(mut self, opts: PercentChange) -> Result<Self, SeriesError> {
        self.require_len("percent change", 2)?;

        let mut pct = lagged_change(self.values(), 1, opts.log);
        if opts.annualize {
            match self.periods_per_year() {
                Some(t) => pct.iter_mut().for_each(|v| *v *= t as f64),
                None => self.advise(Advisory::UnknownFrequency {
                    operation: "annualized percent change".to_string(),
                }),
            }
        }

        let dates = lagged_dates(self.dates(), 1, opts.direction);
        self.replace_axes(dates, pct);

        let meta = self.meta_mut();
        meta.units = "Percent".to_string();
        meta.title = format!("Percentage Change in {}", meta.title);
        Ok(self)
    }

    /// Percent change from one year earlier (`periods_per_year` observations back).
    ///
    /// With an unknown frequency the series is returned unchanged and an
    /// advisory is recorded.
    pub fn annual_percent_change(mut self, log: bool, direction: Direction) -> Result<Self, SeriesError> {
        let operation = "annual percent change";
        let Some(t) = self.periods_per_year() else {
            self.advise(Advisory::UnknownFrequency {
                operation: operation.to_string(),
            });
            return Ok(self);
        };
        self.require_len(operation, t + 1)?;

        let pct = lagged_change(self.values(), t, log);
        let dates = lagged_dates(self.dates(), t, direction);
        self.replace_axes(dates, pct);

        let meta = self.meta_mut();
        meta.units = "Percent".to_string();
        meta.title = format!("Annual Percentage Change in {}", meta.title);
        Ok(self)
    }

    /// Natural log of every observation.
    pub fn log(mut self) -> Self {
        let logged = self.values().iter().map(|v| v.ln()).collect();
        self.replace_values(logged);

        let meta = self.meta_mut();
        meta.units = format!("log {}", meta.units);
        meta.title = format!("Log {}", meta.title);
        self
    }
}

/// `100 * change(v[i], v[i-lag])` for `i` in `lag..N`.
fn lagged_change(values: &[f64], lag: usize, log: bool) -> Vec<f64> {
    values[lag..]
        .iter()
        .zip(values)
        .map(|(cur, prev)| {
            let ratio = cur / prev;
            if log { 100.0 * ratio.ln() } else { 100.0 * (ratio - 1.0) }
        })
        .collect()
}

fn lagged_dates(dates: &[NaiveDate], lag: usize, direction: Direction) -> Vec<NaiveDate> {
    match direction {
        Direction::Backward => dates[lag..].to_vec(),
        Direction::Forward => dates[..dates.len() - lag].to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Frequency, SeriesMeta};

    fn monthly(values: Vec<f64>) -> Series {
        let dates = (0..values.len())
            .map(|i| NaiveDate::from_ymd_opt(2020 + (i / 12) as i32, (i % 12) as u32 + 1, 1).unwrap())
            .collect();
        let meta = SeriesMeta {
            title: "Widgets".into(),
            units: "Count".into(),
            frequency: "Monthly".into(),
            ..SeriesMeta::default()
        };
        Series::new("W", dates, values, meta).unwrap()
    }

    #[test]
    fn simple_backward_change() {
        let s = monthly(vec![100.0, 110.0, 121.0])
            .percent_change(PercentChange {
                log: false,
                ..PercentChange::default()
            })
            .unwrap();
        assert_eq!(s.len(), 2);
        assert!((s.values()[0] - 10.0).abs() < 1e-9);
        assert!((s.values()[1] - 10.0).abs() < 1e-9);
        assert_eq!(s.dates()[0], NaiveDate::from_ymd_opt(2020, 2, 1).unwrap());
        assert_eq!(s.dates()[1], NaiveDate::from_ymd_opt(2020, 3, 1).unwrap());
        assert_eq!(s.meta().units, "Percent");
        assert_eq!(s.meta().title, "Percentage Change in Widgets");
        assert_eq!(s.meta().date_range, "2020-02-01 to 2020-03-01");
    }

    #[test]
    fn forward_keeps_earlier_dates_and_annualizes() {
        let s = monthly(vec![100.0, 101.0, 102.01])
            .percent_change(PercentChange {
                log: false,
                direction: Direction::Forward,
                annualize: true,
            })
            .unwrap();
        assert_eq!(s.dates()[0], NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert!((s.values()[0] - 12.0).abs() < 1e-9);
        assert!(s.advisories().is_empty());
    }

    #[test]
    fn annualize_without_frequency_is_skipped_with_advisory() {
        let mut s = monthly(vec![100.0, 110.0]);
        s.meta_mut().frequency.clear();
        let s = Series::new("W", s.dates().to_vec(), s.values().to_vec(), s.meta().clone()).unwrap();
        let s = s
            .percent_change(PercentChange {
                log: false,
                annualize: true,
                ..PercentChange::default()
            })
            .unwrap();
        assert!((s.values()[0] - 10.0).abs() < 1e-9);
        assert!(matches!(s.advisories()[0], Advisory::UnknownFrequency { .. }));
    }

    #[test]
    fn percent_change_needs_two_points() {
        let err = monthly(vec![1.0]).percent_change(PercentChange::default()).unwrap_err();
        assert!(matches!(err, SeriesError::InsufficientLength { needed: 2, got: 1, .. }));
    }

    #[test]
    fn year_over_year_drops_first_year() {
        let values: Vec<f64> = (0..15).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let s = monthly(values).annual_percent_change(true, Direction::Backward).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.dates()[0], NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        let want = 100.0 * 12.0 * 1.01f64.ln();
        assert!(s.values().iter().all(|v| (v - want).abs() < 1e-9));
        assert_eq!(s.meta().title, "Annual Percentage Change in Widgets");
    }

    #[test]
    fn year_over_year_guards_length() {
        let err = monthly(vec![1.0; 12])
            .annual_percent_change(true, Direction::Backward)
            .unwrap_err();
        assert_eq!(
            err,
            SeriesError::InsufficientLength {
                operation: "annual percent change",
                needed: 13,
                got: 12
            }
        );

        let quarterly = monthly(vec![1.0; 6]).with_frequency(Frequency::Quarterly);
        let s = quarterly.annual_percent_change(false, Direction::Forward).unwrap();
        assert_eq!(s.len(), 2);
        assert!(s.values().iter().all(|v| v.abs() < 1e-12));
    }

    #[test]
    fn year_over_year_without_frequency_is_skipped_with_advisory() {
        let mut meta = monthly(vec![]).meta().clone();
        meta.frequency = "Semiannual".into();
        let dates = (0..20)
            .map(|i| NaiveDate::from_ymd_opt(2000 + i / 2, 1 + 6 * (i % 2) as u32, 1).unwrap())
            .collect();
        let values: Vec<f64> = (1..=20).map(f64::from).collect();
        let s = Series::new("S", dates, values.clone(), meta).unwrap();

        let s = s.annual_percent_change(true, Direction::Backward).unwrap();
        assert_eq!(s.values(), &values[..]);
        assert_eq!(s.meta().title, "Widgets");
        assert_eq!(
            s.advisories(),
            &[Advisory::UnknownFrequency {
                operation: "annual percent change".into()
            }]
        );

        // Later steps still run.
        let s = s.hp_filter(1600.0).unwrap();
        assert!(s.derived().hodrick_prescott.is_some());
    }

    #[test]
    fn log_rewrites_metadata() {
        let s = monthly(vec![1.0, std::f64::consts::E]).log();
        assert!(s.values()[0].abs() < 1e-12);
        assert!((s.values()[1] - 1.0).abs() < 1e-12);
        assert_eq!(s.meta().units, "log Count");
        assert_eq!(s.meta().title, "Log Widgets");
    }
}
